//! Prompt rendering
//!
//! Both prompts are pure functions of their inputs, so identical runs send
//! identical conversations.

use crate::crew::{Persona, Step};
use crate::pipeline::Artifact;
use devcrew_llm::ToolDefinition;

/// System message for a persona
#[must_use]
pub fn system_prompt(persona: &Persona, tools: &[ToolDefinition]) -> String {
    let mut prompt = format!(
        "You are {}.\nYour goal: {}\n\n{}\n",
        persona.role.trim(),
        persona.goal.trim(),
        persona.backstory.trim()
    );

    if tools.is_empty() {
        prompt.push_str("\nNo tools are available. Answer from your own expertise.\n");
    } else {
        prompt.push_str("\nYou can use these tools:\n");
        for tool in tools {
            prompt.push_str(&format!("- {}: {}\n", tool.name, tool.description));
        }
        prompt.push_str(
            "\nCall a tool with a JSON object whose \"operation\" field selects the action. \
             Tool results come back as plain text.\n",
        );
    }

    prompt.push_str(
        "\nWhen you are done, reply with the complete deliverable as a markdown document.",
    );
    prompt
}

/// User message for a step: the filled template, the expected output and
/// every artifact produced so far in this run
#[must_use]
pub fn step_prompt(step: &Step, project_description: &str, prior: &[Artifact]) -> String {
    let mut prompt = format!(
        "{}\n\nExpected output:\n{}",
        step.render_description(project_description).trim(),
        step.expected_output.trim()
    );

    if !prior.is_empty() {
        prompt.push_str("\n\nContext from previous steps:");
        for artifact in prior {
            prompt.push_str(&format!(
                "\n\n## {} ({})\n\n{}",
                artifact.step,
                artifact.persona,
                artifact.content.trim()
            ));
        }
    }

    prompt
}
