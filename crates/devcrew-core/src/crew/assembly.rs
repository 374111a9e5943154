//! Crew assembly
//!
//! Binds every persona to the shared provider and its configured model, and
//! turns a full or custom selection into an ordered [`RunPlan`].

use super::selection::select;
use super::{CrewRegistry, Persona, Step};
use crate::agent::{AgentSettings, PersonaAgent};
use crate::config::AppConfig;
use crate::error::{Error, Result, StepError};
use crate::pipeline::StepInvoker;
use devcrew_llm::LlmProvider;
use devcrew_tools::{register_builtins, ToolRegistry, ToolRunner};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Build the shared registry holding the four built-in adapters
///
/// # Errors
/// Returns [`Error::Tool`] if an adapter cannot be constructed.
pub fn build_tool_registry(config: &AppConfig) -> Result<Arc<ToolRegistry>> {
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, &config.builtins_config())?;
    Ok(Arc::new(registry))
}

/// A persona with its resolved model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewMember {
    /// Persona record
    pub persona: Persona,
    /// Model identifier for the persona's tier
    pub model: String,
}

/// Ordered steps for one run
#[derive(Debug, Clone, Default)]
pub struct RunPlan {
    /// Steps in canonical order
    pub steps: Vec<Step>,
    /// Persona names taking part
    pub roster: Vec<String>,
    /// Human-readable notes about dropped or mismatched selections
    pub warnings: Vec<String>,
}

/// Personas bound to a provider, their models and the shared tools
pub struct Crew {
    registry: CrewRegistry,
    members: Vec<CrewMember>,
    provider: Arc<dyn LlmProvider>,
    runner: ToolRunner,
    settings: AgentSettings,
}

impl Crew {
    /// Assemble a crew
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] for invalid settings or when a persona
    /// names a tool the registry does not have.
    pub fn assemble(
        config: &AppConfig,
        registry: CrewRegistry,
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
    ) -> Result<Self> {
        config.validate()?;

        for persona in registry.personas() {
            for tool in persona.tools.iter().flatten() {
                if !tools.has(tool) {
                    return Err(Error::Configuration(format!(
                        "persona '{}' uses unknown tool '{}'",
                        persona.name, tool
                    )));
                }
            }
        }

        let members: Vec<CrewMember> = registry
            .personas()
            .iter()
            .map(|persona| CrewMember {
                model: config.model_for(persona.model_tier).to_string(),
                persona: persona.clone(),
            })
            .collect();

        for member in &members {
            debug!(persona = %member.persona.name, model = %member.model, "Crew member bound");
        }
        info!(
            provider = provider.name(),
            personas = members.len(),
            steps = registry.steps().len(),
            tools = tools.len(),
            "Crew assembled"
        );

        Ok(Self {
            registry,
            members,
            provider,
            runner: ToolRunner::new(tools, config.runner_config()),
            settings: AgentSettings {
                max_tokens: Some(config.llm.max_tokens),
                temperature: None,
            },
        })
    }

    /// The underlying registry
    #[must_use]
    pub fn registry(&self) -> &CrewRegistry {
        &self.registry
    }

    /// All members in canonical order
    #[must_use]
    pub fn members(&self) -> &[CrewMember] {
        &self.members
    }

    /// Member by persona name
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&CrewMember> {
        self.members.iter().find(|m| m.persona.name == name)
    }

    /// The shared tool runner
    #[must_use]
    pub fn runner(&self) -> &ToolRunner {
        &self.runner
    }

    /// A reasoning driver for a persona
    #[must_use]
    pub fn agent_for(&self, name: &str) -> Option<PersonaAgent> {
        self.member(name).map(|member| {
            PersonaAgent::new(
                member.persona.clone(),
                &member.model,
                Arc::clone(&self.provider),
                self.runner.clone(),
            )
            .with_settings(self.settings.clone())
        })
    }

    /// Every step, every persona
    #[must_use]
    pub fn plan_full(&self) -> RunPlan {
        RunPlan {
            steps: self.registry.steps().to_vec(),
            roster: self
                .registry
                .persona_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            warnings: Vec::new(),
        }
    }

    /// Resolve a custom persona and step selection
    ///
    /// Items are names or 1-based indices. Unknown items are dropped with a
    /// warning. Selected steps keep their canonical order.
    ///
    /// # Errors
    /// Returns [`Error::Selection`] when either side resolves to nothing.
    pub fn plan_custom<P, S>(&self, personas: &[P], steps: &[S]) -> Result<RunPlan>
    where
        P: AsRef<str>,
        S: AsRef<str>,
    {
        let persona_selection = select(personas, &self.registry.persona_names());
        let step_selection = select(steps, &self.registry.step_names());

        if persona_selection.is_empty() || step_selection.is_empty() {
            return Err(Error::Selection("Invalid agent or task selection!".to_string()));
        }

        let mut warnings: Vec<String> = persona_selection
            .dropped
            .iter()
            .map(|item| format!("Ignoring unknown agent '{}'", item))
            .chain(
                step_selection
                    .dropped
                    .iter()
                    .map(|item| format!("Ignoring unknown task '{}'", item)),
            )
            .collect();

        let selected_steps: Vec<Step> = self
            .registry
            .steps()
            .iter()
            .filter(|step| step_selection.contains(&step.name))
            .cloned()
            .collect();

        for step in &selected_steps {
            if !persona_selection.contains(&step.persona) {
                warn!(
                    step = %step.name,
                    persona = %step.persona,
                    "Selected step runs with an unselected persona"
                );
                warnings.push(format!(
                    "Task '{}' runs with '{}', which was not selected",
                    step.name, step.persona
                ));
            }
        }

        Ok(RunPlan {
            steps: selected_steps,
            roster: persona_selection.selected,
            warnings,
        })
    }
}

#[async_trait::async_trait]
impl StepInvoker for Crew {
    async fn invoke(&self, step: &Step, prompt: &str) -> std::result::Result<String, StepError> {
        let agent = self
            .agent_for(&step.persona)
            .ok_or_else(|| StepError::UnknownPersona(step.persona.clone()))?;
        agent.run(prompt).await
    }
}
