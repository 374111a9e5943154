//! `devcrew list`

use super::ListArgs;
use devcrew_core::{AppConfig, CrewRegistry};

/// Numbered persona and step listing
pub fn render(registry: &CrewRegistry, config: &AppConfig) -> String {
    let mut out = String::from("Available Agents:\n");
    for (i, persona) in registry.personas().iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} ({}, {})\n",
            i + 1,
            persona.name,
            persona.role.trim(),
            config.model_for(persona.model_tier)
        ));
    }

    out.push_str("\nAvailable Tasks:\n");
    for (i, step) in registry.steps().iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} [{}] -> {}\n",
            i + 1,
            step.name,
            step.persona,
            step.destination
        ));
    }
    out
}

pub fn run(args: ListArgs, config: &AppConfig) -> anyhow::Result<()> {
    let path = args.crew.as_deref().or(config.crew_file.as_deref());
    let registry = CrewRegistry::load(path)?;
    print!("{}", render(&registry, config));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_builtin() {
        let registry = CrewRegistry::builtin().unwrap();
        let text = render(&registry, &AppConfig::default());

        assert!(text.starts_with("Available Agents:\n  1. senior_developer (Senior Software Developer, codellama:7b)\n"));
        assert!(text.contains("  6. tech_lead (Technical Lead, llama3.2:3b)\n"));
        assert!(text.contains("\nAvailable Tasks:\n  1. analyze_project [business_analyst] -> project_analysis.md\n"));
        assert!(text.ends_with("  10. review_code [senior_developer] -> code_review.md\n"));
    }
}
