//! Step records

use serde::{Deserialize, Serialize};

/// Placeholder every step template must contain
pub const DESCRIPTION_PLACEHOLDER: &str = "{project_description}";

/// One unit of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Unique identifier (e.g. `design_architecture`)
    pub name: String,
    /// Persona that performs the step
    pub persona: String,
    /// Artifact file name, relative to the output directory
    pub destination: String,
    /// Prompt template
    pub description: String,
    /// What the artifact should contain
    pub expected_output: String,
}

impl Step {
    /// Create a step
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        persona: impl Into<String>,
        destination: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            persona: persona.into(),
            destination: destination.into(),
            description: description.into(),
            expected_output: expected_output.into(),
        }
    }

    /// The template with the project description filled in
    #[must_use]
    pub fn render_description(&self, project_description: &str) -> String {
        self.description
            .replace(DESCRIPTION_PLACEHOLDER, project_description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_description() {
        let step = Step::new(
            "analyze_project",
            "business_analyst",
            "project_analysis.md",
            "Analyze: {project_description}",
            "A document",
        );
        assert_eq!(step.render_description("Build a todo API"), "Analyze: Build a todo API");
    }
}
