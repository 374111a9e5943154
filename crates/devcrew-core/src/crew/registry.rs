//! Crew registry loader
//!
//! The built-in crew is embedded TOML. A user file (TOML or YAML) replaces it
//! wholesale. Every source goes through the same validation, so a bad file
//! fails at load time rather than mid-run.

use super::step::DESCRIPTION_PLACEHOLDER;
use super::{Persona, Step};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Built-in crew definition
pub const BUILTIN_CREW: &str = include_str!("../../config/crew.toml");

/// User-level crew override (`<config dir>/devcrew/crew.toml`)
#[must_use]
pub fn user_crew_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("devcrew").join("crew.toml"))
}

/// Ordered personas and steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewRegistry {
    personas: Vec<Persona>,
    steps: Vec<Step>,
}

impl CrewRegistry {
    /// Build a registry from records
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if the records fail validation.
    pub fn new(personas: Vec<Persona>, steps: Vec<Step>) -> Result<Self> {
        let registry = Self { personas, steps };
        registry.validate()?;
        Ok(registry)
    }

    /// The embedded crew
    ///
    /// # Errors
    /// Only if the embedded definition is broken.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CREW)
    }

    /// Parse and validate a TOML definition
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let registry: Self = toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse crew TOML: {}", e)))?;
        registry.validate()?;
        Ok(registry)
    }

    /// Parse and validate a YAML definition
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let registry: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse crew YAML: {}", e)))?;
        registry.validate()?;
        Ok(registry)
    }

    /// Load a definition file; `.yaml`/`.yml` is YAML, anything else TOML
    ///
    /// # Errors
    /// - file missing or unreadable
    /// - parse or validation failure
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Configuration(format!(
                "Crew file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");

        let parsed = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_toml_str(&content)
        };

        parsed.map_err(|e| match e {
            Error::Configuration(msg) => {
                Error::Configuration(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Resolve the crew for a run: an explicit file, else the user file when
    /// present, else the built-in crew
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!(path = %path.display(), "Loading crew file");
            return Self::from_file(path);
        }

        if let Some(path) = user_crew_path().filter(|p| p.exists()) {
            info!(path = %path.display(), "Loading user crew file");
            return Self::from_file(&path);
        }

        debug!("Using built-in crew");
        Self::builtin()
    }

    /// Check every invariant the pipeline relies on
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.personas.is_empty() {
            return Err(invalid("crew defines no personas"));
        }
        if self.steps.is_empty() {
            return Err(invalid("crew defines no steps"));
        }

        let mut persona_names = HashSet::new();
        for persona in &self.personas {
            require("persona", "name", &persona.name, &persona.name)?;
            require("persona", "role", &persona.name, &persona.role)?;
            require("persona", "goal", &persona.name, &persona.goal)?;
            require("persona", "backstory", &persona.name, &persona.backstory)?;

            if !persona_names.insert(persona.name.as_str()) {
                return Err(invalid(format!("duplicate persona '{}'", persona.name)));
            }
            if persona.max_iterations == 0 {
                return Err(invalid(format!(
                    "persona '{}' has max_iterations = 0",
                    persona.name
                )));
            }
            if persona.max_execution_secs == 0 {
                return Err(invalid(format!(
                    "persona '{}' has max_execution_secs = 0",
                    persona.name
                )));
            }
        }

        let mut step_names = HashSet::new();
        let mut destinations = HashSet::new();
        for step in &self.steps {
            require("step", "name", &step.name, &step.name)?;
            require("step", "persona", &step.name, &step.persona)?;
            require("step", "destination", &step.name, &step.destination)?;
            require("step", "description", &step.name, &step.description)?;
            require("step", "expected_output", &step.name, &step.expected_output)?;

            if !step_names.insert(step.name.as_str()) {
                return Err(invalid(format!("duplicate step '{}'", step.name)));
            }
            if !persona_names.contains(step.persona.as_str()) {
                return Err(invalid(format!(
                    "step '{}' references unknown persona '{}'",
                    step.name, step.persona
                )));
            }
            if !step.description.contains(DESCRIPTION_PLACEHOLDER) {
                return Err(invalid(format!(
                    "step '{}' template does not contain {}",
                    step.name, DESCRIPTION_PLACEHOLDER
                )));
            }
            if !is_relative_markdown(&step.destination) {
                return Err(invalid(format!(
                    "step '{}' destination '{}' must be a relative .md path",
                    step.name, step.destination
                )));
            }
            if !destinations.insert(step.destination.as_str()) {
                return Err(invalid(format!(
                    "step '{}' reuses destination '{}'",
                    step.name, step.destination
                )));
            }
        }

        Ok(())
    }

    /// Personas in canonical order
    #[must_use]
    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    /// Steps in canonical order
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Look up a persona
    #[must_use]
    pub fn persona(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.name == name)
    }

    /// Look up a step
    #[must_use]
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Persona names in canonical order
    #[must_use]
    pub fn persona_names(&self) -> Vec<&str> {
        self.personas.iter().map(|p| p.name.as_str()).collect()
    }

    /// Step names in canonical order
    #[must_use]
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::Configuration(format!("invalid crew definition: {}", msg.into()))
}

fn require(kind: &str, field: &str, owner: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        let owner = if owner.trim().is_empty() { "<unnamed>" } else { owner };
        return Err(invalid(format!("{} '{}' is missing {}", kind, owner, field)));
    }
    Ok(())
}

fn is_relative_markdown(destination: &str) -> bool {
    let path = Path::new(destination);
    path.extension().is_some_and(|ext| ext == "md")
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
