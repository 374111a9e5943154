//! Persona records

use serde::{Deserialize, Serialize};

/// Which configured model a persona reasons with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// General model (`llm.default_model`)
    #[default]
    Default,
    /// Code model (`llm.code_model`)
    Code,
    /// Analysis model (`llm.analysis_model`)
    Analysis,
}

impl ModelTier {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Code => "code",
            Self::Analysis => "analysis",
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_max_iterations() -> u32 {
    3
}

fn default_max_execution_secs() -> u64 {
    300
}

/// A reasoning role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Unique identifier (e.g. `tech_lead`)
    pub name: String,
    /// Role title used in the system prompt
    pub role: String,
    /// What the persona is trying to achieve
    pub goal: String,
    /// Background that shapes the answers
    pub backstory: String,
    /// Model tier
    #[serde(default)]
    pub model_tier: ModelTier,
    /// Reasoning iterations per step
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Wall-clock budget per step, in seconds
    #[serde(default = "default_max_execution_secs")]
    pub max_execution_secs: u64,
    /// Tools the persona may call; all registered tools when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

impl Persona {
    /// Create a persona with default limits
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            model_tier: ModelTier::Default,
            max_iterations: default_max_iterations(),
            max_execution_secs: default_max_execution_secs(),
            tools: None,
        }
    }

    /// Set the model tier
    #[must_use]
    pub fn with_model_tier(mut self, tier: ModelTier) -> Self {
        self.model_tier = tier;
        self
    }

    /// Set the iteration budget
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the time budget
    #[must_use]
    pub fn with_max_execution_secs(mut self, secs: u64) -> Self {
        self.max_execution_secs = secs;
        self
    }

    /// Restrict the persona to the named tools
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = Some(tools);
        self
    }
}
