//! Application settings
//!
//! `AppConfig` is deserialized once at startup by the binary and passed by
//! reference into crew assembly. Nothing below this layer reads the
//! environment.

use crate::crew::ModelTier;
use crate::error::{Error, Result};
use crate::pipeline::RetryPolicy;
use devcrew_llm::OllamaConfig;
use devcrew_tools::{BuiltinsConfig, ResearchConfig, RunnerConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// LLM provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Ollama base URL
    pub base_url: String,
    /// Model for the `default` tier
    pub default_model: String,
    /// Model for the `code` tier
    pub code_model: String,
    /// Model for the `analysis` tier
    pub analysis_model: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Max tokens per completion
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            default_model: "llama3.2:3b".to_string(),
            code_model: "codellama:7b".to_string(),
            analysis_model: "mistral:7b".to_string(),
            timeout_secs: 300,
            max_tokens: 4096,
        }
    }
}

/// Pipeline failure policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Attempts per step, including the first
    pub max_attempts: u32,
    /// Pause between attempts
    pub retry_delay_ms: u64,
    /// Record a failed step and keep going
    pub continue_on_failure: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            retry_delay_ms: 1000,
            continue_on_failure: false,
        }
    }
}

/// Tool runner settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Base directory for relative tool paths
    pub workspace_root: Option<PathBuf>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            workspace_root: None,
        }
    }
}

/// Web research settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Scrape truncation length
    pub max_chars: usize,
    /// Instant Answer API endpoint
    pub search_endpoint: String,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        let defaults = ResearchConfig::default();
        Self {
            timeout_secs: defaults.timeout.as_secs(),
            max_chars: defaults.max_chars,
            search_endpoint: defaults.search_endpoint,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// LLM provider
    pub llm: LlmSettings,
    /// Where artifacts are written
    pub output_dir: PathBuf,
    /// Debug-level logging
    pub verbose: bool,
    /// Crew definition file replacing the built-in registry
    pub crew_file: Option<PathBuf>,
    /// Failure policy
    pub pipeline: PipelineSettings,
    /// Tool runner
    pub tools: ToolSettings,
    /// Web research
    pub research: ResearchSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            output_dir: PathBuf::from("output"),
            verbose: false,
            crew_file: None,
            pipeline: PipelineSettings::default(),
            tools: ToolSettings::default(),
            research: ResearchSettings::default(),
        }
    }
}

impl AppConfig {
    /// Check values that deserialize fine but cannot work
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let url = self.llm.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Configuration(format!(
                "llm.base_url must be an http(s) URL, got '{}'",
                self.llm.base_url
            )));
        }

        for (field, value) in [
            ("llm.default_model", &self.llm.default_model),
            ("llm.code_model", &self.llm.code_model),
            ("llm.analysis_model", &self.llm.analysis_model),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Configuration(format!("{} must not be empty", field)));
            }
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::Configuration("output_dir must not be empty".to_string()));
        }

        for (field, value) in [
            ("llm.timeout_secs", self.llm.timeout_secs),
            ("llm.max_tokens", u64::from(self.llm.max_tokens)),
            ("pipeline.max_attempts", u64::from(self.pipeline.max_attempts)),
            ("tools.timeout_secs", self.tools.timeout_secs),
            ("research.timeout_secs", self.research.timeout_secs),
        ] {
            if value == 0 {
                return Err(Error::Configuration(format!("{} must be greater than 0", field)));
            }
        }

        Ok(())
    }

    /// Model identifier for a tier
    #[must_use]
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Default => &self.llm.default_model,
            ModelTier::Code => &self.llm.code_model,
            ModelTier::Analysis => &self.llm.analysis_model,
        }
    }

    /// Ollama provider settings
    #[must_use]
    pub fn ollama_config(&self) -> OllamaConfig {
        OllamaConfig::new()
            .with_base_url(&self.llm.base_url)
            .with_model(&self.llm.default_model)
            .with_max_tokens(self.llm.max_tokens)
            .with_timeout(Duration::from_secs(self.llm.timeout_secs))
    }

    /// Built-in adapter settings
    #[must_use]
    pub fn builtins_config(&self) -> BuiltinsConfig {
        BuiltinsConfig {
            workspace_root: self.tools.workspace_root.clone(),
            research: ResearchConfig::default()
                .with_timeout(Duration::from_secs(self.research.timeout_secs))
                .with_max_chars(self.research.max_chars)
                .with_search_endpoint(&self.research.search_endpoint),
        }
    }

    /// Tool runner settings
    #[must_use]
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::new(Duration::from_secs(self.tools.timeout_secs))
    }

    /// Step retry policy
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.pipeline.max_attempts)
            .with_delay(Duration::from_millis(self.pipeline.retry_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.model_for(ModelTier::Code), "codellama:7b");
        assert_eq!(config.model_for(ModelTier::Default), "llama3.2:3b");
        assert_eq!(config.retry_policy().max_attempts, 1);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
output_dir = "artifacts"

[llm]
code_model = "qwen2.5-coder:7b"

[pipeline]
continue_on_failure = true
"#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("artifacts"));
        assert_eq!(config.llm.code_model, "qwen2.5-coder:7b");
        assert_eq!(config.llm.default_model, "llama3.2:3b");
        assert!(config.pipeline.continue_on_failure);
        assert_eq!(config.pipeline.max_attempts, 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.llm.base_url = "localhost:11434".to_string();
        assert!(matches!(config.validate(), Err(Error::Configuration(msg)) if msg.contains("base_url")));

        let mut config = AppConfig::default();
        config.pipeline.max_attempts = 0;
        assert!(matches!(config.validate(), Err(Error::Configuration(msg)) if msg.contains("max_attempts")));

        let mut config = AppConfig::default();
        config.llm.code_model = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_derived_settings() {
        let mut config = AppConfig::default();
        config.llm.base_url = "http://gpu-box:11434/".to_string();
        config.tools.workspace_root = Some(PathBuf::from("/tmp/work"));
        config.research.max_chars = 500;

        assert_eq!(config.ollama_config().base_url, "http://gpu-box:11434");
        let builtins = config.builtins_config();
        assert_eq!(builtins.workspace_root, Some(PathBuf::from("/tmp/work")));
        assert_eq!(builtins.research.max_chars, 500);
        assert_eq!(config.runner_config().default_timeout, Duration::from_secs(30));
    }
}
