//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat, Map};
use devcrew_core::AppConfig;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Plain variables written by `devcrew setup` into `.env`, and the settings
/// they override
const LEGACY_VARIABLES: [(&str, &str); 6] = [
    ("OLLAMA_BASE_URL", "llm.base_url"),
    ("DEFAULT_LLM_MODEL", "llm.default_model"),
    ("CODE_LLM_MODEL", "llm.code_model"),
    ("ANALYSIS_LLM_MODEL", "llm.analysis_model"),
    ("OUTPUT_DIR", "output_dir"),
    ("VERBOSE", "verbose"),
];

/// Load configuration from files and the process environment
pub fn load_config() -> Result<AppConfig> {
    load_config_with(std::env::vars().collect())
}

/// Load configuration against an explicit environment map
pub fn load_config_with(env: Map<String, String>) -> Result<AppConfig> {
    let mut builder = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. Project overrides (optional)
        .add_source(File::with_name("config/devcrew").required(false))
        .add_source(File::with_name("config/local").required(false))
        // 3. DEVCREW_LLM__BASE_URL style variables
        .add_source(
            Environment::with_prefix("DEVCREW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone())),
        );

    // 4. Plain .env variables win over everything but CLI flags
    for (variable, key) in LEGACY_VARIABLES {
        let value = env
            .get(variable)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        builder = builder
            .set_override_option(key, value)
            .with_context(|| format!("Failed to apply {}", variable))?;
    }

    builder
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
