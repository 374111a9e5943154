//! Error types for devcrew-core
//!
//! This module provides error types and user-friendly error formatting.

use std::path::PathBuf;
use thiserror::Error;

/// Why a single step produced no artifact
#[derive(Debug, Error)]
pub enum StepError {
    /// The provider call failed
    #[error("llm call failed: {0}")]
    Llm(#[from] devcrew_llm::Error),

    /// The persona kept calling tools past its iteration budget
    #[error("exceeded {limit} reasoning iterations")]
    IterationLimit {
        /// Configured budget
        limit: u32,
    },

    /// The persona ran past its execution time budget
    #[error("exceeded execution time limit of {limit_secs}s")]
    Timeout {
        /// Configured budget in seconds
        limit_secs: u64,
    },

    /// The final answer was blank
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The step names a persona the crew does not have
    #[error("persona '{0}' is not part of the crew")]
    UnknownPersona(String),

    /// The artifact could not be persisted
    #[error("failed to write artifact {}: {source}", path.display())]
    Artifact {
        /// Destination path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid settings, persona or step definitions
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A custom selection resolved to nothing
    #[error("selection error: {0}")]
    Selection(String),

    /// A step failed and stopped the run
    #[error("step '{step}' failed: {source}")]
    StepExecution {
        /// Step name
        step: String,
        /// Cause
        #[source]
        source: StepError,
    },

    /// LLM provider error
    #[error("llm error: {0}")]
    Llm(#[from] devcrew_llm::Error),

    /// Tool error
    #[error("tool error: {0}")]
    Tool(#[from] devcrew_tools::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
pub trait UserFriendlyError {
    /// One-line message for the terminal
    fn user_message(&self) -> String;

    /// How to fix it, when there is something to suggest
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Configuration(msg) => format!("⚙️ Configuration error: {}", msg),
            Error::Selection(msg) => format!("❌ {}", msg),
            Error::StepExecution { step, source } => {
                format!("⚡ Step '{}' failed: {}", step, source)
            }
            Error::Llm(e) => format!("🤖 LLM error: {}", e),
            Error::Tool(e) => format!("🔧 Tool error: {}", e),
            Error::Io(e) => format!("💾 File system error: {}", e),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Configuration(_) => Some(
                "💡 Check config/devcrew.toml, your crew file and .env, or run `devcrew setup`."
                    .to_string(),
            ),
            Error::Selection(_) => Some(
                "💡 Use names or numbers from `devcrew list`, separated by commas.".to_string(),
            ),
            Error::StepExecution { source, .. } => match source {
                StepError::Llm(_) => Some(
                    "💡 Make sure Ollama is running (`ollama serve`) and the models are pulled; `devcrew doctor` checks both."
                        .to_string(),
                ),
                StepError::IterationLimit { .. } | StepError::Timeout { .. } => Some(
                    "💡 Raise max_iterations or max_execution_secs for the persona in your crew file."
                        .to_string(),
                ),
                StepError::Artifact { .. } => {
                    Some("💡 Check that the output directory is writable.".to_string())
                }
                StepError::EmptyResponse => {
                    Some("💡 Retry with --retries 2 or try a larger model.".to_string())
                }
                StepError::UnknownPersona(_) => None,
            },
            Error::Llm(_) => Some("💡 Run `devcrew doctor` to check the Ollama setup.".to_string()),
            _ => None,
        }
    }
}

/// Format an error for display in the CLI: the message, then the suggestion
/// on its own line
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = error.user_message();

    if let Some(suggestion) = error.suggestion() {
        output.push('\n');
        output.push_str(&suggestion);
    }

    output
}
