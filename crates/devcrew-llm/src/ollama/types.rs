//! Ollama wire types and provider configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Models the default crew is set up with
pub const SUGGESTED_MODELS: &[&str] = &["llama3.2:3b", "codellama:7b", "mistral:7b"];

/// Default Ollama model
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

/// Default Ollama API URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

// ============================================================================
// API Types
// ============================================================================

/// Request for the Ollama chat endpoint
#[derive(Debug, Serialize)]
pub struct OllamaChatRequest {
    /// The model name to use
    pub model: String,
    /// List of messages in the conversation
    pub messages: Vec<OllamaMessage>,
    /// Additional model options (temperature, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaOptions>,
    /// Whether to stream the response
    pub stream: bool,
    /// Tools available for the model to use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OllamaTool>>,
}

/// Message format for Ollama chat
#[derive(Debug, Serialize)]
pub struct OllamaMessage {
    /// Role of the message sender (system, user, assistant, tool)
    pub role: String,
    /// Content of the message
    pub content: String,
    /// Tool calls made by the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OllamaToolCall>>,
}

/// Model configuration options for Ollama
#[derive(Debug, Serialize)]
pub struct OllamaOptions {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

/// Tool definition for Ollama
#[derive(Debug, Serialize, Deserialize)]
pub struct OllamaTool {
    /// Type of tool (always "function")
    pub r#type: String,
    /// Function details
    pub function: OllamaFunction,
}

/// Function definition for a tool
#[derive(Debug, Serialize, Deserialize)]
pub struct OllamaFunction {
    /// Tool name the model calls back with
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON schema of the parameters
    pub parameters: serde_json::Value,
}

/// A tool call made by the model
#[derive(Debug, Serialize, Deserialize)]
pub struct OllamaToolCall {
    /// Called function
    pub function: OllamaFunctionCall,
}

/// Specific function call details
#[derive(Debug, Serialize, Deserialize)]
pub struct OllamaFunctionCall {
    /// Tool name
    pub name: String,
    /// Arguments as a JSON object (Ollama does not stringify them)
    pub arguments: serde_json::Value,
}

/// Response from the Ollama chat endpoint
///
/// Only the fields devcrew reads are kept; serde skips the rest.
#[derive(Debug, Deserialize)]
pub struct OllamaChatResponse {
    /// Model that answered
    pub model: String,
    /// Assistant message
    pub message: OllamaResponseMessage,
    /// Why generation stopped ("stop", "length")
    #[serde(default)]
    pub done_reason: Option<String>,
    /// Prompt tokens evaluated
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    /// Tokens generated
    #[serde(default)]
    pub eval_count: Option<u32>,
}

/// Message format in Ollama responses
#[derive(Debug, Deserialize)]
pub struct OllamaResponseMessage {
    /// Text content, empty when the model only calls tools
    #[serde(default)]
    pub content: String,
    /// Requested tool calls
    #[serde(default)]
    pub tool_calls: Option<Vec<OllamaToolCall>>,
}

/// Error response from Ollama API
#[derive(Debug, Deserialize)]
pub struct OllamaError {
    /// Error message
    pub error: String,
}

/// Response from the /api/tags endpoint
#[derive(Debug, Deserialize)]
pub struct OllamaTagsResponse {
    /// Locally installed models
    pub models: Vec<OllamaModel>,
}

/// Model information from the tags response
#[derive(Debug, Deserialize)]
pub struct OllamaModel {
    /// Model name with tag, e.g. `llama3.2:3b`
    pub name: String,
}

/// Ollama provider configuration
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL (default: http://localhost:11434)
    pub base_url: String,
    /// Model used when a request leaves the model empty
    pub default_model: String,
    /// Default max tokens
    pub default_max_tokens: u32,
    /// Request timeout (longer for local inference)
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            default_max_tokens: 4096,
            timeout: Duration::from_secs(300), // 5 minutes for local inference
        }
    }
}

impl OllamaConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL (a trailing slash is dropped)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the default max tokens
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
