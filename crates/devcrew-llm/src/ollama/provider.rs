//! Ollama HTTP provider

use super::{
    convert, security,
    types::{
        OllamaChatRequest, OllamaChatResponse, OllamaConfig, OllamaError, OllamaOptions,
        OllamaTagsResponse, SUGGESTED_MODELS,
    },
};
use crate::completion::{
    CompletionRequest, CompletionResponse, TokenUsage, ToolCompletionRequest,
    ToolCompletionResponse,
};
use crate::error::{Error, Result};
use crate::provider::LlmProvider;
use reqwest::Client;
use tracing::{debug, instrument};

/// Ollama local provider
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
    /// Cached list of available models
    cached_models: std::sync::RwLock<Vec<String>>,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            client,
            config,
            cached_models: std::sync::RwLock::new(Vec::new()),
        })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(OllamaConfig::default())
    }

    /// Provider configuration
    #[must_use]
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Check if Ollama is reachable
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        self.client.get(&url).send().await.is_ok()
    }

    /// List models installed in the local Ollama
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to connect to Ollama: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "Ollama returned status {}",
                response.status()
            )));
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        let models: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();

        if let Ok(mut cache) = self.cached_models.write() {
            *cache = models.clone();
        }

        Ok(models)
    }

    fn resolve_model<'a>(&'a self, requested: &'a str) -> &'a str {
        if requested.is_empty() {
            &self.config.default_model
        } else {
            requested
        }
    }

    pub(super) fn options(&self, request: &CompletionRequest) -> Option<OllamaOptions> {
        Some(OllamaOptions {
            temperature: request.temperature,
            num_predict: request.max_tokens.or(Some(self.config.default_max_tokens)),
        })
    }

    async fn send_request(&self, request: OllamaChatRequest) -> Result<OllamaChatResponse> {
        let url = format!("{}/api/chat", self.config.base_url);

        debug!(model = %request.model, messages = request.messages.len(), "Sending request to Ollama");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    Error::Network(format!(
                        "Failed to connect to Ollama at {}. Is Ollama running?",
                        self.config.base_url
                    ))
                } else if e.is_timeout() {
                    Error::Timeout(self.config.timeout.as_millis() as u64)
                } else {
                    Error::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<OllamaError>(&body) {
                return Err(Error::Api(security::sanitize_api_error(&error.error)));
            }
            return Err(Error::Api(security::sanitize_api_error(&format!(
                "HTTP {}: {}",
                status, body
            ))));
        }

        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(format!("{}: {}", e, body)))
    }
}

#[async_trait::async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn supports_tools(&self) -> bool {
        // Tool support depends on the model; unsupported models answer in plain text.
        true
    }

    fn available_models(&self) -> Vec<String> {
        if let Ok(cache) = self.cached_models.read() {
            if !cache.is_empty() {
                return cache.clone();
            }
        }
        SUGGESTED_MODELS.iter().map(|s| (*s).to_string()).collect()
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let ollama_request = OllamaChatRequest {
            model: self.resolve_model(&request.model).to_string(),
            messages: convert::convert_messages(&request.messages),
            options: self.options(&request),
            stream: false,
            tools: None,
        };

        let response = self.send_request(ollama_request).await?;

        Ok(CompletionResponse {
            content: response.message.content,
            usage: TokenUsage::from_counts(response.prompt_eval_count, response.eval_count),
            finish_reason: response.done_reason,
            model: response.model,
        })
    }

    #[instrument(skip(self, request), fields(model = %request.request.model, tools = request.tools.len()))]
    async fn complete_with_tools(
        &self,
        request: ToolCompletionRequest,
    ) -> Result<ToolCompletionResponse> {
        let tools = convert::convert_tools(&request.tools);
        let ollama_request = OllamaChatRequest {
            model: self.resolve_model(&request.request.model).to_string(),
            messages: convert::convert_messages(&request.request.messages),
            options: self.options(&request.request),
            stream: false,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        let response = self.send_request(ollama_request).await?;

        let tool_calls = convert::extract_tool_calls(response.message.tool_calls);
        let content = if response.message.content.is_empty() {
            None
        } else {
            Some(response.message.content)
        };

        Ok(ToolCompletionResponse {
            content,
            tool_calls,
            usage: TokenUsage::from_counts(response.prompt_eval_count, response.eval_count),
            finish_reason: response.done_reason,
            model: response.model,
        })
    }
}
