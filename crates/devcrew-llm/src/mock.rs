//! Mock LLM Provider
//!
//! Replays a scripted queue of replies. When the queue is empty the provider
//! answers with its fallback text, or fails if no fallback was set. Every
//! request is recorded so callers can inspect the exact prompts sent.

use crate::completion::{
    CompletionRequest, CompletionResponse, ToolCompletionRequest, ToolCompletionResponse,
};
use crate::error::{Error, Result};
use crate::provider::LlmProvider;
use crate::tools::ToolCall;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const MOCK_MODEL: &str = "mock-model";

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this response
    Response(ToolCompletionResponse),
    /// Fail with an API error carrying this message
    Error(String),
}

/// A mock LLM provider that returns queued replies.
#[derive(Clone)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    fallback: Option<String>,
    supports_tools: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a mock provider with an empty queue and no fallback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fallback: None,
            supports_tools: true,
        }
    }

    /// Create a mock provider that always answers with `text`.
    #[must_use]
    pub fn constant(text: impl Into<String>) -> Self {
        Self::new().with_fallback(text)
    }

    /// Answer with `text` once the queue is exhausted.
    #[must_use]
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    /// Toggle tool support (text-only providers go through `complete`).
    #[must_use]
    pub fn with_tool_support(mut self, supported: bool) -> Self {
        self.supports_tools = supported;
        self
    }

    /// Queue a plain text answer.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push(MockReply::Response(ToolCompletionResponse::text(
            text, MOCK_MODEL,
        )));
    }

    /// Queue an answer requesting tool calls.
    pub fn push_tool_calls(&self, calls: Vec<ToolCall>) {
        self.push(MockReply::Response(ToolCompletionResponse::calls(
            calls, MOCK_MODEL,
        )));
    }

    /// Queue a provider failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.push(MockReply::Error(message.into()));
    }

    /// Queue an arbitrary reply.
    pub fn push(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn next_reply(&self, request: CompletionRequest) -> Result<ToolCompletionResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Error(message)) => Err(Error::Api(message)),
            None => match &self.fallback {
                Some(text) => Ok(ToolCompletionResponse::text(text.clone(), MOCK_MODEL)),
                None => Err(Error::InvalidResponse(
                    "mock provider has no scripted replies left".to_string(),
                )),
            },
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports_tools(&self) -> bool {
        self.supports_tools
    }

    fn available_models(&self) -> Vec<String> {
        vec![MOCK_MODEL.to_string()]
    }

    fn default_model(&self) -> &str {
        MOCK_MODEL
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let response = self.next_reply(request)?;
        Ok(CompletionResponse {
            content: response.content.unwrap_or_default(),
            usage: response.usage,
            finish_reason: response.finish_reason,
            model: response.model,
        })
    }

    async fn complete_with_tools(
        &self,
        request: ToolCompletionRequest,
    ) -> Result<ToolCompletionResponse> {
        self.next_reply(request.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[tokio::test]
    async fn test_queue_then_fallback() {
        let provider = MockProvider::constant("fallback");
        provider.push_text("first");

        let first = provider
            .complete(CompletionRequest::new("m").with_message(Message::user("a")))
            .await
            .unwrap();
        assert_eq!(first.content, "first");

        let second = provider.complete(CompletionRequest::new("m")).await.unwrap();
        assert_eq!(second.content, "fallback");

        assert_eq!(provider.requests().len(), 2);
        assert_eq!(provider.requests()[0].messages[0].content, "a");
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let provider = MockProvider::new();
        provider.push_error("boom");

        let result = provider
            .complete_with_tools(ToolCompletionRequest::new(CompletionRequest::new("m"), vec![]))
            .await;
        assert!(matches!(result, Err(Error::Api(msg)) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_exhausted_without_fallback() {
        let provider = MockProvider::new();
        let result = provider.complete(CompletionRequest::new("m")).await;
        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_clones_share_queue() {
        let provider = MockProvider::new();
        let clone = provider.clone();
        clone.push_text("shared");

        let response = provider.complete(CompletionRequest::new("m")).await.unwrap();
        assert_eq!(response.content, "shared");
        assert_eq!(clone.requests().len(), 1);
    }
}
