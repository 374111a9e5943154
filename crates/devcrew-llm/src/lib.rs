//! devcrew LLM - LLM Provider Abstraction
//!
//! This crate provides LLM integration for devcrew:
//! - Provider: the `LlmProvider` trait every backend implements
//! - Ollama: local Ollama provider (llama3.2, codellama, mistral)
//! - Mock: scripted provider for tests and dry runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod error;
pub mod message;
pub mod mock;
pub mod ollama;
pub mod provider;
pub mod tools;
pub mod util;

pub use completion::{
    CompletionRequest, CompletionResponse, TokenUsage, ToolCompletionRequest,
    ToolCompletionResponse,
};
pub use error::{Error, Result};
pub use message::{Message, MessageRole};
pub use mock::{MockProvider, MockReply};
pub use ollama::{OllamaConfig, OllamaProvider};
pub use provider::LlmProvider;
pub use tools::{ToolCall, ToolDefinition};
