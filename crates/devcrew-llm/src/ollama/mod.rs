//! Ollama - Local Ollama API provider
//!
//! This module implements the provider for local inference through the
//! Ollama `/api/chat` endpoint.

pub mod convert;
pub mod provider;
mod security;
pub mod types;

#[cfg(test)]
mod tests;

pub use provider::OllamaProvider;
pub use types::{OllamaConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, SUGGESTED_MODELS};
