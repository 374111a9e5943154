//! Adapter contract
//!
//! An adapter turns a JSON argument object from the reasoning loop into one
//! variant of its closed operation enum, runs it, and describes the outcome
//! as text. Adapter calls are total: parse failures and OS/network failures
//! come back as [`AdapterError`], and [`AdapterTool`] renders those as text
//! instead of failing the tool call.

use crate::error::Result;
use crate::registry::{Tool, ToolDefinition, ToolResult};
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Adapter-level failure, always shown to the model as text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The operation tag names nothing this adapter can do
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A field required by the chosen operation is absent
    #[error("{argument} is required for {operation}")]
    MissingArgument {
        /// Operation being parsed
        operation: String,
        /// Name of the missing field
        argument: String,
    },

    /// The OS, a subprocess or the network failed
    #[error("Error executing {operation}: {detail}")]
    OperationFailed {
        /// Operation that failed
        operation: String,
        /// Underlying failure
        detail: String,
    },
}

impl AdapterError {
    pub(crate) fn missing(operation: &str, argument: &str) -> Self {
        Self::MissingArgument {
            operation: operation.to_string(),
            argument: argument.to_string(),
        }
    }

    pub(crate) fn failed(operation: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            detail: detail.to_string(),
        }
    }
}

/// Render an adapter outcome as the text the model reads
#[must_use]
pub fn render(outcome: std::result::Result<String, AdapterError>) -> String {
    match outcome {
        Ok(text) => text,
        Err(e) => e.to_string(),
    }
}

/// Typed field access over a tool-call argument object
pub(crate) struct Args<'a> {
    args: &'a Value,
    operation: &'a str,
}

impl<'a> Args<'a> {
    /// Read the `operation` tag
    pub(crate) fn operation(args: &'a Value, tool: &str) -> std::result::Result<&'a str, AdapterError> {
        args.get("operation")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|op| !op.is_empty())
            .ok_or_else(|| AdapterError::missing(tool, "operation"))
    }

    pub(crate) fn new(args: &'a Value, operation: &'a str) -> Self {
        Self { args, operation }
    }

    fn raw(&self, key: &str) -> Option<&'a str> {
        self.args.get(key).and_then(Value::as_str)
    }

    /// Present string field; an empty string counts as present
    pub(crate) fn string(&self, key: &str) -> std::result::Result<String, AdapterError> {
        self.raw(key)
            .map(str::to_string)
            .ok_or_else(|| AdapterError::missing(self.operation, key))
    }

    /// Present, non-blank string field
    pub(crate) fn non_empty(&self, key: &str) -> std::result::Result<String, AdapterError> {
        self.optional(key)
            .ok_or_else(|| AdapterError::missing(self.operation, key))
    }

    /// Optional non-blank string field
    pub(crate) fn optional(&self, key: &str) -> Option<String> {
        self.raw(key)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
    }

    /// Optional field with a default
    pub(crate) fn or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// A tool adapter with a closed set of operations
#[async_trait::async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Closed operation enum
    type Operation: Send + std::fmt::Debug;

    /// Tool definition exposed to the model
    fn definition() -> ToolDefinition;

    /// Parse a tool-call argument object into an operation
    fn parse(args: &Value) -> std::result::Result<Self::Operation, AdapterError>;

    /// Run one operation
    async fn invoke(&self, operation: Self::Operation) -> std::result::Result<String, AdapterError>;

    /// Parse and run, always producing text
    async fn call(&self, args: &Value) -> String {
        match Self::parse(args) {
            Ok(operation) => render(self.invoke(operation).await),
            Err(e) => e.to_string(),
        }
    }
}

/// [`Tool`] wrapper around an [`Adapter`]
pub struct AdapterTool<A: Adapter> {
    adapter: A,
    definition: ToolDefinition,
}

impl<A: Adapter> AdapterTool<A> {
    /// Wrap an adapter
    #[must_use]
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            definition: A::definition(),
        }
    }

    /// The wrapped adapter
    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}

#[async_trait::async_trait]
impl<A: Adapter> Tool for AdapterTool<A> {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let start = Instant::now();

        let outcome = match A::parse(&input) {
            Ok(operation) => {
                debug!(tool = %self.definition.name, ?operation, "Invoking adapter");
                self.adapter.invoke(operation).await
            }
            Err(e) => Err(e),
        };

        let duration = start.elapsed().as_millis() as u64;
        Ok(match outcome {
            Ok(text) => ToolResult::success(Value::String(text), duration),
            Err(e) => ToolResult::failure(e.to_string(), duration),
        })
    }
}
