//! devcrew Tools - Tool Registry, Runner and Adapters
//!
//! This crate provides the tool system the personas reason with:
//! - Registry: tool registration and LLM schema export
//! - Runner: tool execution with a per-call timeout
//! - Adapter: the total, text-only contract every adapter follows
//! - Builtins: filesystem, git, code analysis and web research adapters

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod builtins;
pub mod error;
pub mod registry;
pub mod runner;

pub use adapter::{Adapter, AdapterError, AdapterTool};
pub use builtins::{
    register_builtins, AnalysisOperation, BuiltinsConfig, CodeAnalysisAdapter, CommandExecutor,
    CommandOutput, FileSystemAdapter, FsOperation, GitAdapter, GitOperation, Language,
    ResearchConfig, ResearchOperation, SystemExecutor, WebResearchAdapter,
};
pub use error::{Error, Result};
pub use registry::{Tool, ToolCategory, ToolDefinition, ToolRegistry, ToolResult};
pub use runner::{ExecutionResult, RunnerConfig, ToolRunner};
