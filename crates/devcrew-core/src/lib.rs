//! devcrew Core - Crew and Pipeline Engine
//!
//! This crate turns a project description into a set of markdown artifacts:
//! - Crew: persona and step registry, selection and assembly
//! - Agent: the per-persona reasoning loop over the tool adapters
//! - Pipeline: sequential, fail-fast step execution with a shared context
//! - Config: the application settings consumed once at startup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agent;
pub mod config;
pub mod crew;
pub mod error;
pub mod pipeline;
pub mod prompt;

pub use agent::{AgentSettings, PersonaAgent};
pub use config::{
    AppConfig, LlmSettings, PipelineSettings, ResearchSettings, ToolSettings,
};
pub use crew::{
    build_tool_registry, parse_list, select, user_crew_path, Crew, CrewMember, CrewRegistry,
    ModelTier, Persona, RunPlan, Selection, Step, BUILTIN_CREW,
};
pub use error::{format_error_for_cli, Error, Result, StepError, UserFriendlyError};
pub use pipeline::{
    Artifact, NoopObserver, Pipeline, PipelineEvent, PipelineObserver, PipelineOptions,
    PipelineReport, PipelineState, RetryPolicy, StepFailure, StepInvoker,
};
