//! Sequential pipeline
//!
//! Steps run strictly in list order, one at a time. Each step's artifact is
//! written to disk and folded into the prompts of every later step. A failed
//! step stops the run unless continue-on-failure is enabled.

mod executor;
mod state;


pub use executor::{
    Artifact, Pipeline, PipelineOptions, PipelineReport, RetryPolicy, StepFailure,
};
pub use state::PipelineState;

use crate::crew::Step;
use crate::error::StepError;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Runs one step's persona on a rendered prompt
#[async_trait::async_trait]
pub trait StepInvoker: Send + Sync {
    /// Produce the artifact text for `step`
    async fn invoke(&self, step: &Step, prompt: &str) -> Result<String, StepError>;
}

/// Events emitted while a pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// Run has started
    RunStarted {
        /// Run identifier
        run_id: Uuid,
        /// Number of steps in the plan
        total_steps: usize,
    },
    /// A step attempt has started
    StepStarted {
        /// Run identifier
        run_id: Uuid,
        /// Position in the plan
        index: usize,
        /// Step name
        step: String,
        /// Persona running the step
        persona: String,
        /// 1-based attempt number
        attempt: u32,
    },
    /// A step attempt failed and will be retried
    StepRetrying {
        /// Run identifier
        run_id: Uuid,
        /// Position in the plan
        index: usize,
        /// Step name
        step: String,
        /// Attempt that failed
        attempt: u32,
        /// Error description
        error: String,
    },
    /// A step wrote its artifact
    StepCompleted {
        /// Run identifier
        run_id: Uuid,
        /// Position in the plan
        index: usize,
        /// Step name
        step: String,
        /// Artifact location
        path: PathBuf,
        /// Wall time for the step in milliseconds
        duration_ms: u64,
    },
    /// A step gave up
    StepFailed {
        /// Run identifier
        run_id: Uuid,
        /// Position in the plan
        index: usize,
        /// Step name
        step: String,
        /// Error description
        error: String,
        /// Attempts made
        attempts: u32,
    },
    /// Every step succeeded
    RunCompleted {
        /// Run identifier
        run_id: Uuid,
        /// Artifacts written
        artifacts: usize,
    },
    /// The run ended with at least one failed step
    RunFailed {
        /// Run identifier
        run_id: Uuid,
        /// First failing step
        step: String,
        /// Failed step count
        failures: usize,
    },
}

impl PipelineEvent {
    /// Get the run id from any event variant.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::StepStarted { run_id, .. }
            | Self::StepRetrying { run_id, .. }
            | Self::StepCompleted { run_id, .. }
            | Self::StepFailed { run_id, .. }
            | Self::RunCompleted { run_id, .. }
            | Self::RunFailed { run_id, .. } => *run_id,
        }
    }
}

/// Receives pipeline events synchronously, in order
pub trait PipelineObserver: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &PipelineEvent);
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_event(&self, _event: &PipelineEvent) {}
}
