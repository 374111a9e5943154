//! Pipeline executor

use super::{NoopObserver, PipelineEvent, PipelineObserver, PipelineState, StepInvoker};
use crate::config::AppConfig;
use crate::crew::Step;
use crate::error::{Error, Result, StepError};
use crate::prompt::step_prompt;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// How often a failed step is re-invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per step, at least 1
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Policy with `max_attempts` total attempts and no delay
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::ZERO,
        }
    }

    /// Set the pause between attempts
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory receiving one markdown file per step
    pub output_dir: PathBuf,
    /// Step retry policy
    pub retry: RetryPolicy,
    /// Keep going after a failed step
    pub continue_on_failure: bool,
}

impl PipelineOptions {
    /// Fail-fast, single-attempt options
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            retry: RetryPolicy::default(),
            continue_on_failure: false,
        }
    }

    /// Options from application settings
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.output_dir)
            .with_retry(config.retry_policy())
            .with_continue_on_failure(config.pipeline.continue_on_failure)
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable continue-on-failure
    #[must_use]
    pub fn with_continue_on_failure(mut self, enabled: bool) -> Self {
        self.continue_on_failure = enabled;
        self
    }
}

/// Output of one successful step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Step name
    pub step: String,
    /// Persona that produced it
    pub persona: String,
    /// Destination relative to the output directory
    pub destination: String,
    /// Where it was written
    pub path: PathBuf,
    /// Raw artifact text
    pub content: String,
    /// Attempts it took
    pub attempts: u32,
    /// Write time
    pub created_at: DateTime<Utc>,
}

/// A step that produced no artifact
#[derive(Debug)]
pub struct StepFailure {
    /// Position in the plan
    pub index: usize,
    /// Step name
    pub step: String,
    /// Last error
    pub error: StepError,
    /// Attempts made
    pub attempts: u32,
}

/// Outcome of a run
#[derive(Debug)]
pub struct PipelineReport {
    /// Run identifier
    pub run_id: Uuid,
    /// Terminal state
    pub state: PipelineState,
    /// Artifacts in step order
    pub artifacts: Vec<Artifact>,
    /// Failed steps in step order
    pub failures: Vec<StepFailure>,
    /// Run start time
    pub started_at: DateTime<Utc>,
    /// Run end time
    pub finished_at: DateTime<Utc>,
}

impl PipelineReport {
    /// Every step produced an artifact
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == PipelineState::Completed && self.failures.is_empty()
    }

    /// Wall time of the run
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Turn the first failure into an error
    ///
    /// # Errors
    /// Returns [`Error::StepExecution`] for the first failed step.
    pub fn into_result(mut self) -> Result<Vec<Artifact>> {
        if self.failures.is_empty() {
            return Ok(self.artifacts);
        }
        let failure = self.failures.remove(0);
        Err(Error::StepExecution {
            step: failure.step,
            source: failure.error,
        })
    }
}

/// Sequential step executor
pub struct Pipeline {
    options: PipelineOptions,
    observer: Arc<dyn PipelineObserver>,
}

impl Pipeline {
    /// Create a pipeline
    #[must_use]
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Attach an event observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Options in effect
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    fn emit(&self, event: PipelineEvent) {
        self.observer.on_event(&event);
    }

    /// Run `steps` in order for one project description
    ///
    /// Step failures do not make this return `Err`; they end up in the
    /// report, whose state is `Failed` at the first failing step.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] for a blank description or an empty
    /// step list. Nothing runs in either case.
    #[instrument(skip_all, fields(steps = steps.len()))]
    pub async fn run(
        &self,
        invoker: &dyn StepInvoker,
        steps: &[Step],
        description: &str,
    ) -> Result<PipelineReport> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::Configuration(
                "project description must not be empty".to_string(),
            ));
        }
        if steps.is_empty() {
            return Err(Error::Configuration("no steps to run".to_string()));
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            %run_id,
            total_steps = steps.len(),
            output_dir = %self.options.output_dir.display(),
            "Pipeline started"
        );
        self.emit(PipelineEvent::RunStarted {
            run_id,
            total_steps: steps.len(),
        });

        let mut state = PipelineState::Idle;
        let mut artifacts: Vec<Artifact> = Vec::with_capacity(steps.len());
        let mut failures: Vec<StepFailure> = Vec::new();

        for (index, step) in steps.iter().enumerate() {
            state.advance(index, &step.name);
            let step_start = Instant::now();
            let prompt = step_prompt(step, description, &artifacts);

            let (outcome, attempts) = self.attempt(run_id, invoker, index, step, &prompt).await;
            let outcome = match outcome {
                Ok(content) => self.persist(step, &content).await.map(|path| (path, content)),
                Err(e) => Err(e),
            };

            match outcome {
                Ok((path, content)) => {
                    let duration_ms = step_start.elapsed().as_millis() as u64;
                    info!(
                        %run_id,
                        step = %step.name,
                        persona = %step.persona,
                        path = %path.display(),
                        attempts,
                        elapsed_ms = duration_ms,
                        "Step completed"
                    );
                    self.emit(PipelineEvent::StepCompleted {
                        run_id,
                        index,
                        step: step.name.clone(),
                        path: path.clone(),
                        duration_ms,
                    });
                    artifacts.push(Artifact {
                        step: step.name.clone(),
                        persona: step.persona.clone(),
                        destination: step.destination.clone(),
                        path,
                        content,
                        attempts,
                        created_at: Utc::now(),
                    });
                }
                Err(e) => {
                    error!(
                        %run_id,
                        step = %step.name,
                        persona = %step.persona,
                        attempts,
                        error = %e,
                        "Step failed"
                    );
                    self.emit(PipelineEvent::StepFailed {
                        run_id,
                        index,
                        step: step.name.clone(),
                        error: e.to_string(),
                        attempts,
                    });
                    failures.push(StepFailure {
                        index,
                        step: step.name.clone(),
                        error: e,
                        attempts,
                    });
                    if !self.options.continue_on_failure {
                        break;
                    }
                    warn!(%run_id, step = %step.name, "Continuing past failed step");
                }
            }
        }

        state = match failures.first() {
            None => PipelineState::Completed,
            Some(first) => PipelineState::Failed {
                index: first.index,
                step: first.step.clone(),
            },
        };

        match &state {
            PipelineState::Failed { step, .. } => {
                self.emit(PipelineEvent::RunFailed {
                    run_id,
                    step: step.clone(),
                    failures: failures.len(),
                });
            }
            _ => {
                self.emit(PipelineEvent::RunCompleted {
                    run_id,
                    artifacts: artifacts.len(),
                });
            }
        }

        let finished_at = Utc::now();
        info!(
            %run_id,
            state = %state,
            artifacts = artifacts.len(),
            failures = failures.len(),
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "Pipeline finished"
        );

        Ok(PipelineReport {
            run_id,
            state,
            artifacts,
            failures,
            started_at,
            finished_at,
        })
    }

    /// Invoke a step under the retry policy; returns the outcome and the
    /// number of attempts made
    async fn attempt(
        &self,
        run_id: Uuid,
        invoker: &dyn StepInvoker,
        index: usize,
        step: &Step,
        prompt: &str,
    ) -> (std::result::Result<String, StepError>, u32) {
        let max_attempts = self.options.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            info!(%run_id, step = %step.name, persona = %step.persona, attempt, "Step started");
            self.emit(PipelineEvent::StepStarted {
                run_id,
                index,
                step: step.name.clone(),
                persona: step.persona.clone(),
                attempt,
            });

            match invoker.invoke(step, prompt).await {
                Ok(content) => return (Ok(content), attempt),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        %run_id,
                        step = %step.name,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Step attempt failed, retrying"
                    );
                    self.emit(PipelineEvent::StepRetrying {
                        run_id,
                        index,
                        step: step.name.clone(),
                        attempt,
                        error: e.to_string(),
                    });
                    if !self.options.retry.delay.is_zero() {
                        tokio::time::sleep(self.options.retry.delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return (Err(e), attempt),
            }
        }
    }

    /// Write an artifact, replacing any previous file
    async fn persist(&self, step: &Step, content: &str) -> std::result::Result<PathBuf, StepError> {
        let path = self.options.output_dir.join(&step.destination);
        write_artifact(&path, content)
            .await
            .map_err(|source| StepError::Artifact {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

async fn write_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await
}
