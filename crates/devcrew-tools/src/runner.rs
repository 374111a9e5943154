//! Runner - Tool execution engine
//!
//! Looks tools up in the registry, validates input and runs them under a
//! timeout. Calls are executed one at a time by the caller; the runner holds
//! no per-call state.

use crate::error::{Error, Result};
use crate::registry::{ToolRegistry, ToolResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, instrument, warn};

/// Configuration for the tool runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Default timeout for tool execution
    pub default_timeout: Duration,
    /// Maximum timeout allowed
    pub max_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30),
            max_timeout: Duration::from_secs(300),
        }
    }
}

impl RunnerConfig {
    /// Create a new configuration with default timeout
    #[must_use]
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            default_timeout,
            ..Default::default()
        }
    }

    /// Set the maximum timeout
    #[must_use]
    pub fn with_max_timeout(mut self, max_timeout: Duration) -> Self {
        self.max_timeout = max_timeout;
        self
    }

    fn effective_timeout(&self) -> Duration {
        self.default_timeout.min(self.max_timeout)
    }
}

/// Tool execution result with additional metadata
#[derive(Debug)]
pub struct ExecutionResult {
    /// The tool result
    pub result: ToolResult,
    /// Tool name
    pub tool_name: String,
}

/// Tool runner
#[derive(Clone)]
pub struct ToolRunner {
    registry: Arc<ToolRegistry>,
    config: RunnerConfig,
}

impl ToolRunner {
    /// Create a new tool runner
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>, config: RunnerConfig) -> Self {
        Self { registry, config }
    }

    /// Create with default configuration
    #[must_use]
    pub fn with_defaults(registry: Arc<ToolRegistry>) -> Self {
        Self::new(registry, RunnerConfig::default())
    }

    /// Get the registry
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute a tool by name
    ///
    /// # Errors
    /// - unknown or disabled tool
    /// - input that is not a JSON object
    /// - timeout
    ///
    /// A tool that returns an error is reported as a failed [`ToolResult`].
    #[instrument(skip(self, input), fields(tool = %tool_name))]
    pub async fn execute(
        &self,
        tool_name: &str,
        input: serde_json::Value,
    ) -> Result<ExecutionResult> {
        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| Error::NotFound(tool_name.to_string()))?;

        if !tool.definition().enabled {
            return Err(Error::InvalidInput(format!(
                "Tool '{}' is disabled",
                tool_name
            )));
        }

        tool.validate_input(&input)?;

        let execution_timeout = self.config.effective_timeout();
        let start = Instant::now();
        debug!(tool = %tool_name, timeout_ms = %execution_timeout.as_millis(), "Executing tool");

        let result = match timeout(execution_timeout, tool.execute(input)).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                let duration = start.elapsed().as_millis() as u64;
                error!(tool = %tool_name, error = %e, "Tool execution failed");
                ToolResult::failure(e.to_string(), duration)
            }
            Err(_) => {
                let duration = start.elapsed().as_millis() as u64;
                warn!(tool = %tool_name, timeout_ms = %execution_timeout.as_millis(), "Tool execution timed out");
                return Err(Error::Timeout(duration));
            }
        };

        debug!(
            tool = %tool_name,
            success = %result.success,
            duration_ms = %result.duration_ms,
            "Tool execution completed"
        );

        Ok(ExecutionResult {
            result,
            tool_name: tool_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Tool, ToolDefinition};

    struct SlowTool {
        definition: ToolDefinition,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl Tool for SlowTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, _input: serde_json::Value) -> Result<ToolResult> {
            tokio::time::sleep(self.delay).await;
            Ok(ToolResult::success(serde_json::json!("done"), 0))
        }
    }

    struct FailingTool {
        definition: ToolDefinition,
    }

    #[async_trait::async_trait]
    impl Tool for FailingTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, _input: serde_json::Value) -> Result<ToolResult> {
            Err(Error::Execution("disk on fire".to_string()))
        }
    }

    fn runner_with(tool: Arc<dyn Tool>, config: RunnerConfig) -> ToolRunner {
        let mut registry = ToolRegistry::new();
        registry.register(tool);
        ToolRunner::new(Arc::new(registry), config)
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let runner = ToolRunner::with_defaults(Arc::new(ToolRegistry::new()));
        let result = runner.execute("nope", serde_json::json!({})).await;
        assert!(matches!(result, Err(Error::NotFound(name)) if name == "nope"));
    }

    #[tokio::test]
    async fn test_input_must_be_object() {
        let runner = runner_with(
            Arc::new(SlowTool {
                definition: ToolDefinition::new("slow", "slow"),
                delay: Duration::from_millis(0),
            }),
            RunnerConfig::default(),
        );
        let result = runner.execute("slow", serde_json::json!("text")).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_timeout() {
        let runner = runner_with(
            Arc::new(SlowTool {
                definition: ToolDefinition::new("slow", "slow"),
                delay: Duration::from_secs(5),
            }),
            RunnerConfig::new(Duration::from_millis(20)),
        );
        let result = runner.execute("slow", serde_json::json!({})).await;
        assert!(matches!(result, Err(Error::Timeout(_))));
    }

    #[tokio::test]
    async fn test_tool_error_becomes_failed_result() {
        let runner = runner_with(
            Arc::new(FailingTool {
                definition: ToolDefinition::new("failing", "fails"),
            }),
            RunnerConfig::default(),
        );
        let executed = runner.execute("failing", serde_json::json!({})).await.unwrap();
        assert!(!executed.result.success);
        assert!(executed.result.as_text().contains("disk on fire"));
    }
}
