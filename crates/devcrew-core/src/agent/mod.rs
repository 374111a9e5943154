//! Persona reasoning driver
//!
//! One invocation is a bounded loop: ask the model, run any tool calls it
//! makes one after another, feed the results back, and stop at the first
//! answer without tool calls. Tool failures never end the loop; they come
//! back to the model as text.

#[cfg(test)]
mod tests;

use crate::crew::Persona;
use crate::error::StepError;
use crate::prompt::system_prompt;
use devcrew_llm::{
    CompletionRequest, LlmProvider, Message, ToolCall, ToolCompletionRequest,
    ToolCompletionResponse, ToolDefinition,
};
use devcrew_tools::ToolRunner;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Completion parameters shared by every persona
#[derive(Debug, Clone, Default)]
pub struct AgentSettings {
    /// Max tokens per completion; provider default when `None`
    pub max_tokens: Option<u32>,
    /// Sampling temperature; provider default when `None`
    pub temperature: Option<f32>,
}

/// A persona bound to a model, a provider and the tool runner
#[derive(Clone)]
pub struct PersonaAgent {
    persona: Persona,
    model: String,
    provider: Arc<dyn LlmProvider>,
    runner: ToolRunner,
    settings: AgentSettings,
}

impl PersonaAgent {
    /// Bind a persona
    #[must_use]
    pub fn new(
        persona: Persona,
        model: impl Into<String>,
        provider: Arc<dyn LlmProvider>,
        runner: ToolRunner,
    ) -> Self {
        Self {
            persona,
            model: model.into(),
            provider,
            runner,
            settings: AgentSettings::default(),
        }
    }

    /// Set completion parameters
    #[must_use]
    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The bound persona
    #[must_use]
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Model identifier sent with every request
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        self.runner
            .registry()
            .to_llm_tools(self.persona.tools.as_deref())
    }

    fn may_use(&self, tool_name: &str) -> bool {
        self.persona
            .tools
            .as_ref()
            .map_or(true, |allowed| allowed.iter().any(|t| t == tool_name))
    }

    fn check_deadline(&self, start: Instant) -> Result<(), StepError> {
        let limit_secs = self.persona.max_execution_secs;
        if start.elapsed() >= Duration::from_secs(limit_secs) {
            warn!(
                persona = %self.persona.name,
                elapsed_ms = start.elapsed().as_millis() as u64,
                limit_secs,
                "Execution time limit reached"
            );
            return Err(StepError::Timeout { limit_secs });
        }
        Ok(())
    }

    /// Run the persona on a rendered step prompt and return its artifact
    ///
    /// # Errors
    /// - [`StepError::Llm`] when the provider fails
    /// - [`StepError::IterationLimit`] when the model is still calling tools
    ///   after `max_iterations` completions
    /// - [`StepError::Timeout`] when `max_execution_secs` elapses
    /// - [`StepError::EmptyResponse`] for a blank final answer
    #[instrument(skip(self, prompt), fields(persona = %self.persona.name, model = %self.model))]
    pub async fn run(&self, prompt: &str) -> Result<String, StepError> {
        let start = Instant::now();
        let tools = self.tools();
        let use_tools = self.provider.supports_tools() && !tools.is_empty();
        let advertised: &[ToolDefinition] = if use_tools { &tools } else { &[] };

        let mut messages = vec![
            Message::system(system_prompt(&self.persona, advertised)),
            Message::user(prompt),
        ];

        let mut iteration = 0;
        loop {
            iteration += 1;
            if iteration > self.persona.max_iterations {
                warn!(
                    persona = %self.persona.name,
                    iteration,
                    "Iteration limit reached"
                );
                return Err(StepError::IterationLimit {
                    limit: self.persona.max_iterations,
                });
            }
            self.check_deadline(start)?;

            debug!(persona = %self.persona.name, iteration, "Requesting completion");
            let response = self.complete(&messages, &tools, use_tools).await?;

            if !response.has_tool_calls() {
                let content = response.content.unwrap_or_default();
                if content.trim().is_empty() {
                    return Err(StepError::EmptyResponse);
                }
                info!(
                    persona = %self.persona.name,
                    iteration,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Persona finished"
                );
                return Ok(content);
            }

            messages.push(Message::assistant_with_tool_calls(
                response.content.clone().unwrap_or_default(),
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                let output = self.execute_tool(call).await;
                messages.push(Message::tool_response_named(&call.id, &call.name, output));
                self.check_deadline(start)?;
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        use_tools: bool,
    ) -> Result<ToolCompletionResponse, StepError> {
        let mut request = CompletionRequest::new(&self.model).with_messages(messages.to_vec());
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }

        let response = if use_tools {
            self.provider
                .complete_with_tools(ToolCompletionRequest::new(request, tools.to_vec()))
                .await?
        } else {
            self.provider.complete(request).await?.into()
        };
        Ok(response)
    }

    /// Run one tool call; every outcome is text for the model
    async fn execute_tool(&self, call: &ToolCall) -> String {
        if !self.may_use(&call.name) {
            warn!(persona = %self.persona.name, tool = %call.name, "Tool not allowed for persona");
            return format!("Tool '{}' is not available to {}", call.name, self.persona.name);
        }

        let input: serde_json::Value = match call.parse_arguments() {
            Ok(input) => input,
            Err(e) => return format!("Invalid arguments for {}: {}", call.name, e),
        };

        match self.runner.execute(&call.name, input).await {
            Ok(executed) => {
                debug!(
                    tool = %executed.tool_name,
                    success = executed.result.success,
                    duration_ms = executed.result.duration_ms,
                    "Tool call finished"
                );
                executed.result.as_text()
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                e.to_string()
            }
        }
    }
}
