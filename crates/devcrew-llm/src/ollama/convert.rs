//! Conversion between devcrew messages and Ollama wire types

use super::types::{
    OllamaFunction, OllamaFunctionCall, OllamaMessage, OllamaTool, OllamaToolCall,
};
use crate::message::Message;
use crate::tools::{ToolCall, ToolDefinition};

/// Convert messages to Ollama format
pub(crate) fn convert_messages(messages: &[Message]) -> Vec<OllamaMessage> {
    messages
        .iter()
        .map(|msg| {
            let tool_calls = if msg.tool_calls.is_empty() {
                None
            } else {
                Some(msg.tool_calls.iter().map(convert_tool_call).collect())
            };

            OllamaMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
                tool_calls,
            }
        })
        .collect()
}

fn convert_tool_call(call: &ToolCall) -> OllamaToolCall {
    OllamaToolCall {
        function: OllamaFunctionCall {
            name: call.name.clone(),
            arguments: serde_json::from_str(&call.arguments)
                .unwrap_or_else(|_| serde_json::json!({})),
        },
    }
}

/// Convert tool definitions to Ollama format
pub(crate) fn convert_tools(tools: &[ToolDefinition]) -> Vec<OllamaTool> {
    tools
        .iter()
        .map(|tool| OllamaTool {
            r#type: "function".to_string(),
            function: OllamaFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        })
        .collect()
}

/// Convert Ollama tool calls back into provider-neutral calls
///
/// Ollama does not assign call ids, so ids are positional.
pub(crate) fn extract_tool_calls(calls: Option<Vec<OllamaToolCall>>) -> Vec<ToolCall> {
    calls
        .map(|calls| {
            calls
                .into_iter()
                .enumerate()
                .map(|(i, tc)| ToolCall::new(format!("call_{}", i), tc.function.name, &tc.function.arguments))
                .collect()
        })
        .unwrap_or_default()
}
