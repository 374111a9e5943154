use super::convert;
use super::provider::OllamaProvider;
use super::security::sanitize_api_error;
use super::types::{OllamaChatResponse, OllamaConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::completion::CompletionRequest;
use crate::message::Message;
use crate::tools::ToolCall;
use std::time::Duration;

#[test]
fn test_config_builder() {
    let config = OllamaConfig::new()
        .with_model("codellama:7b")
        .with_base_url("http://192.168.1.100:11434/")
        .with_max_tokens(2048)
        .with_timeout(Duration::from_secs(120));

    assert_eq!(config.default_model, "codellama:7b");
    assert_eq!(config.base_url, "http://192.168.1.100:11434");
    assert_eq!(config.default_max_tokens, 2048);
    assert_eq!(config.timeout, Duration::from_secs(120));
}

#[test]
fn test_default_config() {
    let config = OllamaConfig::default();

    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.default_model, DEFAULT_MODEL);
    assert_eq!(config.timeout, Duration::from_secs(300));
}

#[test]
fn test_message_conversion() {
    let call = ToolCall::new(
        "call_0",
        "filesystem",
        &serde_json::json!({"operation": "read_file", "path": "README.md"}),
    );
    let messages = vec![
        Message::system("You are a Backend Developer"),
        Message::user("Implement the backend"),
        Message::assistant_with_tool_calls("", vec![call]),
        Message::tool_response("call_0", "hello"),
    ];

    let converted = convert::convert_messages(&messages);

    assert_eq!(converted.len(), 4);
    assert_eq!(converted[0].role, "system");
    assert_eq!(converted[1].role, "user");
    assert_eq!(converted[2].role, "assistant");
    assert_eq!(converted[3].role, "tool");

    let calls = converted[2].tool_calls.as_ref().unwrap();
    assert_eq!(calls[0].function.name, "filesystem");
    assert_eq!(calls[0].function.arguments["path"], "README.md");
    assert!(converted[1].tool_calls.is_none());
}

#[test]
fn test_chat_response_with_tool_calls() {
    let body = r#"{
        "model": "llama3.2:3b",
        "message": {
            "role": "assistant",
            "content": "",
            "tool_calls": [
                {"function": {"name": "git", "arguments": {"operation": "status"}}}
            ]
        },
        "done": true,
        "done_reason": "stop",
        "prompt_eval_count": 12,
        "eval_count": 3
    }"#;

    let response: OllamaChatResponse = serde_json::from_str(body).unwrap();
    let calls = convert::extract_tool_calls(response.message.tool_calls);

    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_0");
    assert_eq!(calls[0].name, "git");
    let args: serde_json::Value = calls[0].parse_arguments().unwrap();
    assert_eq!(args["operation"], "status");
}

#[test]
fn test_sanitize_api_error() {
    let sanitized = sanitize_api_error("Error loading model from /home/user/.ollama/models");
    assert!(!sanitized.contains("/home"));
    assert!(sanitized.contains("installation"));

    let sanitized = sanitize_api_error("connection refused");
    assert!(sanitized.contains("Ollama running"));

    let sanitized = sanitize_api_error("model 'codellama:7b' not found");
    assert!(sanitized.contains("pull"));
}

#[test]
fn test_request_options() {
    let provider = OllamaProvider::new(OllamaConfig::new().with_max_tokens(1024)).unwrap();

    let options = provider.options(&CompletionRequest::new("m")).unwrap();
    assert_eq!(
        serde_json::to_value(&options).unwrap(),
        serde_json::json!({"num_predict": 1024})
    );

    let request = CompletionRequest::new("m").with_max_tokens(64).with_temperature(0.2);
    let options = serde_json::to_value(provider.options(&request).unwrap()).unwrap();
    assert_eq!(options["num_predict"], 64);
    assert_eq!(options.as_object().unwrap().len(), 2);
}

#[test]
fn test_chat_response_ignores_unread_fields() {
    let body = r#"{
        "model": "mistral:7b",
        "created_at": "2024-01-01T00:00:00Z",
        "message": {"role": "assistant", "content": "Hello"},
        "done": true,
        "total_duration": 123456
    }"#;

    let response: OllamaChatResponse = serde_json::from_str(body).unwrap();
    assert_eq!(response.model, "mistral:7b");
    assert_eq!(response.message.content, "Hello");
    assert!(response.message.tool_calls.is_none());
    assert!(response.done_reason.is_none());
    assert!(response.eval_count.is_none());
}
