use super::*;
use devcrew_llm::{MessageRole, MockProvider};
use devcrew_tools::{AdapterTool, FileSystemAdapter, ToolRegistry, ToolResult};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

fn persona() -> Persona {
    Persona::new(
        "backend_developer",
        "Backend Developer",
        "Build robust APIs",
        "You build APIs.",
    )
}

fn fs_runner(root: &Path) -> ToolRunner {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(AdapterTool::new(FileSystemAdapter::with_root(root))));
    ToolRunner::with_defaults(Arc::new(registry))
}

fn empty_runner() -> ToolRunner {
    ToolRunner::with_defaults(Arc::new(ToolRegistry::new()))
}

fn agent(provider: &MockProvider, persona: Persona, runner: ToolRunner) -> PersonaAgent {
    PersonaAgent::new(persona, "codellama:7b", Arc::new(provider.clone()), runner)
}

fn tool_messages(request: &CompletionRequest) -> Vec<&Message> {
    request
        .messages
        .iter()
        .filter(|m| m.role == MessageRole::Tool)
        .collect()
}

#[tokio::test]
async fn test_plain_answer_is_artifact() {
    let provider = MockProvider::new();
    provider.push_text("# Plan\n\nShip it.");

    let agent = agent(&provider, persona(), empty_runner());
    let artifact = agent.run("Plan the API").await.unwrap();
    assert_eq!(artifact, "# Plan\n\nShip it.");

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "codellama:7b");
    assert_eq!(requests[0].messages[0].role, MessageRole::System);
    assert!(requests[0].messages[0].content.starts_with("You are Backend Developer."));
    assert_eq!(requests[0].messages[1].content, "Plan the API");
}

#[tokio::test]
async fn test_tool_call_output_is_fed_back() {
    let dir = TempDir::new().unwrap();
    let provider = MockProvider::new();
    provider.push_tool_calls(vec![ToolCall::new(
        "call_0",
        "filesystem",
        &json!({"operation": "write_file", "path": "notes.md", "content": "draft"}),
    )]);
    provider.push_text("Wrote the notes.");

    let agent = agent(&provider, persona(), fs_runner(dir.path()));
    let artifact = agent.run("Write notes").await.unwrap();

    assert_eq!(artifact, "Wrote the notes.");
    assert_eq!(std::fs::read_to_string(dir.path().join("notes.md")).unwrap(), "draft");

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    let fed_back = tool_messages(&requests[1]);
    assert_eq!(fed_back.len(), 1);
    assert_eq!(fed_back[0].content, "Content written to: notes.md");
    assert_eq!(fed_back[0].tool_call_id.as_deref(), Some("call_0"));
    assert_eq!(fed_back[0].name.as_deref(), Some("filesystem"));
}

#[tokio::test]
async fn test_tool_errors_are_text() {
    let dir = TempDir::new().unwrap();
    let provider = MockProvider::new();
    provider.push_tool_calls(vec![
        ToolCall::new("call_0", "teleport", &json!({})),
        ToolCall {
            id: "call_1".to_string(),
            name: "filesystem".to_string(),
            arguments: "{not json".to_string(),
        },
        ToolCall::new("call_2", "filesystem", &json!({"operation": "shred", "path": "x"})),
    ]);
    provider.push_text("Recovered.");

    let agent = agent(&provider, persona(), fs_runner(dir.path()));
    assert_eq!(agent.run("Try tools").await.unwrap(), "Recovered.");

    let requests = provider.requests();
    let fed_back: Vec<&str> = tool_messages(&requests[1])
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(fed_back.len(), 3);
    assert_eq!(fed_back[0], "tool not found: teleport");
    assert!(fed_back[1].starts_with("Invalid arguments for filesystem"));
    assert_eq!(fed_back[2], "Unsupported operation: shred");
}

#[tokio::test]
async fn test_endless_tool_loop_hits_iteration_limit() {
    let dir = TempDir::new().unwrap();
    let provider = MockProvider::new();
    for i in 0..5 {
        provider.push_tool_calls(vec![ToolCall::new(
            format!("call_{}", i),
            "filesystem",
            &json!({"operation": "list_dir"}),
        )]);
    }

    let agent = agent(&provider, persona(), fs_runner(dir.path()));
    let err = agent.run("Loop forever").await.unwrap_err();

    assert!(matches!(err, StepError::IterationLimit { limit: 3 }));
    assert_eq!(provider.requests().len(), 3);
}

#[tokio::test]
async fn test_empty_answer_is_error() {
    let provider = MockProvider::new();
    provider.push_text("   \n");

    let agent = agent(&provider, persona(), empty_runner());
    assert!(matches!(
        agent.run("Say nothing").await,
        Err(StepError::EmptyResponse)
    ));
}

#[tokio::test]
async fn test_provider_error_is_llm_error() {
    let provider = MockProvider::new();
    provider.push_error("connection refused");

    let agent = agent(&provider, persona(), empty_runner());
    let err = agent.run("Anything").await.unwrap_err();
    assert!(matches!(err, StepError::Llm(_)));
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_time_budget_checked_before_first_call() {
    let provider = MockProvider::constant("never used");
    let agent = agent(
        &provider,
        persona().with_max_execution_secs(0),
        empty_runner(),
    );

    assert!(matches!(
        agent.run("Too slow").await,
        Err(StepError::Timeout { limit_secs: 0 })
    ));
    assert!(provider.requests().is_empty());
}

/// Sleeps past a one-second budget before answering
struct SlowTool {
    definition: devcrew_tools::ToolDefinition,
}

impl SlowTool {
    fn new() -> Self {
        Self {
            definition: devcrew_tools::ToolDefinition::new("slow", "Takes its time"),
        }
    }
}

#[async_trait::async_trait]
impl devcrew_tools::Tool for SlowTool {
    fn definition(&self) -> &devcrew_tools::ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _input: serde_json::Value) -> devcrew_tools::Result<ToolResult> {
        tokio::time::sleep(Duration::from_millis(1100)).await;
        Ok(ToolResult::success(json!("finally"), 1100))
    }
}

#[tokio::test]
async fn test_time_budget_checked_after_tool_call() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SlowTool::new()));
    let runner = ToolRunner::with_defaults(Arc::new(registry));

    let provider = MockProvider::new();
    provider.push_tool_calls(vec![ToolCall::new("call_0", "slow", &json!({}))]);
    provider.push_text("Should not be requested.");

    let agent = agent(&provider, persona().with_max_execution_secs(1), runner);

    assert!(matches!(
        agent.run("Wait for it").await,
        Err(StepError::Timeout { limit_secs: 1 })
    ));
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn test_text_only_provider_gets_no_tool_list() {
    let dir = TempDir::new().unwrap();
    let provider = MockProvider::constant("Answer.").with_tool_support(false);

    let agent = agent(&provider, persona(), fs_runner(dir.path()));
    assert_eq!(agent.run("Question").await.unwrap(), "Answer.");

    let system = &provider.requests()[0].messages[0].content;
    assert!(system.contains("No tools are available"));
}

#[tokio::test]
async fn test_persona_tool_allow_list() {
    let dir = TempDir::new().unwrap();
    let provider = MockProvider::new();
    provider.push_tool_calls(vec![ToolCall::new(
        "call_0",
        "filesystem",
        &json!({"operation": "create_file", "path": "x.md"}),
    )]);
    provider.push_text("Done.");

    let restricted = persona().with_tools(vec!["git".to_string()]);
    let agent = agent(&provider, restricted, fs_runner(dir.path()));
    agent.run("Touch a file").await.unwrap();

    assert!(!dir.path().join("x.md").exists());
    let requests = provider.requests();
    let fed_back = tool_messages(&requests[1]);
    assert_eq!(
        fed_back[0].content,
        "Tool 'filesystem' is not available to backend_developer"
    );
}

#[test]
fn test_settings_apply_to_requests() {
    let provider = MockProvider::constant("ok");
    let agent = agent(&provider, persona(), empty_runner()).with_settings(AgentSettings {
        max_tokens: Some(512),
        temperature: Some(0.2),
    });

    let artifact = tokio_test::block_on(agent.run("Go")).unwrap();
    assert_eq!(artifact, "ok");
    assert_eq!(provider.requests()[0].max_tokens, Some(512));
    assert_eq!(agent.model(), "codellama:7b");
}
