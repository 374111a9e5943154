//! Git adapter
//!
//! Runs git subprocesses through a [`CommandExecutor`]. Argument checks happen
//! while parsing, so an incomplete request never spawns a process.

use crate::adapter::{Adapter, AdapterError, Args};
use crate::registry::{ToolCategory, ToolDefinition};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

/// Tool name exposed to the model
pub const GIT_TOOL: &str = "git";

/// Captured output of a finished subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status was zero
    pub success: bool,
    /// Captured stdout (lossy UTF-8)
    pub stdout: String,
    /// Captured stderr (lossy UTF-8)
    pub stderr: String,
}

/// Runs external programs
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `program` with `args` in `cwd` and capture its output
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> std::io::Result<CommandOutput>;
}

/// [`CommandExecutor`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

#[async_trait::async_trait]
impl CommandExecutor for SystemExecutor {
    async fn run(&self, program: &str, args: &[String], cwd: &Path) -> std::io::Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Git operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOperation {
    /// `git init`
    Init {
        /// Repository path
        path: String,
    },
    /// `git add .`
    Add {
        /// Repository path
        path: String,
    },
    /// `git commit -m <message>`
    Commit {
        /// Repository path
        path: String,
        /// Commit message
        message: String,
    },
    /// `git push`
    Push {
        /// Repository path
        path: String,
    },
    /// `git pull`
    Pull {
        /// Repository path
        path: String,
    },
    /// `git status`
    Status {
        /// Repository path
        path: String,
    },
    /// `git branch [name]`
    Branch {
        /// Repository path
        path: String,
        /// Branch to create; lists branches when absent
        branch: Option<String>,
    },
    /// `git checkout <branch>`
    Checkout {
        /// Repository path
        path: String,
        /// Branch to check out
        branch: String,
    },
    /// `git clone <remote_url> <path>`
    Clone {
        /// Clone destination
        path: String,
        /// Remote to clone
        remote_url: String,
    },
}

impl GitOperation {
    /// Operation tag
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Add { .. } => "add",
            Self::Commit { .. } => "commit",
            Self::Push { .. } => "push",
            Self::Pull { .. } => "pull",
            Self::Status { .. } => "status",
            Self::Branch { .. } => "branch",
            Self::Checkout { .. } => "checkout",
            Self::Clone { .. } => "clone",
        }
    }

    /// Repository path the operation works on
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Init { path }
            | Self::Add { path }
            | Self::Commit { path, .. }
            | Self::Push { path }
            | Self::Pull { path }
            | Self::Status { path }
            | Self::Branch { path, .. }
            | Self::Checkout { path, .. }
            | Self::Clone { path, .. } => path,
        }
    }

    /// Arguments passed to `git`
    #[must_use]
    pub fn git_args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            Self::Init { .. } => vec!["init"],
            Self::Add { .. } => vec!["add", "."],
            Self::Commit { message, .. } => vec!["commit", "-m", message],
            Self::Push { .. } => vec!["push"],
            Self::Pull { .. } => vec!["pull"],
            Self::Status { .. } => vec!["status"],
            Self::Branch { branch: Some(branch), .. } => vec!["branch", branch],
            Self::Branch { branch: None, .. } => vec!["branch"],
            Self::Checkout { branch, .. } => vec!["checkout", branch],
            Self::Clone { path, remote_url } => vec!["clone", remote_url, path],
        };
        args.into_iter().map(str::to_string).collect()
    }

    /// Parse a tool-call argument object
    pub fn from_args(value: &Value) -> Result<Self, AdapterError> {
        let operation = Args::operation(value, GIT_TOOL)?;
        let args = Args::new(value, operation);
        let path = args.or("path", ".");

        let op = match operation {
            "init" => Self::Init { path },
            "add" => Self::Add { path },
            "commit" => Self::Commit {
                path,
                message: args.non_empty("message")?,
            },
            "push" => Self::Push { path },
            "pull" => Self::Pull { path },
            "status" => Self::Status { path },
            "branch" => Self::Branch {
                path,
                branch: args.optional("branch"),
            },
            "checkout" => Self::Checkout {
                path,
                branch: args.non_empty("branch")?,
            },
            "clone" => Self::Clone {
                path,
                remote_url: args.non_empty("remote_url")?,
            },
            other => return Err(AdapterError::UnsupportedOperation(other.to_string())),
        };
        Ok(op)
    }
}

/// Git adapter
#[derive(Clone)]
pub struct GitAdapter {
    executor: Arc<dyn CommandExecutor>,
    root: Option<PathBuf>,
}

impl Default for GitAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl GitAdapter {
    /// Adapter running the system `git`
    #[must_use]
    pub fn new() -> Self {
        Self::with_executor(Arc::new(SystemExecutor))
    }

    /// Adapter running commands through `executor`
    #[must_use]
    pub fn with_executor(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            root: None,
        }
    }

    /// Resolve relative repository paths against `root`
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl Adapter for GitAdapter {
    type Operation = GitOperation;

    fn definition() -> ToolDefinition {
        ToolDefinition::new(
            GIT_TOOL,
            "Git version control: init, add, commit, push, pull, status, branch, checkout, clone. \
             commit requires message, checkout requires branch, clone requires remote_url. \
             Example: {\"operation\": \"commit\", \"path\": \".\", \"message\": \"Add plan\"}",
        )
        .with_category(ToolCategory::Git)
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["init", "add", "commit", "push", "pull", "status", "branch", "checkout", "clone"]
                },
                "path": {"type": "string", "description": "Repository path (default: current directory)"},
                "message": {"type": "string", "description": "Commit message"},
                "branch": {"type": "string", "description": "Branch name"},
                "remote_url": {"type": "string", "description": "Remote repository URL for clone"}
            },
            "required": ["operation"]
        }))
    }

    fn parse(args: &Value) -> Result<GitOperation, AdapterError> {
        GitOperation::from_args(args)
    }

    async fn invoke(&self, operation: GitOperation) -> Result<String, AdapterError> {
        let name = operation.name();
        let target = self.resolve(operation.path());

        let cwd = match &operation {
            GitOperation::Clone { .. } => self.root.clone().unwrap_or_else(|| PathBuf::from(".")),
            _ => {
                if !target.exists() {
                    return Ok(format!("Path does not exist: {}", operation.path()));
                }
                target
            }
        };

        let mut args = operation.git_args();
        if let (GitOperation::Clone { .. }, Some(last)) = (&operation, args.last_mut()) {
            *last = self.resolve(operation.path()).to_string_lossy().to_string();
        }

        debug!(operation = name, cwd = %cwd.display(), "Running git");

        let output = self
            .executor
            .run("git", &args, &cwd)
            .await
            .map_err(|e| AdapterError::failed(format!("Git {}", name), e))?;

        if output.success {
            Ok(format!("Git {} successful:\n{}", name, output.stdout))
        } else {
            Ok(format!("Git {} failed:\n{}", name, output.stderr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::always;
    use serde_json::json;
    use tempfile::TempDir;

    fn ok_output(stdout: &str) -> CommandOutput {
        CommandOutput {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[tokio::test]
    async fn test_commit_without_message_spawns_nothing() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().times(0);
        let git = GitAdapter::with_executor(Arc::new(executor));

        let text = git.call(&json!({"operation": "commit", "path": "."})).await;
        assert_eq!(text, "message is required for commit");

        let text = git
            .call(&json!({"operation": "commit", "path": ".", "message": "  "}))
            .await;
        assert_eq!(text, "message is required for commit");
    }

    #[tokio::test]
    async fn test_checkout_requires_branch() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().times(0);
        let git = GitAdapter::with_executor(Arc::new(executor));

        let text = git.call(&json!({"operation": "checkout"})).await;
        assert_eq!(text, "branch is required for checkout");
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().times(0);
        let git = GitAdapter::with_executor(Arc::new(executor));

        let text = git.call(&json!({"operation": "rebase"})).await;
        assert_eq!(text, "Unsupported operation: rebase");
    }

    #[tokio::test]
    async fn test_missing_path_is_descriptive() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().times(0);
        let git = GitAdapter::with_executor(Arc::new(executor));

        let text = git
            .call(&json!({"operation": "status", "path": "/definitely/not/here"}))
            .await;
        assert_eq!(text, "Path does not exist: /definitely/not/here");
    }

    #[tokio::test]
    async fn test_status_success_and_failure() {
        let dir = TempDir::new().unwrap();

        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .withf(|program, args, _| program == "git" && args == ["status".to_string()])
            .times(1)
            .returning(|_, _, _| Ok(ok_output("On branch main\n")));
        executor
            .expect_run()
            .withf(|_, args, _| args.first().map(String::as_str) == Some("push"))
            .times(1)
            .returning(|_, _, _| {
                Ok(CommandOutput {
                    success: false,
                    stdout: String::new(),
                    stderr: "no upstream".to_string(),
                })
            });

        let git = GitAdapter::with_executor(Arc::new(executor)).with_root(dir.path());

        let status = git.call(&json!({"operation": "status"})).await;
        assert_eq!(status, "Git status successful:\nOn branch main\n");

        let push = git.call(&json!({"operation": "push"})).await;
        assert_eq!(push, "Git push failed:\nno upstream");
    }

    #[tokio::test]
    async fn test_clone_targets_resolved_path() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        let expected_args = vec![
            "clone".to_string(),
            "https://example.com/todo.git".to_string(),
            root.join("todo").to_string_lossy().to_string(),
        ];
        let expected_cwd = root.clone();

        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .withf(move |program, args, cwd| {
                program == "git" && args == expected_args.as_slice() && cwd == expected_cwd
            })
            .times(1)
            .returning(|_, _, _| Ok(ok_output("Cloning into 'todo'...\n")));

        let git = GitAdapter::with_executor(Arc::new(executor)).with_root(&root);
        let text = git
            .call(&json!({
                "operation": "clone",
                "remote_url": "https://example.com/todo.git",
                "path": "todo"
            }))
            .await;
        assert_eq!(text, "Git clone successful:\nCloning into 'todo'...\n");
    }

    #[tokio::test]
    async fn test_executor_error_is_text() {
        let dir = TempDir::new().unwrap();
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .with(always(), always(), always())
            .returning(|_, _, _| {
                Err(std::io::Error::new(std::io::ErrorKind::NotFound, "git not installed"))
            });

        let git = GitAdapter::with_executor(Arc::new(executor)).with_root(dir.path());
        let text = git.call(&json!({"operation": "init"})).await;
        assert_eq!(text, "Error executing Git init: git not installed");
    }

    #[test]
    fn test_git_args() {
        let branch = GitOperation::from_args(&json!({"operation": "branch", "branch": "feature"})).unwrap();
        assert_eq!(branch.git_args(), vec!["branch", "feature"]);

        let list = GitOperation::from_args(&json!({"operation": "branch"})).unwrap();
        assert_eq!(list.git_args(), vec!["branch"]);

        let add = GitOperation::from_args(&json!({"operation": "add", "path": "repo"})).unwrap();
        assert_eq!(add.git_args(), vec!["add", "."]);
        assert_eq!(add.path(), "repo");

        let err = GitOperation::from_args(&json!({"operation": "clone"})).unwrap_err();
        assert_eq!(err.to_string(), "remote_url is required for clone");
    }
}
