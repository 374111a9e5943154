//! Filesystem adapter
//!
//! File and directory operations. Outcomes that are not failures of the
//! filesystem itself (a missing file, a missing source) are reported as
//! plain result text.

use crate::adapter::{Adapter, AdapterError, Args};
use crate::registry::{ToolCategory, ToolDefinition};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Tool name exposed to the model
pub const FILESYSTEM_TOOL: &str = "filesystem";

/// Filesystem operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOperation {
    /// Create an empty file (and its parents)
    CreateFile {
        /// Target path
        path: String,
    },
    /// Read a UTF-8 file
    ReadFile {
        /// Target path
        path: String,
    },
    /// Write (overwrite) a file
    WriteFile {
        /// Target path
        path: String,
        /// Full file content
        content: String,
    },
    /// Delete a file
    DeleteFile {
        /// Target path
        path: String,
    },
    /// Create a directory (and its parents)
    CreateDir {
        /// Target path
        path: String,
    },
    /// Delete a directory recursively
    DeleteDir {
        /// Target path
        path: String,
    },
    /// List a directory
    ListDir {
        /// Target path
        path: String,
    },
    /// Copy a file
    CopyFile {
        /// Source path
        path: String,
        /// Destination path
        destination: String,
    },
    /// Move a file
    MoveFile {
        /// Source path
        path: String,
        /// Destination path
        destination: String,
    },
}

impl FsOperation {
    /// Operation tag
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateFile { .. } => "create_file",
            Self::ReadFile { .. } => "read_file",
            Self::WriteFile { .. } => "write_file",
            Self::DeleteFile { .. } => "delete_file",
            Self::CreateDir { .. } => "create_dir",
            Self::DeleteDir { .. } => "delete_dir",
            Self::ListDir { .. } => "list_dir",
            Self::CopyFile { .. } => "copy_file",
            Self::MoveFile { .. } => "move_file",
        }
    }

    /// Parse a tool-call argument object
    pub fn from_args(value: &Value) -> Result<Self, AdapterError> {
        let operation = Args::operation(value, FILESYSTEM_TOOL)?;
        let args = Args::new(value, operation);

        let op = match operation {
            "create_file" => Self::CreateFile { path: args.non_empty("path")? },
            "read_file" => Self::ReadFile { path: args.non_empty("path")? },
            "write_file" => Self::WriteFile {
                path: args.non_empty("path")?,
                content: args.string("content")?,
            },
            "delete_file" => Self::DeleteFile { path: args.non_empty("path")? },
            "create_dir" => Self::CreateDir { path: args.non_empty("path")? },
            "delete_dir" => Self::DeleteDir { path: args.non_empty("path")? },
            "list_dir" => Self::ListDir { path: args.or("path", ".") },
            "copy_file" => Self::CopyFile {
                path: args.non_empty("path")?,
                destination: args.non_empty("destination")?,
            },
            "move_file" => Self::MoveFile {
                path: args.non_empty("path")?,
                destination: args.non_empty("destination")?,
            },
            other => return Err(AdapterError::UnsupportedOperation(other.to_string())),
        };
        Ok(op)
    }
}

/// Filesystem adapter
#[derive(Debug, Clone, Default)]
pub struct FileSystemAdapter {
    root: Option<PathBuf>,
}

impl FileSystemAdapter {
    /// Adapter resolving relative paths against the process working directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    async fn ensure_parent(path: &Path) -> std::io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
            _ => Ok(()),
        }
    }

    async fn run(&self, op: &FsOperation) -> std::io::Result<String> {
        match op {
            FsOperation::CreateFile { path } => {
                let target = self.resolve(path);
                Self::ensure_parent(&target).await?;
                fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&target)
                    .await?;
                Ok(format!("File created: {}", path))
            }
            FsOperation::ReadFile { path } => {
                let target = self.resolve(path);
                if !target.exists() {
                    return Ok(format!("File not found: {}", path));
                }
                fs::read_to_string(&target).await
            }
            FsOperation::WriteFile { path, content } => {
                let target = self.resolve(path);
                Self::ensure_parent(&target).await?;
                fs::write(&target, content).await?;
                Ok(format!("Content written to: {}", path))
            }
            FsOperation::DeleteFile { path } => {
                let target = self.resolve(path);
                if !target.is_file() {
                    return Ok(format!("File not found: {}", path));
                }
                fs::remove_file(&target).await?;
                Ok(format!("File deleted: {}", path))
            }
            FsOperation::CreateDir { path } => {
                fs::create_dir_all(self.resolve(path)).await?;
                Ok(format!("Directory created: {}", path))
            }
            FsOperation::DeleteDir { path } => {
                let target = self.resolve(path);
                if !target.is_dir() {
                    return Ok(format!("Directory not found: {}", path));
                }
                fs::remove_dir_all(&target).await?;
                Ok(format!("Directory deleted: {}", path))
            }
            FsOperation::ListDir { path } => {
                let target = self.resolve(path);
                if !target.is_dir() {
                    return Ok(format!("Directory not found: {}", path));
                }
                let mut entries = fs::read_dir(&target).await?;
                let mut items = Vec::new();
                while let Some(entry) = entries.next_entry().await? {
                    let kind = if entry.file_type().await?.is_dir() {
                        "DIR"
                    } else {
                        "FILE"
                    };
                    items.push(format!("{}: {}", kind, entry.file_name().to_string_lossy()));
                }
                items.sort();
                Ok(items.join("\n"))
            }
            FsOperation::CopyFile { path, destination } => {
                let source = self.resolve(path);
                if !source.is_file() {
                    return Ok(format!("Source file not found: {}", path));
                }
                let dest = self.resolve(destination);
                Self::ensure_parent(&dest).await?;
                fs::copy(&source, &dest).await?;
                Ok(format!("File copied from {} to {}", path, destination))
            }
            FsOperation::MoveFile { path, destination } => {
                let source = self.resolve(path);
                if !source.is_file() {
                    return Ok(format!("Source file not found: {}", path));
                }
                let dest = self.resolve(destination);
                Self::ensure_parent(&dest).await?;
                if fs::rename(&source, &dest).await.is_err() {
                    // rename fails across filesystems
                    fs::copy(&source, &dest).await?;
                    fs::remove_file(&source).await?;
                }
                Ok(format!("File moved from {} to {}", path, destination))
            }
        }
    }
}

#[async_trait::async_trait]
impl Adapter for FileSystemAdapter {
    type Operation = FsOperation;

    fn definition() -> ToolDefinition {
        ToolDefinition::new(
            FILESYSTEM_TOOL,
            "File and directory operations: create_file, read_file, write_file, delete_file, \
             create_dir, delete_dir, list_dir, copy_file, move_file. \
             Example: {\"operation\": \"write_file\", \"path\": \"docs/plan.md\", \"content\": \"# Plan\"}",
        )
        .with_category(ToolCategory::File)
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["create_file", "read_file", "write_file", "delete_file",
                             "create_dir", "delete_dir", "list_dir", "copy_file", "move_file"]
                },
                "path": {
                    "type": "string",
                    "description": "File or directory path; required by every operation except list_dir, which defaults to \".\""
                },
                "content": {"type": "string", "description": "Content for write_file"},
                "destination": {"type": "string", "description": "Destination for copy_file/move_file"}
            },
            "required": ["operation"]
        }))
    }

    fn parse(args: &Value) -> Result<FsOperation, AdapterError> {
        FsOperation::from_args(args)
    }

    async fn invoke(&self, operation: FsOperation) -> Result<String, AdapterError> {
        debug!(operation = operation.name(), "Filesystem operation");
        self.run(&operation)
            .await
            .map_err(|e| AdapterError::failed(operation.name(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn adapter() -> (TempDir, FileSystemAdapter) {
        let dir = TempDir::new().unwrap();
        let adapter = FileSystemAdapter::with_root(dir.path());
        (dir, adapter)
    }

    #[test]
    fn test_parse_operations() {
        let op = FsOperation::from_args(&json!({
            "operation": "copy_file", "path": "a.md", "destination": "b.md"
        }))
        .unwrap();
        assert_eq!(
            op,
            FsOperation::CopyFile {
                path: "a.md".to_string(),
                destination: "b.md".to_string()
            }
        );

        let err = FsOperation::from_args(&json!({"operation": "chmod", "path": "a"})).unwrap_err();
        assert_eq!(err, AdapterError::UnsupportedOperation("chmod".to_string()));

        let err = FsOperation::from_args(&json!({"operation": "write_file", "path": "a"})).unwrap_err();
        assert_eq!(err.to_string(), "content is required for write_file");

        let err = FsOperation::from_args(&json!({"operation": "move_file", "path": "a"})).unwrap_err();
        assert_eq!(err.to_string(), "destination is required for move_file");
    }

    #[tokio::test]
    async fn test_list_dir_without_path() {
        let (dir, fs) = adapter();
        std::fs::write(dir.path().join("README.md"), "x").unwrap();

        let required = FileSystemAdapter::definition().parameters["required"].clone();
        assert_eq!(required, json!(["operation"]));

        let listed = fs.call(&json!({"operation": "list_dir"})).await;
        assert_eq!(listed, "FILE: README.md");
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let (_dir, fs) = adapter();
        let content = "# Plan\n\nline two\n  indented ünïcode\n";

        let written = fs
            .invoke(FsOperation::WriteFile {
                path: "docs/plan.md".to_string(),
                content: content.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(written, "Content written to: docs/plan.md");

        let read = fs
            .invoke(FsOperation::ReadFile {
                path: "docs/plan.md".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(read, content);
    }

    #[tokio::test]
    async fn test_write_empty_content_is_allowed() {
        let (_dir, fs) = adapter();
        let text = fs
            .call(&json!({"operation": "write_file", "path": "empty.md", "content": ""}))
            .await;
        assert_eq!(text, "Content written to: empty.md");
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_descriptive() {
        let (_dir, fs) = adapter();
        let text = fs
            .invoke(FsOperation::DeleteFile {
                path: "nope.md".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(text, "File not found: nope.md");
    }

    #[tokio::test]
    async fn test_create_list_delete() {
        let (dir, fs) = adapter();

        fs.call(&json!({"operation": "create_dir", "path": "src"})).await;
        fs.call(&json!({"operation": "create_file", "path": "src/main.rs"})).await;
        fs.call(&json!({"operation": "create_file", "path": "README.md"})).await;

        let listing = fs.call(&json!({"operation": "list_dir", "path": "."})).await;
        assert_eq!(listing, "DIR: src\nFILE: README.md");

        let deleted = fs.call(&json!({"operation": "delete_dir", "path": "src"})).await;
        assert_eq!(deleted, "Directory deleted: src");
        assert!(!dir.path().join("src").exists());

        let missing = fs.call(&json!({"operation": "delete_dir", "path": "src"})).await;
        assert_eq!(missing, "Directory not found: src");
    }

    #[tokio::test]
    async fn test_copy_and_move() {
        let (dir, fs) = adapter();
        fs.call(&json!({"operation": "write_file", "path": "a.md", "content": "A"})).await;

        let copied = fs
            .call(&json!({"operation": "copy_file", "path": "a.md", "destination": "out/b.md"}))
            .await;
        assert_eq!(copied, "File copied from a.md to out/b.md");
        assert_eq!(std::fs::read_to_string(dir.path().join("out/b.md")).unwrap(), "A");

        let moved = fs
            .call(&json!({"operation": "move_file", "path": "a.md", "destination": "c.md"}))
            .await;
        assert_eq!(moved, "File moved from a.md to c.md");
        assert!(!dir.path().join("a.md").exists());

        let missing = fs
            .call(&json!({"operation": "copy_file", "path": "a.md", "destination": "d.md"}))
            .await;
        assert_eq!(missing, "Source file not found: a.md");
    }

    #[tokio::test]
    async fn test_failures_are_text() {
        let (dir, fs) = adapter();
        std::fs::write(dir.path().join("blocker"), "x").unwrap();

        // parent path is a file, so the write fails at the OS level
        let text = fs
            .call(&json!({"operation": "write_file", "path": "blocker/inner.md", "content": "x"}))
            .await;
        assert!(text.starts_with("Error executing write_file:"), "{}", text);
    }
}
