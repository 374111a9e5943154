//! Code analysis adapter
//!
//! Static, subprocess-free analysis of a single source file. Every operation
//! is a pure function of the file contents, so the submodules are tested on
//! string input without touching the filesystem.

mod complexity;
mod lint;
mod quality;
mod structure;

use crate::adapter::{Adapter, AdapterError, Args};
use crate::registry::{ToolCategory, ToolDefinition};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tool name exposed to the model
pub const ANALYSIS_TOOL: &str = "code_analysis";

/// Source language of an analysed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Language {
    /// Python
    Python,
    /// Rust
    Rust,
    /// JavaScript
    JavaScript,
    /// TypeScript
    TypeScript,
    /// Anything else, by lowercase name; only `quality` supports it
    Other(String),
}

impl Language {
    /// Parse a language name as the model writes it
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "python" | "py" => Self::Python,
            "rust" | "rs" => Self::Rust,
            "javascript" | "js" | "jsx" | "node" => Self::JavaScript,
            "typescript" | "ts" | "tsx" => Self::TypeScript,
            other => Self::Other(other.to_string()),
        }
    }

    /// Infer from a file extension, falling back to Python
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "rs" => Self::Rust,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "ts" | "tsx" => Self::TypeScript,
            "go" => Self::Other("go".to_string()),
            "java" => Self::Other("java".to_string()),
            "c" | "h" => Self::Other("c".to_string()),
            "cpp" | "cc" | "hpp" => Self::Other("cpp".to_string()),
            "rb" => Self::Other("ruby".to_string()),
            "sh" | "bash" => Self::Other("shell".to_string()),
            _ => Self::Python,
        }
    }

    /// Lowercase name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Python => "python",
            Self::Rust => "rust",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Other(name) => name,
        }
    }

    /// Name used in report headings
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Python => "Python",
            Self::Rust => "Rust",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Other(name) => name,
        }
    }

    /// Line comment prefix
    #[must_use]
    pub fn comment_prefix(&self) -> &'static str {
        match self {
            Self::Rust | Self::JavaScript | Self::TypeScript => "//",
            Self::Other(name) if matches!(name.as_str(), "go" | "java" | "c" | "cpp") => "//",
            _ => "#",
        }
    }

    /// Maximum line length before `lint` flags a line
    #[must_use]
    pub fn max_line_length(&self) -> usize {
        match self {
            Self::Python => 79,
            _ => 100,
        }
    }

    /// Whether the structural operations (`structure`, `complexity`, `lint`) apply
    #[must_use]
    pub fn is_structured(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Uses indentation rather than braces for blocks
    pub(crate) fn is_indented(&self) -> bool {
        matches!(self, Self::Python)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Code analysis operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOperation {
    /// Classes/types, functions and imports
    Structure {
        /// File to analyse
        file_path: String,
        /// Source language
        language: Language,
    },
    /// Per-function decision-point complexity
    Complexity {
        /// File to analyse
        file_path: String,
        /// Source language
        language: Language,
    },
    /// Rule-based style checks
    Lint {
        /// File to analyse
        file_path: String,
        /// Source language
        language: Language,
    },
    /// Line statistics
    Quality {
        /// File to analyse
        file_path: String,
        /// Source language
        language: Language,
    },
}

impl AnalysisOperation {
    /// Operation tag
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Structure { .. } => "structure",
            Self::Complexity { .. } => "complexity",
            Self::Lint { .. } => "lint",
            Self::Quality { .. } => "quality",
        }
    }

    /// Target file as given
    #[must_use]
    pub fn file_path(&self) -> &str {
        match self {
            Self::Structure { file_path, .. }
            | Self::Complexity { file_path, .. }
            | Self::Lint { file_path, .. }
            | Self::Quality { file_path, .. } => file_path,
        }
    }

    /// Language the file is analysed as
    #[must_use]
    pub fn language(&self) -> &Language {
        match self {
            Self::Structure { language, .. }
            | Self::Complexity { language, .. }
            | Self::Lint { language, .. }
            | Self::Quality { language, .. } => language,
        }
    }

    /// Parse a tool-call argument object
    pub fn from_args(value: &Value) -> Result<Self, AdapterError> {
        let operation = Args::operation(value, ANALYSIS_TOOL)?;
        if !matches!(operation, "structure" | "complexity" | "lint" | "quality") {
            return Err(AdapterError::UnsupportedOperation(operation.to_string()));
        }

        let args = Args::new(value, operation);
        let file_path = args.non_empty("file_path")?;
        let language = args
            .optional("language")
            .map(|name| Language::from_name(&name))
            .unwrap_or_else(|| Language::from_path(Path::new(&file_path)));

        Ok(match operation {
            "structure" => Self::Structure { file_path, language },
            "complexity" => Self::Complexity { file_path, language },
            "lint" => Self::Lint { file_path, language },
            _ => Self::Quality { file_path, language },
        })
    }
}

/// Code analysis adapter
#[derive(Debug, Clone, Default)]
pub struct CodeAnalysisAdapter {
    root: Option<PathBuf>,
}

impl CodeAnalysisAdapter {
    /// Adapter resolving paths against the working directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`
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

/// Run an operation over already-loaded file contents
pub(crate) fn analyze(
    operation: &AnalysisOperation,
    file_name: &str,
    content: &str,
) -> Result<String, AdapterError> {
    let language = operation.language();
    if !matches!(operation, AnalysisOperation::Quality { .. }) && !language.is_structured() {
        return Err(AdapterError::UnsupportedOperation(format!(
            "{} for {}",
            operation.name(),
            language
        )));
    }

    Ok(match operation {
        AnalysisOperation::Structure { .. } => structure::analyze(content, language, file_name),
        AnalysisOperation::Complexity { .. } => complexity::analyze(content, language, file_name),
        AnalysisOperation::Lint { .. } => lint::analyze(content, language, file_name),
        AnalysisOperation::Quality { .. } => quality::analyze(content, language, file_name),
    })
}

#[async_trait::async_trait]
impl Adapter for CodeAnalysisAdapter {
    type Operation = AnalysisOperation;

    fn definition() -> ToolDefinition {
        ToolDefinition::new(
            ANALYSIS_TOOL,
            "Analyze a source file: structure (classes, functions, imports), complexity \
             (functions with complexity >= 5), lint (style issues) or quality (line statistics). \
             Example: {\"operation\": \"structure\", \"file_path\": \"app/main.py\"}",
        )
        .with_category(ToolCategory::Analysis)
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["structure", "complexity", "lint", "quality"]
                },
                "file_path": {"type": "string", "description": "Path to the source file"},
                "language": {
                    "type": "string",
                    "description": "python, rust, javascript or typescript (default: from extension)"
                }
            },
            "required": ["operation", "file_path"]
        }))
    }

    fn parse(args: &Value) -> Result<AnalysisOperation, AdapterError> {
        AnalysisOperation::from_args(args)
    }

    async fn invoke(&self, operation: AnalysisOperation) -> Result<String, AdapterError> {
        let path = self.resolve(operation.file_path());
        if !path.is_file() {
            return Ok(format!("File not found: {}", operation.file_path()));
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AdapterError::failed(operation.name(), e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| operation.file_path().to_string());

        debug!(
            operation = operation.name(),
            language = %operation.language(),
            bytes = content.len(),
            "Analyzing file"
        );
        analyze(&operation, &file_name, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_language_inference() {
        assert_eq!(Language::from_path(Path::new("src/lib.rs")), Language::Rust);
        assert_eq!(Language::from_path(Path::new("app.tsx")), Language::TypeScript);
        assert_eq!(Language::from_path(Path::new("index.js")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("main.go")), Language::Other("go".into()));
        assert_eq!(Language::from_path(Path::new("README")), Language::Python);
        assert_eq!(Language::from_name(" JS "), Language::JavaScript);
    }

    #[test]
    fn test_parse() {
        let op = AnalysisOperation::from_args(&json!({
            "operation": "lint",
            "file_path": "main.py"
        }))
        .unwrap();
        assert_eq!(op.name(), "lint");
        assert_eq!(op.language(), &Language::Python);

        let err = AnalysisOperation::from_args(&json!({"operation": "quality"})).unwrap_err();
        assert_eq!(err.to_string(), "file_path is required for quality");

        let err = AnalysisOperation::from_args(&json!({"operation": "format", "file_path": "a"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported operation: format");
    }

    #[test]
    fn test_unsupported_language() {
        let op = AnalysisOperation::from_args(&json!({
            "operation": "structure",
            "file_path": "main.go"
        }))
        .unwrap();
        let err = analyze(&op, "main.go", "package main\n").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported operation: structure for go");

        let quality = AnalysisOperation::Quality {
            file_path: "main.go".into(),
            language: Language::Other("go".into()),
        };
        let text = analyze(&quality, "main.go", "// entry\npackage main\n").unwrap();
        assert!(text.contains("Comment lines: 1"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let adapter = CodeAnalysisAdapter::new();
        let text = adapter
            .call(&json!({"operation": "structure", "file_path": "/no/such/file.py"}))
            .await;
        assert_eq!(text, "File not found: /no/such/file.py");
    }

    #[tokio::test]
    async fn test_analyze_file_on_disk() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("app.py"),
            "import os\n\nclass App:\n    def run(self):\n        return os.getcwd()\n",
        )
        .unwrap();

        let adapter = CodeAnalysisAdapter::new().with_root(dir.path());
        let text = adapter
            .call(&json!({"operation": "structure", "file_path": "app.py"}))
            .await;
        assert!(text.starts_with("Python Structure Analysis for app.py:"));
        assert!(text.contains("Classes (1): App"));
        assert!(text.contains("Functions (1): run"));
        assert!(text.contains("Imports (1): os"));
    }
}
