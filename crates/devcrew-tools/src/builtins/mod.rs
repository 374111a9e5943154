//! Built-in tool adapters
//!
//! - `filesystem`: file and directory operations
//! - `git`: git subprocesses
//! - `code_analysis`: static source analysis
//! - `web_research`: search and page extraction

mod analysis;
mod filesystem;
mod git;
mod research;

pub use analysis::{AnalysisOperation, CodeAnalysisAdapter, Language, ANALYSIS_TOOL};
pub use filesystem::{FileSystemAdapter, FsOperation, FILESYSTEM_TOOL};
pub use git::{CommandExecutor, CommandOutput, GitAdapter, GitOperation, SystemExecutor, GIT_TOOL};
pub use research::{ResearchConfig, ResearchOperation, WebResearchAdapter, RESEARCH_TOOL};

use crate::adapter::AdapterTool;
use crate::error::Result;
use crate::registry::ToolRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Settings shared by the built-in adapters
#[derive(Debug, Clone, Default)]
pub struct BuiltinsConfig {
    /// Base directory for relative paths; the process working directory when `None`
    pub workspace_root: Option<PathBuf>,
    /// Web research settings
    pub research: ResearchConfig,
}

/// Register all built-in adapters
///
/// # Errors
/// Returns an error if the research HTTP client cannot be built.
pub fn register_builtins(registry: &mut ToolRegistry, config: &BuiltinsConfig) -> Result<()> {
    let mut filesystem = FileSystemAdapter::new();
    let mut git = GitAdapter::new();
    let mut analysis = CodeAnalysisAdapter::new();
    if let Some(root) = &config.workspace_root {
        filesystem = FileSystemAdapter::with_root(root);
        git = git.with_root(root);
        analysis = analysis.with_root(root);
    }

    registry.register(Arc::new(AdapterTool::new(filesystem)));
    registry.register(Arc::new(AdapterTool::new(git)));
    registry.register(Arc::new(AdapterTool::new(analysis)));
    registry.register(Arc::new(AdapterTool::new(WebResearchAdapter::new(
        config.research.clone(),
    )?)));

    info!(count = registry.len(), "Registered built-in tools");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_builtins() {
        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry, &BuiltinsConfig::default()).unwrap();

        assert_eq!(
            registry.list_names(),
            vec![ANALYSIS_TOOL, FILESYSTEM_TOOL, GIT_TOOL, RESEARCH_TOOL]
        );
        let llm_tools = registry.to_llm_tools(None);
        assert!(llm_tools
            .iter()
            .all(|t| t.parameters["required"][0] == "operation"));
    }
}
