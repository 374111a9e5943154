//! `devcrew run`

use super::progress::ProgressPrinter;
use super::{prompts, RunArgs};
use anyhow::bail;
use devcrew_core::{
    build_tool_registry, parse_list, AppConfig, Crew, CrewRegistry, Pipeline, PipelineOptions,
    PipelineReport, RunPlan,
};
use devcrew_llm::{LlmProvider, MockProvider, OllamaProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

const RULE_WIDTH: usize = 60;

const AGENTS_HINT: &str = "e.g. 1,6,tech_lead";
const TASKS_HINT: &str = "e.g. 1,2,review_code";
const DESCRIPTION_HINT: &str = "what to build, for whom, and any technology preferences";

/// Canned artifact for `--dry-run`
pub const DRY_RUN_REPLY: &str = "# Dry run\n\nNo model was called for this step.\n";

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Fold run flags into the loaded settings
pub fn apply_overrides(config: &mut AppConfig, args: &RunArgs) {
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(crew) = &args.crew {
        config.crew_file = Some(crew.clone());
    }
    if let Some(retries) = args.retries {
        config.pipeline.max_attempts = retries.saturating_add(1);
    }
    if args.continue_on_failure {
        config.pipeline.continue_on_failure = true;
    }
    if let Some(url) = &args.base_url {
        config.llm.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(model) = &args.model {
        config.llm.default_model = model.clone();
        config.llm.code_model = model.clone();
        config.llm.analysis_model = model.clone();
    }
}

fn provider_for(config: &AppConfig, dry_run: bool) -> anyhow::Result<Arc<dyn LlmProvider>> {
    if dry_run {
        info!("Dry run: using canned replies");
        return Ok(Arc::new(MockProvider::constant(DRY_RUN_REPLY)));
    }
    let provider =
        OllamaProvider::new(config.ollama_config()).map_err(devcrew_core::Error::from)?;
    Ok(Arc::new(provider))
}

/// Run the full or custom workflow
pub async fn run(args: RunArgs, mut config: AppConfig) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args);

    let registry = CrewRegistry::load(config.crew_file.as_deref())?;
    let tools = build_tool_registry(&config)?;
    let provider = provider_for(&config, args.dry_run)?;
    let crew = Crew::assemble(&config, registry, provider, tools)?;

    let (plan, description) = if args.custom {
        custom_plan(&crew, &args)?
    } else {
        full_plan(&crew, &args)?
    };

    println!("🚀 Starting development team workflow...");
    println!("This may take several minutes depending on the project complexity.");
    println!("{}", rule());

    let pipeline = Pipeline::new(PipelineOptions::from_config(&config))
        .with_observer(Arc::new(ProgressPrinter::default()));
    let report = pipeline.run(&crew, &plan.steps, &description).await?;

    print_summary(&report, &config.output_dir);
    report.into_result()?;
    Ok(())
}

fn joined_description(args: &RunArgs) -> String {
    args.description.join(" ").trim().to_string()
}

fn full_plan(crew: &Crew, args: &RunArgs) -> anyhow::Result<(RunPlan, String)> {
    println!("🤖 AI Development Team Starting...");
    println!("{}", rule());

    let mut description = joined_description(args);
    if description.is_empty() {
        description = prompts::text("📝 Enter your project description:", Some(DESCRIPTION_HINT))?;
    }
    if description.is_empty() {
        bail!("Project description is required!");
    }

    println!("🎯 Project: {}", description);
    println!("{}", rule());
    Ok((crew.plan_full(), description))
}

fn custom_plan(crew: &Crew, args: &RunArgs) -> anyhow::Result<(RunPlan, String)> {
    println!("🎛️  Custom AI Development Team Workflow");
    println!("{}", rule());

    println!("Available Agents:");
    for (i, name) in crew.registry().persona_names().iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    println!("\nAvailable Tasks:");
    for (i, name) in crew.registry().step_names().iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    println!("\n{}", rule());

    let agents = match &args.agents {
        Some(agents) => agents.trim().to_string(),
        None => prompts::text(
            "Select agents (comma-separated numbers or names):",
            Some(AGENTS_HINT),
        )?,
    };
    let tasks = match &args.tasks {
        Some(tasks) => tasks.trim().to_string(),
        None => prompts::text(
            "Select tasks (comma-separated numbers or names):",
            Some(TASKS_HINT),
        )?,
    };
    let mut description = joined_description(args);
    if description.is_empty() {
        description = prompts::text("Enter project description:", Some(DESCRIPTION_HINT))?;
    }

    if agents.is_empty() || tasks.is_empty() || description.is_empty() {
        bail!("All fields are required!");
    }

    let agents = parse_list(&agents);
    let tasks = parse_list(&tasks);
    let plan = crew.plan_custom(agents.as_slice(), tasks.as_slice())?;
    for warning in &plan.warnings {
        println!("⚠️  {}", warning);
    }

    let step_names: Vec<&str> = plan.steps.iter().map(|s| s.name.as_str()).collect();
    println!("\n🎯 Selected Agents: {}", plan.roster.join(", "));
    println!("🎯 Selected Tasks: {}", step_names.join(", "));
    println!("🎯 Project: {}", description);
    println!("{}", rule());

    Ok((plan, description))
}

/// Markdown files in the output directory, sorted by name
pub fn generated_documents(output_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(output_dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}

fn print_summary(report: &PipelineReport, output_dir: &Path) {
    let location = std::path::absolute(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());

    println!("{}", rule());
    if report.is_success() {
        println!("✅ Development team workflow completed!");
    } else {
        println!(
            "⚠️  Workflow {} ({} of {} step(s) failed)",
            report.state,
            report.failures.len(),
            report.failures.len() + report.artifacts.len()
        );
    }
    println!("📁 Results saved in: {}", location.display());
    println!(
        "⏱️  {} artifact(s) in {:.1}s",
        report.artifacts.len(),
        report.duration().num_milliseconds() as f64 / 1000.0
    );
    println!("{}", rule());

    let documents = generated_documents(output_dir);
    if !documents.is_empty() {
        println!("📋 Generated Documents:");
        for path in documents {
            if let Some(name) = path.file_name() {
                println!("   - {}", name.to_string_lossy());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        let args = RunArgs {
            output_dir: Some(PathBuf::from("artifacts")),
            retries: Some(2),
            continue_on_failure: true,
            base_url: Some("http://gpu-box:11434/".to_string()),
            model: Some("qwen2.5:7b".to_string()),
            ..RunArgs::default()
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.output_dir, PathBuf::from("artifacts"));
        assert_eq!(config.pipeline.max_attempts, 3);
        assert!(config.pipeline.continue_on_failure);
        assert_eq!(config.llm.base_url, "http://gpu-box:11434");
        assert_eq!(config.llm.code_model, "qwen2.5:7b");
        assert_eq!(config.llm.analysis_model, "qwen2.5:7b");
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &RunArgs::default());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_generated_documents() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.md"), "b").unwrap();
        std::fs::write(dir.path().join("a.md"), "a").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("dir.md")).unwrap();

        let names: Vec<String> = generated_documents(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);

        assert!(generated_documents(&dir.path().join("missing")).is_empty());
    }
}
