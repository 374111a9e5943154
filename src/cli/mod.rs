//! CLI module for devcrew
//!
//! Provides the commands:
//! - `run`: execute the full or a custom crew pipeline
//! - `list`: show personas and steps with their indices
//! - `doctor`: check git, Ollama and the configured models
//! - `setup`: pull models and scaffold a project directory

use clap::{Args, Parser, Subcommand};
use devcrew_core::{format_error_for_cli, AppConfig};
use std::path::PathBuf;

pub mod doctor;
pub mod list;
pub mod progress;
pub mod prompts;
pub mod run;
pub mod setup;

/// Local multi-agent development team
#[derive(Parser, Debug)]
#[command(name = "devcrew")]
#[command(about = "Local multi-agent development team backed by Ollama")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Debug-level logging (same as VERBOSE=true)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write daily rolling log files to this directory
    #[arg(long, global = true, env = "DEVCREW_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the development team on a project description
    Run(RunArgs),
    /// List personas and steps
    List(ListArgs),
    /// Run system diagnostics
    Doctor,
    /// Pull models and create a project directory
    Setup(SetupArgs),
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Project description; prompted for when omitted
    pub description: Vec<String>,

    /// Pick personas and steps instead of running the full workflow
    #[arg(long)]
    pub custom: bool,

    /// Personas for --custom (comma-separated names or numbers)
    #[arg(long, requires = "custom")]
    pub agents: Option<String>,

    /// Steps for --custom (comma-separated names or numbers)
    #[arg(long, requires = "custom")]
    pub tasks: Option<String>,

    /// Where artifacts are written (overrides OUTPUT_DIR)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Crew definition file (TOML or YAML)
    #[arg(long)]
    pub crew: Option<PathBuf>,

    /// Extra attempts for a failing step
    #[arg(long)]
    pub retries: Option<u32>,

    /// Keep going after a failed step
    #[arg(long)]
    pub continue_on_failure: bool,

    /// Ollama server URL (overrides OLLAMA_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Use this model for every persona
    #[arg(long)]
    pub model: Option<String>,

    /// Answer every step with a canned reply instead of calling a model
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Crew definition file (TOML or YAML)
    #[arg(long)]
    pub crew: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct SetupArgs {
    /// Project directory to create
    #[arg(long, default_value = "devcrew_project")]
    pub dir: PathBuf,

    /// Skip `ollama pull`
    #[arg(long)]
    pub skip_models: bool,

    /// Overwrite a non-empty directory without asking
    #[arg(long)]
    pub force: bool,
}

/// Run the CLI command
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => run::run(args, config).await,
        Some(Commands::List(args)) => list::run(args, &config),
        Some(Commands::Doctor) => doctor::run(&config).await,
        Some(Commands::Setup(args)) => setup::run(args).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

/// One user-facing line plus an optional suggestion
pub fn render_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<devcrew_core::Error>() {
        Some(core) => format_error_for_cli(core),
        None => format!("❌ {:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "devcrew",
            "run",
            "Build",
            "a",
            "todo",
            "API",
            "--retries",
            "2",
            "--continue-on-failure",
            "--output-dir",
            "out",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.description.join(" "), "Build a todo API");
                assert_eq!(args.retries, Some(2));
                assert!(args.continue_on_failure);
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
                assert!(!args.custom);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_agents_require_custom() {
        assert!(Cli::try_parse_from(["devcrew", "run", "--agents", "1"]).is_err());
        assert!(Cli::try_parse_from(["devcrew", "run", "--custom", "--agents", "1"]).is_ok());
    }

    #[test]
    fn test_render_error() {
        let err = anyhow::Error::from(devcrew_core::Error::Selection(
            "Invalid agent or task selection!".to_string(),
        ));
        assert!(render_error(&err).starts_with("❌ Invalid agent or task selection!"));

        let plain = anyhow::anyhow!("All fields are required!");
        assert_eq!(render_error(&plain), "❌ All fields are required!");
    }
}
