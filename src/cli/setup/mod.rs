//! `devcrew setup`
//!
//! 1. Check that git is available (required)
//! 2. Check for the Ollama CLI; print install guidance when missing
//! 3. Pull the models (failures warn and continue)
//! 4. Create the project directory
//! 5. Write `.env`, `config/crew.toml`, `README.md`, `docs/*.md` and `start.sh`

mod templates;

use super::{prompts, SetupArgs};
use devcrew_core::BUILTIN_CREW;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::warn;

/// Models pulled by setup
pub const MODELS: [&str; 4] = ["llama3.2:3b", "codellama:7b", "mistral:7b", "nomic-embed-text"];

const DIRECTORIES: [&str; 3] = ["config", "docs", "output"];

/// Print a styled box.
fn print_box(title: &str, content: &str) {
    println!();
    println!("  ╔═══════════════════════════════════════════════════════════════╗");
    println!("  ║  {:^61}║", title);
    println!("  ╚═══════════════════════════════════════════════════════════════╝");
    for line in content.lines() {
        if !line.is_empty() {
            println!("  {}", line);
        }
    }
    println!();
}

fn command_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn ollama_install_hint() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Install Ollama with: curl -fsSL https://ollama.com/install.sh | sh",
        "macos" => "Install Ollama with: brew install ollama (or download from https://ollama.com/download)",
        _ => "Download Ollama from: https://ollama.com/download",
    }
}

pub async fn run(args: SetupArgs) -> anyhow::Result<()> {
    print_box(
        "devcrew setup",
        "🚀 Setting up your AI-powered development team\n\
         🤖 Local models with Ollama\n\
         👥 Developers, testers, analysts and a tech lead",
    );

    println!("🔍 Checking system requirements...");
    if !command_available("git") {
        return Err(devcrew_core::Error::Configuration(
            "Git is required but not found".to_string(),
        )
        .into());
    }
    println!("✅ Git is available");

    if command_available("ollama") {
        println!("✅ Ollama is installed");
        if args.skip_models {
            println!("⏭️  Skipping model downloads");
        } else {
            pull_models().await;
        }
    } else {
        println!("⚠️  Ollama not found. {}", ollama_install_hint());
        println!("   Then run: devcrew setup --dir {}", args.dir.display());
    }

    println!("📁 Creating project structure...");
    if is_non_empty_dir(&args.dir) && !args.force {
        println!("⚠️  Project directory {} already exists", args.dir.display());
        if !prompts::confirm("Do you want to overwrite its devcrew files?", false)? {
            anyhow::bail!("Setup cancelled");
        }
    }

    let written = scaffold(&args.dir)?;
    for path in &written {
        println!("   + {}", path.display());
    }

    print_box(
        "🎉 SETUP COMPLETED! 🎉",
        &format!(
            "📁 Project location: {}\n\
             🚀 Quick start:\n   cd {}\n   ./start.sh\n\
             📖 Or read the README.md for detailed instructions",
            args.dir.display(),
            args.dir.display()
        ),
    );
    Ok(())
}

async fn pull_models() {
    println!("📦 Setting up AI models...");
    for model in MODELS {
        println!("📥 Downloading {}...", model);
        let status = tokio::process::Command::new("ollama")
            .args(["pull", model])
            .status()
            .await;
        match status {
            Ok(status) if status.success() => println!("✅ {} downloaded successfully", model),
            Ok(status) => {
                warn!(model, %status, "ollama pull failed");
                println!("⚠️  Failed to download {}, continuing...", model);
            }
            Err(e) => {
                warn!(model, error = %e, "ollama pull could not start");
                println!("⚠️  Failed to download {}, continuing...", model);
            }
        }
    }
}

fn is_non_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Create the directory layout and write every template; returns the files written
pub fn scaffold(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    for sub in DIRECTORIES {
        std::fs::create_dir_all(dir.join(sub))?;
    }

    let files: [(&str, &str); 7] = [
        (".env", templates::ENV_FILE),
        ("config/crew.toml", BUILTIN_CREW),
        ("README.md", templates::README),
        ("docs/web_application.md", templates::WEB_APPLICATION),
        ("docs/api_development.md", templates::API_DEVELOPMENT),
        ("docs/mobile_application.md", templates::MOBILE_APPLICATION),
        ("start.sh", templates::START_SCRIPT),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        std::fs::write(&path, content)?;
        written.push(path);
    }

    make_executable(&dir.join("start.sh"))?;
    Ok(written)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
