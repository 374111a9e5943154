//! `devcrew doctor`

use devcrew_core::AppConfig;
use devcrew_llm::OllamaProvider;
use std::path::Path;
use std::process::Command;

/// Whether `name` is among the installed models; a bare name matches `:latest`
pub fn model_installed(installed: &[String], name: &str) -> bool {
    installed.iter().any(|model| {
        model == name || (!name.contains(':') && model.strip_suffix(":latest") == Some(name))
    })
}

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("🏥 devcrew Doctor\n");

    let mut all_ok = true;

    all_ok &= check_command("git", "Git", "Install git: https://git-scm.com/downloads");
    all_ok &= check_command("ollama", "Ollama CLI", "Install Ollama: https://ollama.com/download");
    check_env_file();
    all_ok &= check_ollama_models(config).await;

    println!();
    if all_ok {
        println!("✅ All checks passed! Ready to run devcrew.");
        Ok(())
    } else {
        println!("⚠️  Some checks failed. Please fix the issues above.");
        anyhow::bail!("doctor found problems")
    }
}

fn check_command(program: &str, label: &str, hint: &str) -> bool {
    print!("Checking {}... ", label);

    match Command::new(program).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            println!("✅ {}", version.trim());
            true
        }
        Ok(output) => {
            println!("❌ `{} --version` exited with {}", program, output.status);
            false
        }
        Err(_) => {
            println!("❌ Not found");
            println!("  {}", hint);
            false
        }
    }
}

fn check_env_file() {
    print!("Checking .env file... ");

    if Path::new(".env").exists() {
        println!("✅ Found");
    } else {
        println!("ℹ️  Not found (defaults in use; `devcrew setup` writes one)");
    }
}

async fn check_ollama_models(config: &AppConfig) -> bool {
    print!("Checking Ollama at {}... ", config.llm.base_url);

    let provider = match OllamaProvider::new(config.ollama_config()) {
        Ok(provider) => provider,
        Err(e) => {
            println!("❌ {}", e);
            return false;
        }
    };

    let installed = match provider.list_models().await {
        Ok(models) => {
            println!("✅ Running ({} model(s) installed)", models.len());
            models
        }
        Err(e) => {
            println!("⚠️  Not reachable: {}", e);
            println!("  Start Ollama with: ollama serve");
            return false;
        }
    };

    let mut ok = true;
    for (tier, model) in [
        ("default", &config.llm.default_model),
        ("code", &config.llm.code_model),
        ("analysis", &config.llm.analysis_model),
    ] {
        if model_installed(&installed, model) {
            println!("  ✅ {} model {}", tier, model);
        } else {
            println!("  ❌ {} model {} missing (ollama pull {})", tier, model, model);
            ok = false;
        }
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_installed() {
        let installed = vec!["llama3.2:3b".to_string(), "mistral:latest".to_string()];
        assert!(model_installed(&installed, "llama3.2:3b"));
        assert!(model_installed(&installed, "mistral"));
        assert!(!model_installed(&installed, "mistral:7b"));
        assert!(!model_installed(&installed, "codellama:7b"));
    }
}
