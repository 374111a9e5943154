//! Prompt helpers with inquire → stdin fallback.
//!
//! Every prompt gracefully degrades: when stdin is not a terminal, or
//! `inquire` fails, we fall back to plain stdin reads.

use inquire::{Confirm, Text};
use std::io::{self, BufRead, IsTerminal, Write};

/// Read a trimmed line from stdin.
fn read_line() -> anyhow::Result<String> {
    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))?;
    Ok(input.trim().to_string())
}

/// Free-text prompt with fallback; returns the trimmed answer, possibly empty.
pub fn text(message: &str, help: Option<&str>) -> anyhow::Result<String> {
    if !io::stdin().is_terminal() {
        return plain_text(message, help);
    }
    let mut builder = Text::new(message);
    if let Some(h) = help {
        builder = builder.with_help_message(h);
    }
    match builder.prompt() {
        Ok(v) => Ok(v.trim().to_string()),
        Err(
            inquire::InquireError::OperationCanceled | inquire::InquireError::OperationInterrupted,
        ) => {
            anyhow::bail!("Cancelled");
        }
        Err(_) => plain_text(message, help),
    }
}

/// Prompt line for the stdin fallback
fn plain_prompt(message: &str, help: Option<&str>) -> String {
    match help {
        Some(h) => format!("{} ({}) ", message, h),
        None => format!("{} ", message),
    }
}

fn plain_text(message: &str, help: Option<&str>) -> anyhow::Result<String> {
    print!("{}", plain_prompt(message, help));
    io::stdout().flush()?;
    read_line()
}

/// Confirm prompt with fallback.
pub fn confirm(message: &str, default: bool) -> anyhow::Result<bool> {
    if !io::stdin().is_terminal() {
        return plain_confirm(message, default);
    }
    match Confirm::new(message).with_default(default).prompt() {
        Ok(v) => Ok(v),
        Err(
            inquire::InquireError::OperationCanceled | inquire::InquireError::OperationInterrupted,
        ) => {
            anyhow::bail!("Cancelled");
        }
        Err(_) => plain_confirm(message, default),
    }
}

fn plain_confirm(message: &str, default: bool) -> anyhow::Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    print!("? {} ({}) ", message, hint);
    io::stdout().flush()?;
    let input = read_line()?;
    match input.to_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Ok(default),
    }
}
