//! Terminal progress for pipeline runs

use devcrew_core::{PipelineEvent, PipelineObserver};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Prints one line per step transition
#[derive(Debug, Default)]
pub struct ProgressPrinter {
    total: AtomicUsize,
}

impl ProgressPrinter {
    /// Line for an event, if it is worth showing
    pub fn line(&self, event: &PipelineEvent) -> Option<String> {
        let total = self.total.load(Ordering::Relaxed);
        match event {
            PipelineEvent::RunStarted { total_steps, .. } => {
                self.total.store(*total_steps, Ordering::Relaxed);
                None
            }
            PipelineEvent::StepStarted {
                index,
                step,
                persona,
                attempt,
                ..
            } => Some(if *attempt > 1 {
                format!("▶️  [{}/{}] {} ({}), attempt {}", index + 1, total, step, persona, attempt)
            } else {
                format!("▶️  [{}/{}] {} ({})", index + 1, total, step, persona)
            }),
            PipelineEvent::StepRetrying { step, error, .. } => {
                Some(format!("🔁 {} failed, retrying: {}", step, error))
            }
            PipelineEvent::StepCompleted {
                step,
                path,
                duration_ms,
                ..
            } => Some(format!(
                "✅ {} → {} ({:.1}s)",
                step,
                path.display(),
                *duration_ms as f64 / 1000.0
            )),
            PipelineEvent::StepFailed {
                step,
                error,
                attempts,
                ..
            } => Some(format!(
                "❌ {} failed after {} attempt(s): {}",
                step, attempts, error
            )),
            PipelineEvent::RunCompleted { .. } | PipelineEvent::RunFailed { .. } => None,
        }
    }
}

impl PipelineObserver for ProgressPrinter {
    fn on_event(&self, event: &PipelineEvent) {
        if let Some(line) = self.line(event) {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    #[test]
    fn test_lines() {
        let printer = ProgressPrinter::default();
        let run_id = Uuid::nil();

        assert!(printer
            .line(&PipelineEvent::RunStarted {
                run_id,
                total_steps: 10
            })
            .is_none());

        let started = printer.line(&PipelineEvent::StepStarted {
            run_id,
            index: 1,
            step: "design_architecture".to_string(),
            persona: "tech_lead".to_string(),
            attempt: 1,
        });
        assert_eq!(
            started.as_deref(),
            Some("▶️  [2/10] design_architecture (tech_lead)")
        );

        let done = printer.line(&PipelineEvent::StepCompleted {
            run_id,
            index: 1,
            step: "design_architecture".to_string(),
            path: PathBuf::from("output/architecture_design.md"),
            duration_ms: 1500,
        });
        assert_eq!(
            done.as_deref(),
            Some("✅ design_architecture → output/architecture_design.md (1.5s)")
        );
    }
}
