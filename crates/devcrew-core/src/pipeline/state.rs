//! Pipeline state machine

use serde::Serialize;
use std::fmt;

/// `Idle -> Running(i) -> Completed`, or `Running(i) -> Failed(i)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing has run yet
    #[default]
    Idle,
    /// A step is in progress
    Running {
        /// Position in the plan
        index: usize,
        /// Step name
        step: String,
    },
    /// Every step produced an artifact
    Completed,
    /// A step failed; `index` is the first failure
    Failed {
        /// Position in the plan
        index: usize,
        /// Step name
        step: String,
    },
}

impl PipelineState {
    /// Completed or Failed
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }

    /// Step transition; only valid from `Idle` or `Running`
    pub(crate) fn advance(&mut self, index: usize, step: &str) {
        debug_assert!(!self.is_terminal(), "advance from terminal state {}", self);
        *self = Self::Running {
            index,
            step: step.to_string(),
        };
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running { index, step } => write!(f, "running step {} ({})", index + 1, step),
            Self::Completed => write!(f, "completed"),
            Self::Failed { index, step } => write!(f, "failed at step {} ({})", index + 1, step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let mut state = PipelineState::default();
        assert_eq!(state, PipelineState::Idle);
        assert!(!state.is_terminal());

        state.advance(0, "analyze_project");
        state.advance(1, "design_architecture");
        assert_eq!(state.to_string(), "running step 2 (design_architecture)");

        let failed = PipelineState::Failed {
            index: 1,
            step: "design_architecture".to_string(),
        };
        assert!(failed.is_terminal());
        assert_eq!(failed.to_string(), "failed at step 2 (design_architecture)");
        assert!(PipelineState::Completed.is_terminal());
    }

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_value(PipelineState::Failed {
            index: 0,
            step: "a".to_string(),
        })
        .unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["index"], 0);
    }
}
