//! Typed error hierarchy for the vigil supervision engine.
//!
//! Two top-level enums cover the two failure domains:
//! - `EngineError` — transport/communication failures at the engine facade
//! - `RunError` — outcomes of an orchestration run or a single watched job
//!
//! Timeouts and unmet preconditions are deliberately *not* errors; they are
//! reported through `PhaseStatus` and user-visible warnings instead.

use thiserror::Error;

/// Communication failures at the engine facade boundary.
///
/// These are fatal for the run that observes them: they propagate unchanged
/// and are never retried at this layer.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine unreachable: {0}")]
    Unreachable(String),

    #[error("Engine rejected the {operation} request: {details}")]
    Rejected {
        operation: &'static str,
        details: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Outcomes of a phase-based run or a single watched job.
///
/// Local cancellation, engine-side cancellation and remote failure are kept
/// distinct so callers can report each differently. `UnhandledTerminalToken`
/// is a canary: it fires when the well-known token set and the terminal
/// handler drift apart, and is never expected in a correct deployment.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Remote job failed: {details}")]
    JobFailed { details: String },

    #[error("Remote job was canceled on the engine side")]
    CanceledByEngine,

    #[error("Run canceled by local request")]
    Canceled,

    #[error("Status token '{token}' is well-known but has no terminal handler")]
    UnhandledTerminalToken { token: String },
}

impl RunError {
    /// True for both cancellation variants, local and engine-side.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RunError::Canceled | RunError::CanceledByEngine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_rejected_carries_operation_and_details() {
        let err = EngineError::Rejected {
            operation: "start",
            details: "scan slots exhausted".to_string(),
        };
        assert!(err.to_string().contains("start"));
        assert!(err.to_string().contains("scan slots exhausted"));
    }

    #[test]
    fn run_error_converts_from_engine_error() {
        let inner = EngineError::Unreachable("connection refused".to_string());
        let run_err: RunError = inner.into();
        match &run_err {
            RunError::Engine(EngineError::Unreachable(msg)) => {
                assert_eq!(msg, "connection refused");
            }
            _ => panic!("Expected RunError::Engine(Unreachable(...))"),
        }
    }

    #[test]
    fn run_error_job_failed_carries_details() {
        let err = RunError::JobFailed {
            details: "Failed".to_string(),
        };
        assert!(err.to_string().contains("Failed"));
    }

    #[test]
    fn cancellation_variants_are_distinct() {
        assert!(RunError::Canceled.is_cancellation());
        assert!(RunError::CanceledByEngine.is_cancellation());
        assert!(
            !RunError::JobFailed {
                details: "x".into()
            }
            .is_cancellation()
        );
        assert!(!matches!(RunError::Canceled, RunError::CanceledByEngine));
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        let engine_err = EngineError::Unreachable("x".into());
        assert_std_error(&engine_err);
        let run_err = RunError::Canceled;
        assert_std_error(&run_err);
    }
}
