//! Terminal state classification for remote status tokens.
//!
//! Remote engines report progress through an open-ended status vocabulary
//! that evolves between product versions. This module folds that vocabulary
//! into a fixed terminal-state set. Unrecognized tokens classify as
//! `Running`: an unknown-but-plausibly-transient token must never break an
//! active polling loop.

use serde::{Deserialize, Serialize};

use crate::errors::RunError;

/// States a remote job cannot transition out of, plus `Running` for
/// everything still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    Running,
    Complete,
    Failed,
    Canceled,
}

/// Status tokens with a fixed, agreed meaning. Matching ignores ASCII case.
const WELL_KNOWN_TOKENS: &[(&str, TerminalState)] = &[
    ("Complete", TerminalState::Complete),
    ("Cancelled", TerminalState::Canceled),
    ("Failed", TerminalState::Failed),
];

impl TerminalState {
    /// Map a raw status token to a terminal state.
    ///
    /// Unknown tokens map to `Running` so that new transient states on the
    /// remote side keep the poll loop alive instead of aborting it.
    pub fn classify(token: &str) -> Self {
        WELL_KNOWN_TOKENS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(token))
            .map(|(_, state)| *state)
            .unwrap_or(TerminalState::Running)
    }

    /// True only for the fixed well-known tokens.
    pub fn is_well_known(token: &str) -> bool {
        WELL_KNOWN_TOKENS
            .iter()
            .any(|(known, _)| known.eq_ignore_ascii_case(token))
    }

    /// True for every state except `Running`.
    pub fn is_terminal(self) -> bool {
        self != TerminalState::Running
    }
}

/// Branch on the terminal classification of a final status token.
///
/// `Ok(())` means the job completed and the caller may fetch its result.
/// Failure and engine-side cancellation surface as their distinct outcome
/// kinds. The fallthrough arm is the drift canary: it is reached when a
/// token considered settled by the wait predicate has no handler here.
pub fn terminal_outcome(token: &str) -> Result<(), RunError> {
    match TerminalState::classify(token) {
        TerminalState::Complete => Ok(()),
        TerminalState::Failed => Err(RunError::JobFailed {
            details: token.to_string(),
        }),
        TerminalState::Canceled => Err(RunError::CanceledByEngine),
        TerminalState::Running => Err(RunError::UnhandledTerminalToken {
            token: token.to_string(),
        }),
    }
}
