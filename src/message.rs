//! Operator-facing messages emitted during a run.
//!
//! Skips and degradations (a phase cut short, a precondition not met) are
//! not errors, but the operator still needs to hear about them. The
//! sequencer pushes `UserVisibleMessage`s through a `MessageSink`; where
//! they end up (product report, log file, UI) is the embedder's business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Message severity as shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single operator-facing notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserVisibleMessage {
    pub severity: Severity,
    pub text: String,
    /// When the message was emitted.
    pub timestamp: DateTime<Utc>,
}

impl UserVisibleMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }
}

/// Destination for operator-facing notices.
pub trait MessageSink: Send + Sync {
    fn accept(&self, message: UserVisibleMessage);
}

/// In-memory sink that records every accepted message.
///
/// Used by the test suite to assert on emitted notices and handy for
/// embedders that collect messages for a report written after the run.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<UserVisibleMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything accepted so far.
    pub fn snapshot(&self) -> Vec<UserVisibleMessage> {
        self.messages.lock().expect("message sink poisoned").clone()
    }

    /// Count of messages with the given severity.
    pub fn count_of(&self, severity: Severity) -> usize {
        self.messages
            .lock()
            .expect("message sink poisoned")
            .iter()
            .filter(|m| m.severity == severity)
            .count()
    }
}

impl MessageSink for MemorySink {
    fn accept(&self, message: UserVisibleMessage) {
        self.messages
            .lock()
            .expect("message sink poisoned")
            .push(message);
    }
}
