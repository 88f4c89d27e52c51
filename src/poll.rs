//! The shared wait loop.
//!
//! One poll loop serves both the phase sequencer and the single-job watcher.
//! Each iteration is strictly poll-then-decide: check cancellation, check
//! the deadline, sleep one interval, query status. Nothing ever interrupts
//! an in-flight remote call, which makes the worst-case latency to observe
//! either cancellation or timeout exactly one poll interval — the accepted
//! trade-off of cooperative cancellation.
//!
//! The poller never issues stop itself. Its caller performs exactly one
//! idempotent stop after the loop returns, on every exit path, so the
//! stop-exactly-once invariant lives in a single place.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::classify::TerminalState;
use crate::engine::{EngineFacade, JobHandle, StatusReport};
use crate::errors::EngineError;

/// Default pause between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Why the wait loop ended. Timeout is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// The done-predicate accepted a status report.
    Done,
    /// The deadline passed before the operation finished.
    TimedOut,
    /// Local cancellation was observed.
    Canceled,
}

/// Result of one wait: how it ended, what was last seen, how long it took.
#[derive(Debug, Clone)]
pub struct PollWait {
    pub exit: PollExit,
    pub last: Option<StatusReport>,
    pub elapsed: Duration,
}

/// Fixed-interval wait loop over an engine's status call.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Poller {
    /// A poller with the given check interval. A zero interval would
    /// busy-wait, so it falls back to the default.
    pub fn new(interval: Duration) -> Self {
        if interval.is_zero() {
            Self::default()
        } else {
            Self { interval }
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the operation is done, the deadline passes, or local
    /// cancellation is observed.
    ///
    /// With a zero `max_wait` the loop performs zero waiting iterations and
    /// reports `TimedOut` immediately. A transport error from the status
    /// query is fatal and propagates unchanged; the caller still owes the
    /// handle its one stop call on that path too.
    pub async fn wait<F>(
        &self,
        engine: &dyn EngineFacade,
        handle: &JobHandle,
        max_wait: Duration,
        cancel: &CancellationToken,
        is_done: F,
    ) -> Result<PollWait, EngineError>
    where
        F: Fn(&StatusReport) -> bool,
    {
        let started = Instant::now();
        let mut last = None;

        let exit = loop {
            if cancel.is_cancelled() {
                debug!(handle = %handle, "cancellation observed, leaving wait loop");
                break PollExit::Canceled;
            }
            if started.elapsed() >= max_wait {
                debug!(handle = %handle, max_wait_ms = max_wait.as_millis() as u64, "deadline reached");
                break PollExit::TimedOut;
            }

            sleep(self.interval).await;

            let report = engine.status(handle).await?;
            debug!(handle = %handle, status = %report, "status check");
            let done = is_done(&report);
            last = Some(report);
            if done {
                break PollExit::Done;
            }
        };

        Ok(PollWait {
            exit,
            last,
            elapsed: started.elapsed(),
        })
    }
}

/// Done-predicate for phase operations: a progress report finishes at 100%,
/// a token report finishes on any terminal classification.
pub fn phase_done(report: &StatusReport) -> bool {
    match report {
        StatusReport::Progress(pct) => *pct >= 100,
        StatusReport::Token(token) => TerminalState::classify(token).is_terminal(),
    }
}

/// Done-predicate for watched jobs: wait while the token is outside the
/// well-known set, so unknown transient states keep the loop alive.
///
/// Deliberately *not* the same test as [`phase_done`]: the terminal handler
/// afterwards branches on classification, and the gap between "well-known"
/// and "classified" is what trips the drift canary.
pub fn job_settled(report: &StatusReport) -> bool {
    match report {
        StatusReport::Progress(pct) => *pct >= 100,
        StatusReport::Token(token) => TerminalState::is_well_known(token),
    }
}
