//! Single-job supervision for adapters that delegate one whole unit of work.
//!
//! Some engines take an entire scan as one remote job instead of exposing
//! phases. The watcher reuses the shared poll loop once, stops the job
//! exactly once, and branches on the terminal classification of the last
//! status token: fetch the result on completion, raise a failure with the
//! remote diagnostic, or raise the distinct engine-side-cancellation
//! outcome.
//!
//! The watcher always carries its own finite deadline rather than polling
//! forever; the defaults mirror job-style engines, which are polled far
//! less often and allowed to run far longer than a single phase.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::classify::terminal_outcome;
use crate::engine::{EngineFacade, JobHandle, StartParams, StatusReport};
use crate::errors::RunError;
use crate::phase::PhaseKind;
use crate::poll::{PollExit, Poller, job_settled};

/// Default pause between job status checks: one minute.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Default upper bound on a watched job: five days.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(5 * 24 * 60 * 60);

/// Supervises one remote job from start (or handle) to terminal state.
pub struct JobWatcher {
    poller: Poller,
    max_wait: Duration,
}

impl Default for JobWatcher {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_INTERVAL, DEFAULT_MAX_WAIT)
    }
}

impl JobWatcher {
    pub fn new(check_interval: Duration, max_wait: Duration) -> Self {
        Self {
            poller: Poller::new(check_interval),
            max_wait,
        }
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Start a remote job for `kind` and watch it to its terminal state.
    pub async fn supervise(
        &self,
        engine: &dyn EngineFacade,
        kind: PhaseKind,
        params: &StartParams,
        cancel: &CancellationToken,
    ) -> Result<String, RunError> {
        let handle = engine.start(kind, params).await?;
        info!(kind = %kind, handle = %handle, "remote job started");
        self.watch(engine, &handle, cancel).await
    }

    /// Watch an already-started job until it settles, times out or is
    /// canceled, then classify the outcome.
    ///
    /// On `Complete` the job's result is fetched and returned. The handle
    /// receives exactly one stop call on every path, including transport
    /// errors raised while polling.
    pub async fn watch(
        &self,
        engine: &dyn EngineFacade,
        handle: &JobHandle,
        cancel: &CancellationToken,
    ) -> Result<String, RunError> {
        let wait = self
            .poller
            .wait(engine, handle, self.max_wait, cancel, job_settled)
            .await;
        let stopped = engine.stop(handle).await;
        let wait = wait?;
        stopped?;

        match wait.exit {
            PollExit::Canceled => {
                info!(handle = %handle, "watched job canceled by local request");
                Err(RunError::Canceled)
            }
            PollExit::TimedOut => {
                warn!(
                    handle = %handle,
                    max_wait_ms = self.max_wait.as_millis() as u64,
                    "watched job never reached a terminal state"
                );
                Err(RunError::JobFailed {
                    details: format!(
                        "no terminal state after {} seconds",
                        self.max_wait.as_secs()
                    ),
                })
            }
            PollExit::Done => {
                if let Some(StatusReport::Token(token)) = &wait.last {
                    terminal_outcome(token)?;
                }
                info!(handle = %handle, elapsed_ms = wait.elapsed.as_millis() as u64, "watched job completed");
                Ok(engine.fetch_result(handle).await?)
            }
        }
    }
}
