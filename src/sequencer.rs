//! The phase sequencer: drives the ordered phases of one run.
//!
//! One run executes on a single logical thread of control; phases are
//! strictly sequential. The sequencer threads one `ScanBudget` and one
//! cancellation token through every phase, sizes each phase's slice with
//! the budget allocator, and guarantees every started remote operation
//! receives exactly one stop call before the run returns — on success,
//! timeout, cancellation and error alike.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::budget::{ScanBudget, compute_phase_budget};
use crate::classify::terminal_outcome;
use crate::config::ScanConfig;
use crate::engine::{EngineFacade, StatusReport};
use crate::errors::RunError;
use crate::guard;
use crate::message::{MessageSink, UserVisibleMessage};
use crate::phase::{PhaseKind, PhaseReport, PhaseStatus, RunReport};
use crate::poll::{PollExit, Poller, phase_done};

/// Sequential driver for the phases of one scan run.
pub struct PhaseSequencer {
    poller: Poller,
}

impl PhaseSequencer {
    pub fn new(poller: Poller) -> Self {
        Self { poller }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(Poller::new(config.poll_interval()))
    }

    /// Run every enabled phase in fixed order under one shared budget.
    ///
    /// Engine communication failures abort the run unretried. Local
    /// cancellation returns `RunError::Canceled` after the current phase's
    /// operation has been stopped and charged; no further phase starts.
    pub async fn run(
        &self,
        engine: &dyn EngineFacade,
        config: &ScanConfig,
        cancel: &CancellationToken,
        sink: &dyn MessageSink,
    ) -> Result<RunReport, RunError> {
        let mut budget = ScanBudget::new(config.total_budget());
        let params = config.start_params();
        let phases = config.plan().enabled_phases();
        let mut reports = Vec::with_capacity(phases.len());
        let run_started = Instant::now();

        info!(
            total_budget_ms = budget.total().as_millis() as u64,
            phases = phases.len(),
            authenticated = params.identity.is_some(),
            "scan run starting"
        );

        for (index, kind) in phases.iter().copied().enumerate() {
            if cancel.is_cancelled() {
                info!(phase = %kind, "cancellation observed before phase start");
                return Err(RunError::Canceled);
            }

            let later_phases = phases.len() - index - 1;
            let slice = compute_phase_budget(budget.remaining(), later_phases);
            let phase_started = Instant::now();

            if kind == PhaseKind::ActiveProbe {
                let has_targets = guard::check("active probe needs discovered targets", || async {
                    Ok(engine.discovered_targets().await? > 0)
                })
                .await?;

                if !has_targets {
                    sink.accept(UserVisibleMessage::warning(
                        "Skipped the active probe because earlier phases discovered no targets.",
                    ));
                    let elapsed = phase_started.elapsed();
                    budget.charge(elapsed);
                    reports.push(PhaseReport {
                        kind,
                        status: PhaseStatus::SkippedPrecondition,
                        elapsed,
                        last_observed: None,
                    });
                    continue;
                }
            }

            let handle = engine.start(kind, &params).await?;
            info!(
                phase = %kind,
                handle = %handle,
                slice_ms = slice.as_millis() as u64,
                remaining_ms = budget.remaining().as_millis() as u64,
                "phase started"
            );

            let wait = self
                .poller
                .wait(engine, &handle, slice, cancel, phase_done)
                .await;
            // The one stop this handle gets, issued before any error can
            // propagate. A polling transport error outranks a stop error.
            let stopped = engine.stop(&handle).await;
            let wait = wait?;
            stopped?;

            let elapsed = phase_started.elapsed();
            budget.charge(elapsed);

            match wait.exit {
                PollExit::Done => {
                    if let Some(StatusReport::Token(token)) = &wait.last {
                        terminal_outcome(token)?;
                    }
                    info!(phase = %kind, elapsed_ms = elapsed.as_millis() as u64, "phase completed");
                    reports.push(PhaseReport {
                        kind,
                        status: PhaseStatus::Completed,
                        elapsed,
                        last_observed: wait.last,
                    });
                }
                PollExit::TimedOut => {
                    warn!(phase = %kind, slice_ms = slice.as_millis() as u64, "phase hit its time slice");
                    sink.accept(UserVisibleMessage::warning(format!(
                        "The {kind} phase did not finish within its {} ms time slice and was cut short.",
                        slice.as_millis()
                    )));
                    reports.push(PhaseReport {
                        kind,
                        status: PhaseStatus::TimedOut,
                        elapsed,
                        last_observed: wait.last,
                    });
                }
                PollExit::Canceled => {
                    info!(phase = %kind, "phase canceled by local request");
                    return Err(RunError::Canceled);
                }
            }
        }

        let report = RunReport {
            phases: reports,
            remaining_budget: budget.remaining(),
            total_elapsed: run_started.elapsed(),
        };
        info!(
            total_elapsed_ms = report.total_elapsed.as_millis() as u64,
            remaining_ms = report.remaining_budget.as_millis() as u64,
            all_completed = report.all_completed(),
            "scan run finished"
        );
        Ok(report)
    }
}
