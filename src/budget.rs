//! Wall-clock budget bookkeeping for an orchestration run.
//!
//! One `ScanBudget` is created per run, charged after every phase with the
//! actual time spent, and discarded when the run ends. It is a plain owned
//! value on purpose: concurrent runs each hold their own budget, so no
//! shared state and no locking are involved.

use std::time::Duration;

/// Remaining wall-clock time for the rest of a run.
///
/// `remaining` only ever decreases and saturates at zero.
#[derive(Debug, Clone)]
pub struct ScanBudget {
    total: Duration,
    remaining: Duration,
}

impl ScanBudget {
    /// Create a fresh budget for one run.
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            remaining: total,
        }
    }

    /// The immutable total this budget started with.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Time still available for the rest of the run.
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Time already charged.
    pub fn spent(&self) -> Duration {
        self.total - self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Charge elapsed wall-clock time against the budget, flooring at zero.
    pub fn charge(&mut self, elapsed: Duration) {
        self.remaining = self.remaining.saturating_sub(elapsed);
    }
}

/// Compute the time slice for the next phase.
///
/// A phase followed by `later_enabled_phases` further enabled phases gets an
/// even share of the remaining budget so the later phases are not starved;
/// the last enabled phase gets everything that is left. The result is always
/// within `[0, remaining]`. A zero slice is valid: the phase still runs, its
/// poll loop performs zero waiting iterations and it is reported as
/// individually timed out without aborting the run.
pub fn compute_phase_budget(remaining: Duration, later_enabled_phases: usize) -> Duration {
    if later_enabled_phases == 0 {
        remaining
    } else {
        remaining / (later_enabled_phases as u32 + 1)
    }
}
