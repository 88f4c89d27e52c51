//! Phase identities, the per-run plan and per-phase reporting.
//!
//! A run walks a fixed phase order: Discover and PassiveAnalyze always,
//! DeepCrawl and ActiveProbe only when enabled. `PhasePlan` captures the
//! enabled flags chosen at run start; `PhaseReport`/`RunReport` capture
//! what actually happened.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::StatusReport;

/// The fixed, ordered set of phases a run can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Crawl the target and build the site/target tree.
    Discover,
    /// Analyze traffic recorded so far without touching the target.
    PassiveAnalyze,
    /// Browser-driven crawl for script-heavy targets.
    DeepCrawl,
    /// Actively attack every discovered target. Expensive; guarded.
    ActiveProbe,
}

impl PhaseKind {
    /// All phases in their fixed execution order.
    pub const ALL: [PhaseKind; 4] = [
        PhaseKind::Discover,
        PhaseKind::PassiveAnalyze,
        PhaseKind::DeepCrawl,
        PhaseKind::ActiveProbe,
    ];

    /// Optional phases run only when enabled in the plan.
    pub fn is_optional(self) -> bool {
        matches!(self, PhaseKind::DeepCrawl | PhaseKind::ActiveProbe)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Discover => "discover",
            PhaseKind::PassiveAnalyze => "passive-analyze",
            PhaseKind::DeepCrawl => "deep-crawl",
            PhaseKind::ActiveProbe => "active-probe",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which optional phases a run will attempt, decided once at run start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasePlan {
    pub deep_crawl: bool,
    pub active_probe: bool,
}

impl PhasePlan {
    pub fn is_enabled(&self, kind: PhaseKind) -> bool {
        match kind {
            PhaseKind::Discover | PhaseKind::PassiveAnalyze => true,
            PhaseKind::DeepCrawl => self.deep_crawl,
            PhaseKind::ActiveProbe => self.active_probe,
        }
    }

    /// The enabled phases in execution order.
    pub fn enabled_phases(&self) -> Vec<PhaseKind> {
        PhaseKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}

/// How a single phase ended. Neither timeout nor a precondition skip is an
/// error; the run continues past both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Completed,
    /// The phase hit its time slice and was cut short.
    TimedOut,
    /// The phase's precondition did not hold; start was never invoked.
    SkippedPrecondition,
}

/// What one phase did with its slice of the budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseReport {
    pub kind: PhaseKind,
    pub status: PhaseStatus,
    /// Wall-clock time charged to the budget for this phase.
    pub elapsed: Duration,
    /// Last status observed before the phase ended, if any.
    pub last_observed: Option<StatusReport>,
}

/// The outcome of a whole phase-based run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub phases: Vec<PhaseReport>,
    /// Budget left over when the run ended.
    pub remaining_budget: Duration,
    pub total_elapsed: Duration,
}

impl RunReport {
    /// True when every attempted phase ran to completion.
    pub fn all_completed(&self) -> bool {
        self.phases
            .iter()
            .all(|p| p.status == PhaseStatus::Completed)
    }

    pub fn phase(&self, kind: PhaseKind) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.kind == kind)
    }
}
