//! Run configuration: budget, poll interval, optional phases, identity.
//!
//! A `ScanConfig` is decided once at run start and stays fixed for the whole
//! run. It can be built in code or loaded from a TOML file; every field has
//! a sensible default so a minimal file (or none at all) works.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::{Identity, StartParams};
use crate::phase::PhasePlan;
use crate::poll::DEFAULT_POLL_INTERVAL;

/// Default wall-clock budget for a whole run: eight hours.
pub const DEFAULT_TOTAL_BUDGET_MS: u64 = 8 * 60 * 60 * 1000;

fn default_total_budget_ms() -> u64 {
    DEFAULT_TOTAL_BUDGET_MS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

/// Per-run configuration, decided once at run start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Total wall-clock budget shared by all phases, in milliseconds.
    #[serde(default = "default_total_budget_ms")]
    pub total_budget_ms: u64,
    /// Pause between status checks, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Run the browser-driven deep crawl phase.
    #[serde(default)]
    pub deep_crawl: bool,
    /// Run the active probe phase (still gated by its precondition).
    #[serde(default)]
    pub active_probe: bool,
    /// Identity to scan as; `None` means unauthenticated.
    #[serde(default)]
    pub identity: Option<Identity>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            total_budget_ms: default_total_budget_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            deep_crawl: false,
            active_probe: false,
            identity: None,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scan config: {}", path.display()))?;

        let config: ScanConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse scan config TOML: {}", path.display()))?;

        Ok(config)
    }

    pub fn total_budget(&self) -> Duration {
        Duration::from_millis(self.total_budget_ms)
    }

    /// Poll interval; a configured zero would busy-wait and falls back to
    /// the default.
    pub fn poll_interval(&self) -> Duration {
        if self.poll_interval_ms == 0 {
            DEFAULT_POLL_INTERVAL
        } else {
            Duration::from_millis(self.poll_interval_ms)
        }
    }

    /// The optional-phase plan this configuration describes.
    pub fn plan(&self) -> PhasePlan {
        PhasePlan {
            deep_crawl: self.deep_crawl,
            active_probe: self.active_probe,
        }
    }

    /// Start parameters carrying the configured identity, or anonymous.
    pub fn start_params(&self) -> StartParams {
        match &self.identity {
            Some(identity) => StartParams::as_identity(identity.clone()),
            None => StartParams::anonymous(),
        }
    }
}
