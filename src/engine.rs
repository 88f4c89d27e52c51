//! The engine facade boundary.
//!
//! Everything the supervision core knows about the external scan engine goes
//! through the `EngineFacade` trait: start/status/stop plus one-time
//! configuration and a couple of read-only queries. Transport, wire formats
//! and authentication live entirely inside facade implementations.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::phase::PhaseKind;

/// Opaque identifier for a started remote operation.
///
/// Assigned by the engine, required for every status and stop call, and
/// invalid once stop has been issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity a scan runs as when it is not anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Login or account name known to the engine.
    pub name: String,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Parameters passed to every phase-start call.
///
/// The unauthenticated and as-identity execution modes differ only in this
/// value, never in the orchestration algorithm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartParams {
    pub identity: Option<Identity>,
}

impl StartParams {
    /// Parameters for an unauthenticated run.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Parameters for a run performed as the given identity.
    pub fn as_identity(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }
}

/// One poll's worth of status, in whichever style the engine speaks.
///
/// Crawl-like operations report a percentage; job-like operations report a
/// free-form status token that the classifier folds into a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", content = "value", rename_all = "snake_case")]
pub enum StatusReport {
    /// Progress percentage, 0..=100.
    Progress(u8),
    /// Raw status token from the engine's own vocabulary.
    Token(String),
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusReport::Progress(pct) => write!(f, "{pct}%"),
            StatusReport::Token(token) => f.write_str(token),
        }
    }
}

/// One-time engine configuration applied before orchestration begins.
///
/// Mirrors the setters the remote engines expose: proxy, authentication
/// header, extra request headers, a client certificate and the URL scope of
/// the scan. How these reach the engine is a facade concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Proxy in `host:port` form, if the target is only reachable through one.
    pub proxy: Option<String>,
    /// Value for the engine's authorization header.
    pub auth_header: Option<String>,
    /// Additional headers sent with every request the engine makes.
    #[serde(default)]
    pub extra_headers: Vec<(String, String)>,
    /// Client certificate presented to the target, if any.
    pub client_certificate: Option<PathBuf>,
    /// URLs the scan must stay inside.
    #[serde(default)]
    pub include_urls: Vec<String>,
    /// URLs the scan must never touch.
    #[serde(default)]
    pub exclude_urls: Vec<String>,
}

/// Abstract boundary to the external long-running-operation engine.
///
/// `stop` must be idempotent and safe to call when the remote operation
/// already finished or never properly started — every cleanup path invokes
/// it unconditionally.
#[async_trait]
pub trait EngineFacade: Send + Sync {
    /// Apply one-time configuration. Called once, before any start.
    async fn configure(&self, settings: &EngineSettings) -> Result<(), EngineError>;

    /// Start a remote operation for the given phase.
    async fn start(
        &self,
        phase: PhaseKind,
        params: &StartParams,
    ) -> Result<JobHandle, EngineError>;

    /// Query the current status of a running operation.
    async fn status(&self, handle: &JobHandle) -> Result<StatusReport, EngineError>;

    /// Terminate a remote operation. Idempotent.
    async fn stop(&self, handle: &JobHandle) -> Result<(), EngineError>;

    /// Number of targets discovered by earlier phases. Cheap; used as the
    /// precondition for active probing.
    async fn discovered_targets(&self) -> Result<usize, EngineError>;

    /// Fetch the result of a completed operation.
    async fn fetch_result(&self, handle: &JobHandle) -> Result<String, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_handle_roundtrips_its_id() {
        let handle = JobHandle::new("scan-42");
        assert_eq!(handle.as_str(), "scan-42");
        assert_eq!(handle.to_string(), "scan-42");
    }

    #[test]
    fn start_params_modes() {
        let anon = StartParams::anonymous();
        assert!(anon.identity.is_none());

        let authed = StartParams::as_identity(Identity::new("scan-user"));
        assert_eq!(authed.identity.unwrap().name, "scan-user");
    }

    #[test]
    fn status_report_display() {
        assert_eq!(StatusReport::Progress(40).to_string(), "40%");
        assert_eq!(StatusReport::Token("Queued".into()).to_string(), "Queued");
    }

    #[test]
    fn status_report_serialization_is_tagged() {
        let report = StatusReport::Progress(99);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("progress"));

        let parsed: StatusReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn engine_settings_default_is_empty() {
        let settings = EngineSettings::default();
        assert!(settings.proxy.is_none());
        assert!(settings.auth_header.is_none());
        assert!(settings.extra_headers.is_empty());
        assert!(settings.include_urls.is_empty());
    }
}
