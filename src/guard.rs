//! Precondition guard for expensive optional phases.
//!
//! Some phases are costly to even start (active probing attacks every
//! discovered target) and pointless when a cheap necessary condition does
//! not hold. The guard runs that check before the start call, logs the
//! decision and hands the answer back; the caller decides how to report a
//! skip.

use std::future::Future;

use tracing::{debug, warn};

use crate::errors::EngineError;

/// Evaluate a named precondition before an expensive phase start.
///
/// The predicate usually performs one cheap engine query. A communication
/// failure inside it propagates unchanged, like every other facade error.
pub async fn check<F, Fut>(name: &str, predicate: F) -> Result<bool, EngineError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<bool, EngineError>>,
{
    let satisfied = predicate().await?;
    if satisfied {
        debug!(precondition = name, "precondition satisfied");
    } else {
        warn!(precondition = name, "precondition not met, phase will be skipped");
    }
    Ok(satisfied)
}
