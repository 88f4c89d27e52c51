pub mod budget;
pub mod classify;
pub mod config;
pub mod engine;
pub mod errors;
pub mod guard;
pub mod message;
pub mod phase;
pub mod poll;
pub mod sequencer;
pub mod watcher;

// The types most embedders need, re-exported at the crate root.
pub use config::ScanConfig;
pub use engine::{EngineFacade, JobHandle, StatusReport};
pub use errors::{EngineError, RunError};
pub use phase::{PhaseKind, RunReport};
pub use sequencer::PhaseSequencer;
pub use watcher::JobWatcher;
