//! Observability for the stress engine.
//!
//! Scoring never surfaces estimation failures to callers, so the counters
//! here are the supported way to see them.

pub mod log;

// Re-export commonly used types
pub use log::{create_shared_log, EngineLog, EngineStats, SharedEngineLog};
