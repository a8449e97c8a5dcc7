//! Stress Engine - neuro-adaptive difficulty control from behavioral signals.
//!
//! This library estimates a player's moment-to-moment stress from two
//! independent signals - facial geometry reported by an external detector
//! and keyboard typing dynamics - and uses the fused estimate to retune a
//! game's difficulty multiplier toward a target stress band.
//!
//! The engine is a bounded, reproducible heuristic scorer, not a validated
//! physiological model: every score it stores or returns lies in [0,1],
//! difficulty stays in [0.5, 3.0], and the only randomness is the facial
//! estimator's injectable jitter source.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Stress Engine                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐    ┌────────────┐    ┌──────────────┐        │
//! │  │  Facial    │    │  Keyboard  │    │  Difficulty  │        │
//! │  │ Estimator  │    │ Estimator  │    │  Controller  │        │
//! │  └─────┬──────┘    └─────┬──────┘    └──────┬───────┘        │
//! │        │                 │                  │                │
//! │        ▼                 ▼                  ▼                │
//! │  ┌──────────────────────────────────────────────┐            │
//! │  │       Session Registry (per-player state)    │            │
//! │  └──────────────────────────────────────────────┘            │
//! │                        │                                     │
//! │                        ▼                                     │
//! │                 ┌─────────────┐                              │
//! │                 │ Engine Log  │                              │
//! │                 └─────────────┘                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use stress_engine::{
//!     AnalyzeFaceRequest, BoundingBox, Engine, FaceObservation, FrameSize, NoiseSource,
//! };
//!
//! let engine = Engine::with_noise(NoiseSource::seeded(42));
//!
//! let response = engine.analyze_face(&AnalyzeFaceRequest {
//!     player_id: "player-1".to_string(),
//!     observation: Some(FaceObservation::BoundingBox(BoundingBox::new(
//!         100.0, 80.0, 120.0, 160.0,
//!     ))),
//!     frame: FrameSize::new(640.0, 480.0),
//! });
//!
//! assert!(response.face_detected);
//! assert!((0.0..=1.0).contains(&response.stress_score));
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod session;
pub mod telemetry;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use core::{
    BoundingBox, FaceObservation, FacialEstimator, FrameSize, LandmarkPoint, NoiseSource,
    Recommendation, TypingTelemetry, NEUTRAL_SCORE,
};
pub use engine::{
    AnalyzeFaceRequest, AnalyzeFaceResponse, Engine, KeyboardStressRequest,
    KeyboardStressResponse, ResetRequest, ResetResponse, UpdateDifficultyRequest,
    UpdateDifficultyResponse,
};
pub use session::{PlayerSession, SessionRegistry, HISTORY_CAPACITY};
pub use telemetry::{EngineLog, EngineStats, SharedEngineLog};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
