//! Core scoring and control logic for the stress engine.
//!
//! This module contains:
//! - Face observation types delivered by the external detector
//! - Facial and keyboard stress estimators
//! - The adaptive difficulty controller

pub mod difficulty;
pub mod facial;
pub mod keyboard;
pub mod observation;

// Re-export commonly used types
pub use difficulty::{
    advance, combine, recommendation, Recommendation, DEFAULT_DIFFICULTY, MAX_DIFFICULTY,
    MIN_DIFFICULTY,
};
pub use facial::{FacialEstimator, FacialScore, NoiseSource, NEUTRAL_SCORE};
pub use keyboard::TypingTelemetry;
pub use observation::{BoundingBox, FaceObservation, FrameSize, LandmarkPoint};
