//! The engine facade: the four boundary operations.
//!
//! [`Engine`] owns the session registry, the facial estimator, and the
//! activity log, and exposes `analyze_face`, `keyboard_stress`,
//! `update_difficulty`, and `reset`. The request/response types here are
//! the literal shapes a transport layer (HTTP or otherwise) would
//! serialize; the engine itself knows nothing about transports.

use crate::config::Config;
use crate::core::difficulty::{self, Recommendation};
use crate::core::facial::{FacialEstimator, NoiseSource, NEUTRAL_SCORE};
use crate::core::keyboard::{self, TypingTelemetry};
use crate::core::observation::{FaceObservation, FrameSize};
use crate::session::SessionRegistry;
use crate::telemetry::{create_shared_log, SharedEngineLog};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

fn default_player_id() -> String {
    "default".to_string()
}

fn neutral() -> f64 {
    NEUTRAL_SCORE
}

/// Request for one frame's facial analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeFaceRequest {
    #[serde(default = "default_player_id")]
    pub player_id: String,
    /// `None` means the detector ran but found no face in the frame.
    #[serde(default)]
    pub observation: Option<FaceObservation>,
    pub frame: FrameSize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeFaceResponse {
    pub stress_score: f64,
    pub avg_stress: f64,
    pub face_detected: bool,
    pub difficulty: f64,
}

/// Request for one typing-telemetry score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardStressRequest {
    #[serde(default = "default_player_id")]
    pub player_id: String,
    #[serde(default)]
    pub telemetry: TypingTelemetry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardStressResponse {
    pub keyboard_stress: f64,
    pub avg_keyboard_stress: f64,
}

/// Request to advance a player's difficulty from the latest scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDifficultyRequest {
    #[serde(default = "default_player_id")]
    pub player_id: String,
    #[serde(default = "neutral")]
    pub facial_stress: f64,
    #[serde(default = "neutral")]
    pub keyboard_stress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDifficultyResponse {
    pub difficulty: f64,
    pub combined_stress: f64,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetRequest {
    #[serde(default = "default_player_id")]
    pub player_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub status: String,
}

/// Stress scoring and difficulty control over an owned session registry.
pub struct Engine {
    registry: SessionRegistry,
    facial: Mutex<FacialEstimator>,
    log: SharedEngineLog,
    instance_id: Uuid,
}

impl Engine {
    /// Create an engine from configuration. `noise_seed` in the config
    /// pins the facial noise source; otherwise it is entropy-seeded.
    pub fn new(config: &Config) -> Self {
        let noise = match config.noise_seed {
            Some(seed) => NoiseSource::seeded(seed),
            None => NoiseSource::from_entropy(),
        };
        Self::with_noise(noise)
    }

    /// Create an engine with an explicit noise source.
    pub fn with_noise(noise: NoiseSource) -> Self {
        let instance_id = Uuid::new_v4();
        tracing::info!(%instance_id, "stress engine created");
        Self {
            registry: SessionRegistry::new(),
            facial: Mutex::new(FacialEstimator::new(noise)),
            log: create_shared_log(),
            instance_id,
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Shared handle to the activity counters.
    pub fn log(&self) -> SharedEngineLog {
        SharedEngineLog::clone(&self.log)
    }

    /// Score one face observation and fold it into the player's history.
    ///
    /// A frame with no detected face still records the neutral score, so
    /// the rolling average drifts back toward neutral while the player is
    /// away from the camera.
    pub fn analyze_face(&self, request: &AnalyzeFaceRequest) -> AnalyzeFaceResponse {
        self.log.record_face_analyzed();

        self.registry.with_session(&request.player_id, |session| {
            let (stress_score, face_detected) = match &request.observation {
                Some(observation) => {
                    let previous = session.last_face_observation;
                    let score = self
                        .facial
                        .lock()
                        .expect("facial estimator poisoned")
                        .estimate(observation, request.frame, previous.as_ref());
                    if score.degraded {
                        self.log.record_estimation_fault();
                        tracing::warn!(
                            player_id = %request.player_id,
                            "facial estimation failed, substituting neutral score"
                        );
                    }
                    // Remember the detected geometry for the next frame's
                    // movement comparison.
                    if let Some(rect) = observation.bounding_box(request.frame) {
                        session.last_face_observation = Some(rect);
                    }
                    (score.value, true)
                }
                None => (NEUTRAL_SCORE, false),
            };

            session.face_detected = face_detected;
            let avg_stress = session.record_facial(stress_score);

            tracing::debug!(
                player_id = %request.player_id,
                stress_score,
                avg_stress,
                face_detected,
                "face analyzed"
            );

            AnalyzeFaceResponse {
                stress_score,
                avg_stress,
                face_detected,
                difficulty: session.difficulty(),
            }
        })
    }

    /// Score one typing-telemetry snapshot and fold it into the player's
    /// keyboard history.
    pub fn keyboard_stress(&self, request: &KeyboardStressRequest) -> KeyboardStressResponse {
        self.log.record_keyboard_sample();

        let keyboard_stress = keyboard::estimate(&request.telemetry);
        let avg_keyboard_stress = self
            .registry
            .with_session(&request.player_id, |session| {
                session.record_keyboard(keyboard_stress)
            });

        tracing::debug!(
            player_id = %request.player_id,
            keyboard_stress,
            avg_keyboard_stress,
            "keyboard telemetry scored"
        );

        KeyboardStressResponse {
            keyboard_stress,
            avg_keyboard_stress,
        }
    }

    /// Fuse the latest scores and advance the player's difficulty.
    ///
    /// Incoming scores are clamped to [0,1] so a misbehaving caller cannot
    /// push the combined value out of range.
    pub fn update_difficulty(&self, request: &UpdateDifficultyRequest) -> UpdateDifficultyResponse {
        self.log.record_difficulty_update();

        let facial = sanitize_score(request.facial_stress);
        let keyboard = sanitize_score(request.keyboard_stress);
        let combined = difficulty::combine(facial, keyboard);

        let new_difficulty = self.registry.with_session(&request.player_id, |session| {
            let next = difficulty::advance(session.difficulty(), combined);
            session.set_difficulty(next);
            next
        });

        tracing::debug!(
            player_id = %request.player_id,
            combined_stress = combined,
            difficulty = new_difficulty,
            "difficulty updated"
        );

        UpdateDifficultyResponse {
            difficulty: new_difficulty,
            combined_stress: combined,
            recommendation: difficulty::recommendation(combined),
        }
    }

    /// Replace a player's session with a fresh default record.
    pub fn reset(&self, request: &ResetRequest) -> ResetResponse {
        self.log.record_session_reset();
        self.registry.reset(&request.player_id);

        tracing::info!(player_id = %request.player_id, "session reset");

        ResetResponse {
            status: "reset".to_string(),
        }
    }

    /// Current difficulty for a player, creating the session if absent.
    pub fn difficulty(&self, player_id: &str) -> f64 {
        self.registry.with_session(player_id, |s| s.difficulty())
    }
}

/// Clamp a caller-supplied score into [0,1]; non-finite values fall back
/// to neutral.
fn sanitize_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        NEUTRAL_SCORE
    }
}
