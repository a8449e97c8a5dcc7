//! Facial stress estimation from detector observations.
//!
//! Two interchangeable scoring variants live behind [`FacialEstimator`]:
//! a bounding-box variant that compares consecutive frames, and a
//! landmark-mesh variant that reads structural variance out of a single
//! frame. Which one runs is decided by the observation shape the upstream
//! detector produced.
//!
//! Estimation jitter is modeled as uniform noise from an injectable
//! [`NoiseSource`], so tests can pin scores exactly while production runs
//! with an entropy-seeded generator.

use crate::core::observation::{BoundingBox, FaceObservation, FrameSize, LandmarkPoint};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use statrs::statistics::Statistics;

/// Score returned when no face is available or estimation fails.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Amplitude of the uniform estimation jitter.
const NOISE_AMPLITUDE: f64 = 0.1;

/// Fixed contribution when the face aspect ratio leaves the normal band.
const SHAPE_STRESS: f64 = 0.3;

/// Aspect ratios inside this band are considered unremarkable.
const ASPECT_NORMAL_MIN: f64 = 1.0;
const ASPECT_NORMAL_MAX: f64 = 2.0;

/// Weight of frame-to-frame movement in the bounding-box score.
const MOVEMENT_WEIGHT: f64 = 0.7;

/// Weight of frame-to-frame size change in the bounding-box score.
const SIZE_VARIANCE_WEIGHT: f64 = 0.3;

/// Weight of the aspect-ratio term in both variants.
const SHAPE_WEIGHT: f64 = 0.3;

/// Movement is normalized against this fraction of the frame width.
const MOVEMENT_NORM_FRACTION: f64 = 0.1;

/// Landmark variance is normalized against `dimension^2 * VARIANCE_SCALE`.
const VARIANCE_SCALE: f64 = 0.01;

/// Uniform jitter source for facial scores.
///
/// Production uses [`NoiseSource::from_entropy`]; tests either seed it or
/// disable it to assert exact scores.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: ChaCha8Rng,
    amplitude: f64,
}

impl NoiseSource {
    /// Entropy-seeded source with the standard amplitude.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            amplitude: NOISE_AMPLITUDE,
        }
    }

    /// Reproducible source with the standard amplitude.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            amplitude: NOISE_AMPLITUDE,
        }
    }

    /// Source that always yields zero, for exact-score assertions.
    pub fn disabled() -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(0),
            amplitude: 0.0,
        }
    }

    /// Draw one jitter sample from `[-amplitude, amplitude]`.
    pub fn sample(&mut self) -> f64 {
        if self.amplitude == 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-self.amplitude..=self.amplitude)
    }
}

/// Outcome of one facial estimation.
#[derive(Debug, Clone, Copy)]
pub struct FacialScore {
    /// Stress score in [0,1].
    pub value: f64,
    /// True when estimation failed and the neutral score was substituted.
    pub degraded: bool,
}

/// Maps face observations to stress scores in [0,1].
pub struct FacialEstimator {
    noise: NoiseSource,
}

impl FacialEstimator {
    pub fn new(noise: NoiseSource) -> Self {
        Self { noise }
    }

    /// Score one observation.
    ///
    /// `previous` is the prior frame's face rectangle for the same player,
    /// used only by the bounding-box variant. Degenerate geometry never
    /// escapes as an error; it degrades to [`NEUTRAL_SCORE`] with the
    /// `degraded` flag set so the caller can count the fault.
    pub fn estimate(
        &mut self,
        observation: &FaceObservation,
        frame: FrameSize,
        previous: Option<&BoundingBox>,
    ) -> FacialScore {
        let raw = match observation {
            FaceObservation::BoundingBox(rect) => score_bounding_box(rect, frame, previous),
            FaceObservation::LandmarkMesh { points } => score_landmark_mesh(points, frame),
        };

        match raw {
            Some(base) => {
                let value = (base + self.noise.sample()).clamp(0.0, 1.0);
                FacialScore {
                    value,
                    degraded: false,
                }
            }
            None => FacialScore {
                value: NEUTRAL_SCORE,
                degraded: true,
            },
        }
    }
}

/// Bounding-box variant: frame-to-frame movement and size change plus a
/// shape term. Returns `None` on degenerate geometry.
fn score_bounding_box(
    rect: &BoundingBox,
    frame: FrameSize,
    previous: Option<&BoundingBox>,
) -> Option<f64> {
    if !rect.is_well_formed() || !frame.width.is_finite() || frame.width <= 0.0 {
        return None;
    }

    let aspect_ratio = rect.height / (rect.width + 1.0);
    let shape_stress = if (ASPECT_NORMAL_MIN..=ASPECT_NORMAL_MAX).contains(&aspect_ratio) {
        0.0
    } else {
        SHAPE_STRESS
    };

    let mut movement_stress = 0.0;
    let mut size_variance_stress = 0.0;
    if let Some(prev) = previous.filter(|p| p.is_well_formed()) {
        let (cx, cy) = rect.center();
        let (px, py) = prev.center();
        let distance = ((cx - px).powi(2) + (cy - py).powi(2)).sqrt();
        movement_stress =
            (distance / (frame.width * MOVEMENT_NORM_FRACTION)).clamp(0.0, 1.0) * MOVEMENT_WEIGHT;

        let relative_change = (rect.width - prev.width).abs() / (prev.width + 1.0)
            + (rect.height - prev.height).abs() / (prev.height + 1.0);
        size_variance_stress = relative_change.clamp(0.0, 1.0) * SIZE_VARIANCE_WEIGHT;
    }

    let score = movement_stress + SHAPE_WEIGHT * shape_stress + size_variance_stress;
    score.is_finite().then_some(score)
}

/// Landmark-mesh variant: single-frame structural variance stands in for
/// motion, blended with the same shape term.
fn score_landmark_mesh(points: &[LandmarkPoint], frame: FrameSize) -> Option<f64> {
    if points.is_empty()
        || points.iter().any(|p| !p.is_finite())
        || !frame.width.is_finite()
        || !frame.height.is_finite()
        || frame.width <= 0.0
        || frame.height <= 0.0
    {
        return None;
    }

    // Scale normalized coordinates into pixel space; depth shares the
    // horizontal scale.
    let xs: Vec<f64> = points.iter().map(|p| p.x * frame.width).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y * frame.height).collect();
    let zs: Vec<f64> = points.iter().map(|p| p.z * frame.width).collect();

    let face_width = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        - xs.iter().copied().fold(f64::INFINITY, f64::min);
    let face_height = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        - ys.iter().copied().fold(f64::INFINITY, f64::min);

    let aspect_ratio = face_height / (face_width + 1.0);
    let aspect_stress = if (ASPECT_NORMAL_MIN..=ASPECT_NORMAL_MAX).contains(&aspect_ratio) {
        0.0
    } else {
        SHAPE_STRESS
    };

    let width_norm = frame.width * frame.width * VARIANCE_SCALE;
    let height_norm = frame.height * frame.height * VARIANCE_SCALE;
    let x_var = (xs.iter().population_variance() / width_norm).clamp(0.0, 1.0);
    let y_var = (ys.iter().population_variance() / height_norm).clamp(0.0, 1.0);
    let z_var = (zs.iter().population_variance() / width_norm).clamp(0.0, 1.0);
    let movement_stress = (x_var + y_var + z_var) / 3.0;

    let score = movement_stress * MOVEMENT_WEIGHT + aspect_stress * SHAPE_WEIGHT;
    score.is_finite().then_some(score)
}
