//! Keyboard stress estimation from typing telemetry.
//!
//! Irregular typing rhythm, long key presses, and frequent corrections all
//! push the score up from a neutral baseline. This estimator is fully
//! deterministic: identical telemetry always yields the identical score.

use serde::{Deserialize, Serialize};

/// Baseline score with no telemetry signal at all.
const BASELINE: f64 = 0.5;

/// Press durations at or below this are considered relaxed (milliseconds).
const PRESS_DURATION_FLOOR_MS: f64 = 100.0;

/// Press-duration stress saturates this many milliseconds above the floor.
const PRESS_DURATION_RANGE_MS: f64 = 400.0;

/// Speed variance saturates at this value.
const SPEED_VARIANCE_NORM: f64 = 100.0;

const PRESS_DURATION_WEIGHT: f64 = 0.3;
const SPEED_VARIANCE_WEIGHT: f64 = 0.3;
const ERROR_RATE_WEIGHT: f64 = 0.4;

/// One snapshot of typing telemetry from the input capture layer.
///
/// Fields the capture layer could not measure default to zero and simply
/// contribute nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TypingTelemetry {
    /// Average key hold duration in milliseconds.
    #[serde(default)]
    pub avg_press_duration: f64,
    /// Variance of inter-key speed.
    #[serde(default)]
    pub speed_variance: f64,
    /// Fraction of keystrokes that were corrections, in [0,1].
    #[serde(default)]
    pub error_rate: f64,
}

/// Compute the keyboard stress score in [0,1] for one telemetry snapshot.
pub fn estimate(telemetry: &TypingTelemetry) -> f64 {
    let mut score = BASELINE;

    if telemetry.avg_press_duration > 0.0 {
        let duration_stress = ((telemetry.avg_press_duration - PRESS_DURATION_FLOOR_MS)
            / PRESS_DURATION_RANGE_MS)
            .clamp(0.0, 1.0);
        score += duration_stress * PRESS_DURATION_WEIGHT;
    }

    if telemetry.speed_variance > 0.0 {
        let variance_stress = (telemetry.speed_variance / SPEED_VARIANCE_NORM).clamp(0.0, 1.0);
        score += variance_stress * SPEED_VARIANCE_WEIGHT;
    }

    if telemetry.error_rate > 0.0 {
        score += telemetry.error_rate.clamp(0.0, 1.0) * ERROR_RATE_WEIGHT;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_telemetry_is_neutral() {
        assert_eq!(estimate(&TypingTelemetry::default()), 0.5);
    }

    #[test]
    fn test_relaxed_press_duration_adds_nothing() {
        let telemetry = TypingTelemetry {
            avg_press_duration: 100.0,
            ..Default::default()
        };
        assert_eq!(estimate(&telemetry), 0.5);
    }

    #[test]
    fn test_press_duration_saturates_at_500ms() {
        let at_limit = TypingTelemetry {
            avg_press_duration: 500.0,
            ..Default::default()
        };
        let beyond = TypingTelemetry {
            avg_press_duration: 2000.0,
            ..Default::default()
        };
        assert_eq!(estimate(&at_limit), 0.8);
        assert_eq!(estimate(&beyond), 0.8);
    }

    #[test]
    fn test_all_terms_saturated_clamps_to_one() {
        let telemetry = TypingTelemetry {
            avg_press_duration: 500.0,
            speed_variance: 100.0,
            error_rate: 1.0,
        };
        // 0.5 + 0.3 + 0.3 + 0.4 = 1.5, clamped.
        assert_eq!(estimate(&telemetry), 1.0);
    }

    #[test]
    fn test_partial_terms() {
        let telemetry = TypingTelemetry {
            avg_press_duration: 300.0,
            speed_variance: 50.0,
            error_rate: 0.25,
        };
        // 0.5 + 0.3*0.5 + 0.3*0.5 + 0.4*0.25 = 0.9
        assert!((estimate(&telemetry) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let telemetry = TypingTelemetry {
            avg_press_duration: 237.0,
            speed_variance: 41.5,
            error_rate: 0.12,
        };
        let first = estimate(&telemetry);
        for _ in 0..10 {
            assert_eq!(estimate(&telemetry), first);
        }
    }

    #[test]
    fn test_negative_inputs_contribute_nothing() {
        let telemetry = TypingTelemetry {
            avg_press_duration: -50.0,
            speed_variance: -3.0,
            error_rate: -1.0,
        };
        assert_eq!(estimate(&telemetry), 0.5);
    }
}
