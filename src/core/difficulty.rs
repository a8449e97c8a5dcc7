//! Adaptive difficulty control.
//!
//! The controller fuses the latest facial and keyboard stress scores into a
//! combined value and nudges the player's difficulty multiplier toward the
//! target stress band with multiplicative hysteresis. Nobody else mutates
//! difficulty.

use serde::{Deserialize, Serialize};

pub const MIN_DIFFICULTY: f64 = 0.5;
pub const MAX_DIFFICULTY: f64 = 3.0;
pub const DEFAULT_DIFFICULTY: f64 = 1.0;

/// Fusion weights for the combined stress value.
pub const FACIAL_WEIGHT: f64 = 0.6;
pub const KEYBOARD_WEIGHT: f64 = 0.4;

/// Band edges around the target stress zone.
const VERY_STRESSED: f64 = 0.7;
const STRESSED: f64 = 0.6;
const RELAXED: f64 = 0.4;
const VERY_RELAXED: f64 = 0.3;

/// Direction the game should take the challenge level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Increase,
    Decrease,
    Maintain,
}

/// Weighted fusion of the two stress streams.
pub fn combine(facial_stress: f64, keyboard_stress: f64) -> f64 {
    facial_stress * FACIAL_WEIGHT + keyboard_stress * KEYBOARD_WEIGHT
}

/// Advance a difficulty value one step against the combined stress.
///
/// Bands are evaluated highest-stress first; the 0.4–0.6 zone is the target
/// and leaves difficulty untouched. The result is always clamped into
/// [`MIN_DIFFICULTY`, `MAX_DIFFICULTY`].
pub fn advance(current: f64, combined: f64) -> f64 {
    let next = if combined > VERY_STRESSED {
        current * 0.9
    } else if combined > STRESSED {
        current * 0.95
    } else if combined < VERY_RELAXED {
        current * 1.1
    } else if combined < RELAXED {
        current * 1.05
    } else {
        current
    };

    next.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// What the game should do with the challenge level at this stress point.
pub fn recommendation(combined: f64) -> Recommendation {
    if combined < RELAXED {
        Recommendation::Increase
    } else if combined > STRESSED {
        Recommendation::Decrease
    } else {
        Recommendation::Maintain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_weights() {
        assert!((combine(1.0, 0.0) - 0.6).abs() < 1e-12);
        assert!((combine(0.0, 1.0) - 0.4).abs() < 1e-12);
        assert!((combine(0.5, 0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_combine_is_monotonic() {
        let base = combine(0.5, 0.3);
        assert!(combine(0.5, 0.4) > base);
        assert!(combine(0.6, 0.3) > base);
    }

    #[test]
    fn test_very_stressed_band() {
        assert!((advance(1.0, 0.75) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_stressed_band() {
        assert!((advance(1.0, 0.65) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_optimal_zone_holds() {
        assert_eq!(advance(1.37, 0.5), 1.37);
        assert_eq!(advance(1.37, 0.4), 1.37);
        assert_eq!(advance(1.37, 0.6), 1.37);
    }

    #[test]
    fn test_relaxed_band() {
        assert!((advance(1.0, 0.35) - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_very_relaxed_band() {
        assert!((advance(1.0, 0.2) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_floor_and_ceiling() {
        let mut d = DEFAULT_DIFFICULTY;
        for _ in 0..100 {
            d = advance(d, 0.9);
        }
        assert_eq!(d, MIN_DIFFICULTY);

        let mut d = DEFAULT_DIFFICULTY;
        for _ in 0..100 {
            d = advance(d, 0.1);
        }
        assert_eq!(d, MAX_DIFFICULTY);
    }

    #[test]
    fn test_recommendation_thresholds() {
        assert_eq!(recommendation(0.2), Recommendation::Increase);
        assert_eq!(recommendation(0.39), Recommendation::Increase);
        assert_eq!(recommendation(0.4), Recommendation::Maintain);
        assert_eq!(recommendation(0.6), Recommendation::Maintain);
        assert_eq!(recommendation(0.61), Recommendation::Decrease);
        assert_eq!(recommendation(0.9), Recommendation::Decrease);
    }

    #[test]
    fn test_recommendation_serializes_lowercase() {
        let json = serde_json::to_string(&Recommendation::Increase).unwrap();
        assert_eq!(json, "\"increase\"");
    }
}
