//! Per-player session state and the session registry.
//!
//! Each player gets one [`PlayerSession`] holding two bounded score
//! histories and the current difficulty multiplier. The
//! [`SessionRegistry`] creates sessions lazily and serializes mutation per
//! player while leaving different players fully independent.

use crate::core::difficulty::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::core::observation::BoundingBox;
use crate::core::NEUTRAL_SCORE;
use chrono::{DateTime, Utc};
use statrs::statistics::Statistics;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

/// Maximum number of samples kept per score stream.
pub const HISTORY_CAPACITY: usize = 10;

/// Mutable per-player state record.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    stress_history: VecDeque<f64>,
    keyboard_history: VecDeque<f64>,
    difficulty: f64,
    /// Detection outcome of the latest analyzed frame.
    pub face_detected: bool,
    /// Most recently detected face geometry, for frame-to-frame comparison.
    pub last_face_observation: Option<BoundingBox>,
    created_at: DateTime<Utc>,
    last_update: DateTime<Utc>,
}

impl Default for PlayerSession {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            stress_history: VecDeque::with_capacity(HISTORY_CAPACITY),
            keyboard_history: VecDeque::with_capacity(HISTORY_CAPACITY),
            difficulty: DEFAULT_DIFFICULTY,
            face_detected: false,
            last_face_observation: None,
            created_at: now,
            last_update: now,
        }
    }
}

impl PlayerSession {
    /// Append a facial stress sample, evicting the oldest at capacity,
    /// and return the running average.
    pub fn record_facial(&mut self, score: f64) -> f64 {
        Self::push_bounded(&mut self.stress_history, score);
        self.last_update = Utc::now();
        Self::average(&self.stress_history)
    }

    /// Append a keyboard stress sample, evicting the oldest at capacity,
    /// and return the running average.
    pub fn record_keyboard(&mut self, score: f64) -> f64 {
        Self::push_bounded(&mut self.keyboard_history, score);
        self.last_update = Utc::now();
        Self::average(&self.keyboard_history)
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// Persist a controller-computed difficulty. Clamped here as well so
    /// the invariant holds no matter what the caller hands in.
    pub(crate) fn set_difficulty(&mut self, difficulty: f64) {
        self.difficulty = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        self.last_update = Utc::now();
    }

    pub fn stress_history(&self) -> impl Iterator<Item = f64> + '_ {
        self.stress_history.iter().copied()
    }

    pub fn keyboard_history(&self) -> impl Iterator<Item = f64> + '_ {
        self.keyboard_history.iter().copied()
    }

    pub fn stress_history_len(&self) -> usize {
        self.stress_history.len()
    }

    pub fn keyboard_history_len(&self) -> usize {
        self.keyboard_history.len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    fn push_bounded(history: &mut VecDeque<f64>, score: f64) {
        history.push_back(score.clamp(0.0, 1.0));
        while history.len() > HISTORY_CAPACITY {
            history.pop_front();
        }
    }

    fn average(history: &VecDeque<f64>) -> f64 {
        if history.is_empty() {
            return NEUTRAL_SCORE;
        }
        let mean = history.iter().mean();
        if mean.is_finite() {
            mean
        } else {
            NEUTRAL_SCORE
        }
    }
}

/// Owns every player session for the process lifetime.
///
/// The outer map lock is held only long enough to look up or insert the
/// per-player entry; all state mutation happens under that player's own
/// mutex, so distinct players never contend.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<Mutex<PlayerSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session for a player, creating a default one on first use.
    pub fn session(&self, player_id: &str) -> Arc<Mutex<PlayerSession>> {
        if let Some(existing) = self.sessions.read().expect("session map poisoned").get(player_id) {
            return Arc::clone(existing);
        }

        let mut sessions = self.sessions.write().expect("session map poisoned");
        Arc::clone(
            sessions
                .entry(player_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(PlayerSession::default()))),
        )
    }

    /// Run a closure against a player's session under its exclusive lock.
    pub fn with_session<R>(&self, player_id: &str, f: impl FnOnce(&mut PlayerSession) -> R) -> R {
        let session = self.session(player_id);
        let mut guard = session.lock().expect("session poisoned");
        f(&mut guard)
    }

    /// Replace a player's session with a fresh default record. The
    /// identifier itself stays registered.
    pub fn reset(&self, player_id: &str) {
        self.with_session(player_id, |session| {
            *session = PlayerSession::default();
        });
    }

    /// Number of distinct players seen so far.
    pub fn player_count(&self) -> usize {
        self.sessions.read().expect("session map poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session() {
        let session = PlayerSession::default();
        assert_eq!(session.difficulty(), 1.0);
        assert!(!session.face_detected);
        assert!(session.last_face_observation.is_none());
        assert_eq!(session.stress_history_len(), 0);
    }

    #[test]
    fn test_empty_history_averages_neutral() {
        let mut session = PlayerSession::default();
        // First sample: average equals the sample itself.
        let avg = session.record_facial(0.8);
        assert!((avg - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_fifo_eviction_keeps_newest_ten() {
        let mut session = PlayerSession::default();
        for i in 0..15 {
            session.record_facial(i as f64 / 20.0);
        }

        assert_eq!(session.stress_history_len(), HISTORY_CAPACITY);
        let kept: Vec<f64> = session.stress_history().collect();
        // Oldest five dropped in order; samples 5..15 remain.
        let expected: Vec<f64> = (5..15).map(|i| i as f64 / 20.0).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_keyboard_history_is_independent() {
        let mut session = PlayerSession::default();
        session.record_facial(0.9);
        session.record_keyboard(0.1);

        assert_eq!(session.stress_history_len(), 1);
        assert_eq!(session.keyboard_history_len(), 1);
        assert!((session.record_keyboard(0.3) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_stored_scores_are_clamped() {
        let mut session = PlayerSession::default();
        session.record_facial(7.0);
        session.record_facial(-2.0);

        for score in session.stress_history() {
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn test_registry_lazy_creation() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.player_count(), 0);

        let difficulty = registry.with_session("alice", |s| s.difficulty());
        assert_eq!(difficulty, 1.0);
        assert_eq!(registry.player_count(), 1);
    }

    #[test]
    fn test_registry_reset_keeps_identifier() {
        let registry = SessionRegistry::new();
        registry.with_session("bob", |s| {
            s.record_facial(0.9);
            s.set_difficulty(2.5);
        });

        registry.reset("bob");
        assert_eq!(registry.player_count(), 1);
        registry.with_session("bob", |s| {
            assert_eq!(s.difficulty(), 1.0);
            assert_eq!(s.stress_history_len(), 0);
            assert_eq!(s.keyboard_history_len(), 0);
            assert!(!s.face_detected);
        });
    }

    #[test]
    fn test_registry_isolates_players() {
        let registry = SessionRegistry::new();
        registry.with_session("p1", |s| s.set_difficulty(0.7));
        registry.with_session("p2", |s| assert_eq!(s.difficulty(), 1.0));
    }

    #[test]
    fn test_concurrent_same_player_updates_serialize() {
        let registry = Arc::new(SessionRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    registry.with_session("shared", |s| {
                        s.record_facial(0.5);
                    });
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        registry.with_session("shared", |s| {
            assert_eq!(s.stress_history_len(), HISTORY_CAPACITY);
        });
    }
}
