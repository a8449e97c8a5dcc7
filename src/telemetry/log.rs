//! Engine activity counters.
//!
//! Estimation failures are deliberately invisible at the scoring boundary
//! (the neutral score is substituted), so this log is the one place where
//! they are observable. The other counters exist for the same reason:
//! operators can see what the engine has been doing without any per-player
//! data leaving the process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Activity counters for the current process.
#[derive(Debug)]
pub struct EngineLog {
    /// Number of face observations scored
    faces_analyzed: AtomicU64,
    /// Number of typing telemetry snapshots scored
    keyboard_samples: AtomicU64,
    /// Number of difficulty updates applied
    difficulty_updates: AtomicU64,
    /// Number of estimation failures degraded to the neutral score
    estimation_faults: AtomicU64,
    /// Number of session resets
    session_resets: AtomicU64,
    /// Process start time
    started_at: DateTime<Utc>,
}

impl EngineLog {
    pub fn new() -> Self {
        Self {
            faces_analyzed: AtomicU64::new(0),
            keyboard_samples: AtomicU64::new(0),
            difficulty_updates: AtomicU64::new(0),
            estimation_faults: AtomicU64::new(0),
            session_resets: AtomicU64::new(0),
            started_at: Utc::now(),
        }
    }

    pub fn record_face_analyzed(&self) {
        self.faces_analyzed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_keyboard_sample(&self) {
        self.keyboard_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_difficulty_update(&self) {
        self.difficulty_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_estimation_fault(&self) {
        self.estimation_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_reset(&self) {
        self.session_resets.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of estimation failures so far.
    pub fn estimation_faults(&self) -> u64 {
        self.estimation_faults.load(Ordering::Relaxed)
    }

    /// Get the current statistics.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            faces_analyzed: self.faces_analyzed.load(Ordering::Relaxed),
            keyboard_samples: self.keyboard_samples.load(Ordering::Relaxed),
            difficulty_updates: self.difficulty_updates.load(Ordering::Relaxed),
            estimation_faults: self.estimation_faults.load(Ordering::Relaxed),
            session_resets: self.session_resets.load(Ordering::Relaxed),
            started_at: self.started_at,
            uptime_secs: (Utc::now() - self.started_at).num_seconds().max(0) as u64,
        }
    }

    /// Summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Engine Statistics:\n\
             - Faces analyzed: {}\n\
             - Keyboard samples scored: {}\n\
             - Difficulty updates: {}\n\
             - Estimation faults (degraded to neutral): {}\n\
             - Session resets: {}\n\
             - Uptime: {} seconds",
            stats.faces_analyzed,
            stats.keyboard_samples,
            stats.difficulty_updates,
            stats.estimation_faults,
            stats.session_resets,
            stats.uptime_secs
        )
    }
}

impl Default for EngineLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of engine statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub faces_analyzed: u64,
    pub keyboard_samples: u64,
    pub difficulty_updates: u64,
    pub estimation_faults: u64,
    pub session_resets: u64,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: u64,
}

/// Thread-safe shared handle to the engine log.
pub type SharedEngineLog = Arc<EngineLog>;

/// Create a new shared engine log.
pub fn create_shared_log() -> SharedEngineLog {
    Arc::new(EngineLog::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let log = EngineLog::new();
        log.record_face_analyzed();
        log.record_face_analyzed();
        log.record_keyboard_sample();
        log.record_estimation_fault();

        let stats = log.stats();
        assert_eq!(stats.faces_analyzed, 2);
        assert_eq!(stats.keyboard_samples, 1);
        assert_eq!(stats.estimation_faults, 1);
        assert_eq!(stats.difficulty_updates, 0);
    }

    #[test]
    fn test_shared_log_across_threads() {
        let log = create_shared_log();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let log = Arc::clone(&log);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    log.record_difficulty_update();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(log.stats().difficulty_updates, 400);
    }

    #[test]
    fn test_summary_mentions_faults() {
        let log = EngineLog::new();
        log.record_estimation_fault();
        assert!(log.summary().contains("Estimation faults"));
    }
}
