//! Finished-game history
//!
//! Persisted to LocalStorage. Keeps the most recent runs (newest first) and
//! the total of tokens ever mined, which the rewards view shows as a balance.

use serde::{Deserialize, Serialize};

use crate::platform;
use crate::sim::GameState;

/// Maximum number of runs to keep
pub const MAX_HISTORY: usize = 50;

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Tokens collected
    pub score: u64,
    /// Time spent playing (seconds)
    pub duration_secs: f64,
    /// Speed multiplier when the run ended
    pub peak_speed: f32,
    /// Unix timestamp (ms) when the run ended
    pub timestamp: f64,
}

impl GameRecord {
    pub fn from_state(state: &GameState, timestamp: f64) -> Self {
        Self {
            score: state.score,
            duration_secs: state.clock_ms / 1000.0,
            peak_speed: state.speed,
            timestamp,
        }
    }
}

/// Run history plus lifetime totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameHistory {
    /// Newest first
    pub records: Vec<GameRecord>,
    /// Tokens mined across every run, including ones trimmed from `records`
    #[serde(default)]
    pub total_mined: u64,
}

impl GameHistory {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "moxie_mining_history";

    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished run; returns its rank among kept runs (1-indexed)
    pub fn record(&mut self, record: GameRecord) -> usize {
        self.total_mined += record.score;
        let rank = self.rank_of(record.score);
        self.records.insert(0, record);
        self.records.truncate(MAX_HISTORY);
        rank
    }

    /// Rank a score would take among kept runs (ties rank behind older runs)
    pub fn rank_of(&self, score: u64) -> usize {
        self.records.iter().filter(|r| r.score >= score).count() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Best score among kept runs (if any)
    pub fn best_score(&self) -> Option<u64> {
        self.records.iter().map(|r| r.score).max()
    }

    /// Top `n` runs by score, highest first
    pub fn top(&self, n: usize) -> Vec<&GameRecord> {
        let mut sorted: Vec<&GameRecord> = self.records.iter().collect();
        // Stable sort keeps newer runs ahead on ties
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted.truncate(n);
        sorted
    }

    /// Load history from storage
    pub fn load() -> Self {
        match platform::load_json::<GameHistory>(Self::STORAGE_KEY) {
            Some(history) => {
                log::info!("Loaded {} past runs", history.records.len());
                history
            }
            None => {
                log::info!("No game history found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save history to storage
    pub fn save(&self) {
        if platform::save_json(Self::STORAGE_KEY, self) {
            log::info!("Game history saved ({} runs)", self.records.len());
        }
    }
}

/// Format a timestamp as a relative date string
pub fn format_relative(timestamp: f64, now: f64) -> String {
    let diff_secs = (now - timestamp).max(0.0) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64) -> GameRecord {
        GameRecord {
            score,
            duration_secs: 12.0,
            peak_speed: 1.2,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_record_newest_first() {
        let mut history = GameHistory::new();
        history.record(run(3));
        history.record(run(9));
        assert_eq!(history.records[0].score, 9);
        assert_eq!(history.records[1].score, 3);
        assert_eq!(history.total_mined, 12);
    }

    #[test]
    fn test_rank() {
        let mut history = GameHistory::new();
        assert_eq!(history.record(run(10)), 1);
        assert_eq!(history.record(run(20)), 1);
        assert_eq!(history.record(run(15)), 2);
        assert_eq!(history.record(run(15)), 3);
        assert_eq!(history.rank_of(1), 5);
    }

    #[test]
    fn test_trim_keeps_total() {
        let mut history = GameHistory::new();
        for _ in 0..(MAX_HISTORY + 5) {
            history.record(run(2));
        }
        assert_eq!(history.records.len(), MAX_HISTORY);
        assert_eq!(history.total_mined, 2 * (MAX_HISTORY as u64 + 5));
    }

    #[test]
    fn test_top_and_best() {
        let mut history = GameHistory::new();
        assert_eq!(history.best_score(), None);
        for score in [4, 11, 7, 2] {
            history.record(run(score));
        }
        assert_eq!(history.best_score(), Some(11));
        let top: Vec<u64> = history.top(2).iter().map(|r| r.score).collect();
        assert_eq!(top, vec![11, 7]);
    }

    #[test]
    fn test_record_from_state() {
        let mut state = GameState::new(1);
        state.score = 6;
        state.clock_ms = 45_500.0;
        state.speed = 1.4;
        let record = GameRecord::from_state(&state, 1000.0);
        assert_eq!(record.score, 6);
        assert!((record.duration_secs - 45.5).abs() < 1e-9);
        assert_eq!(record.timestamp, 1000.0);
    }

    #[test]
    fn test_format_relative() {
        let now = 10_000_000_000.0;
        assert_eq!(format_relative(now - 5_000.0, now), "Just now");
        assert_eq!(format_relative(now - 90_000.0, now), "1 min ago");
        assert_eq!(format_relative(now - 3.0 * 3_600_000.0, now), "3 hours ago");
        assert_eq!(format_relative(now - 86_400_000.0, now), "Yesterday");
        assert_eq!(format_relative(now - 5.0 * 86_400_000.0, now), "5 days ago");
    }
}
