//! Local persistence: a flat string key-value store and the scorebook that
//! keeps best score, match history and the sound preference in it.

mod kv;
mod scorebook;

pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use scorebook::Scorebook;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cricket::MatchOutcome;

/// Matches kept in history, newest first.
pub const HISTORY_LIMIT: usize = 10;

/// Keys the scorebook writes into the key-value store.
pub mod keys {
    pub const SOUND: &str = "emo-cricket-sound";
    pub const HISTORY: &str = "emo-cricket-history";
    pub const BEST: &str = "emo-cricket-best";
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    pub user_score: u32,
    pub comp_score: u32,
    pub result: MatchOutcome,
    pub user_bat_first: bool,
}

impl HistoryEntry {
    pub fn new(timestamp: DateTime<Utc>, user_score: u32, comp_score: u32, user_bat_first: bool) -> Self {
        Self {
            timestamp,
            user_score,
            comp_score,
            result: MatchOutcome::from_scores(user_score, comp_score),
            user_bat_first,
        }
    }

    /// Compact scoreline, e.g. `✅ 12-10`.
    pub fn chip(&self) -> String {
        format!("{} {}-{}", self.result.chip(), self.user_score, self.comp_score)
    }
}

/// What the match engine needs from storage.
pub trait Persistence {
    /// Stored best score, 0 when absent or unreadable.
    fn best_score(&self) -> u32;
    fn set_best_score(&mut self, score: u32) -> Result<(), StoreError>;
    /// Stored history, newest first. Empty when absent or unreadable.
    fn history(&self) -> Vec<HistoryEntry>;
    /// Prepends `entry` and keeps the newest [`HISTORY_LIMIT`] entries.
    fn append_history(&mut self, entry: HistoryEntry) -> Result<(), StoreError>;
    fn sound_enabled(&self) -> bool;
    fn set_sound_enabled(&mut self, enabled: bool) -> Result<(), StoreError>;
}

/// Win/loss/tie tally over a slice of history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub matches: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub highest: u32,
}

impl HistorySummary {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut summary, entry| {
            summary.matches += 1;
            match entry.result {
                MatchOutcome::Win => summary.wins += 1,
                MatchOutcome::Loss => summary.losses += 1,
                MatchOutcome::Tie => summary.ties += 1,
            }
            summary.highest = summary.highest.max(entry.user_score);
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(user: u32, comp: u32) -> HistoryEntry {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        HistoryEntry::new(at, user, comp, true)
    }

    #[test]
    fn test_entry_json_shape() {
        let json = serde_json::to_value(entry(12, 10)).unwrap();
        assert_eq!(json["date"], "2026-03-14T09:26:53Z");
        assert_eq!(json["userScore"], 12);
        assert_eq!(json["compScore"], 10);
        assert_eq!(json["result"], "win");
        assert_eq!(json["userBatFirst"], true);
    }

    #[test]
    fn test_entry_reads_browser_payload() {
        let raw = r#"{"date":"2026-03-14T09:26:53.120Z","userScore":4,"compScore":9,"result":"loss","userBatFirst":false}"#;
        let parsed: HistoryEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.result, MatchOutcome::Loss);
        assert_eq!(parsed.user_score, 4);
        assert!(!parsed.user_bat_first);
    }

    #[test]
    fn test_chip() {
        assert_eq!(entry(12, 10).chip(), "✅ 12-10");
        assert_eq!(entry(3, 3).chip(), "🤝 3-3");
    }

    #[test]
    fn test_summary() {
        let entries = vec![entry(12, 10), entry(3, 8), entry(5, 5), entry(20, 2)];
        let summary = HistorySummary::from_entries(&entries);
        assert_eq!(summary.matches, 4);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.ties, 1);
        assert_eq!(summary.highest, 20);
    }
}
