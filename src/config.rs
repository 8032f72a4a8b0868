//! Runtime settings for the terminal game.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STORE: &str = "hand-cricket.json";
pub const DEFAULT_REVEAL_MS: u64 = 220;
pub const DEFAULT_INNINGS_BREAK_MS: u64 = 1800;
pub const DEFAULT_FEEDBACK_MS: u64 = 420;

/// Presentation delays. None of them affect match rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Between playing a ball and revealing the computer's pick.
    pub reveal: Duration,
    /// How long the innings-break overlay holds input.
    pub innings_break: Duration,
    /// How long a feedback banner stays up.
    pub feedback: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_millis(DEFAULT_REVEAL_MS, DEFAULT_INNINGS_BREAK_MS, DEFAULT_FEEDBACK_MS)
    }
}

impl Timing {
    pub fn from_millis(reveal: u64, innings_break: u64, feedback: u64) -> Self {
        Self {
            reveal: Duration::from_millis(reveal),
            innings_break: Duration::from_millis(innings_break),
            feedback: Duration::from_millis(feedback),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub store_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub timing: Timing,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE),
            log_file: None,
            seed: None,
            timing: Timing::default(),
        }
    }
}

impl GameConfig {
    /// Explicit log file, or one next to the store.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.store_path.with_extension("log"))
    }
}
