use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{
    GameConfig, Timing, DEFAULT_FEEDBACK_MS, DEFAULT_INNINGS_BREAK_MS, DEFAULT_REVEAL_MS,
    DEFAULT_STORE,
};
use crate::core::runner::Runner;
use crate::cricket::{CricketApp, MatchEngine, MatchOutcome, RandomSource, SeededRandom, ThreadRandom};
use crate::logging::{init_tracing, LogTarget};
use crate::store::{
    HistoryEntry, HistorySummary, JsonFileStore, KeyValueStore, Persistence, Scorebook,
    HISTORY_LIMIT,
};

#[derive(Parser, Debug)]
#[command(name = "hand-cricket")]
#[command(about = "🏏 Emoji hand cricket against the computer")]
#[command(version)]
pub struct Cli {
    /// File holding best score, history and the sound preference
    #[arg(long, global = true, env = "HAND_CRICKET_STORE", default_value = DEFAULT_STORE)]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Play in the terminal (default)
    Play(PlayArgs),
    /// List recent matches, newest first
    History {
        #[arg(short, long, default_value_t = HISTORY_LIMIT)]
        limit: usize,
    },
    /// Win/loss record and best score
    Stats,
    /// Turn the wicket bell on or off
    Sound {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Forget history and best score
    Reset,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PlayArgs {
    /// Seed the computer's picks for a repeatable match
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_REVEAL_MS)]
    pub reveal_ms: u64,

    #[arg(long, default_value_t = DEFAULT_INNINGS_BREAK_MS)]
    pub innings_break_ms: u64,

    #[arg(long, default_value_t = DEFAULT_FEEDBACK_MS)]
    pub feedback_ms: u64,

    /// Defaults to a `.log` file next to the store
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            seed: None,
            reveal_ms: DEFAULT_REVEAL_MS,
            innings_break_ms: DEFAULT_INNINGS_BREAK_MS,
            feedback_ms: DEFAULT_FEEDBACK_MS,
            log_file: None,
        }
    }
}

impl PlayArgs {
    pub fn into_config(self, store_path: PathBuf) -> GameConfig {
        GameConfig {
            store_path,
            log_file: self.log_file,
            seed: self.seed,
            timing: Timing::from_millis(self.reveal_ms, self.innings_break_ms, self.feedback_ms),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

pub async fn run_cli() -> Result<()> {
    run(Cli::parse()).await
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => play(PlayArgs::default().into_config(cli.store)).await,
        Some(Commands::Play(args)) => play(args.into_config(cli.store)).await,
        Some(command) => {
            init_tracing(LogTarget::Stderr)?;
            let mut book = open_scorebook(&cli.store)?;
            run_records(command, &mut book, &mut std::io::stdout())
        }
    }
}

fn open_scorebook(path: &Path) -> Result<Scorebook<JsonFileStore>> {
    let store = JsonFileStore::open(path)
        .with_context(|| format!("opening score store {}", path.display()))?;
    debug!(path = %store.path().display(), "score store opened");
    Ok(Scorebook::new(store))
}

/// Opens the store, runs the TUI until the player quits, restores the terminal.
pub async fn play(config: GameConfig) -> Result<()> {
    init_tracing(LogTarget::File(config.log_path()))?;

    let book = open_scorebook(&config.store_path)?;
    let rng: Box<dyn RandomSource + Send> = match config.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    };
    let app = CricketApp::new(MatchEngine::new(rng, book), config.timing);
    info!(store = %config.store_path.display(), seed = ?config.seed, "starting session");

    let terminal = ratatui::init();
    let result = Runner::new(app).run(terminal).await;
    ratatui::restore();

    let app = result?;
    info!(best = app.engine().best_score(), "session closed");
    Ok(())
}

/// Handles the subcommands that only read or edit stored records.
pub fn run_records<K: KeyValueStore>(
    command: Commands,
    book: &mut Scorebook<K>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::History { limit } => {
            let history = book.history();
            if history.is_empty() {
                writeln!(out, "No matches yet.")?;
            }
            for entry in history.iter().take(limit) {
                writeln!(out, "{}", format_history_line(entry))?;
            }
        }
        Commands::Stats => {
            let summary = HistorySummary::from_entries(&book.history());
            writeln!(out, "🏏 Best score: {}", book.best_score())?;
            writeln!(
                out,
                "Last {} matches: {} won, {} lost, {} tied",
                summary.matches, summary.wins, summary.losses, summary.ties
            )?;
            writeln!(out, "Highest recent score: {}", summary.highest)?;
        }
        Commands::Sound { state } => {
            let enabled = state == Toggle::On;
            book.set_sound_enabled(enabled)?;
            writeln!(out, "Sound {}", if enabled { "on 🔊" } else { "off 🔇" })?;
        }
        Commands::Reset => {
            book.clear()?;
            writeln!(out, "History and best score cleared.")?;
        }
        Commands::Play(_) => {}
    }
    Ok(())
}

pub fn format_history_line(entry: &HistoryEntry) -> String {
    let result = match entry.result {
        MatchOutcome::Win => "Win ",
        MatchOutcome::Loss => "Loss",
        MatchOutcome::Tie => "Tie ",
    };
    let role = if entry.user_bat_first { "batted first" } else { "bowled first" };
    format!(
        "{}  {} {}  You {} - Computer {}  ({role})",
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        entry.result.chip(),
        result,
        entry.user_score,
        entry.comp_score,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn run_to_string(command: Commands, book: &mut Scorebook<MemoryStore>) -> String {
        let mut out = Vec::new();
        run_records(command, book, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn entry(user: u32, comp: u32, bat_first: bool) -> HistoryEntry {
        let ts = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        HistoryEntry::new(ts, user, comp, bat_first)
    }

    #[test]
    fn test_default_command_is_play() {
        let cli = Cli::try_parse_from(["hand-cricket"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.store, PathBuf::from(DEFAULT_STORE));
    }

    #[test]
    fn test_play_args_build_config() {
        let cli = Cli::try_parse_from([
            "hand-cricket",
            "--store",
            "scores.json",
            "play",
            "--seed",
            "7",
            "--reveal-ms",
            "0",
        ])
        .unwrap();
        let Some(Commands::Play(args)) = cli.command else {
            panic!("expected play");
        };
        let config = args.into_config(cli.store);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.timing.reveal, Duration::ZERO);
        assert_eq!(config.timing.innings_break, Duration::from_millis(1800));
        assert_eq!(config.log_path(), PathBuf::from("scores.log"));
    }

    #[test]
    fn test_sound_subcommand_parses() {
        let cli = Cli::try_parse_from(["hand-cricket", "sound", "off"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Sound { state: Toggle::Off }));
        assert!(Cli::try_parse_from(["hand-cricket", "sound", "loud"]).is_err());
    }

    #[test]
    fn test_history_line() {
        let line = format_history_line(&entry(12, 10, true));
        assert_eq!(
            line,
            "2026-03-14 09:30  ✅ Win   You 12 - Computer 10  (batted first)"
        );
    }

    #[test]
    fn test_history_and_stats_output() {
        let mut book = Scorebook::new(MemoryStore::new());
        assert_eq!(run_to_string(Commands::History { limit: 5 }, &mut book), "No matches yet.\n");

        book.append_history(entry(4, 9, false)).unwrap();
        book.append_history(entry(12, 10, true)).unwrap();
        book.set_best_score(12).unwrap();

        let history = run_to_string(Commands::History { limit: 1 }, &mut book);
        assert_eq!(history.lines().count(), 1);
        assert!(history.contains("You 12 - Computer 10"));

        let stats = run_to_string(Commands::Stats, &mut book);
        assert!(stats.contains("Best score: 12"));
        assert!(stats.contains("Last 2 matches: 1 won, 1 lost, 0 tied"));
    }

    #[test]
    fn test_sound_and_reset() {
        let mut book = Scorebook::new(MemoryStore::new());
        book.append_history(entry(3, 1, true)).unwrap();
        book.set_best_score(3).unwrap();

        run_to_string(Commands::Sound { state: Toggle::Off }, &mut book);
        assert!(!book.sound_enabled());

        run_to_string(Commands::Reset, &mut book);
        assert!(book.history().is_empty());
        assert_eq!(book.best_score(), 0);
        assert!(!book.sound_enabled());
    }
}
