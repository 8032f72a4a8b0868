pub mod core {
	pub mod game;
	pub mod runner;
}

pub mod cli;
pub mod config;
pub mod cricket;
pub mod logging;
pub mod store;

// Re-export for convenience
pub use crate::config::{GameConfig, Timing};
pub use crate::core::game::{Context, Flow, Game};
pub use crate::cricket::{BallOutcome, EngineError, MatchEngine, MatchState, Phase, Side};
