//! Hand cricket: rules engine plus its terminal front end.

pub mod app;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod random;
pub mod renderer;
pub mod state;
pub mod stats;

pub use app::{AppEvent, CricketApp};
pub use engine::{MatchEngine, PendingBall};
pub use error::EngineError;
pub use outcome::{BallOutcome, MatchEnding, MatchOutcome, MatchResult};
pub use random::{RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
pub use renderer::MatchRenderer;
pub use state::{MatchState, Phase, Side};
