use thiserror::Error;

use crate::cricket::state::Phase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Pick a run between 1 and 6 (got {choice})")]
    InvalidInput { choice: u8 },

    #[error("Cannot {action} while in {phase:?}")]
    IllegalState { action: &'static str, phase: Phase },

    #[error("A ball is already being resolved")]
    BallPending,

    #[error("Stale turn {token} (current turn is {current})")]
    StaleTurn { token: u64, current: u64 },
}

impl EngineError {
    /// Rejections that are the normal debounce path rather than a mistake
    /// worth showing to the player.
    pub fn is_debounce(&self) -> bool {
        match self {
            EngineError::InvalidInput { .. } => false,
            EngineError::IllegalState { .. } => true,
            EngineError::BallPending => true,
            EngineError::StaleTurn { .. } => true,
        }
    }
}
