use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::cricket::state::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Loss,
    Tie,
}

impl MatchOutcome {
    /// Outcome from the user's point of view.
    pub fn from_scores(user_score: u32, comp_score: u32) -> Self {
        match user_score.cmp(&comp_score) {
            Ordering::Greater => MatchOutcome::Win,
            Ordering::Less => MatchOutcome::Loss,
            Ordering::Equal => MatchOutcome::Tie,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            MatchOutcome::Win => "🏆",
            MatchOutcome::Loss => "💀",
            MatchOutcome::Tie => "🤝",
        }
    }

    pub fn chip(self) -> &'static str {
        match self {
            MatchOutcome::Win => "✅",
            MatchOutcome::Loss => "❌",
            MatchOutcome::Tie => "🤝",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MatchOutcome::Win => "You won the match!",
            MatchOutcome::Loss => "Computer won the match.",
            MatchOutcome::Tie => "It's a tie!",
        }
    }
}

/// Final figures of a completed match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub result: MatchOutcome,
    pub user_score: u32,
    pub comp_score: u32,
    pub is_new_best: bool,
}

/// How the last ball of a match finished it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEnding {
    /// The chasing side was dismissed.
    Dismissal { side: Side, score_at_out: u32 },
    /// The chasing side met or passed the target mid-innings.
    TargetReached { side: Side, runs: u32 },
}

/// What a single resolved ball did to the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallOutcome {
    Scored { side: Side, runs: u32 },
    /// First-innings dismissal; the chase begins with `target`.
    Out { side: Side, score_at_out: u32, target: u32 },
    MatchEnded { result: MatchResult, ending: MatchEnding },
}

impl BallOutcome {
    pub fn is_dismissal(&self) -> bool {
        matches!(
            self,
            BallOutcome::Out { .. }
                | BallOutcome::MatchEnded { ending: MatchEnding::Dismissal { .. }, .. }
        )
    }

    pub fn match_result(&self) -> Option<&MatchResult> {
        match self {
            BallOutcome::MatchEnded { result, .. } => Some(result),
            _ => None,
        }
    }
}
