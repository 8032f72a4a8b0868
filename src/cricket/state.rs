use serde::{Deserialize, Serialize};

use crate::cricket::stats;

/// Which screen of the match flow is active. Drives which events are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Lobby,
    RoleSelect,
    InProgress,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    User,
    Computer,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::User => Side::Computer,
            Side::Computer => Side::User,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::User => "You",
            Side::Computer => "Computer",
        }
    }
}

/// State of the active match. Owned by the engine; everything else only
/// ever sees a shared borrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: Phase,
    pub user_batting_first: bool,
    pub innings: u8,
    pub user_score: u32,
    pub comp_score: u32,
    pub target: Option<u32>,
    pub balls_bowled: u32,
    pub last_user_choice: Option<u8>,
    pub last_comp_choice: Option<u8>,
    pub game_over: bool,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            phase: Phase::Lobby,
            user_batting_first: true,
            innings: 1,
            user_score: 0,
            comp_score: 0,
            target: None,
            balls_bowled: 0,
            last_user_choice: None,
            last_comp_choice: None,
            game_over: false,
        }
    }
}

impl MatchState {
    /// Fresh first innings with the chosen role.
    pub fn new_match(user_batting_first: bool) -> Self {
        Self {
            phase: Phase::InProgress,
            user_batting_first,
            ..Self::default()
        }
    }

    /// Blank state parked on a non-playing screen.
    pub fn idle(phase: Phase, user_batting_first: bool) -> Self {
        debug_assert!(matches!(phase, Phase::Lobby | Phase::RoleSelect));
        Self {
            phase,
            user_batting_first,
            ..Self::default()
        }
    }

    pub fn first_batting_side(&self) -> Side {
        if self.user_batting_first {
            Side::User
        } else {
            Side::Computer
        }
    }

    pub fn batting_side(&self) -> Side {
        if self.innings == 1 {
            self.first_batting_side()
        } else {
            self.first_batting_side().other()
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::User => self.user_score,
            Side::Computer => self.comp_score,
        }
    }

    pub(crate) fn score_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::User => &mut self.user_score,
            Side::Computer => &mut self.comp_score,
        }
    }

    pub fn batting_score(&self) -> u32 {
        self.score(self.batting_side())
    }

    /// Score of the side chasing the target, once the chase has begun.
    pub fn chasing_score(&self) -> Option<u32> {
        self.target.map(|_| self.score(self.first_batting_side().other()))
    }

    pub fn runs_needed(&self) -> Option<u32> {
        let target = self.target?;
        self.chasing_score()
            .map(|score| stats::runs_needed(target, score))
    }

    pub fn chase_complete(&self) -> bool {
        match (self.target, self.chasing_score()) {
            (Some(target), Some(score)) => self.innings == 2 && score >= target,
            _ => false,
        }
    }

    /// Run rate of the side batting this innings.
    pub fn run_rate(&self) -> f64 {
        stats::run_rate(self.batting_score(), self.balls_bowled)
    }
}
