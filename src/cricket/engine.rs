//! The match state machine.
//!
//! ```text
//! Lobby --select_role--> InProgress(1)
//! Lobby/Result --open_role_select--> RoleSelect --select_role--> InProgress(1)
//! InProgress(1) --dismissal--> InProgress(2)   target fixed
//! InProgress(2) --dismissal or target met--> Result
//! Result --select_role--> InProgress(1)
//! ```
//!
//! A ball is resolved in two steps so the presentation can delay the reveal:
//! [`MatchEngine::begin_ball`] draws the computer's pick and arms the
//! reentrancy guard, [`MatchEngine::complete_ball`] applies it. Every reset
//! advances the turn token, which turns any ball still in flight stale.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cricket::error::EngineError;
use crate::cricket::outcome::{BallOutcome, MatchEnding, MatchOutcome, MatchResult};
use crate::cricket::random::RandomSource;
use crate::cricket::state::{MatchState, Phase, Side};
use crate::store::{HistoryEntry, Persistence};

pub const MIN_RUN: u8 = 1;
pub const MAX_RUN: u8 = 6;

/// A ball whose computer pick is drawn but not yet applied.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingBall {
    token: u64,
    user_choice: u8,
    comp_choice: u8,
}

impl PendingBall {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn user_choice(&self) -> u8 {
        self.user_choice
    }
}

pub struct MatchEngine<R, P> {
    state: MatchState,
    rng: R,
    store: P,
    turn: u64,
    pending: Option<u64>,
}

impl<R: RandomSource, P: Persistence> MatchEngine<R, P> {
    pub fn new(rng: R, store: P) -> Self {
        Self {
            state: MatchState::default(),
            rng,
            store,
            turn: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Current turn token.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn is_resolving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    pub fn best_score(&self) -> u32 {
        self.store.best_score()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.store.history()
    }

    pub fn batting_side(&self) -> Side {
        self.state.batting_side()
    }

    pub fn chasing_score(&self) -> Option<u32> {
        self.state.chasing_score()
    }

    pub fn run_rate(&self) -> f64 {
        self.state.run_rate()
    }

    pub fn runs_needed(&self) -> Option<u32> {
        self.state.runs_needed()
    }

    /// Starts a fresh match with the chosen role, from any phase.
    pub fn select_role(&mut self, user_bats_first: bool) -> &MatchState {
        self.advance_turn();
        self.state = MatchState::new_match(user_bats_first);
        info!(turn = self.turn, user_bats_first, "match started");
        &self.state
    }

    pub fn open_role_select(&mut self) -> &MatchState {
        self.advance_turn();
        self.state = MatchState::idle(Phase::RoleSelect, self.state.user_batting_first);
        &self.state
    }

    pub fn return_to_lobby(&mut self) -> &MatchState {
        self.advance_turn();
        self.state = MatchState::idle(Phase::Lobby, self.state.user_batting_first);
        &self.state
    }

    /// Draws the computer's pick and arms the reentrancy guard.
    pub fn begin_ball(&mut self, user_choice: u8) -> Result<PendingBall, EngineError> {
        if !(MIN_RUN..=MAX_RUN).contains(&user_choice) {
            return Err(EngineError::InvalidInput { choice: user_choice });
        }
        if self.state.phase != Phase::InProgress {
            return Err(EngineError::IllegalState {
                action: "play a ball",
                phase: self.state.phase,
            });
        }
        if self.pending.is_some() {
            return Err(EngineError::BallPending);
        }

        let comp_choice = self.rng.uniform_int(MIN_RUN, MAX_RUN);
        self.pending = Some(self.turn);
        Ok(PendingBall {
            token: self.turn,
            user_choice,
            comp_choice,
        })
    }

    /// Applies a ball started by [`begin_ball`](Self::begin_ball). A ball
    /// from an earlier turn is rejected without touching the state.
    pub fn complete_ball(&mut self, ball: PendingBall) -> Result<BallOutcome, EngineError> {
        if ball.token != self.turn || self.pending != Some(ball.token) {
            return Err(EngineError::StaleTurn {
                token: ball.token,
                current: self.turn,
            });
        }
        self.pending = None;
        Ok(self.apply_ball(ball.user_choice, ball.comp_choice))
    }

    /// Resolves a ball in one step.
    pub fn resolve_ball(&mut self, user_choice: u8) -> Result<BallOutcome, EngineError> {
        let ball = self.begin_ball(user_choice)?;
        self.complete_ball(ball)
    }

    fn advance_turn(&mut self) {
        self.turn += 1;
        if self.pending.take().is_some() {
            debug!(turn = self.turn, "pending ball invalidated");
        }
    }

    fn apply_ball(&mut self, user_choice: u8, comp_choice: u8) -> BallOutcome {
        let batting = self.state.batting_side();
        self.state.balls_bowled += 1;
        self.state.last_user_choice = Some(user_choice);
        self.state.last_comp_choice = Some(comp_choice);

        if user_choice == comp_choice {
            let score_at_out = self.state.score(batting);
            debug!(innings = self.state.innings, ?batting, score_at_out, "wicket");
            return self.switch_innings(batting, score_at_out);
        }

        let runs = u32::from(match batting {
            Side::User => user_choice,
            Side::Computer => comp_choice,
        });
        *self.state.score_mut(batting) += runs;
        debug!(
            innings = self.state.innings,
            ?batting,
            runs,
            user_score = self.state.user_score,
            comp_score = self.state.comp_score,
            "runs scored"
        );

        if self.state.chase_complete() {
            let result = self.finalize_match();
            return BallOutcome::MatchEnded {
                result,
                ending: MatchEnding::TargetReached { side: batting, runs },
            };
        }

        BallOutcome::Scored { side: batting, runs }
    }

    fn switch_innings(&mut self, out_side: Side, score_at_out: u32) -> BallOutcome {
        if self.state.innings == 1 {
            let target = self.state.score(self.state.first_batting_side()) + 1;
            self.state.innings = 2;
            self.state.balls_bowled = 0;
            self.state.target = Some(target);
            info!(target, "first innings over");
            return BallOutcome::Out {
                side: out_side,
                score_at_out,
                target,
            };
        }

        let result = self.finalize_match();
        BallOutcome::MatchEnded {
            result,
            ending: MatchEnding::Dismissal {
                side: out_side,
                score_at_out,
            },
        }
    }

    /// Ends the match and records it. Only reachable once per match: the
    /// phase leaves InProgress here and no further ball is accepted.
    fn finalize_match(&mut self) -> MatchResult {
        self.state.phase = Phase::Result;
        self.state.game_over = true;

        let user_score = self.state.user_score;
        let comp_score = self.state.comp_score;
        let result = MatchOutcome::from_scores(user_score, comp_score);
        let is_new_best = user_score > self.store.best_score();

        if is_new_best {
            if let Err(err) = self.store.set_best_score(user_score) {
                warn!(error = %err, "failed to store best score");
            }
        }

        let entry = HistoryEntry::new(Utc::now(), user_score, comp_score, self.state.user_batting_first);
        if let Err(err) = self.store.append_history(entry) {
            warn!(error = %err, "failed to store match history");
        }

        info!(?result, user_score, comp_score, is_new_best, "match finished");
        MatchResult {
            result,
            user_score,
            comp_score,
            is_new_best,
        }
    }
}
