use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::style::Print;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Timing;
use crate::core::game::{Context, Flow, Game};
use crate::cricket::engine::{MatchEngine, PendingBall};
use crate::cricket::outcome::{BallOutcome, MatchEnding, MatchOutcome, MatchResult};
use crate::cricket::random::RandomSource;
use crate::cricket::renderer::{MatchRenderer, View};
use crate::cricket::state::{Phase, Side};
use crate::store::{HistoryEntry, Persistence};

/// Frame rate of the cycling computer hand while a ball is in flight.
const SPIN_RATE: Duration = Duration::from_millis(60);

/// Timers the app schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Reveal { token: u64 },
    InningsBreakOver { token: u64 },
    FeedbackExpired { seq: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub tone: Tone,
    seq: u64,
}

/// Overlay shown between the innings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InningsBreak {
    pub headline: String,
    pub user_score: u32,
    pub comp_score: u32,
    pub target: u32,
}

/// Terminal front end for the match engine.
pub struct CricketApp<R, P> {
    engine: MatchEngine<R, P>,
    timing: Timing,
    pending: Option<PendingBall>,
    innings_break: Option<InningsBreak>,
    feedback: Option<Feedback>,
    feedback_seq: u64,
    status: String,
    last_ball_note: Option<String>,
    last_result: Option<MatchResult>,
    history: Vec<HistoryEntry>,
    best_score: u32,
    sound_enabled: bool,
    help_visible: bool,
    spinner: u8,
}

impl<R: RandomSource, P: Persistence> CricketApp<R, P> {
    pub fn new(engine: MatchEngine<R, P>, timing: Timing) -> Self {
        let history = engine.history();
        let best_score = engine.best_score();
        let sound_enabled = engine.store().sound_enabled();
        Self {
            engine,
            timing,
            pending: None,
            innings_break: None,
            feedback: None,
            feedback_seq: 0,
            status: "Choose your role to begin.".into(),
            last_ball_note: None,
            last_result: None,
            history,
            best_score,
            sound_enabled,
            help_visible: false,
            spinner: 1,
        }
    }

    pub fn engine(&self) -> &MatchEngine<R, P> {
        &self.engine
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn innings_break(&self) -> Option<&InningsBreak> {
        self.innings_break.as_ref()
    }

    pub fn last_result(&self) -> Option<&MatchResult> {
        self.last_result.as_ref()
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn view(&self) -> View<'_> {
        View {
            state: self.engine.state(),
            best_score: self.best_score,
            history: &self.history,
            status: &self.status,
            feedback: self.feedback.as_ref(),
            innings_break: self.innings_break.as_ref(),
            last_result: self.last_result.as_ref(),
            last_ball_note: self.last_ball_note.as_deref(),
            pending_choice: self.pending.as_ref().map(PendingBall::user_choice),
            spinner_face: self.spinner,
            sound_enabled: self.sound_enabled,
            help_visible: self.help_visible,
        }
    }

    fn clear_round(&mut self) {
        self.pending = None;
        self.innings_break = None;
        self.last_ball_note = None;
        self.last_result = None;
        self.feedback = None;
    }

    fn refresh_records(&mut self) {
        self.history = self.engine.history();
        self.best_score = self.engine.best_score();
    }

    fn open_role_select(&mut self) {
        self.engine.open_role_select();
        self.clear_round();
        self.status = "Select Bat First or Bowl First to begin.".into();
    }

    fn go_home(&mut self) {
        self.engine.return_to_lobby();
        self.clear_round();
        self.refresh_records();
        self.status = "Choose your role to begin.".into();
    }

    fn start_match(&mut self, user_bats_first: bool) {
        self.engine.select_role(user_bats_first);
        self.clear_round();
        self.status = if user_bats_first {
            "You bat first. Build pressure with big shots!".into()
        } else {
            "You bowl first. Hunt for an early wicket!".into()
        };
        self.show_steady("Pick a run to play the ball.", Tone::Neutral);
    }

    fn play_ball(&mut self, choice: u8, ctx: &Context<AppEvent>) {
        if self.innings_break.is_some() {
            debug!(choice, "ball ignored during innings break");
            return;
        }
        match self.engine.begin_ball(choice) {
            Ok(ball) => {
                let token = ball.token();
                self.pending = Some(ball);
                self.last_ball_note = None;
                self.flash("...bowler is running in", Tone::Neutral, ctx);
                ctx.schedule_after(self.timing.reveal, AppEvent::Reveal { token });
            }
            Err(err) if err.is_debounce() => debug!(error = %err, "ball input ignored"),
            Err(err) => self.flash(err.to_string(), Tone::Bad, ctx),
        }
    }

    fn reveal(&mut self, token: u64, ctx: &Context<AppEvent>) {
        if self.pending.as_ref().map(PendingBall::token) != Some(token) {
            debug!(token, "stale reveal dropped");
            return;
        }
        let Some(ball) = self.pending.take() else {
            return;
        };
        match self.engine.complete_ball(ball) {
            Ok(outcome) => self.show_outcome(outcome, ctx),
            Err(err) => debug!(error = %err, "reveal discarded"),
        }
    }

    fn show_outcome(&mut self, outcome: BallOutcome, ctx: &Context<AppEvent>) {
        match outcome {
            BallOutcome::Scored { side: Side::User, runs } => {
                self.flash(format!("+{runs} runs!"), Tone::Good, ctx);
            }
            BallOutcome::Scored { side: Side::Computer, runs } => {
                self.flash(format!("Computer +{runs}"), Tone::Bad, ctx);
            }
            BallOutcome::Out { side, score_at_out, target } => {
                self.ring_bell();
                let state = self.engine.state();
                self.innings_break = Some(InningsBreak {
                    headline: wicket_message(side, score_at_out),
                    user_score: state.user_score,
                    comp_score: state.comp_score,
                    target,
                });
                self.flash("WICKET! 💥", Tone::Bad, ctx);
                ctx.schedule_after(
                    self.timing.innings_break,
                    AppEvent::InningsBreakOver { token: self.engine.turn() },
                );
            }
            BallOutcome::MatchEnded { result, ending } => {
                if let MatchEnding::Dismissal { side, score_at_out } = ending {
                    self.ring_bell();
                    self.last_ball_note = Some(wicket_message(side, score_at_out));
                }
                self.finish(result);
            }
        }
    }

    fn begin_second_innings(&mut self, token: u64, ctx: &Context<AppEvent>) {
        if token != self.engine.turn() {
            debug!(token, "stale innings break dropped");
            return;
        }
        let Some(innings_break) = self.innings_break.take() else {
            return;
        };
        let target = innings_break.target;
        self.status = if self.engine.state().user_batting_first {
            format!("Computer needs {target}. Defend every run!")
        } else {
            format!("You need {target}. Chase calmly.")
        };
        self.last_ball_note = Some(innings_break.headline);
        self.flash(format!("2nd innings starts. Target: {target}"), Tone::Neutral, ctx);
    }

    fn finish(&mut self, result: MatchResult) {
        let (text, tone) = match result.result {
            MatchOutcome::Win => ("Victory! 🏆", Tone::Good),
            MatchOutcome::Loss => ("Defeat! Regroup for the next game.", Tone::Bad),
            MatchOutcome::Tie => ("Dead even!", Tone::Neutral),
        };
        self.show_steady(text, tone);
        self.status = "Press Enter to play again.".into();
        self.last_result = Some(result);
        self.refresh_records();
    }

    fn flash(&mut self, text: impl Into<String>, tone: Tone, ctx: &Context<AppEvent>) {
        self.show_steady(text, tone);
        ctx.schedule_after(
            self.timing.feedback,
            AppEvent::FeedbackExpired { seq: self.feedback_seq },
        );
    }

    fn show_steady(&mut self, text: impl Into<String>, tone: Tone) {
        self.feedback_seq += 1;
        self.feedback = Some(Feedback {
            text: text.into(),
            tone,
            seq: self.feedback_seq,
        });
    }

    fn expire_feedback(&mut self, seq: u64) {
        if self.engine.state().game_over {
            return;
        }
        if self.feedback.as_ref().is_some_and(|f| f.seq == seq) {
            self.feedback = None;
        }
    }

    fn toggle_sound(&mut self) {
        let enabled = !self.sound_enabled;
        if let Err(err) = self.engine.store_mut().set_sound_enabled(enabled) {
            warn!(error = %err, "failed to store sound preference");
        }
        self.sound_enabled = enabled;
    }

    fn ring_bell(&self) {
        if !self.sound_enabled {
            return;
        }
        if let Err(err) = chime(&mut std::io::stdout()) {
            debug!(error = %err, "terminal bell failed");
        }
    }

    fn handle_phase_key(&mut self, code: KeyCode, ctx: &Context<AppEvent>) -> Flow {
        match (self.engine.state().phase, code) {
            (Phase::Lobby, KeyCode::Enter | KeyCode::Char('s')) => self.open_role_select(),
            (Phase::Lobby, KeyCode::Esc) => return Flow::Quit,
            (Phase::RoleSelect, KeyCode::Char('b')) => self.start_match(true),
            (Phase::RoleSelect, KeyCode::Char('w')) => self.start_match(false),
            (Phase::RoleSelect, KeyCode::Esc | KeyCode::Char('h')) => self.go_home(),
            (Phase::InProgress, KeyCode::Char(c)) if c.is_ascii_digit() => {
                let choice = c.to_digit(10).unwrap_or(0) as u8;
                self.play_ball(choice, ctx);
            }
            (Phase::InProgress, KeyCode::Esc | KeyCode::Char('h')) => self.go_home(),
            (Phase::Result, KeyCode::Enter | KeyCode::Char('r')) => self.open_role_select(),
            (Phase::Result, KeyCode::Esc | KeyCode::Char('h')) => self.go_home(),
            _ => {}
        }
        Flow::Continue
    }
}

impl<R: RandomSource, P: Persistence> Game for CricketApp<R, P> {
    type Event = AppEvent;

    fn handle_key(&mut self, key: KeyEvent, ctx: &Context<AppEvent>) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if self.help_visible {
            match key.code {
                KeyCode::Char('q' | 'Q') => return Flow::Quit,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => self.help_visible = false,
                _ => {}
            }
            return Flow::Continue;
        }

        let code = match key.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        match code {
            KeyCode::Char('q') => Flow::Quit,
            KeyCode::Char('?') => {
                self.help_visible = true;
                Flow::Continue
            }
            KeyCode::Char('m') => {
                self.toggle_sound();
                Flow::Continue
            }
            code => self.handle_phase_key(code, ctx),
        }
    }

    fn handle_event(&mut self, event: AppEvent, ctx: &Context<AppEvent>) {
        match event {
            AppEvent::Reveal { token } => self.reveal(token, ctx),
            AppEvent::InningsBreakOver { token } => self.begin_second_innings(token, ctx),
            AppEvent::FeedbackExpired { seq } => self.expire_feedback(seq),
        }
    }

    fn tick_rate(&self) -> Option<Duration> {
        self.pending.as_ref().map(|_| SPIN_RATE)
    }

    fn on_tick(&mut self, _ctx: &Context<AppEvent>) {
        self.spinner = self.spinner % 6 + 1;
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        MatchRenderer::render(frame, &self.view());
    }
}

/// Sends BEL through crossterm so it is flushed alongside terminal output.
fn chime<W: Write>(out: &mut W) -> std::io::Result<()> {
    execute!(out, Print('\x07'))
}

fn wicket_message(side: Side, score_at_out: u32) -> String {
    match side {
        Side::User => format!("WICKET! You are out on {score_at_out}."),
        Side::Computer => format!("WICKET! Computer is out on {score_at_out}."),
    }
}
