use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
};

use crate::cricket::app::{Feedback, InningsBreak, Tone};
use crate::cricket::outcome::MatchResult;
use crate::cricket::state::{MatchState, Phase, Side};
use crate::cricket::stats::format_run_rate;
use crate::store::HistoryEntry;

/// Chips shown on the lobby screen.
const LOBBY_CHIPS: usize = 3;

/// Everything a frame needs, borrowed from the app.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub state: &'a MatchState,
    pub best_score: u32,
    pub history: &'a [HistoryEntry],
    pub status: &'a str,
    pub feedback: Option<&'a Feedback>,
    pub innings_break: Option<&'a InningsBreak>,
    pub last_result: Option<&'a MatchResult>,
    pub last_ball_note: Option<&'a str>,
    pub pending_choice: Option<u8>,
    pub spinner_face: u8,
    pub sound_enabled: bool,
    pub help_visible: bool,
}

/// Hand sign for a run value; 0 is a closed fist.
pub fn hand_face(runs: u8) -> &'static str {
    match runs {
        1 => "☝",
        2 => "✌",
        3 => "🤟",
        4 => "🖖",
        5 => "✋",
        6 => "👍",
        _ => "✊",
    }
}

#[derive(Debug)]
pub struct MatchRenderer;

impl MatchRenderer {
    pub fn render(frame: &mut Frame, view: &View) {
        match view.state.phase {
            Phase::Lobby => Self::render_lobby(frame, view),
            Phase::RoleSelect => Self::render_role_select(frame, view),
            Phase::InProgress | Phase::Result => Self::render_match(frame, view),
        }

        if let Some(innings_break) = view.innings_break {
            Self::render_innings_break(frame, innings_break);
        } else if let (Phase::Result, Some(result)) = (view.state.phase, view.last_result) {
            Self::render_result(frame, result);
        }

        if view.help_visible {
            Self::render_help(frame);
        }
    }

    fn header() -> Paragraph<'static> {
        Paragraph::new("🏏 ═══ EMOJI HAND CRICKET ═══ 🏏")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
    }

    fn footer(keys: &str, sound_enabled: bool) -> Paragraph<'static> {
        let sound = if sound_enabled { "🔊 on" } else { "🔇 off" };
        Paragraph::new(format!("{keys}  [M] Sound {sound}  [?] Help  [Q] Quit"))
            .style(Style::default().fg(Color::DarkGray))
    }

    fn render_lobby(frame: &mut Frame, view: &View) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(6),    // Records
                Constraint::Length(3), // Status
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(Self::header(), chunks[0]);

        let chips = if view.history.is_empty() {
            "No matches yet".to_string()
        } else {
            view.history
                .iter()
                .take(LOBBY_CHIPS)
                .map(HistoryEntry::chip)
                .collect::<Vec<_>>()
                .join("   ")
        };
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("Best score: "),
                Span::styled(
                    view.best_score.to_string(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from("Recent matches:"),
            Line::from(chips),
        ];
        let records = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Records"))
            .alignment(Alignment::Center);
        frame.render_widget(records, chunks[1]);

        Self::render_status(frame, view.status, chunks[2]);
        frame.render_widget(
            Self::footer("[Enter] Start Match", view.sound_enabled),
            chunks[3],
        );
    }

    fn render_role_select(frame: &mut Frame, view: &View) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        frame.render_widget(Self::header(), chunks[0]);

        let items = vec![
            ListItem::new("🏏  [B] Bat First").style(Style::default().fg(Color::Green)),
            ListItem::new("🎯  [W] Bowl First").style(Style::default().fg(Color::Magenta)),
        ];
        let roles = List::new(items).block(Block::default().borders(Borders::ALL).title("Choose your role"));
        frame.render_widget(roles, chunks[1]);

        Self::render_status(frame, view.status, chunks[2]);
        frame.render_widget(
            Self::footer("[B] Bat  [W] Bowl  [Esc] Back", view.sound_enabled),
            chunks[3],
        );
    }

    fn render_match(frame: &mut Frame, view: &View) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(4), // Scoreboard
                Constraint::Length(1), // Innings stepper
                Constraint::Min(5),    // Hands
                Constraint::Length(4), // Last ball + status
                Constraint::Length(3), // Feedback
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(Self::header(), chunks[0]);
        frame.render_widget(Self::scoreboard(view), chunks[1]);
        frame.render_widget(Self::stepper(view.state), chunks[2]);
        Self::render_hands(frame, view, chunks[3]);

        let last_ball = view
            .last_ball_note
            .map(str::to_string)
            .unwrap_or_else(|| Self::last_ball_line(view.state));
        let commentary = Paragraph::new(vec![Line::from(last_ball), Line::from(view.status)])
            .block(Block::default().borders(Borders::ALL).title("Last ball"))
            .style(Style::default().fg(Color::Yellow))
            .wrap(Wrap { trim: true });
        frame.render_widget(commentary, chunks[4]);

        let (text, color) = match view.feedback {
            Some(feedback) => (feedback.text.as_str(), tone_color(feedback.tone)),
            None => ("", Color::White),
        };
        let banner = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(banner, chunks[5]);

        let keys = match view.state.phase {
            Phase::Result => "[Enter] Play again  [H] Home",
            _ => "[1-6] Play  [Esc/H] Abandon",
        };
        frame.render_widget(Self::footer(keys, view.sound_enabled), chunks[6]);
    }

    fn scoreboard<'a>(view: &View) -> Table<'a> {
        let state = view.state;
        let target = state
            .target
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".into());
        let header = Row::new(["You", "Computer", "Target", "Balls", "Run rate", "Best"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let values = Row::new(vec![
            Cell::from(state.user_score.to_string()),
            Cell::from(state.comp_score.to_string()),
            Cell::from(target),
            Cell::from(state.balls_bowled.to_string()),
            Cell::from(format_run_rate(state.run_rate())),
            Cell::from(view.best_score.to_string()),
        ]);

        Table::new(vec![values], [Constraint::Ratio(1, 6); 6])
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Scoreboard"))
            .style(Style::default().fg(Color::White))
    }

    fn stepper(state: &MatchState) -> Paragraph<'static> {
        let step = |label: &'static str, active: bool| {
            let (dot, style) = if active {
                ("●", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                ("○", Style::default().fg(Color::DarkGray))
            };
            Span::styled(format!("{dot} {label}"), style)
        };

        let mut spans = vec![
            step("1st Innings", state.innings == 1),
            Span::raw("   "),
            step("2nd Innings", state.innings == 2),
        ];
        if let Some(needed) = state.runs_needed() {
            let chase = if needed == 0 {
                "Target reached!".to_string()
            } else {
                format!("Need {needed} runs to win")
            };
            spans.push(Span::raw("   "));
            spans.push(Span::styled(chase, Style::default().fg(Color::Yellow)));
        }
        Paragraph::new(Line::from(spans))
    }

    fn render_hands(frame: &mut Frame, view: &View, area: Rect) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let state = view.state;
        let (user_face, comp_face) = match view.pending_choice {
            Some(choice) => (choice, view.spinner_face),
            None => (
                state.last_user_choice.unwrap_or(0),
                state.last_comp_choice.unwrap_or(0),
            ),
        };

        let batting = state.batting_side();
        let role = |side: Side| if side == batting { "batting" } else { "bowling" };

        for (slot, side, face) in [(halves[0], Side::User, user_face), (halves[1], Side::Computer, comp_face)] {
            let hand = Paragraph::new(vec![
                Line::from(""),
                Line::from(hand_face(face)),
                Line::from(if face == 0 { "-".to_string() } else { face.to_string() }),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{} ({})", side.label(), role(side))),
            )
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD));
            frame.render_widget(hand, slot);
        }
    }

    fn last_ball_line(state: &MatchState) -> String {
        match (state.last_user_choice, state.last_comp_choice) {
            (Some(user), Some(comp)) => format!("You {user} vs Computer {comp}"),
            _ => "Waiting for the first ball.".into(),
        }
    }

    fn render_status(frame: &mut Frame, status: &str, area: Rect) {
        let status = Paragraph::new(status.to_string())
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(status, area);
    }

    fn render_innings_break(frame: &mut Frame, innings_break: &InningsBreak) {
        let area = centered_rect(frame.area(), 44, 8);
        let lines = vec![
            Line::from(Span::styled(
                innings_break.headline.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!(
                "You {}  -  Computer {}",
                innings_break.user_score, innings_break.comp_score
            )),
            Line::from(format!("Target: {}", innings_break.target)),
        ];
        let popup = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Innings Break"))
            .alignment(Alignment::Center);
        frame.render_widget(Clear, area);
        frame.render_widget(popup, area);
    }

    fn render_result(frame: &mut Frame, result: &MatchResult) {
        let area = centered_rect(frame.area(), 44, 9);
        let mut lines = vec![
            Line::from(format!("{}  {}", result.result.emoji(), result.result.message())),
            Line::from(""),
            Line::from(format!(
                "You {}  -  Computer {}",
                result.user_score, result.comp_score
            )),
        ];
        if result.is_new_best {
            lines.push(Line::from(Span::styled(
                "New best score!",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("[Enter] Play again   [H] Home"));

        let popup = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Match Over"))
            .alignment(Alignment::Center);
        frame.render_widget(Clear, area);
        frame.render_widget(popup, area);
    }

    fn render_help(frame: &mut Frame) {
        let area = centered_rect(frame.area(), 56, 13);
        let lines = vec![
            Line::from("Both sides show 1-6 fingers each ball."),
            Line::from("Different numbers: the batter scores their own number."),
            Line::from("Same number: the batter is out."),
            Line::from("The second innings chases first score + 1."),
            Line::from(""),
            Line::from("[1-6]  play a ball"),
            Line::from("[B]/[W]  bat or bowl first"),
            Line::from("[Enter]  start / play again"),
            Line::from("[M]  sound   [Esc]  back   [Q]  quit"),
        ];
        let popup = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("How to play"))
            .wrap(Wrap { trim: true });
        frame.render_widget(Clear, area);
        frame.render_widget(popup, area);
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::White,
        Tone::Good => Color::Green,
        Tone::Bad => Color::Red,
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
