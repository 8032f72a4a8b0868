use crate::core::game::{Context, Flow, Game};
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tokio::sync::mpsc;

/// Wake-up interval for games without a tick, so resizes still redraw promptly.
const IDLE_WAKE: Duration = Duration::from_millis(250);

pub struct Runner<G: Game> {
    game: G,
}

impl<G: Game> Runner<G> {
    pub fn new(game: G) -> Self {
        Self { game }
    }

    /// Runs until the game asks to quit or input closes, then hands the game
    /// back. Terminal setup and restore stay with the caller.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<G> {
        let (tx, mut rx) = mpsc::unbounded_channel::<G::Event>();
        let ctx = Context::new(tx);
        let mut input = EventStream::new();

        loop {
            terminal.draw(|f| self.game.render(f))?;

            let tick_rate = self.game.tick_rate();
            let tick = tokio::time::sleep(tick_rate.unwrap_or(IDLE_WAKE));

            tokio::select! {
                // 1. INPUT
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if self.game.handle_key(key, &ctx) == Flow::Quit {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },

                // 2. SCHEDULED: timers the game set through the context
                Some(event) = rx.recv() => {
                    self.game.handle_event(event, &ctx);
                }

                // 3. TICK: animation heartbeat
                _ = tick => {
                    if tick_rate.is_some() {
                        self.game.on_tick(&ctx);
                    }
                }
            }
        }

        Ok(self.game)
    }
}
