//! Core game interface driven by the terminal runner.
use crossterm::event::KeyEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// What the runner should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main game trait. The runner owns the loop; the game owns its state.
pub trait Game {
    /// Events the game posts back to itself through the [`Context`]
    type Event: Send + 'static;

    fn handle_key(&mut self, key: KeyEvent, ctx: &Context<Self::Event>) -> Flow;

    fn handle_event(&mut self, event: Self::Event, ctx: &Context<Self::Event>);

    /// Heartbeat interval, `None` while the game has nothing to animate
    fn tick_rate(&self) -> Option<Duration> {
        None
    }

    fn on_tick(&mut self, _ctx: &Context<Self::Event>) {}

    fn render(&self, frame: &mut ratatui::Frame);
}

/// Handle games use to schedule work for later. Scheduled events come back
/// through [`Game::handle_event`] on the runner's task, so a game never sees
/// two callbacks at once.
pub struct Context<E> {
    tx: UnboundedSender<E>,
}

impl<E: Send + 'static> Context<E> {
    pub fn new(tx: UnboundedSender<E>) -> Self {
        Self { tx }
    }

    /// Delivers `event` after `delay`. Nothing cancels it; games tag events
    /// with whatever they need to recognise stale ones.
    pub fn schedule_after(&self, delay: Duration, event: E) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The runner is gone if this fails.
            let _ = tx.send(event);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_events_arrive_in_delay_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ctx = Context::new(tx);

        ctx.schedule_after(Duration::from_millis(300), "late");
        ctx.schedule_after(Duration::from_millis(100), "early");
        ctx.schedule_after(Duration::ZERO, "now");

        assert_eq!(rx.recv().await, Some("now"));
        assert_eq!(rx.recv().await, Some("early"));
        assert_eq!(rx.recv().await, Some("late"));
    }
}
