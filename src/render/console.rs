//! Console renderer
//!
//! Observes the state machine and redraws on every change. Carries no shake
//! logic of its own.

use std::io::Write;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::OutputFormat;
use crate::events::ShakeEvent;
use crate::state::ShakeState;

use super::view::ShakeView;

/// Renders shake state and events as text or JSON lines
pub struct ConsoleRenderer<W> {
    out: W,
    format: OutputFormat,
    frame_interval: Duration,
    view: ShakeView,
    tick: usize,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, format: OutputFormat, frame_interval: Duration) -> Self {
        Self {
            out,
            format,
            frame_interval,
            view: ShakeView::default(),
            tick: 0,
        }
    }

    /// Current view
    pub fn view(&self) -> &ShakeView {
        &self.view
    }

    /// Recover the output sink
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run until the state machine goes away and its event queue is drained
    pub async fn run(
        &mut self,
        mut state_rx: watch::Receiver<ShakeState>,
        mut event_rx: broadcast::Receiver<ShakeEvent>,
    ) -> std::io::Result<()> {
        let initial = *state_rx.borrow_and_update();
        self.redraw(initial)?;

        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Events queued before the machine went away are still drawn
        let mut state_closed = false;

        loop {
            tokio::select! {
                biased;

                changed = state_rx.changed(), if !state_closed => {
                    if changed.is_err() {
                        debug!("state channel closed, draining events");
                        state_closed = true;
                        continue;
                    }
                    let state = *state_rx.borrow_and_update();
                    self.redraw(state)?;
                    ticker.reset();
                }

                event = event_rx.recv() => match event {
                    Ok(event) => self.on_event(&event)?,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "renderer event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },

                _ = ticker.tick(), if self.view.is_animating() => {
                    self.advance_frame()?;
                }
            }
        }

        info!("renderer stopped");
        Ok(())
    }

    /// Redraw for a new state
    pub fn redraw(&mut self, state: ShakeState) -> std::io::Result<()> {
        let view = ShakeView::from_state(state);
        if view.is_animating() && !self.view.is_animating() {
            self.tick = 0;
        }
        self.view = view;

        debug!(%state, "redraw");
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{}", self.view.headline)?;
            }
            OutputFormat::Json => {
                let line = serde_json::to_string(&self.view)?;
                writeln!(self.out, "{}", line)?;
            }
        }
        self.out.flush()
    }

    /// React to a state machine event
    pub fn on_event(&mut self, event: &ShakeEvent) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => match event {
                ShakeEvent::HapticFeedback { style } => {
                    writeln!(self.out, "* haptic: {:?} *", style)?;
                }
                other => {
                    debug!(%other, "event");
                    return Ok(());
                }
            },
            OutputFormat::Json => {
                let line = serde_json::to_string(event)?;
                writeln!(self.out, "{}", line)?;
            }
        }
        self.out.flush()
    }

    /// Draw the next animation frame; no-op when the animation is hidden
    pub fn advance_frame(&mut self) -> std::io::Result<()> {
        let Some(animation) = self.view.animation else {
            return Ok(());
        };

        if self.format == OutputFormat::Text {
            writeln!(self.out, "{} {}", ShakeView::frame(self.tick), animation)?;
            self.out.flush()?;
        }
        self.tick += 1;
        Ok(())
    }
}
