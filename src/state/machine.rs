//! Core state machine implementation
//!
//! Handles transitions between Idle and Shaking based on shake signals,
//! holding the Shaking state for a fixed delay after the shake ends.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::events::{FeedbackStyle, ShakeEvent, ShakeSignal};

use super::timer::{HoldExpired, HoldTimer, TimerHandle};

/// The two observable shake states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShakeState {
    /// No shake in progress
    #[default]
    Idle,
    /// Shake in progress, or within the hold window after it ended
    Shaking,
}

impl std::fmt::Display for ShakeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShakeState::Idle => write!(f, "Idle"),
            ShakeState::Shaking => write!(f, "Shaking"),
        }
    }
}

/// The state machine that owns `ShakeState`
///
/// All mutations happen on the task that drives `run`. Hold expiries are
/// delivered back to that task over an internal channel and are checked
/// against the current generation before they may reset the state.
pub struct StateMachine {
    /// Current state
    state: ShakeState,
    /// How long Shaking is held after the last `Ended`
    hold: Duration,
    /// Bumped on every signal that supersedes a pending expiry
    generation: u64,
    /// Outstanding hold timer, if any
    pending: Option<TimerHandle>,
    /// Time when Shaking was entered
    shaking_since: Option<Instant>,
    timer: HoldTimer,
    expiry_rx: mpsc::Receiver<HoldExpired>,
    /// Observable state for renderers
    state_tx: watch::Sender<ShakeState>,
    /// Channel for emitting shake events
    event_tx: broadcast::Sender<ShakeEvent>,
}

impl StateMachine {
    /// Create a new state machine in Idle
    pub fn new(hold: Duration, event_tx: broadcast::Sender<ShakeEvent>) -> Self {
        let (expiry_tx, expiry_rx) = mpsc::channel(8);
        let (state_tx, _) = watch::channel(ShakeState::Idle);

        Self {
            state: ShakeState::Idle,
            hold,
            generation: 0,
            pending: None,
            shaking_since: None,
            timer: HoldTimer::new(expiry_tx),
            expiry_rx,
            state_tx,
            event_tx,
        }
    }

    /// Get the current state
    pub fn state(&self) -> ShakeState {
        self.state
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<ShakeState> {
        self.state_tx.subscribe()
    }

    /// Run the state machine, processing shake signals and hold expiries
    ///
    /// Returns once every signal sender is gone and any pending hold has
    /// played out.
    pub async fn run(&mut self, mut signal_rx: mpsc::Receiver<ShakeSignal>) {
        info!(hold_ms = as_millis(self.hold), "state machine started in Idle state");

        loop {
            tokio::select! {
                biased;

                signal = signal_rx.recv() => match signal {
                    Some(signal) => self.handle_signal(signal),
                    None => break,
                },

                Some(expired) = self.expiry_rx.recv() => {
                    self.handle_expiry(expired);
                }
            }
        }

        while self.pending.is_some() {
            match self.expiry_rx.recv().await {
                Some(expired) => self.handle_expiry(expired),
                None => break,
            }
        }

        info!(state = %self.state, "state machine stopped");
    }

    /// Handle a shake signal
    fn handle_signal(&mut self, signal: ShakeSignal) {
        match signal {
            ShakeSignal::Started => self.handle_started(),
            ShakeSignal::Ended => self.handle_ended(),
        }
    }

    fn handle_started(&mut self) {
        self.generation += 1;
        self.cancel_pending();

        match self.state {
            ShakeState::Idle => self.transition_to(ShakeState::Shaking),
            ShakeState::Shaking => {
                debug!(generation = self.generation, "shake re-affirmed");
            }
        }
    }

    fn handle_ended(&mut self) {
        if self.state == ShakeState::Idle {
            debug!("shake ended while idle, ignoring");
            return;
        }

        self.generation += 1;
        // Replacing the handle drops, and so cancels, any earlier timer
        self.pending = Some(self.timer.schedule(self.hold, self.generation));

        let hold_ms = as_millis(self.hold);
        debug!(generation = self.generation, hold_ms, "hold timer armed");
        self.emit(ShakeEvent::ShakeEnded { hold_ms });
    }

    /// Handle a hold expiry
    fn handle_expiry(&mut self, expired: HoldExpired) {
        if expired.generation != self.generation || self.state != ShakeState::Shaking {
            debug!(
                expired = expired.generation,
                current = self.generation,
                "ignoring stale hold timer"
            );
            return;
        }

        self.pending = None;
        self.transition_to(ShakeState::Idle);
    }

    fn cancel_pending(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            pending.cancel();
        }
    }

    /// Perform a state transition
    fn transition_to(&mut self, new_state: ShakeState) {
        let old_state = self.state;
        let duration_ms = self
            .shaking_since
            .map(|t| as_millis(t.elapsed()))
            .unwrap_or(0);

        info!(
            from = %old_state,
            to = %new_state,
            duration_ms = duration_ms,
            "state transition"
        );

        self.state = new_state;
        self.state_tx.send_replace(new_state);

        match new_state {
            ShakeState::Shaking => {
                self.shaking_since = Some(Instant::now());
                self.emit(ShakeEvent::ShakeStarted);
                self.emit(ShakeEvent::HapticFeedback {
                    style: FeedbackStyle::Error,
                });
            }
            ShakeState::Idle => {
                self.shaking_since = None;
                self.emit(ShakeEvent::ShakeFinished { duration_ms });
            }
        }
    }

    fn emit(&self, event: ShakeEvent) {
        debug!(?event, "emitting event");
        let _ = self.event_tx.send(event);
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
