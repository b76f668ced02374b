//! Motion event source
//!
//! Translates platform motion callbacks into shake signals. Listeners are
//! registered explicitly; there is no process-wide notification center.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::events::ShakeSignal;

use super::subtype::{MotionEvent, MotionSubtype};

/// Filters raw motion callbacks for the shake subtype and delivers
/// `ShakeSignal`s to every registered listener
#[derive(Debug, Clone, Default)]
pub struct MotionEventSource {
    listeners: Vec<mpsc::Sender<ShakeSignal>>,
}

impl MotionEventSource {
    /// Create a source with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener channel
    pub fn register(&mut self, listener: mpsc::Sender<ShakeSignal>) {
        self.listeners.push(listener);
    }

    /// Platform "motion began" callback
    ///
    /// Returns the number of listeners the signal reached.
    pub fn motion_began(&self, subtype: MotionSubtype) -> usize {
        if !subtype.is_shake() {
            debug!(?subtype, "ignoring non-shake motion began");
            return 0;
        }
        self.deliver(ShakeSignal::Started)
    }

    /// Platform "motion ended" callback
    ///
    /// Returns the number of listeners the signal reached.
    pub fn motion_ended(&self, subtype: MotionSubtype) -> usize {
        if !subtype.is_shake() {
            debug!(?subtype, "ignoring non-shake motion ended");
            return 0;
        }
        self.deliver(ShakeSignal::Ended)
    }

    /// Dispatch a parsed motion event to the matching callback
    pub fn dispatch(&self, event: MotionEvent) -> usize {
        match event {
            MotionEvent::Began(subtype) => self.motion_began(subtype),
            MotionEvent::Ended(subtype) => self.motion_ended(subtype),
        }
    }

    /// Check whether every listener has gone away
    pub fn is_closed(&self) -> bool {
        self.listeners.iter().all(|tx| tx.is_closed())
    }

    // Platform callbacks are synchronous, so delivery never waits.
    fn deliver(&self, signal: ShakeSignal) -> usize {
        let mut delivered = 0;

        for listener in &self.listeners {
            match listener.try_send(signal) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(?signal, "shake listener full, dropping signal");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(?signal, "shake listener closed");
                }
            }
        }

        debug!(?signal, delivered, "shake signal delivered");
        delivered
    }
}
