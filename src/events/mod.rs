//! Events module for shake state transitions
//!
//! Provides the signals flowing into the state machine and the structured
//! events it emits to observers (renderer, haptics).

use serde::{Deserialize, Serialize};

/// Discrete signals delivered by the motion event source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShakeSignal {
    /// The platform reported the start of a shake motion
    Started,
    /// The platform reported the end of a shake motion
    Ended,
}

/// Haptic cue style requested from the feedback generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStyle {
    /// Error-style notification cue
    Error,
}

/// Events emitted by the state machine during transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShakeEvent {
    /// Entered the shaking state (Idle -> Shaking)
    ShakeStarted,

    /// Physical shake ended, hold timer armed
    ShakeEnded {
        /// Hold duration before returning to idle
        hold_ms: u64,
    },

    /// Hold expired and the state returned to idle
    ShakeFinished {
        /// Duration in milliseconds that the shaking state was active
        duration_ms: u64,
    },

    /// One-shot haptic cue, fired on Idle -> Shaking only
    HapticFeedback { style: FeedbackStyle },
}

impl std::fmt::Display for ShakeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShakeEvent::ShakeStarted => write!(f, "SHAKE_STARTED"),
            ShakeEvent::ShakeEnded { hold_ms } => write!(f, "SHAKE_ENDED (hold {}ms)", hold_ms),
            ShakeEvent::ShakeFinished { duration_ms } => {
                write!(f, "SHAKE_FINISHED ({}ms)", duration_ms)
            }
            ShakeEvent::HapticFeedback { style } => write!(f, "HAPTIC_FEEDBACK ({:?})", style),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = ShakeEvent::ShakeFinished { duration_ms: 4200 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("shake_finished"));
        assert!(json.contains("4200"));
    }

    #[test]
    fn test_haptic_serialization() {
        let event = ShakeEvent::HapticFeedback {
            style: FeedbackStyle::Error,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"haptic_feedback","style":"error"}"#);
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"shake_started"}"#;
        let event: ShakeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ShakeEvent::ShakeStarted);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ShakeEvent::ShakeEnded { hold_ms: 3000 }.to_string(),
            "SHAKE_ENDED (hold 3000ms)"
        );
    }
}
