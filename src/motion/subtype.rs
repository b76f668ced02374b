//! Motion subtype definitions and console input parsing
//!
//! Mirrors the platform's motion event subtypes. Only `Shake` is acted on;
//! everything else is filtered out by the event source.

use std::str::FromStr;

/// Subtype tag carried by a platform motion callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionSubtype {
    /// No specific subtype
    #[default]
    None,
    /// Device shake gesture
    Shake,
    /// Remote control event (headset buttons etc)
    RemoteControl,
}

impl MotionSubtype {
    /// Check if this subtype is the shake gesture
    pub fn is_shake(&self) -> bool {
        matches!(self, MotionSubtype::Shake)
    }
}

impl FromStr for MotionSubtype {
    type Err = ParseMotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(MotionSubtype::None),
            "shake" => Ok(MotionSubtype::Shake),
            "remote-control" | "remote_control" | "remote" => Ok(MotionSubtype::RemoteControl),
            other => Err(ParseMotionError::UnknownSubtype(other.to_string())),
        }
    }
}

/// A raw motion callback as delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    /// Motion began
    Began(MotionSubtype),
    /// Motion ended
    Ended(MotionSubtype),
}

impl MotionEvent {
    /// Parse one console line into motion events
    ///
    /// Accepts `began <subtype>`, `ended <subtype>`, or a bare `<subtype>`
    /// which expands to a begin/end pair.
    pub fn parse_line(line: &str) -> Result<Vec<MotionEvent>, ParseMotionError> {
        let mut words = line.split_whitespace();
        let first = words.next().ok_or(ParseMotionError::Empty)?;
        let second = words.next();

        if let Some(extra) = words.next() {
            return Err(ParseMotionError::TrailingInput(extra.to_string()));
        }

        match (first.to_ascii_lowercase().as_str(), second) {
            ("began" | "begin", Some(subtype)) => Ok(vec![MotionEvent::Began(subtype.parse()?)]),
            ("ended" | "end", Some(subtype)) => Ok(vec![MotionEvent::Ended(subtype.parse()?)]),
            ("began" | "begin" | "ended" | "end", None) => {
                Err(ParseMotionError::MissingSubtype(first.to_string()))
            }
            (_, Some(_)) => Err(ParseMotionError::UnknownPhase(first.to_string())),
            (_, None) => {
                let subtype: MotionSubtype = first.parse()?;
                Ok(vec![MotionEvent::Began(subtype), MotionEvent::Ended(subtype)])
            }
        }
    }
}

/// Errors from parsing console motion input
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseMotionError {
    #[error("empty motion line")]
    Empty,

    #[error("unknown motion phase '{0}' (expected began or ended)")]
    UnknownPhase(String),

    #[error("unknown motion subtype '{0}'")]
    UnknownSubtype(String),

    #[error("motion phase '{0}' requires a subtype")]
    MissingSubtype(String),

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_subtype() {
        let subtype = MotionSubtype::default();
        assert_eq!(subtype, MotionSubtype::None);
        assert!(!subtype.is_shake());
    }

    #[test]
    fn test_subtype_parse() {
        assert_eq!("Shake".parse::<MotionSubtype>(), Ok(MotionSubtype::Shake));
        assert_eq!("remote-control".parse::<MotionSubtype>(), Ok(MotionSubtype::RemoteControl));
        assert_eq!(
            "tilt".parse::<MotionSubtype>(),
            Err(ParseMotionError::UnknownSubtype("tilt".to_string()))
        );
    }

    #[test]
    fn test_parse_began_and_ended() {
        assert_eq!(
            MotionEvent::parse_line("began shake"),
            Ok(vec![MotionEvent::Began(MotionSubtype::Shake)])
        );
        assert_eq!(
            MotionEvent::parse_line("  ended   remote  "),
            Ok(vec![MotionEvent::Ended(MotionSubtype::RemoteControl)])
        );
    }

    #[test]
    fn test_parse_shorthand_pair() {
        assert_eq!(
            MotionEvent::parse_line("shake"),
            Ok(vec![
                MotionEvent::Began(MotionSubtype::Shake),
                MotionEvent::Ended(MotionSubtype::Shake),
            ])
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(MotionEvent::parse_line("   "), Err(ParseMotionError::Empty));
        assert_eq!(
            MotionEvent::parse_line("wiggle shake"),
            Err(ParseMotionError::UnknownPhase("wiggle".to_string()))
        );
        assert_eq!(
            MotionEvent::parse_line("began"),
            Err(ParseMotionError::MissingSubtype("began".to_string()))
        );
        assert_eq!(
            MotionEvent::parse_line("began shake now"),
            Err(ParseMotionError::TrailingInput("now".to_string()))
        );
    }
}
