//! Motion module for platform shake detection
//!
//! Filters platform motion callbacks for the shake subtype and delivers
//! start/end signals to the shake state machine.

mod listener;
mod source;
mod subtype;

pub use listener::{ListenerError, MotionListener};
pub use source::MotionEventSource;
pub use subtype::{MotionEvent, MotionSubtype, ParseMotionError};
