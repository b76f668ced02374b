//! State machine module for shake tracking
//!
//! Provides an explicit state machine with two states:
//! - Idle: Default state, no shake in progress
//! - Shaking: Entered immediately on shake start, held for a fixed delay
//!   after the shake ends

mod machine;
mod timer;

pub use machine::{ShakeState, StateMachine};
pub use timer::{HoldExpired, HoldTimer, TimerHandle};
