//! shake-daemon: shake gesture detection with a debounced state machine
//!
//! Components:
//! - Motion event source filtering platform motion callbacks for shakes
//! - Explicit state machine holding the Shaking state after a shake ends
//! - Console renderer observing state changes and haptic cues

pub mod config;
pub mod events;
pub mod lifecycle;
pub mod motion;
pub mod render;
pub mod state;
