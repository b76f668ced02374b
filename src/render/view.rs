//! View model derived from shake state

use serde::Serialize;

use crate::state::ShakeState;

/// Name of the looping animation shown while shaking
pub const SHAKE_ANIMATION: &str = "vibrate";

const FRAMES: [&str; 4] = ["((  |  ))", "(( |   ))", "((  |  ))", "((   | ))"];

/// What the screen shows for a given state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShakeView {
    pub state: ShakeState,
    pub headline: &'static str,
    /// Looping animation, present only while shaking
    pub animation: Option<&'static str>,
}

impl ShakeView {
    pub fn from_state(state: ShakeState) -> Self {
        match state {
            ShakeState::Idle => Self {
                state,
                headline: "Not Shaking!",
                animation: None,
            },
            ShakeState::Shaking => Self {
                state,
                headline: "Shaking!",
                animation: Some(SHAKE_ANIMATION),
            },
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Animation frame for a tick count; loops forever
    pub fn frame(tick: usize) -> &'static str {
        FRAMES[tick % FRAMES.len()]
    }
}

impl Default for ShakeView {
    fn default() -> Self {
        Self::from_state(ShakeState::Idle)
    }
}
