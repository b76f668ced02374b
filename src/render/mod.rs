//! Renderer module
//!
//! Purely reactive: projects `ShakeState` into a view and draws it.

mod console;
mod view;

pub use console::ConsoleRenderer;
pub use view::{ShakeView, SHAKE_ANIMATION};
