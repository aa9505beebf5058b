//! Reusable widget abstractions for the TUI

mod dialog;
mod text_input;

pub use dialog::{centered_rect, overlay_rect};
pub use text_input::TextInputState;
