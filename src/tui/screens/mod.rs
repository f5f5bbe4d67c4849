//! TUI screen implementations.

pub mod help;
pub mod outline;

pub use help::{HelpState, draw_help};
pub use outline::{OutlineState, draw_outline};
