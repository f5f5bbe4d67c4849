//! TUI: App state, event loop, outline screen, settings modal and editors.

pub mod action;
pub mod app;
pub mod editors;
pub mod error;
pub mod modal;
pub mod screens;
pub mod widgets;

pub use app::App;
pub use error::AppError;
