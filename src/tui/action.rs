//! Actions returned by screen and modal event handlers.

use super::app::Screen;

/// An action that a screen or modal handler returns to the [`App`](super::App).
///
/// The `App` interprets these to open and save modals and to navigate between
/// screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Navigate to the given screen.
    Navigate(Screen),
    /// Open the settings modal for the outline item at the given index.
    OpenSettings(usize),
    /// Open the publish modal for the outline item at the given index.
    OpenPublish(usize),
    /// Save the open modal.
    SaveSettings,
    /// The open modal was dismissed without saving.
    CloseModal,
    /// Quit the application.
    Quit,
}
