//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use briar_core::Notification;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the current state.
    Render,

    /// Show a transient notification.
    Notify(Notification),

    /// Move to another screen.
    Navigate(String),

    /// Ask the user for a file to attach to the open conversation.
    PickFile {
        /// Picker hint from the command, e.g. a file path. May be empty.
        hint: String,
    },

    /// Quit the application.
    Quit,
}
