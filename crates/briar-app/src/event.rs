//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the
//! [`crate::App`] state machine: commands typed by the user and periodic
//! ticks that let scheduled conversation transitions fire.

use crate::{Command, CommandError};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// User command.
    Command(Command),

    /// Input line that did not parse.
    Invalid(CommandError),

    /// Periodic tick.
    Tick,

    /// Frontend needs a repaint (resize, input edit).
    Redraw,
}

impl AppEvent {
    /// Parse an input line into a command event.
    pub fn from_line(line: &str) -> Self {
        match Command::parse(line) {
            Ok(command) => Self::Command(command),
            Err(err) => Self::Invalid(err),
        }
    }
}

impl From<Command> for AppEvent {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}
