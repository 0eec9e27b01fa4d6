//! Application layer for Briar
//!
//! Pure state machine and generic runtime that orchestrate a session, the
//! chat list and at most one open conversation, enabling deterministic
//! simulation testing with the same code that runs in the terminal.
//!
//! # Components
//!
//! - [`App`]: state machine (commands and ticks in, actions out)
//! - [`Command`]: text commands parsed from an input line
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using a Driver
//! - [`view`]: plain-text rendering of the application state

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod command;
mod driver;
mod event;
mod runtime;
pub mod view;

pub use action::AppAction;
pub use app::{App, Listing};
pub use command::{Command, CommandError};
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::Runtime;
