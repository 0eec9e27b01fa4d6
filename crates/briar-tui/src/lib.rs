//! Terminal UI for Briar
//!
//! A thin shell over [`briar_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`briar_app::Runtime`].
//!
//! This crate only handles key input, terminal rendering and the production
//! environment.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod input;
pub mod system_env;
pub mod terminal;
pub mod ui;

pub use briar_app::{App, AppAction, AppEvent, Driver, Runtime};
pub use input::{InputState, KeyInput};
pub use system_env::SystemEnv;
pub use terminal::{Chrome, TerminalDriver, TerminalError};
