//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use briar_core::{Notification, env::Environment};

use crate::{App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal and in simulation.
///
/// # Implementations
///
/// - **Terminal**: line-oriented stdin/stdout
/// - **Simulation**: scripted events on virtual time
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
/// - [`Instant`](Driver::Instant): Time representation (real or virtual)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Poll for the next input event.
    ///
    /// Returns an event or `None` if nothing is ready before the next tick.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Ask the user for a file to attach. `None` if nothing was picked.
    ///
    /// `hint` is whatever the user passed to the attach command.
    fn pick_file(&mut self, hint: &str) -> Option<Vec<u8>>;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render<E>(&mut self, app: &App<E>) -> Result<(), Self::Error>
    where
        E: Environment<Instant = Self::Instant>;

    /// Show a transient notification.
    fn notify(&mut self, notification: &Notification);

    /// Move to another screen.
    fn navigate(&mut self, path: &str);

    /// Clean up resources.
    fn stop(&mut self);
}
