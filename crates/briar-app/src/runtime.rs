//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: application state machine
//! - [`Driver`]: Platform-specific I/O

use briar_core::{QueuedFiles, SimulationConfig, env::Environment};
use tracing::{debug, info};

use crate::{App, AppAction, AppEvent, Driver};

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for randomness and wall-clock time
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    app: App<E>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
{
    /// Create a new runtime with the given driver and environment.
    pub fn new(driver: D, env: E, config: SimulationConfig) -> Self {
        Self { driver, app: App::new(env, config) }
    }

    /// Create a runtime around an already configured App.
    pub fn with_app(driver: D, app: App<E>) -> Self {
        Self { driver, app }
    }

    /// Run the main event loop.
    ///
    /// Each cycle:
    /// 1. Polls for an input event from the driver
    /// 2. Ticks the App so due conversation transitions fire
    /// 3. Executes the resulting actions through the driver
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        info!("runtime started");
        self.driver.render(&self.app)?;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        self.app.quit();
        self.driver.stop();
        info!("runtime stopped");
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        if let Some(event) = self.driver.poll_event().await? {
            let now = self.driver.now();
            let actions = self.app.handle(event, now);
            if self.process_actions(actions)? {
                return Ok(true);
            }
        }

        let now = self.driver.now();
        let actions = self.app.handle(AppEvent::Tick, now);
        self.process_actions(actions)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Notify(notification) => self.driver.notify(&notification),
                    AppAction::Navigate(path) => {
                        debug!(%path, "navigate");
                        self.driver.navigate(&path);
                    },
                    AppAction::PickFile { hint } => {
                        let mut picker = QueuedFiles::new(self.driver.pick_file(&hint));
                        let now = self.driver.now();
                        pending_actions.extend(self.app.attach(&mut picker, now));
                    },
                    AppAction::Quit => return Ok(true),
                }
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App<E> {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App<E> {
        &mut self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Split into driver and App.
    pub fn into_parts(self) -> (D, App<E>) {
        (self.driver, self.app)
    }
}
