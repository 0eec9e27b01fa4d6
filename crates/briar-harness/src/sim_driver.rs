//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`briar_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Input comes from a script of [`Step`]s. Each step advances virtual time
//! before its event is delivered, so scheduled transitions fire on the
//! runtime's next tick exactly as they would after a real pause. When the
//! script runs out the driver asks the App to quit.

use std::{collections::VecDeque, time::Duration};

use briar_app::{App, AppEvent, Command, Driver, view};
use briar_core::{ContactId, Notification, env::Environment};
use tracing::trace;

use crate::{
    SimEnv, SimInstant,
    invariants::{InvariantRegistry, Timeline},
};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// One scripted input: wait `delay` of virtual time, then deliver `event`.
#[derive(Debug, Clone)]
pub struct Step {
    /// Virtual time to pass before the event.
    pub delay: Duration,
    /// Event to deliver.
    pub event: AppEvent,
}

impl Step {
    /// Deliver `event` without waiting.
    pub fn now(event: impl Into<AppEvent>) -> Self {
        Self { delay: Duration::ZERO, event: event.into() }
    }

    /// Deliver `event` after `delay`.
    pub fn after(delay: Duration, event: impl Into<AppEvent>) -> Self {
        Self { delay, event: event.into() }
    }

    /// Parse `line` as typed input and deliver it without waiting.
    pub fn typed(line: &str) -> Self {
        Self::now(AppEvent::from_line(line))
    }

    /// Let `delay` pass with no input.
    pub fn wait(delay: Duration) -> Self {
        Self { delay, event: AppEvent::Tick }
    }
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] so the same [`briar_app::Runtime`] orchestration
/// code runs in both the terminal and simulation tests. Records every
/// render, notification and navigation for later assertions.
pub struct SimDriver {
    env: SimEnv,
    script: VecDeque<Step>,
    files: VecDeque<Vec<u8>>,
    screens: Vec<Vec<String>>,
    notifications: Vec<Notification>,
    navigations: Vec<String>,
    file_requests: Vec<String>,
    invariants: Option<InvariantRegistry>,
    timeline: Timeline,
    timeline_contact: Option<ContactId>,
    stopped: bool,
}

impl SimDriver {
    /// Create a driver over `env` that plays `script`.
    pub fn new(env: SimEnv, script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            env,
            script: script.into_iter().collect(),
            files: VecDeque::new(),
            screens: Vec::new(),
            notifications: Vec::new(),
            navigations: Vec::new(),
            file_requests: Vec::new(),
            invariants: None,
            timeline: Timeline::new(),
            timeline_contact: None,
            stopped: false,
        }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Files handed out, in order, when the App asks for one.
    #[must_use]
    pub fn with_files(mut self, files: impl IntoIterator<Item = Vec<u8>>) -> Self {
        self.files.extend(files);
        self
    }

    /// Every rendered screen, oldest first.
    pub fn screens(&self) -> &[Vec<String>] {
        &self.screens
    }

    /// Most recently rendered screen.
    pub fn last_screen(&self) -> Option<&[String]> {
        self.screens.last().map(Vec::as_slice)
    }

    /// Every notification shown, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Every navigation path, oldest first.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// Hints passed with each file request.
    pub fn file_requests(&self) -> &[String] {
        &self.file_requests
    }

    /// Snapshots of the currently open conversation, one per render.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn record_conversation<E: Environment>(&mut self, app: &App<E>) -> Result<(), SimDriverError> {
        let Some(conversation) = app.conversation() else {
            return Ok(());
        };

        if self.timeline_contact.as_ref() != Some(conversation.contact_id()) {
            self.timeline = Timeline::new();
            self.timeline_contact = Some(conversation.contact_id().clone());
        }
        self.timeline.record(conversation);

        match &self.invariants {
            Some(registry) => registry.check_all(&self.timeline).map_err(|violations| {
                let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
                SimDriverError(messages.join("; "))
            }),
            None => Ok(()),
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let Some(step) = self.script.pop_front() else {
            return Ok(Some(Command::Quit.into()));
        };
        self.env.advance(step.delay);
        trace!(at = ?self.env.now(), event = ?step.event, "scripted event");
        Ok(Some(step.event))
    }

    fn pick_file(&mut self, hint: &str) -> Option<Vec<u8>> {
        self.file_requests.push(hint.to_string());
        self.files.pop_front()
    }

    fn now(&self) -> SimInstant {
        self.env.now()
    }

    fn render<E>(&mut self, app: &App<E>) -> Result<(), Self::Error>
    where
        E: Environment<Instant = Self::Instant>,
    {
        self.screens.push(view::screen(app));
        self.record_conversation(app)
    }

    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.clone());
    }

    fn navigate(&mut self, path: &str) {
        self.navigations.push(path.to_string());
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
