//! Notifications and navigation.
//!
//! Both are fire-and-forget collaborators: the core hands a value over and
//! never looks at the outcome.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Informational.
    Info,
    /// Error or warning.
    Destructive,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Headline.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Presentation hint.
    pub severity: Severity,
}

impl Notification {
    /// Informational notification.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), severity: Severity::Info }
    }

    /// Destructive notification.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Accepts notifications for transient display.
pub trait NotificationSink {
    /// Display a notification.
    fn notify(&mut self, notification: Notification);
}

/// Accepts destination paths.
pub trait Navigator {
    /// Navigate to `path`.
    fn navigate(&mut self, path: &str);
}

/// Sink that records every notification.
///
/// Clones share the same buffer, so a driver and a test can both hold one.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Number of recorded notifications.
    pub fn len(&self) -> usize {
        match self.notifications.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// No notifications recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for MemorySink {
    fn notify(&mut self, notification: Notification) {
        match self.notifications.lock() {
            Ok(mut guard) => guard.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
