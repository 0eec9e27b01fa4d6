//! User preferences.

use serde::{Deserialize, Serialize};

use crate::Notification;

/// Default disappearing-message timer in seconds.
pub const DEFAULT_DISAPPEARING_SECS: u64 = 30;

/// Per-user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Show informational notifications.
    pub notifications_enabled: bool,
    /// Default TTL for disappearing messages, in seconds.
    pub disappearing_secs: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { notifications_enabled: true, disappearing_secs: DEFAULT_DISAPPEARING_SECS }
    }
}

impl Preferences {
    /// Flip notifications and describe the new state.
    pub fn toggle_notifications(&mut self) -> Notification {
        self.notifications_enabled = !self.notifications_enabled;
        if self.notifications_enabled {
            Notification::info(
                "Notifications enabled",
                "You will now receive notification alerts",
            )
        } else {
            Notification::info("Notifications disabled", "You will not receive notification alerts")
        }
    }

    /// Set the default disappearing timer.
    pub fn set_disappearing_time(&mut self, secs: u64) -> Notification {
        self.disappearing_secs = secs;
        Notification::info(
            "Default timer updated",
            format!("Messages will disappear after {secs} seconds"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_reports_new_state() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.toggle_notifications().title, "Notifications disabled");
        assert!(!prefs.notifications_enabled);
        assert_eq!(prefs.toggle_notifications().title, "Notifications enabled");
    }

    #[test]
    fn timer_description_mentions_seconds() {
        let mut prefs = Preferences::default();
        let note = prefs.set_disappearing_time(60);
        assert_eq!(note.description, "Messages will disappear after 60 seconds");
        assert_eq!(prefs.disappearing_secs, 60);
    }
}
