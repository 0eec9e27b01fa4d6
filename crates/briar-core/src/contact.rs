//! Contact directory and message seed collaborators.
//!
//! The simulator only sees these traits, so the static prototype data in
//! [`crate::seed`] can be swapped for a real backend without touching the
//! lifecycle logic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Message;

/// Contact identifier. Also identifies the conversation with that contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContactId(String);

impl ContactId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Profile shown in a conversation header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactProfile {
    /// Display name.
    pub display_name: String,
    /// Optional status line.
    pub status_line: Option<String>,
}

impl ContactProfile {
    /// Create a profile. A blank status line is stored as `None`.
    pub fn new(display_name: impl Into<String>, status_line: &str) -> Self {
        let status_line =
            if status_line.trim().is_empty() { None } else { Some(status_line.to_string()) };
        Self { display_name: display_name.into(), status_line }
    }
}

/// Resolves contact identifiers to profiles.
pub trait ContactDirectory {
    /// Profile for `contact`, `None` if unknown.
    fn profile(&self, contact: &ContactId) -> Option<ContactProfile>;
}

/// Supplies the initial messages of a conversation.
pub trait MessageSeed {
    /// Messages for `contact` in chronological order. May be empty.
    ///
    /// `now_ms` is the wall clock at load time; seeds place their messages
    /// relative to it.
    fn seed(&self, contact: &ContactId, now_ms: u64) -> Vec<Message>;
}
