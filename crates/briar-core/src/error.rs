//! Error types for the Briar core.
//!
//! The conversation simulator is fail-soft and never returns errors: invalid
//! identifiers, empty sends and stale scheduled transitions are no-ops. The
//! errors here cover the surfaces that do reject input: session handling and
//! simulation policy.

use std::time::Duration;

use thiserror::Error;

/// Errors from creating or editing a [`crate::Session`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Username or password was blank.
    #[error("please fill in all fields")]
    MissingFields,

    /// Profile rename with a blank username.
    #[error("username cannot be blank")]
    BlankUsername,
}

/// Errors from validating a [`crate::SimulationConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Probability outside `[0, 1]`.
    #[error("{field} must be within [0, 1], got {value}")]
    Probability {
        /// Offending field
        field: &'static str,
        /// Value supplied
        value: f64,
    },

    /// A period that must be positive was zero.
    #[error("{field} must be greater than zero")]
    ZeroInterval {
        /// Offending field
        field: &'static str,
    },

    /// Replies are enabled but there is nothing to reply with.
    #[error("reply pool is empty while replies are enabled")]
    EmptyReplyPool,

    /// The reply would land before its typing indicator starts.
    #[error("reply_after ({reply_after:?}) is earlier than reply_typing_after ({typing_after:?})")]
    ReplyBeforeTyping {
        /// Delay before the typing indicator
        typing_after: Duration,
        /// Delay before the reply
        reply_after: Duration,
    },
}

impl SessionError {
    /// Title and description shown to the user for this error.
    pub fn notice(&self) -> (&'static str, String) {
        ("Error", capitalize(&self.to_string()))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_notice_is_capitalized() {
        let (title, description) = SessionError::MissingFields.notice();
        assert_eq!(title, "Error");
        assert_eq!(description, "Please fill in all fields");
    }

    #[test]
    fn config_error_names_field() {
        let err = ConfigError::Probability { field: "reply_probability", value: 2.0 };
        assert_eq!(err.to_string(), "reply_probability must be within [0, 1], got 2");
    }
}
