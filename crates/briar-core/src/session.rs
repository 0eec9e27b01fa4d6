//! Explicit session value.
//!
//! The signed-in user is a plain value handed to whoever needs it; there is no
//! ambient store. Credentials are only checked for presence, as there is no
//! backend to verify them against.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    username: String,
}

impl Session {
    /// Sign in. Blank username or password is rejected.
    pub fn sign_in(username: &str, password: &str) -> Result<Self, SessionError> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(SessionError::MissingFields);
        }
        Ok(Self { username: username.trim().to_string() })
    }

    /// Signed-in username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Change the username (profile save). Blank names are rejected.
    pub fn rename(&mut self, username: &str) -> Result<(), SessionError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(SessionError::BlankUsername);
        }
        self.username = username.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_requires_both_fields() {
        assert_eq!(Session::sign_in("", "pw"), Err(SessionError::MissingFields));
        assert_eq!(Session::sign_in("alice", "  "), Err(SessionError::MissingFields));
        assert_eq!(Session::sign_in(" alice ", "pw").map(|s| s.username().to_string()), Ok("alice".into()));
    }

    #[test]
    fn rename_rejects_blank() {
        let mut session = Session::sign_in("alice", "pw").unwrap();
        assert_eq!(session.rename(" "), Err(SessionError::BlankUsername));
        assert_eq!(session.username(), "alice");

        session.rename("alicia").unwrap();
        assert_eq!(session.username(), "alicia");
    }
}
