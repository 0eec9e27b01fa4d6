//! Chat list previews and the user directory used to start new chats.
//!
//! Both filter with the same rule: case-insensitive substring match on the
//! username. An empty query matches everything.

use serde::{Deserialize, Serialize};

use crate::ContactId;

const MINUTE_MS: u64 = 60 * 1000;

/// One row of the chat list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPreview {
    /// Conversation to open.
    pub contact_id: ContactId,
    /// Contact display name.
    pub username: String,
    /// Text of the latest message.
    pub last_message: String,
    /// Time of the latest message, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Unread message count.
    pub unread: u32,
    /// Contact status line.
    pub status: Option<String>,
}

/// The chat list.
#[derive(Debug, Clone, Default)]
pub struct ChatList {
    chats: Vec<ChatPreview>,
}

impl ChatList {
    /// Chat list over `chats`, in display order.
    pub fn new(chats: Vec<ChatPreview>) -> Self {
        Self { chats }
    }

    /// The prototype's three chats, timestamped relative to `now_ms`.
    pub fn prototype(now_ms: u64) -> Self {
        let ago = |minutes: u64| now_ms.saturating_sub(minutes * MINUTE_MS);
        Self::new(vec![
            ChatPreview {
                contact_id: ContactId::from("1"),
                username: "Alice".into(),
                last_message: "Hey, how are you doing?".into(),
                timestamp_ms: ago(5),
                unread: 2,
                status: Some("Just saw a beautiful sunset!".into()),
            },
            ChatPreview {
                contact_id: ContactId::from("2"),
                username: "Bob".into(),
                last_message: "Can we meet tomorrow?".into(),
                timestamp_ms: ago(60),
                unread: 0,
                status: None,
            },
            ChatPreview {
                contact_id: ContactId::from("3"),
                username: "Charlie".into(),
                last_message: "I'll send you the documents later".into(),
                timestamp_ms: ago(180),
                unread: 1,
                status: Some("Busy with work".into()),
            },
        ])
    }

    /// All chats.
    pub fn chats(&self) -> &[ChatPreview] {
        &self.chats
    }

    /// Chats whose username matches `query`.
    pub fn filter(&self, query: &str) -> Vec<&ChatPreview> {
        self.chats.iter().filter(|c| matches_query(&c.username, query)).collect()
    }

    /// Clear the unread badge of a chat. Returns `false` if it is unknown.
    pub fn mark_read(&mut self, contact: &ContactId) -> bool {
        match self.chats.iter_mut().find(|c| &c.contact_id == contact) {
            Some(chat) => {
                chat.unread = 0;
                true
            },
            None => false,
        }
    }
}

/// A user that can be messaged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    /// User identifier.
    pub id: String,
    /// Display name.
    pub username: String,
    /// Presence line.
    pub status: String,
}

/// Searchable list of known users.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<UserEntry>,
}

impl UserDirectory {
    /// Directory over `users`.
    pub fn new(users: Vec<UserEntry>) -> Self {
        Self { users }
    }

    /// The prototype's six users.
    pub fn prototype() -> Self {
        let user = |id: &str, username: &str, status: &str| UserEntry {
            id: id.into(),
            username: username.into(),
            status: status.into(),
        };
        Self::new(vec![
            user("u1", "Alice", "Active now"),
            user("u2", "Bob", "Last seen 2h ago"),
            user("u3", "Charlie", "Active now"),
            user("u4", "Diana", "Last seen yesterday"),
            user("u5", "Edward", "Active now"),
            user("u6", "Fiona", "Last seen 5m ago"),
        ])
    }

    /// Users whose username matches `query`.
    pub fn search(&self, query: &str) -> Vec<&UserEntry> {
        self.users.iter().filter(|u| matches_query(&u.username, query)).collect()
    }

    /// Look up a user by id.
    pub fn get(&self, id: &str) -> Option<&UserEntry> {
        self.users.iter().find(|u| u.id == id)
    }
}

fn matches_query(username: &str, query: &str) -> bool {
    username.to_lowercase().contains(&query.trim().to_lowercase())
}
