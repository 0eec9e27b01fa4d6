//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a conversation at a point in
//! time. Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks, and on a [`Timeline`] of them for properties
//! that only show across steps.

use briar_core::{Conversation, DeliveryStatus, Message, MessageId, Sender, env::Environment};

/// Snapshot of one message's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSnapshot {
    /// Message identifier.
    pub id: MessageId,
    /// Author.
    pub sender: Sender,
    /// Delivery status.
    pub status: DeliveryStatus,
    /// Text content.
    pub content: String,
    /// Disappearing message.
    pub ephemeral: bool,
    /// `Some(viewed)` while one-time-view media is attached.
    pub one_time_view: Option<bool>,
    /// Whether any media is attached.
    pub has_media: bool,
    /// Reactions as stored. `Some(empty)` is itself a violation.
    pub reactions: Option<Vec<(String, Sender)>>,
}

impl From<&Message> for MessageSnapshot {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            sender: message.sender,
            status: message.status,
            content: message.content.clone(),
            ephemeral: message.is_ephemeral(),
            one_time_view: message.media.as_ref().filter(|m| m.one_time_view).map(|m| m.viewed),
            has_media: message.media.is_some(),
            reactions: message
                .reactions
                .as_ref()
                .map(|rs| rs.iter().map(|r| (r.emoji.clone(), r.by)).collect()),
        }
    }
}

/// Snapshot of a conversation's observable state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationSnapshot {
    /// Messages in display order.
    pub messages: Vec<MessageSnapshot>,
    /// Typing indicator visible.
    pub typing: bool,
    /// Teardown has run.
    pub torn_down: bool,
    /// Number of pending scheduled tasks.
    pub pending_tasks: usize,
    /// Content that replaces expired one-time media.
    pub expired_marker: String,
}

impl ConversationSnapshot {
    /// Capture the current state of `conversation`.
    pub fn capture<E: Environment>(conversation: &Conversation<E>) -> Self {
        Self {
            messages: conversation.messages().iter().map(MessageSnapshot::from).collect(),
            typing: conversation.is_typing(),
            torn_down: conversation.is_torn_down(),
            pending_tasks: conversation.tasks().len(),
            expired_marker: conversation.config().expired_media_marker.clone(),
        }
    }

    /// Look up a message.
    pub fn message(&self, id: &MessageId) -> Option<&MessageSnapshot> {
        self.messages.iter().find(|m| &m.id == id)
    }
}

/// Ordered history of snapshots of one conversation.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    snapshots: Vec<ConversationSnapshot>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture and append the current state of `conversation`.
    pub fn record<E: Environment>(&mut self, conversation: &Conversation<E>) {
        self.push(ConversationSnapshot::capture(conversation));
    }

    /// Append a snapshot.
    pub fn push(&mut self, snapshot: ConversationSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> &[ConversationSnapshot] {
        &self.snapshots
    }

    /// Consecutive snapshot pairs, oldest first.
    pub fn steps(&self) -> impl Iterator<Item = (&ConversationSnapshot, &ConversationSnapshot)> {
        self.snapshots.windows(2).filter_map(|w| match w {
            [before, after] => Some((before, after)),
            _ => None,
        })
    }

    /// Most recent snapshot.
    pub fn latest(&self) -> Option<&ConversationSnapshot> {
        self.snapshots.last()
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// No snapshots recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
