//! Message model.
//!
//! A [`Message`] carries text and optional media, a forward-only
//! [`DeliveryStatus`], optional reactions and an optional ephemeral TTL.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Message identifier, unique within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier for the `n`th locally sent message.
    pub fn local(n: u64) -> Self {
        Self(format!("new-{n}"))
    }

    /// Identifier for the `n`th simulated reply.
    pub fn reply(n: u64) -> Self {
        Self(format!("new-reply-{n}"))
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Who wrote a message or reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    /// The local user.
    Me,
    /// The other side of the conversation.
    Peer,
}

/// Delivery status of a message.
///
/// Ordered `Sent < Delivered < Read`. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeliveryStatus {
    /// Handed to the (simulated) transport.
    Sent,
    /// Reached the peer.
    Delivered,
    /// Seen by the peer.
    Read,
}

impl DeliveryStatus {
    /// Move to `target` if it is strictly ahead of the current status.
    ///
    /// Returns `true` if the status changed.
    pub fn advance_to(&mut self, target: Self) -> bool {
        if target > *self {
            *self = target;
            true
        } else {
            false
        }
    }

    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
        }
    }
}

/// An emoji reaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reaction {
    /// Emoji symbol.
    pub emoji: String,
    /// Author of the reaction.
    pub by: Sender,
}

/// Kind of attached media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// Still image.
    Image,
}

/// Media attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Kind of media.
    pub kind: MediaKind,
    /// Locator of the content (URL or `blob:` locator). Not validated.
    pub source: String,
    /// Viewable once, then replaced with an expiry marker.
    pub one_time_view: bool,
    /// The one-time-view content has been revealed.
    pub viewed: bool,
}

impl Media {
    /// Regular image attachment.
    pub fn image(source: impl Into<String>) -> Self {
        Self { kind: MediaKind::Image, source: source.into(), one_time_view: false, viewed: false }
    }

    /// Image that can be viewed once.
    pub fn one_time_image(source: impl Into<String>) -> Self {
        Self { one_time_view: true, ..Self::image(source) }
    }

    /// One-time-view media that has not been revealed yet.
    pub fn is_revealable(&self) -> bool {
        self.one_time_view && !self.viewed
    }
}

/// Disappearing-message settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ephemeral {
    /// Time to live. `None` falls back to the simulation default.
    pub ttl: Option<Duration>,
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier, unique within the conversation.
    pub id: MessageId,
    /// Text content. May be empty when media is attached.
    pub content: String,
    /// Author.
    pub sender: Sender,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Delivery status.
    pub status: DeliveryStatus,
    /// Set for disappearing messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<Ephemeral>,
    /// Reactions in the order they were added. Never `Some(vec![])`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Vec<Reaction>>,
    /// Attached media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

impl Message {
    /// Plain text message.
    pub fn text(
        id: impl Into<MessageId>,
        sender: Sender,
        content: impl Into<String>,
        timestamp_ms: u64,
        status: DeliveryStatus,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            sender,
            timestamp_ms,
            status,
            ephemeral: None,
            reactions: None,
            media: None,
        }
    }

    /// Attach media.
    #[must_use]
    pub fn with_media(mut self, media: Media) -> Self {
        self.media = Some(media);
        self
    }

    /// Make the message disappear after `ttl`.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ephemeral = Some(Ephemeral { ttl: Some(ttl) });
        self
    }

    /// Add a reaction without toggling.
    #[must_use]
    pub fn with_reaction(mut self, emoji: impl Into<String>, by: Sender) -> Self {
        self.reactions.get_or_insert_with(Vec::new).push(Reaction { emoji: emoji.into(), by });
        self
    }

    /// Disappearing message.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral.is_some()
    }

    /// TTL of an ephemeral message, falling back to `default`.
    ///
    /// `None` for regular messages.
    pub fn ttl(&self, default: Duration) -> Option<Duration> {
        self.ephemeral.map(|e| e.ttl.unwrap_or(default))
    }

    /// Toggle a reaction by `by`.
    ///
    /// Removes an identical reaction if present, otherwise appends it. An
    /// emptied list collapses to `None`. Returns `true` if the reaction was
    /// added.
    pub fn toggle_reaction(&mut self, emoji: &str, by: Sender) -> bool {
        let existing = self
            .reactions
            .as_ref()
            .and_then(|rs| rs.iter().position(|r| r.emoji == emoji && r.by == by));

        match existing {
            Some(index) => {
                if let Some(reactions) = self.reactions.as_mut() {
                    reactions.remove(index);
                    if reactions.is_empty() {
                        self.reactions = None;
                    }
                }
                false
            },
            None => {
                self.reactions
                    .get_or_insert_with(Vec::new)
                    .push(Reaction { emoji: emoji.to_string(), by });
                true
            },
        }
    }

    /// Reactions as a slice (empty when absent).
    pub fn reactions(&self) -> &[Reaction] {
        self.reactions.as_deref().unwrap_or(&[])
    }
}
