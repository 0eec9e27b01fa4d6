//! Briar core
//!
//! Pure, I/O-free domain of the Briar chat prototype: the message model, the
//! conversation lifecycle simulator and the collaborator traits it consumes.
//!
//! # Components
//!
//! - [`Conversation`]: lifecycle simulator for one open conversation
//! - [`TaskRegistry`]: cancellable scheduled transitions keyed by kind
//! - [`Environment`](env::Environment): time and randomness abstraction
//! - [`ContactDirectory`], [`MessageSeed`], [`NotificationSink`],
//!   [`Navigator`], [`FilePicker`]: injected collaborators
//! - [`Session`], [`Preferences`], [`ChatList`], [`UserDirectory`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod contact;
pub mod conversation;
mod directory;
pub mod env;
pub mod error;
mod media;
mod message;
mod notify;
mod preferences;
pub mod schedule;
pub mod seed;
mod session;

pub use config::{
    DEFAULT_AMBIENT_TYPING_DURATION, DEFAULT_AMBIENT_TYPING_INTERVAL,
    DEFAULT_AMBIENT_TYPING_PROBABILITY, DEFAULT_DELIVERED_AFTER, DEFAULT_EPHEMERAL_TTL,
    DEFAULT_ONE_TIME_VIEW_GRACE, DEFAULT_READ_AFTER, DEFAULT_REPLIES, DEFAULT_REPLY_AFTER,
    DEFAULT_REPLY_PROBABILITY, DEFAULT_REPLY_TYPING_AFTER, EXPIRED_MEDIA_MARKER,
    MIN_AMBIENT_TYPING_INTERVAL, SimulationConfig,
};
pub use contact::{ContactDirectory, ContactId, ContactProfile, MessageSeed};
pub use conversation::{Conversation, ConversationAction, ConversationView, TypingSource};
pub use directory::{ChatList, ChatPreview, UserDirectory, UserEntry};
pub use error::{ConfigError, SessionError};
pub use media::{FilePicker, MediaLocator, NoFile, QueuedFiles};
pub use message::{DeliveryStatus, Ephemeral, Media, MediaKind, Message, MessageId, Reaction, Sender};
pub use notify::{MemorySink, Navigator, Notification, NotificationSink, Severity};
pub use preferences::{DEFAULT_DISAPPEARING_SECS, Preferences};
pub use schedule::{TaskKind, TaskRegistry};
pub use seed::{StaticDirectory, StaticSeed};
pub use session::Session;
