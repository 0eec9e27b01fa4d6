//! Static contacts and conversations used by the prototype.

use std::time::Duration;

use crate::{
    ContactDirectory, ContactId, ContactProfile, DeliveryStatus, Media, Message, MessageSeed,
    Sender,
};

const MINUTE_MS: u64 = 60 * 1000;

/// Red heart, the reaction on seed message `m4`.
pub const HEART: &str = "\u{2764}\u{fe0f}";

/// Emojis offered by the reaction picker.
pub const REACTION_EMOJIS: [&str; 7] = [
    "\u{1f44d}",
    HEART,
    "\u{1f60a}",
    "\u{1f602}",
    "\u{1f62e}",
    "\u{1f622}",
    "\u{1f389}",
];

/// Fixed contact directory: Alice ("1"), Bob ("2") and Charlie ("3").
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDirectory;

impl ContactDirectory for StaticDirectory {
    fn profile(&self, contact: &ContactId) -> Option<ContactProfile> {
        match contact.as_str() {
            "1" => Some(ContactProfile::new("Alice", "Just saw a beautiful sunset!")),
            "2" => Some(ContactProfile::new("Bob", "")),
            "3" => Some(ContactProfile::new("Charlie", "Busy with work")),
            _ => None,
        }
    }
}

/// Fixed conversation history for the static contacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSeed;

impl MessageSeed for StaticSeed {
    fn seed(&self, contact: &ContactId, now_ms: u64) -> Vec<Message> {
        let ago = |minutes: u64| now_ms.saturating_sub(minutes * MINUTE_MS);

        match contact.as_str() {
            "1" => vec![
                Message::text(
                    "m1",
                    Sender::Peer,
                    "Hey there! How are you doing?",
                    ago(120),
                    DeliveryStatus::Read,
                ),
                Message::text(
                    "m2",
                    Sender::Me,
                    "I'm good, thanks! How about you?",
                    ago(90),
                    DeliveryStatus::Read,
                ),
                Message::text(
                    "m3",
                    Sender::Peer,
                    "This is a disappearing message that will self-destruct!",
                    ago(30),
                    DeliveryStatus::Read,
                )
                .with_ttl(Duration::from_secs(30)),
                Message::text(
                    "m4",
                    Sender::Peer,
                    "Check out this photo I took yesterday",
                    ago(15),
                    DeliveryStatus::Read,
                )
                .with_media(Media::image(
                    "https://images.unsplash.com/photo-1470071459604-3b5ec3a7fe05?auto=format&fit=crop&q=80&w=800",
                ))
                .with_reaction(HEART, Sender::Me),
                Message::text(
                    "m5",
                    Sender::Peer,
                    "And here's a one-time view image",
                    ago(10),
                    DeliveryStatus::Read,
                )
                .with_media(Media::one_time_image(
                    "https://images.unsplash.com/photo-1470813740244-df37b8c1edcb?auto=format&fit=crop&q=80&w=800",
                )),
                Message::text(
                    "m6",
                    Sender::Me,
                    "These photos are beautiful!",
                    ago(5),
                    DeliveryStatus::Delivered,
                ),
            ],
            "2" => vec![
                Message::text(
                    "m1",
                    Sender::Peer,
                    "Can we meet tomorrow?",
                    ago(60),
                    DeliveryStatus::Read,
                ),
                Message::text(
                    "m2",
                    Sender::Me,
                    "Sure, what time works for you?",
                    ago(55),
                    DeliveryStatus::Delivered,
                ),
            ],
            "3" => vec![Message::text(
                "m1",
                Sender::Peer,
                "I'll send you the documents later",
                ago(180),
                DeliveryStatus::Read,
            )],
            _ => Vec::new(),
        }
    }
}
