//! Plain-text view of the application state.
//!
//! Pure formatting shared by every frontend. The terminal UI styles these
//! lines; the simulation driver records them as screen snapshots.

use briar_core::{
    ChatPreview, Conversation, DeliveryStatus, Message, Sender, UserEntry, env::Environment,
};

use crate::{App, Listing};

const MS_PER_MINUTE: u64 = 60 * 1000;
const MINUTES_PER_DAY: u64 = 24 * 60;

/// `HH:MM` (UTC) of a Unix timestamp in milliseconds.
pub fn clock(timestamp_ms: u64) -> String {
    let minutes = (timestamp_ms / MS_PER_MINUTE) % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Delivery tick marks.
pub fn status_marks(status: DeliveryStatus) -> &'static str {
    match status {
        DeliveryStatus::Sent => "\u{2713}",
        DeliveryStatus::Delivered => "\u{2713}\u{2713}",
        DeliveryStatus::Read => "\u{2713}\u{2713} read",
    }
}

/// One message as a single line.
///
/// Outgoing messages carry their tick marks; disappearing messages, media and
/// reactions are tagged inline.
pub fn message_line(message: &Message, peer_name: &str) -> String {
    let author = match message.sender {
        Sender::Me => "You",
        Sender::Peer => peer_name,
    };

    let mut line = format!("[{}] {} {author}: ", clock(message.timestamp_ms), message.id);
    if let Some(media) = &message.media {
        if media.one_time_view && !media.viewed {
            line.push_str("[one-time image, /view to open] ");
        } else if media.one_time_view {
            line.push_str("[one-time image, viewing] ");
        } else {
            line.push_str("[image] ");
        }
    }
    line.push_str(&message.content);

    if message.is_ephemeral() {
        line.push_str(" (disappearing)");
    }
    if !message.reactions().is_empty() {
        let emojis: Vec<&str> = message.reactions().iter().map(|r| r.emoji.as_str()).collect();
        line.push_str(&format!(" {}", emojis.join("")));
    }
    if message.sender == Sender::Me {
        line.push_str(&format!(" {}", status_marks(message.status)));
    }
    line
}

/// Lines of an open conversation: header, messages, typing indicator.
pub fn conversation_lines<E: Environment>(conversation: &Conversation<E>) -> Vec<String> {
    let Some(profile) = conversation.profile() else {
        return vec!["Conversation not found".to_string()];
    };

    let mut lines = vec![match &profile.status_line {
        Some(status) => format!("{} - {status}", profile.display_name),
        None => profile.display_name.clone(),
    }];
    lines.extend(conversation.messages().iter().map(|m| message_line(m, &profile.display_name)));
    if conversation.is_typing() {
        lines.push(format!("{} is typing...", profile.display_name));
    }
    lines
}

/// One chat list row.
pub fn chat_line(chat: &ChatPreview) -> String {
    let badge = if chat.unread > 0 { format!(" ({})", chat.unread) } else { String::new() };
    format!(
        "{} {}{badge} [{}] {}",
        chat.contact_id,
        chat.username,
        clock(chat.timestamp_ms),
        chat.last_message
    )
}

/// One user search row.
pub fn user_line(user: &UserEntry) -> String {
    if user.status.is_empty() {
        format!("{} {}", user.id, user.username)
    } else {
        format!("{} {} - {}", user.id, user.username, user.status)
    }
}

/// Whole screen as plain lines.
pub fn screen<E: Environment>(app: &App<E>) -> Vec<String> {
    let mut lines = Vec::new();

    match (app.session(), app.conversation()) {
        (None, _) => lines.push("Sign in with /login <username> <password>".to_string()),
        (Some(_), Some(conversation)) => lines.extend(conversation_lines(conversation)),
        (Some(_), None) => match app.listing() {
            Some(Listing::Users(users)) => lines.extend(users.iter().map(user_line)),
            Some(Listing::Chats(chats)) => lines.extend(chats.iter().map(chat_line)),
            None => lines.extend(app.chats().chats().iter().map(chat_line)),
        },
    }

    if let Some(status) = app.status_message() {
        lines.push(status.to_string());
    }
    lines
}
