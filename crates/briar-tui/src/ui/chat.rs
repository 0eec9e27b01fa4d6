//! Chat area
//!
//! Displays the open conversation, or the current listing when no
//! conversation is open.

use briar_app::{App, Listing, view};
use briar_core::{Sender, env::Environment};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let (title, items) = match (app.session(), app.conversation()) {
        (None, _) => (" Sign in ".to_string(), vec![hint(
            "Sign in with /login <username> <password>",
        )]),
        (Some(_), Some(conversation)) => match conversation.profile() {
            None => (" Not found ".to_string(), vec![hint("Conversation not found")]),
            Some(profile) => {
                let title = match &profile.status_line {
                    Some(status) => format!(" {} - {status} ", profile.display_name),
                    None => format!(" {} ", profile.display_name),
                };
                let mut items: Vec<ListItem> = conversation
                    .messages()
                    .iter()
                    .map(|msg| {
                        let mut style = match msg.sender {
                            Sender::Me => Style::default().fg(Color::Green),
                            Sender::Peer => Style::default().fg(Color::Cyan),
                        };
                        if msg.is_ephemeral() {
                            style = style.add_modifier(Modifier::ITALIC);
                        }
                        ListItem::new(Line::from(Span::styled(
                            view::message_line(msg, &profile.display_name),
                            style,
                        )))
                    })
                    .collect();
                if conversation.is_typing() {
                    items.push(ListItem::new(Line::from(Span::styled(
                        format!("{} is typing...", profile.display_name),
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                    ))));
                }
                (title, items)
            },
        },
        (Some(_), None) => match app.listing() {
            Some(Listing::Users(users)) => (
                " Users ".to_string(),
                users.iter().map(|u| ListItem::new(view::user_line(u))).collect(),
            ),
            Some(Listing::Chats(chats)) => (
                " Chats ".to_string(),
                chats.iter().map(|c| ListItem::new(view::chat_line(c))).collect(),
            ),
            None => (
                " Chats ".to_string(),
                app.chats().chats().iter().map(|c| ListItem::new(view::chat_line(c))).collect(),
            ),
        },
    };

    let block = Block::default().borders(Borders::ALL).title(title);

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}

fn hint(text: &str) -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(text.to_string(), Style::default().fg(Color::DarkGray))))
}
