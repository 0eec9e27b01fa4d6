//! Chats sidebar
//!
//! Displays the chat list with unread badges.

use briar_app::App;
use briar_core::env::Environment;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const ACTIVE_PREFIX: &str = ">";
const INACTIVE_PREFIX: &str = " ";

enum ChatDisplayState {
    Active,
    Unread(u32),
    Normal,
}

/// Render the chats sidebar.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let active = app.conversation().map(|c| c.contact_id().clone());

    let items: Vec<ListItem> = if app.session().is_none() {
        Vec::new()
    } else {
        app.chats()
            .chats()
            .iter()
            .map(|chat| {
                let state = if active.as_ref() == Some(&chat.contact_id) {
                    ChatDisplayState::Active
                } else if chat.unread > 0 {
                    ChatDisplayState::Unread(chat.unread)
                } else {
                    ChatDisplayState::Normal
                };

                let name = format!("{} {}", chat.contact_id, chat.username);
                let (prefix, suffix, style) = match state {
                    ChatDisplayState::Active => (
                        ACTIVE_PREFIX,
                        String::new(),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    ChatDisplayState::Unread(count) => {
                        (INACTIVE_PREFIX, format!(" {count}"), Style::default().fg(Color::Cyan))
                    },
                    ChatDisplayState::Normal => (INACTIVE_PREFIX, String::new(), Style::default()),
                };

                ListItem::new(Line::from(vec![
                    Span::raw(prefix),
                    Span::styled(name, style),
                    Span::styled(suffix, Style::default().fg(Color::Red)),
                ]))
            })
            .collect()
    };

    let block = Block::default().borders(Borders::ALL).title(" Chats ");
    let list = List::new(items).block(block);

    frame.render_widget(list, area);
}
