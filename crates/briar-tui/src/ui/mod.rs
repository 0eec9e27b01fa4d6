//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod chat;
mod chats;
mod input;
mod status;

use briar_core::env::Environment;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::{App, terminal::Chrome};

/// Render the entire UI.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, chrome: &Chrome) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, *main_area);
    input::render(frame, &chrome.input, *input_area);
    status::render(frame, app, chrome, *status_area);
}

/// Render the main area (chats sidebar + conversation).
fn render_main_area<E: Environment>(frame: &mut Frame, app: &App<E>, area: Rect) {
    const CHATS_SIDEBAR_WIDTH: u16 = 16;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(CHATS_SIDEBAR_WIDTH), Constraint::Min(CHAT_AREA_MIN_WIDTH)])
        .split(area);

    let [chats_area, chat_area] = chunks.as_ref() else {
        return;
    };

    chats::render(frame, app, *chats_area);
    chat::render(frame, app, *chat_area);
}
