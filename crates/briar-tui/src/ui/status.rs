//! Status bar
//!
//! Displays the current screen, the signed-in user, preferences and the most
//! recent notification.

use briar_app::App;
use briar_core::{Severity, env::Environment};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::terminal::Chrome;

/// Render the status bar.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, chrome: &Chrome, area: Rect) {
    let user = match app.session() {
        Some(session) => Span::styled(
            session.username().to_string(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("signed out", Style::default().fg(Color::Red)),
    };

    let prefs = app.preferences();
    let settings = format!(
        " | {} | notifications {} | timer {}s",
        chrome.path,
        if prefs.notifications_enabled { "on" } else { "off" },
        prefs.disappearing_secs
    );

    let mut spans = vec![Span::raw(" "), user, Span::raw(settings)];

    if let Some(status) = app.status_message() {
        spans.push(Span::styled(format!(" | {status}"), Style::default().fg(Color::Yellow)));
    } else if let Some(toast) = &chrome.toast {
        let color = match toast.severity {
            Severity::Info => Color::White,
            Severity::Destructive => Color::Red,
        };
        spans.push(Span::styled(
            format!(" | {}: {}", toast.title, toast.description),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
