//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and handles
//! character-level key events. On Enter the line becomes an [`AppEvent`].

use briar_app::{AppEvent, Command};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Input state for the TUI.
///
/// Manages the text input buffer and cursor position.
/// Handles all character-level key events.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position in characters (not bytes).
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Byte offset of the character at `index`.
    fn byte_offset(&self, index: usize) -> usize {
        self.buffer.char_indices().nth(index).map_or(self.buffer.len(), |(offset, _)| offset)
    }

    /// Handle a key input event.
    ///
    /// Returns the event for the App, if any: a repaint after editing, the
    /// parsed line on Enter, or quit on Esc.
    pub fn handle_key(&mut self, key: KeyInput) -> Option<AppEvent> {
        match key {
            KeyInput::Char(c) => {
                let offset = self.byte_offset(self.cursor);
                self.buffer.insert(offset, c);
                self.cursor = self.cursor.saturating_add(1);
                Some(AppEvent::Redraw)
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let offset = self.byte_offset(self.cursor);
                    self.buffer.remove(offset);
                }
                Some(AppEvent::Redraw)
            },
            KeyInput::Delete => {
                if self.cursor < self.len() {
                    let offset = self.byte_offset(self.cursor);
                    self.buffer.remove(offset);
                }
                Some(AppEvent::Redraw)
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Some(AppEvent::Redraw)
            },
            KeyInput::Right => {
                if self.cursor < self.len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
                Some(AppEvent::Redraw)
            },
            KeyInput::Home => {
                self.cursor = 0;
                Some(AppEvent::Redraw)
            },
            KeyInput::End => {
                self.cursor = self.len();
                Some(AppEvent::Redraw)
            },
            KeyInput::Enter => self.handle_enter(),
            KeyInput::Esc => Some(Command::Quit.into()),
        }
    }

    /// Handle Enter key - take the line and parse it.
    fn handle_enter(&mut self) -> Option<AppEvent> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if text.trim().is_empty() {
            return Some(AppEvent::Redraw);
        }
        Some(AppEvent::from_line(&text))
    }
}
