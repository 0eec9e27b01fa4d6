//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering.

use std::{
    io::{self, Stdout, stdout},
    time::{Duration, Instant},
};

use briar_app::{App, AppEvent, Command, Driver};
use briar_core::{Notification, env::Environment};
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{InputState, KeyInput, ui};

/// Interval between ticks when no key is pressed.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Chrome around the App state: input line, last notification, current
/// path.
#[derive(Debug, Default)]
pub struct Chrome {
    /// Input line being edited.
    pub input: InputState,
    /// Most recent notification.
    pub toast: Option<Notification>,
    /// Current screen path.
    pub path: String,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm) and rendering (ratatui). Owns the input
/// state for text editing.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    chrome: Chrome,
}

impl TerminalDriver {
    /// Create a new terminal driver, switching to the alternate screen.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self {
            terminal,
            event_stream,
            chrome: Chrome { path: "/login".into(), ..Chrome::default() },
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                            return Ok(Some(Command::Quit.into()));
                        }
                        Ok(Self::convert_key(key.code).and_then(|k| self.chrome.input.handle_key(k)))
                    },
                    Some(Ok(Event::Resize(..))) => Ok(Some(AppEvent::Redraw)),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(None),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(TICK_INTERVAL) => Ok(None),
        }
    }

    fn pick_file(&mut self, hint: &str) -> Option<Vec<u8>> {
        read_attachment(hint)
    }

    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn render<E>(&mut self, app: &App<E>) -> Result<(), Self::Error>
    where
        E: Environment<Instant = Self::Instant>,
    {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.chrome);
        })?;
        Ok(())
    }

    fn notify(&mut self, notification: &Notification) {
        self.chrome.toast = Some(notification.clone());
    }

    fn navigate(&mut self, path: &str) {
        self.chrome.path = path.to_string();
    }

    fn stop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

/// Read the file at `path` for an attachment. Blank or unreadable paths
/// yield nothing.
fn read_attachment(path: &str) -> Option<Vec<u8>> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    match std::fs::read(path) {
        Ok(bytes) => {
            debug!(path, len = bytes.len(), "file picked");
            Some(bytes)
        },
        Err(err) => {
            warn!(path, %err, "cannot read attachment");
            None
        },
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_attachment_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let path = file.path().to_string_lossy().into_owned();
        assert_eq!(read_attachment(&format!("  {path} ")), Some(vec![0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn blank_or_missing_path_yields_nothing() {
        assert_eq!(read_attachment("   "), None);

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        assert_eq!(read_attachment(&missing.to_string_lossy()), None);
    }

    #[test]
    fn keys_map_to_input() {
        assert_eq!(TerminalDriver::convert_key(KeyCode::Char('x')), Some(KeyInput::Char('x')));
        assert_eq!(TerminalDriver::convert_key(KeyCode::Enter), Some(KeyInput::Enter));
        assert_eq!(TerminalDriver::convert_key(KeyCode::F(1)), None);
    }
}
