//! File picker collaborator and blob locators.

use crate::{Media, env::Environment};

/// Yields at most one selected file.
pub trait FilePicker {
    /// Selected file contents, `None` if the user picked nothing.
    fn pick(&mut self) -> Option<Vec<u8>>;
}

/// Picker that never selects anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFile;

impl FilePicker for NoFile {
    fn pick(&mut self) -> Option<Vec<u8>> {
        None
    }
}

/// Picker that yields pre-loaded files in order.
#[derive(Debug, Clone, Default)]
pub struct QueuedFiles {
    files: std::collections::VecDeque<Vec<u8>>,
}

impl QueuedFiles {
    /// Queue the given files.
    pub fn new(files: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self { files: files.into_iter().collect() }
    }
}

impl FilePicker for QueuedFiles {
    fn pick(&mut self) -> Option<Vec<u8>> {
        self.files.pop_front()
    }
}

/// Opaque locator for picked content.
///
/// The locator is not validated and the bytes are not retained; it only gives
/// the attachment something displayable to point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLocator(String);

impl MediaLocator {
    /// Build a `blob:` locator for `bytes`.
    pub fn from_blob<E: Environment>(env: &E, bytes: &[u8]) -> Self {
        Self(format!("blob:{:032x}-{}", env.random_u128(), bytes.len()))
    }

    /// Locator string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Regular image attachment pointing at this locator.
    pub fn into_image(self) -> Media {
        Media::image(self.0)
    }
}
