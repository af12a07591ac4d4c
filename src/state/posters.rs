//! In-memory poster images keyed by URL

use std::collections::HashMap;

use iced::widget::image;

#[derive(Debug, Clone)]
enum PosterState {
    Loading,
    Ready(image::Handle),
    /// Not retried for the rest of the session
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct PosterCache {
    entries: HashMap<String, PosterState>,
}

impl PosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `url` for download. Returns false if it is already loading,
    /// loaded or known to be broken.
    pub fn request(&mut self, url: &str) -> bool {
        if self.entries.contains_key(url) {
            return false;
        }
        self.entries.insert(url.to_string(), PosterState::Loading);
        true
    }

    /// Store downloaded bytes, or remember the failure
    pub fn complete(&mut self, url: &str, bytes: Option<Vec<u8>>) {
        let state = match bytes {
            Some(bytes) => PosterState::Ready(image::Handle::from_bytes(bytes)),
            None => PosterState::Failed,
        };
        self.entries.insert(url.to_string(), state);
    }

    pub fn get(&self, url: &str) -> Option<&image::Handle> {
        match self.entries.get(url) {
            Some(PosterState::Ready(handle)) => Some(handle),
            _ => None,
        }
    }

    pub fn is_loading(&self, url: &str) -> bool {
        matches!(self.entries.get(url), Some(PosterState::Loading))
    }
}
