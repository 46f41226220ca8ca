//! Lyric resolution for tracks in the music directory
//!
//! This module provides:
//! - LRCLIB API client for searching and fetching synced lyrics
//! - `.lrc` sidecar storage next to each audio file
//! - A process-wide memory cache keyed by LRCLIB id
//! - The resolver tying them together: local, then cache, then remote

pub mod cache;
pub mod lrclib;
pub mod resolver;
pub mod store;

#[cfg(test)]
pub(crate) mod stub;

pub use cache::MemoryCache;
pub use lrclib::LrclibClient;
pub use resolver::LyricResolver;
pub use store::LocalLyricStore;

use serde::Serialize;

use crate::library::TrackPath;

/// What a caller asks lyrics for.
#[derive(Debug, Clone)]
pub struct TrackRef {
    pub path: TrackPath,
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl TrackRef {
    /// Blank title/artist values are treated as absent.
    pub fn new(path: TrackPath, title: Option<String>, artist: Option<String>) -> Self {
        Self {
            path,
            title: non_blank(title),
            artist: non_blank(artist),
        }
    }

    pub fn has_search_terms(&self) -> bool {
        self.title.is_some() || self.artist.is_some()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Where a resolved lyric came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricSource {
    Local,
    Cached,
    Online,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricResult {
    #[serde(rename = "lyrics")]
    pub text: String,
    pub source: LyricSource,
}

impl LyricResult {
    pub fn new(text: String, source: LyricSource) -> Self {
        Self { text, source }
    }

    /// Nothing found; the UI prompts for a manual upload.
    pub fn none() -> Self {
        Self::new(String::new(), LyricSource::None)
    }
}
