use std::sync::Arc;

use tracing::{debug, warn};

use super::{LocalLyricStore, LrclibClient, LyricResult, LyricSource, MemoryCache, TrackRef};
use crate::config::LyricsConfig;
use crate::error::{Error, Result};

/// Finds lyrics for a track: the local sidecar first, then the memory cache
/// for LRCLIB's top search hit, then LRCLIB itself. Remote hits are written
/// back to both the cache and the sidecar.
pub struct LyricResolver {
    store: LocalLyricStore,
    cache: Arc<MemoryCache>,
    remote: LrclibClient,
}

impl LyricResolver {
    pub fn new(store: LocalLyricStore, cache: Arc<MemoryCache>, remote: LrclibClient) -> Self {
        Self {
            store,
            cache,
            remote,
        }
    }

    pub fn from_config(store: LocalLyricStore, cfg: &LyricsConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            store,
            Arc::new(MemoryCache::new(cfg.cache_capacity)),
            LrclibClient::new(cfg)?,
        ))
    }

    pub fn store(&self) -> &LocalLyricStore {
        &self.store
    }

    /// Only a track with neither sidecar nor search terms is an error; every
    /// remote failure degrades to [`LyricResult::none`].
    pub async fn resolve(&self, track: &TrackRef) -> Result<LyricResult> {
        match self.store.get(&track.path).await {
            Ok(Some(text)) => {
                debug!("lyrics for {} served from sidecar", track.path);
                return Ok(LyricResult::new(text, LyricSource::Local));
            }
            Ok(None) => debug!("no sidecar for {}", track.path),
            Err(e) => warn!("failed to read sidecar for {}: {e}", track.path),
        }

        if !track.has_search_terms() {
            return Err(Error::MissingSearchParams);
        }

        let candidates = match self
            .remote
            .search(track.title.as_deref(), track.artist.as_deref())
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("lyrics search failed for {}: {e}", track.path);
                return Ok(LyricResult::none());
            }
        };

        // No disambiguation by duration/album: LRCLIB's first hit wins.
        let Some(top) = candidates.into_iter().next() else {
            debug!(
                "no lyrics found for {:?} - {:?}",
                track.artist, track.title
            );
            return Ok(LyricResult::none());
        };
        debug!(
            "top lyric hit {} - {} ({}, {:.0}s)",
            top.artist_name, top.track_name, top.album_name, top.duration_seconds
        );
        let id = top.id;

        if let Some(text) = self.cache.get(id.as_str()) {
            return Ok(LyricResult::new(text, LyricSource::Cached));
        }

        let _fetching = self.cache.claim_fetch(id.as_str()).await;
        // Whoever held the claim before us may have filled it in.
        if let Some(text) = self.cache.get(id.as_str()) {
            return Ok(LyricResult::new(text, LyricSource::Cached));
        }

        let text = match self.remote.fetch_by_id(&id).await {
            Ok(text) => text,
            Err(e) => {
                warn!("fetching lyrics {id} failed: {e}");
                return Ok(LyricResult::none());
            }
        };

        self.cache.put(id.as_str(), &text);
        debug!("cached lyrics {id} ({} entries)", self.cache.len());
        match self.store.put(&track.path, text.as_str()).await {
            Ok(path) => debug!("saved lyrics {id} to {}", path.display()),
            Err(e) => warn!("failed to save lyrics for {} locally: {e}", track.path),
        }

        Ok(LyricResult::new(text, LyricSource::Online))
    }
}
