use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::lyrics::{LocalLyricStore, LyricResolver};

pub type GuardedResolver = Arc<LyricResolver>;

#[derive(Clone)]
pub struct ServerState {
    pub resolver: GuardedResolver,
    pub music_dir: MusicDir,
}

/// Root every requested track path is resolved against.
#[derive(Clone)]
pub struct MusicDir(pub Arc<PathBuf>);

impl ServerState {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let store = LocalLyricStore::new(cfg.paths.music_dir.clone());
        let resolver = LyricResolver::from_config(store, &cfg.lyrics)?;
        Ok(Self::with_resolver(resolver))
    }

    pub fn with_resolver(resolver: LyricResolver) -> Self {
        let music_dir = MusicDir(Arc::new(resolver.store().root().to_path_buf()));
        Self {
            resolver: Arc::new(resolver),
            music_dir,
        }
    }
}

impl FromRef<ServerState> for GuardedResolver {
    fn from_ref(input: &ServerState) -> Self {
        input.resolver.clone()
    }
}

impl FromRef<ServerState> for MusicDir {
    fn from_ref(input: &ServerState) -> Self {
        input.music_dir.clone()
    }
}
