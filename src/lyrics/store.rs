use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Result;
use crate::library::TrackPath;

/// Extension of the lyric file stored next to each track.
pub const LYRIC_EXTENSION: &str = "lrc";

/// `.lrc` sidecars living beside the audio files under the music root.
#[derive(Debug, Clone)]
pub struct LocalLyricStore {
    root: PathBuf,
}

impl LocalLyricStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `Artist/song.mp3` -> `<root>/Artist/song.lrc`
    pub fn sidecar_path(&self, track: &TrackPath) -> PathBuf {
        track.resolve(&self.root).with_extension(LYRIC_EXTENSION)
    }

    /// Raw sidecar contents, or `None` when the track has no sidecar.
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    pub async fn get(&self, track: &TrackPath) -> Result<Option<String>> {
        match tokio::fs::read(self.sidecar_path(track)).await {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the sidecar with `content`, creating parent directories as needed.
    pub async fn put(&self, track: &TrackPath, content: impl Into<Vec<u8>>) -> Result<PathBuf> {
        let path = self.sidecar_path(track);
        let content = content.into();
        let target = path.clone();
        tokio::task::spawn_blocking(move || replace_file(&target, &content))
            .await
            .map_err(io::Error::other)??;
        Ok(path)
    }
}

/// Writes through a temp file in the same directory and renames it over `path`,
/// so readers never observe a half-written sidecar.
fn replace_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file().set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
