use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use super::is_audio_file;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicFile {
    pub name: String,
    /// Slash-separated, relative to the music root.
    pub path: String,
    pub file_type: String,
    pub size: u64,
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(segments.join("/"))
}

/// Lists every audio file under `root`, sorted by relative path.
pub fn scan(root: &Path) -> Result<Vec<MusicFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_audio_file(path) {
            continue;
        }
        let Some(rel) = relative_path(root, path) else {
            continue;
        };

        files.push(MusicFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: rel,
            file_type: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: entry.metadata().map_err(std::io::Error::from)?.len(),
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
