use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// A slash-separated path relative to the music root that cannot escape it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPath(PathBuf);

impl TrackPath {
    /// Validates a client-supplied track path. Any `..` anywhere in the string,
    /// a root or a drive prefix is rejected before the filesystem is touched.
    /// A non-blank path is kept as sent, surrounding spaces included.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::MissingPath);
        }
        if raw.contains("..") {
            return Err(Error::InvalidPath);
        }

        let mut clean = PathBuf::new();
        for component in Path::new(raw).components() {
            match component {
                Component::Normal(segment) => clean.push(segment),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::InvalidPath);
                }
            }
        }

        if clean.as_os_str().is_empty() {
            return Err(Error::InvalidPath);
        }
        Ok(Self(clean))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Absolute location of this track under `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl std::fmt::Display for TrackPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_path().display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_relative_paths() {
        let p = TrackPath::parse("Artist/Album/01 Song.mp3").unwrap();
        assert_eq!(p.as_path(), Path::new("Artist/Album/01 Song.mp3"));
        assert_eq!(
            p.resolve(Path::new("/music")),
            PathBuf::from("/music/Artist/Album/01 Song.mp3")
        );
    }

    #[test]
    fn drops_current_dir_segments() {
        let p = TrackPath::parse("./a/./b.flac").unwrap();
        assert_eq!(p.as_path(), Path::new("a/b.flac"));
    }

    #[test]
    fn rejects_parent_traversal() {
        assert!(matches!(TrackPath::parse("../etc/passwd"), Err(Error::InvalidPath)));
        assert!(matches!(TrackPath::parse("a/../../b.mp3"), Err(Error::InvalidPath)));
        assert!(matches!(TrackPath::parse(".."), Err(Error::InvalidPath)));
    }

    #[test]
    fn rejects_double_dots_inside_names() {
        assert!(matches!(TrackPath::parse("a..b.mp3"), Err(Error::InvalidPath)));
        assert!(matches!(TrackPath::parse(".../x.mp3"), Err(Error::InvalidPath)));
        assert!(matches!(TrackPath::parse("Band/..hidden/x.mp3"), Err(Error::InvalidPath)));
    }

    #[test]
    fn keeps_surrounding_spaces() {
        let p = TrackPath::parse("song.mp3 ").unwrap();
        assert_eq!(p.as_path(), Path::new("song.mp3 "));
        let p = TrackPath::parse(" Band/song.mp3").unwrap();
        assert_eq!(p.as_path(), Path::new(" Band/song.mp3"));
    }

    #[test]
    fn rejects_absolute_paths() {
        assert!(matches!(TrackPath::parse("/etc/passwd"), Err(Error::InvalidPath)));
    }

    #[test]
    fn empty_path_is_missing() {
        assert!(matches!(TrackPath::parse(""), Err(Error::MissingPath)));
        assert!(matches!(TrackPath::parse("   "), Err(Error::MissingPath)));
        assert!(matches!(TrackPath::parse("."), Err(Error::InvalidPath)));
    }
}
