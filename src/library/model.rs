use std::path::PathBuf;
use std::time::Duration;

/// A playable song from one of the scanned roots.
///
/// Two tracks are the same song when artist and title match; the path is
/// not part of the identity.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: u32,
    pub artist: String,
    pub title: String,
    pub path: PathBuf,
    /// Length read from tag metadata, when the scanner found one.
    pub duration: Option<Duration>,
}

impl Track {
    pub fn new(artist: impl Into<String>, title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: 0,
            artist: artist.into(),
            title: title.into(),
            path: path.into(),
            duration: None,
        }
    }

    /// `Artist - Title`, the name shown everywhere in the shell.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.artist == other.artist && self.title == other.title
    }
}

impl Eq for Track {}
