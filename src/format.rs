// Tag schema and container identification

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagError};

/// Supported tag schemas
///
/// The serde/display names double as the column names of the external
/// label/format matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagFormat {
    #[serde(rename = "ID3v2.3")]
    Id3v23,
    #[serde(rename = "ID3v2.4")]
    Id3v24,
    #[serde(rename = "MP4")]
    Mp4,
}

impl TagFormat {
    pub const ALL: [TagFormat; 3] = [TagFormat::Id3v23, TagFormat::Id3v24, TagFormat::Mp4];

    pub fn name(&self) -> &'static str {
        match self {
            TagFormat::Id3v23 => "ID3v2.3",
            TagFormat::Id3v24 => "ID3v2.4",
            TagFormat::Mp4 => "MP4",
        }
    }

    /// Parse a matrix column name; unknown columns (e.g. "Notes") yield None
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ID3v2.3" => Some(TagFormat::Id3v23),
            "ID3v2.4" => Some(TagFormat::Id3v24),
            "MP4" => Some(TagFormat::Mp4),
            _ => None,
        }
    }

    pub fn is_id3(&self) -> bool {
        matches!(self, TagFormat::Id3v23 | TagFormat::Id3v24)
    }
}

impl fmt::Display for TagFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Audio container kind, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Mp3,
    Mp4,
}

impl Container {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("mp3") => Ok(Container::Mp3),
            Some("m4a") | Some("m4b") | Some("mp4") => Ok(Container::Mp4),
            _ => Err(TagError::UnrecognisedFormat(path.display().to_string())),
        }
    }

    /// Tag schema assumed for a container when the tags themselves do not
    /// say otherwise (untagged MP3 files default to ID3v2.4)
    pub fn default_tag_format(&self) -> TagFormat {
        match self {
            Container::Mp3 => TagFormat::Id3v24,
            Container::Mp4 => TagFormat::Mp4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_names_round_trip() {
        for fmt in TagFormat::ALL {
            assert_eq!(TagFormat::from_name(fmt.name()), Some(fmt));
        }
        assert_eq!(TagFormat::from_name("Notes"), None);
    }

    #[test]
    fn test_container_detection() {
        assert_eq!(
            Container::from_path(&PathBuf::from("a/b/song.mp3")).unwrap(),
            Container::Mp3
        );
        assert_eq!(
            Container::from_path(&PathBuf::from("song.M4A")).unwrap(),
            Container::Mp4
        );
        assert!(Container::from_path(&PathBuf::from("song.flac")).is_err());
    }
}
