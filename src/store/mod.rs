// Tag persistence boundary
//
// Byte-level container reading/writing is delegated to an external tag
// library; the engine only needs the TagStore contract: enumerate native
// key/value pairs, set a key, then save. The shipped implementation works
// on JSON tag dumps, the interchange form the persistence collaborator
// produces and consumes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagError};
use crate::format::{Container, TagFormat};
use crate::value::{TagRecord, TagValue};

/// Contract of the tag-persistence collaborator
pub trait TagStore {
    fn tag_format(&self) -> TagFormat;

    /// All native key/value records, ordered lexicographically by key
    fn entries(&self) -> Vec<TagRecord>;

    fn set(&mut self, key: String, value: TagValue);

    fn remove(&mut self, key: &str) -> Option<TagValue>;

    /// Persist all applied changes; called once after a full translation
    fn save(&mut self) -> Result<()>;
}

/// An in-memory tag set with its schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDump {
    pub format: TagFormat,
    #[serde(default)]
    pub tags: BTreeMap<String, TagValue>,
}

impl TagDump {
    pub fn new(format: TagFormat) -> Self {
        TagDump {
            format,
            tags: BTreeMap::new(),
        }
    }
}

impl TagStore for TagDump {
    fn tag_format(&self) -> TagFormat {
        self.format
    }

    fn entries(&self) -> Vec<TagRecord> {
        self.tags
            .iter()
            .map(|(key, value)| TagRecord {
                key: key.clone(),
                value: value.clone(),
                format: self.format,
            })
            .collect()
    }

    fn set(&mut self, key: String, value: TagValue) {
        self.tags.insert(key, value);
    }

    fn remove(&mut self, key: &str) -> Option<TagValue> {
        self.tags.remove(key)
    }

    fn save(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A tag dump backed by a JSON file on disk
#[derive(Debug)]
pub struct DumpFile {
    path: PathBuf,
    pub dump: TagDump,
}

impl DumpFile {
    /// Load an existing dump
    pub fn open(path: &Path) -> Result<Self> {
        let body = fs::read_to_string(path)?;
        let dump = serde_json::from_str(&body).map_err(|err| TagError::MalformedDump {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Ok(DumpFile {
            path: path.to_path_buf(),
            dump,
        })
    }

    /// Load an existing dump, or start an empty one in the given format
    pub fn open_or_create(path: &Path, format: TagFormat) -> Result<Self> {
        if path.exists() {
            Self::open(path)
        } else {
            Ok(DumpFile {
                path: path.to_path_buf(),
                dump: TagDump::new(format),
            })
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tag schema implied by a dump file name: dumps sit next to the audio
    /// file as `<name>.<audio ext>.json`, so the inner extension names the
    /// container
    pub fn infer_format(path: &Path) -> Result<TagFormat> {
        let stem = path
            .file_stem()
            .map(PathBuf::from)
            .ok_or_else(|| TagError::UnrecognisedFormat(path.display().to_string()))?;
        Ok(Container::from_path(&stem)?.default_tag_format())
    }

    /// Dump path conventionally accompanying an audio file
    pub fn sidecar_path(audio_path: &Path) -> PathBuf {
        let mut name = audio_path.as_os_str().to_os_string();
        name.push(".json");
        PathBuf::from(name)
    }
}

impl TagStore for DumpFile {
    fn tag_format(&self) -> TagFormat {
        self.dump.format
    }

    fn entries(&self) -> Vec<TagRecord> {
        self.dump.entries()
    }

    fn set(&mut self, key: String, value: TagValue) {
        self.dump.set(key, value);
    }

    fn remove(&mut self, key: &str) -> Option<TagValue> {
        self.dump.remove(key)
    }

    fn save(&mut self) -> Result<()> {
        let body =
            serde_json::to_string_pretty(&self.dump).map_err(|err| TagError::MalformedDump {
                path: self.path.clone(),
                reason: err.to_string(),
            })?;
        fs::write(&self.path, body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::Id3Frame;
    use crate::mp4::{Mp4Cover, CoverFormat, Mp4Value};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tagbridge-store-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_dump_file_round_trip() {
        let path = temp_path("song.mp3.json");
        let mut file = DumpFile::open_or_create(&path, TagFormat::Id3v24).unwrap();
        file.set(
            "TIT2".to_string(),
            TagValue::Id3(Id3Frame::Text {
                text: vec!["A Song".to_string()],
            }),
        );
        file.set(
            "APIC:".to_string(),
            TagValue::Id3(Id3Frame::cover("image/jpeg".to_string(), vec![0xff, 0xd8, 0x00])),
        );
        file.save().unwrap();

        let reloaded = DumpFile::open(&path).unwrap();
        assert_eq!(reloaded.dump, file.dump);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_cover_bytes_survive_json() {
        let dump = TagDump {
            format: TagFormat::Mp4,
            tags: BTreeMap::from([(
                "covr".to_string(),
                TagValue::Mp4(Mp4Value::Covers {
                    values: vec![Mp4Cover {
                        format: CoverFormat::Png,
                        data: vec![0x89, 0x50, 0x4e, 0x47],
                    }],
                }),
            )]),
        };
        let body = serde_json::to_string(&dump).unwrap();
        let reloaded: TagDump = serde_json::from_str(&body).unwrap();
        assert_eq!(reloaded, dump);
    }

    #[test]
    fn test_entries_sorted_by_key() {
        let mut dump = TagDump::new(TagFormat::Id3v24);
        dump.set("TPE1".into(), TagValue::Id3(Id3Frame::Text { text: vec!["x".into()] }));
        dump.set("TALB".into(), TagValue::Id3(Id3Frame::Text { text: vec!["y".into()] }));
        let keys: Vec<_> = dump.entries().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["TALB", "TPE1"]);
    }

    #[test]
    fn test_format_inference_from_dump_name() {
        assert_eq!(
            DumpFile::infer_format(Path::new("x/song.mp3.json")).unwrap(),
            TagFormat::Id3v24
        );
        assert_eq!(
            DumpFile::infer_format(Path::new("song.m4a.json")).unwrap(),
            TagFormat::Mp4
        );
        assert!(DumpFile::infer_format(Path::new("song.json")).is_err());
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            DumpFile::sidecar_path(Path::new("a/song.m4a")),
            PathBuf::from("a/song.m4a.json")
        );
    }
}
