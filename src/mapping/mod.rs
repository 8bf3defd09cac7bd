// The label/format mapping table
//
// Associates each canonical label ("TITLE", "TRACK", "COVER", ...) with its
// native key in each supported tag schema. Rows come from an external
// label/format matrix (fetched or cached); a small set of hard-coded
// overrides is applied on top, then the table is inverted into a per-format
// native-key index. Built once per run and read-only afterwards.

pub mod source;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, TagError};
use crate::format::TagFormat;
use crate::id3;
use crate::mp4;

pub use source::{HttpMappingSource, LabelMatrix, MappingSource};

/// Well-known canonical labels
pub mod label {
    pub const COVER: &str = "COVER";
    pub const DESCRIPTION: &str = "DESCRIPTION";
    pub const TRACK: &str = "TRACK";
    pub const DISCNUMBER: &str = "DISCNUMBER";
    pub const GENRE: &str = "GENRE";
    pub const COMMENT: &str = "COMMENT";

    /// Catch-all row of the external matrix, dropped during table build
    pub const OTHER_FIELDS: &str = "Other fields";
}

/// When two labels claim the same native key in one format, the label
/// appearing earlier here wins; unlisted labels lose to listed ones and
/// tie-break by first-seen (label order). The external matrix is known to
/// contain such collisions (genre spellings in particular).
const COLLISION_PRIORITY: &[&str] = &[label::GENRE, label::COMMENT];

/// Native keys of one label across the supported formats
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingEntry {
    keys: BTreeMap<TagFormat, String>,
}

impl MappingEntry {
    pub fn native_key(&self, format: TagFormat) -> Option<&str> {
        self.keys.get(&format).map(String::as_str)
    }

    pub fn formats(&self) -> impl Iterator<Item = (TagFormat, &str)> {
        self.keys.iter().map(|(fmt, key)| (*fmt, key.as_str()))
    }
}

/// Immutable two-way index over the label/format matrix
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    by_label: BTreeMap<String, MappingEntry>,
    by_format: HashMap<TagFormat, HashMap<String, String>>,
}

impl MappingTable {
    /// Build the table from a raw matrix, applying the unconditional
    /// post-processing: drop the catch-all row, inject COVER, merge the
    /// DESCRIPTION custom-field keys, normalize cosmetic key variants,
    /// ignore unknown columns, then invert into the per-format index.
    pub fn from_matrix(mut matrix: LabelMatrix) -> Self {
        matrix.remove(label::OTHER_FIELDS);

        matrix.insert(
            label::COVER.to_string(),
            BTreeMap::from([
                (TagFormat::Id3v23.name().to_string(), id3::COVER_KEY.to_string()),
                (TagFormat::Id3v24.name().to_string(), id3::COVER_KEY.to_string()),
                (TagFormat::Mp4.name().to_string(), mp4::COVER_KEY.to_string()),
            ]),
        );

        let description = matrix.entry(label::DESCRIPTION.to_string()).or_default();
        for fmt in [TagFormat::Id3v23, TagFormat::Id3v24] {
            description.insert(
                fmt.name().to_string(),
                id3::custom_field_key(label::DESCRIPTION),
            );
        }

        let mut by_label: BTreeMap<String, MappingEntry> = BTreeMap::new();
        for (lbl, cells) in matrix {
            let mut entry = MappingEntry::default();
            for (column, cell) in cells {
                let Some(format) = TagFormat::from_name(&column) else {
                    continue;
                };
                entry.keys.insert(format, normalize_native_key(&cell));
            }
            if !entry.keys.is_empty() {
                by_label.insert(lbl, entry);
            }
        }

        let mut by_format: HashMap<TagFormat, HashMap<String, String>> = HashMap::new();
        for (lbl, entry) in &by_label {
            for (format, key) in entry.formats() {
                let index = by_format.entry(format).or_default();
                match index.get(key) {
                    Some(existing) if !outranks(lbl, existing) => {
                        debug!(
                            "mapping collision in {format}: key {key:?} kept for \
                             {existing:?}, dropped for {lbl:?}"
                        );
                    }
                    Some(existing) => {
                        debug!(
                            "mapping collision in {format}: key {key:?} reassigned \
                             from {existing:?} to {lbl:?}"
                        );
                        index.insert(key.to_string(), lbl.clone());
                    }
                    None => {
                        index.insert(key.to_string(), lbl.clone());
                    }
                }
            }
        }

        MappingTable { by_label, by_format }
    }

    /// Build the table from cache or the external source, writing a freshly
    /// fetched matrix back to the cache path when one was given. Fatal when
    /// neither yields a usable matrix.
    pub fn load(source: &dyn MappingSource, cache_path: Option<&Path>) -> Result<Self> {
        let cached = cache_path.and_then(source::load_cache);
        let (matrix, fresh) = match cached {
            Some(matrix) => (matrix, false),
            None => (source.fetch()?, true),
        };

        if fresh {
            if let Some(path) = cache_path {
                if let Err(err) = source::store_cache(path, &matrix) {
                    warn!("failed to write mapping cache '{}': {err}", path.display());
                }
            }
        }

        let table = Self::from_matrix(matrix);
        if table.by_label.is_empty() {
            return Err(TagError::MappingUnavailable {
                reason: "mapping matrix is empty".to_string(),
            });
        }
        Ok(table)
    }

    pub fn entry(&self, lbl: &str) -> Option<&MappingEntry> {
        self.by_label.get(lbl)
    }

    /// Native key of a label in a format, if the field exists there
    pub fn native_key(&self, lbl: &str, format: TagFormat) -> Option<&str> {
        self.by_label.get(lbl)?.native_key(format)
    }

    /// Label owning a native key in a format
    pub fn label_for(&self, format: TagFormat, native_key: &str) -> Option<&str> {
        self.by_format
            .get(&format)?
            .get(native_key)
            .map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, &MappingEntry)> {
        self.by_label.iter().map(|(lbl, entry)| (lbl.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Cosmetic normalization of native keys from the external matrix: a
/// lowercased artist-atom spelling, and the genre-atom cell which lists the
/// legacy alternative ("©gen | gnre") collapsed to the canonical atom.
fn normalize_native_key(cell: &str) -> String {
    let cell = cell.replace("\u{a9}art", "\u{a9}ART");
    if cell.contains("\u{a9}gen") {
        return "\u{a9}gen".to_string();
    }
    cell
}

fn outranks(new: &str, existing: &str) -> bool {
    priority_rank(new) < priority_rank(existing)
}

fn priority_rank(lbl: &str) -> usize {
    COLLISION_PRIORITY
        .iter()
        .position(|p| *p == lbl)
        .unwrap_or(COLLISION_PRIORITY.len())
}

#[cfg(test)]
pub(crate) mod test_matrix {
    use super::*;

    /// A representative slice of the external matrix
    pub fn sample() -> LabelMatrix {
        let rows: &[(&str, &[(&str, &str)])] = &[
            ("TITLE", &[("ID3v2.3", "TIT2"), ("ID3v2.4", "TIT2"), ("MP4", "\u{a9}nam")]),
            ("ARTIST", &[("ID3v2.3", "TPE1"), ("ID3v2.4", "TPE1"), ("MP4", "\u{a9}art")]),
            ("ALBUM", &[("ID3v2.3", "TALB"), ("ID3v2.4", "TALB"), ("MP4", "\u{a9}alb")]),
            ("ALBUMARTIST", &[("ID3v2.3", "TPE2"), ("ID3v2.4", "TPE2"), ("MP4", "aART")]),
            ("TRACK", &[("ID3v2.3", "TRCK"), ("ID3v2.4", "TRCK"), ("MP4", "trkn")]),
            ("DISCNUMBER", &[("ID3v2.3", "TPOS"), ("ID3v2.4", "TPOS"), ("MP4", "disk")]),
            ("GENRE", &[("ID3v2.3", "TCON"), ("ID3v2.4", "TCON"), ("MP4", "\u{a9}gen | gnre")]),
            ("COMMENT", &[("ID3v2.3", "COMM"), ("ID3v2.4", "COMM"), ("MP4", "\u{a9}cmt")]),
            ("BPM", &[("ID3v2.3", "TBPM"), ("ID3v2.4", "TBPM"), ("MP4", "tmpo")]),
            ("MOOD", &[("ID3v2.4", "TMOO"), ("MP4", "----:com.apple.iTunes:MOOD")]),
            ("DESCRIPTION", &[("MP4", "desc"), ("Notes", "podcast field")]),
            ("Other fields", &[("ID3v2.3", "TXXX"), ("MP4", "----")]),
        ];

        rows.iter()
            .map(|(lbl, cells)| {
                (
                    lbl.to_string(),
                    cells
                        .iter()
                        .map(|(col, key)| (col.to_string(), key.to_string()))
                        .collect(),
                )
            })
            .collect()
    }

    pub fn sample_table() -> MappingTable {
        MappingTable::from_matrix(sample())
    }
}
