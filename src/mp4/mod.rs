// MP4/M4A tag schema support
//
// iTunes-style metadata atoms under moov/udta/meta/ilst. Values are lists:
// text atoms hold strings, trkn/disk hold index/total pairs, covr holds
// cover images with an image-format code, and freeform ----: atoms hold
// marked byte payloads. Atom-level container parsing belongs to the
// tag-persistence layer.

use serde::{Deserialize, Serialize};

use crate::utils::b64;
use crate::utils::encoding::{self, DataEncoding};
use crate::value::IndexTotal;

/// Prefix of freeform atom keys, `----:com.apple.iTunes:<name>`
pub const FREEFORM_PREFIX: &str = "----:com.apple.iTunes:";
/// Short display form of freeform keys
pub const FREEFORM_DISPLAY: &str = "----";
/// Cover artwork atom
pub const COVER_KEY: &str = "covr";

/// Extract `<name>` from a `----:com.apple.iTunes:<name>` key
pub fn freeform_field_name(key: &str) -> Option<&str> {
    key.strip_prefix(FREEFORM_PREFIX)
}

/// Build the freeform key for a field name
pub fn freeform_key(name: &str) -> String {
    format!("{FREEFORM_PREFIX}{name}")
}

/// Image-format code of a cover atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverFormat {
    Jpeg,
    Png,
}

impl CoverFormat {
    /// Numeric data-format code stored in the atom
    pub fn code(&self) -> u32 {
        match self {
            CoverFormat::Jpeg => 13,
            CoverFormat::Png => 14,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            13 => Some(CoverFormat::Jpeg),
            14 => Some(CoverFormat::Png),
            _ => None,
        }
    }

    /// Fixed image-format/MIME table shared with the ID3 picture frame
    pub fn mime(&self) -> &'static str {
        match self {
            CoverFormat::Jpeg => "image/jpeg",
            CoverFormat::Png => "image/png",
        }
    }

    /// Inverse of [`CoverFormat::mime`]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(CoverFormat::Jpeg),
            "image/png" => Some(CoverFormat::Png),
            _ => None,
        }
    }
}

/// One cover image as stored in a covr atom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mp4Cover {
    pub format: CoverFormat,
    #[serde(with = "b64")]
    pub data: Vec<u8>,
}

/// One payload of a freeform atom: opaque bytes plus an encoding marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeformData {
    pub encoding: DataEncoding,
    #[serde(with = "b64")]
    pub data: Vec<u8>,
}

impl FreeformData {
    /// UTF-8 payload, the freeform convention for custom text fields
    pub fn utf8(text: &str) -> Self {
        FreeformData {
            encoding: DataEncoding::Utf8,
            data: text.as_bytes().to_vec(),
        }
    }

    /// Decode per the encoding marker; None for malformed payloads
    pub fn decode(&self) -> Option<String> {
        encoding::decode_text(&self.data, self.encoding)
    }
}

/// An MP4 atom value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "atom", rename_all = "snake_case")]
pub enum Mp4Value {
    /// Text atom values
    Text { values: Vec<String> },
    /// trkn/disk index-total pairs
    Pairs { values: Vec<IndexTotal> },
    /// Freeform payloads
    Freeform { values: Vec<FreeformData> },
    /// covr images
    Covers { values: Vec<Mp4Cover> },
}

impl Mp4Value {
    pub fn text(values: Vec<String>) -> Self {
        Mp4Value::Text { values }
    }
}

/// One entry of the atom catalog
pub struct AtomSpec {
    /// Raw four-byte atom identifier (© is the single byte 0xA9)
    pub raw: &'static [u8; 4],
    pub name: &'static str,
    pub description: &'static str,
}

/// Atom catalog: known metadata atoms with their descriptions, used by the
/// classifier for diagnostic display
pub static ATOM_CATALOG: &[AtomSpec] = &[
    AtomSpec { raw: b"\xA9nam", name: "\u{a9}nam", description: "track title" },
    AtomSpec { raw: b"\xA9alb", name: "\u{a9}alb", description: "album" },
    AtomSpec { raw: b"\xA9ART", name: "\u{a9}ART", description: "artist" },
    AtomSpec { raw: b"aART", name: "aART", description: "album artist" },
    AtomSpec { raw: b"\xA9wrt", name: "\u{a9}wrt", description: "composer" },
    AtomSpec { raw: b"\xA9day", name: "\u{a9}day", description: "year" },
    AtomSpec { raw: b"\xA9cmt", name: "\u{a9}cmt", description: "comment" },
    AtomSpec { raw: b"desc", name: "desc", description: "description" },
    AtomSpec { raw: b"purd", name: "purd", description: "purchase date" },
    AtomSpec { raw: b"\xA9grp", name: "\u{a9}grp", description: "grouping" },
    AtomSpec { raw: b"\xA9gen", name: "\u{a9}gen", description: "genre" },
    AtomSpec { raw: b"gnre", name: "gnre", description: "genre as numeric code" },
    AtomSpec { raw: b"trkn", name: "trkn", description: "track number and total" },
    AtomSpec { raw: b"disk", name: "disk", description: "disc number and total" },
    AtomSpec { raw: b"tmpo", name: "tmpo", description: "tempo/BPM" },
    AtomSpec { raw: b"cpil", name: "cpil", description: "part of a compilation" },
    AtomSpec { raw: b"covr", name: "covr", description: "cover artwork" },
    AtomSpec { raw: b"\xA9lyr", name: "\u{a9}lyr", description: "lyrics" },
    AtomSpec { raw: b"\xA9too", name: "\u{a9}too", description: "encoded by" },
    AtomSpec { raw: b"cprt", name: "cprt", description: "copyright" },
    AtomSpec { raw: b"soal", name: "soal", description: "album sort order" },
    AtomSpec { raw: b"soaa", name: "soaa", description: "album artist sort order" },
    AtomSpec { raw: b"soar", name: "soar", description: "artist sort order" },
    AtomSpec { raw: b"sonm", name: "sonm", description: "title sort order" },
    AtomSpec { raw: b"soco", name: "soco", description: "composer sort order" },
    AtomSpec { raw: b"pgap", name: "pgap", description: "part of a gapless album" },
    AtomSpec { raw: b"pcst", name: "pcst", description: "podcast" },
    AtomSpec { raw: b"tvsh", name: "tvsh", description: "TV show name" },
];

/// Look up an atom by its display name
pub fn atom_spec(name: &str) -> Option<&'static AtomSpec> {
    ATOM_CATALOG.iter().find(|spec| spec.name == name)
}

/// Look up an atom by its raw four-byte identifier
pub fn atom_spec_by_raw(raw: &[u8]) -> Option<&'static AtomSpec> {
    ATOM_CATALOG.iter().find(|spec| spec.raw[..] == *raw)
}

/// Raw byte form of an atom key: each char must fit in one byte (© maps
/// to 0xA9) and the key must be exactly four bytes long
pub fn key_raw_bytes(key: &str) -> Option<[u8; 4]> {
    let mut bytes = [0u8; 4];
    let mut len = 0;
    for c in key.chars() {
        let code = u32::from(c);
        if code > 0xFF || len == 4 {
            return None;
        }
        bytes[len] = code as u8;
        len += 1;
    }
    (len == 4).then_some(bytes)
}

/// Well-known atoms with conventional lowercase field labels, used for
/// diagnostic display
static WELL_KNOWN: &[(&str, &str)] = &[
    ("\u{a9}ART", "artist"),
    ("\u{a9}alb", "album"),
    ("\u{a9}cmt", "comment"),
    ("\u{a9}day", "date"),
    ("\u{a9}gen", "genre"),
    ("\u{a9}lyr", "lyrics"),
    ("\u{a9}nam", "title"),
    ("\u{a9}wrt", "composer"),
    ("aART", "albumartist"),
    ("cpil", "compilation"),
    ("disk", "discnumber"),
    ("tmpo", "bpm"),
    ("trkn", "tracknumber"),
];

/// Conventional label for a well-known atom
pub fn well_known_label(key: &str) -> Option<&'static str> {
    WELL_KNOWN
        .iter()
        .find(|(atom, _)| *atom == key)
        .map(|(_, label)| *label)
}
