// ID3v2 tag schema support
//
// Values are modeled after the on-tag frame shapes: text frames keyed by
// their four-character frame ID, user-defined text frames (TXXX) keyed by
// a descriptor, comment frames keyed by language and descriptor, attached
// pictures and private frames. Byte-level frame encoding/decoding is the
// job of the tag-persistence layer, not this module.

use serde::{Deserialize, Serialize};

use crate::utils::b64;

/// Prefix of user-defined text frame keys, `TXXX:<name>`
pub const CUSTOM_PREFIX: &str = "TXXX:";
/// Prefix of private frame keys, `PRIV:<owner>`
pub const PRIVATE_PREFIX: &str = "PRIV:";
/// Plain comment frame ID
pub const COMMENT_KEY: &str = "COMM";
/// Prefix shared by all qualified comment keys
pub const COMMENT_PREFIX: &str = "COMM:";
/// Comment key carrying the default language marker
pub const COMMENT_KEY_DEFAULT_LANG: &str = "COMM::eng";
/// Embedded front-cover picture key
pub const COVER_KEY: &str = "APIC:";
/// Language written into newly constructed comment frames
pub const DEFAULT_LANG: &str = "eng";

/// Picture type code for a front cover
pub const PICTURE_TYPE_COVER_FRONT: u8 = 3;

/// Extract `<name>` from a `TXXX:<name>` key
pub fn custom_field_name(key: &str) -> Option<&str> {
    key.strip_prefix(CUSTOM_PREFIX)
}

/// Build the `TXXX:<name>` key for a field name
pub fn custom_field_key(name: &str) -> String {
    format!("{CUSTOM_PREFIX}{name}")
}

/// An ID3v2 frame value, shared by the v2.3 and v2.4 schemas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum Id3Frame {
    /// Any standard text frame; the frame ID lives in the tag key
    Text { text: Vec<String> },
    /// User-defined text frame (TXXX)
    UserText { desc: String, text: Vec<String> },
    /// Comment frame (COMM)
    Comment {
        lang: String,
        desc: String,
        text: Vec<String>,
    },
    /// Attached picture (APIC)
    Picture {
        mime: String,
        picture_type: u8,
        desc: String,
        #[serde(with = "b64")]
        data: Vec<u8>,
    },
    /// Private frame (PRIV)
    Private {
        owner: String,
        #[serde(with = "b64")]
        data: Vec<u8>,
    },
}

impl Id3Frame {
    /// Text content for the text-bearing frame shapes
    pub fn text(&self) -> Option<&[String]> {
        match self {
            Id3Frame::Text { text }
            | Id3Frame::UserText { text, .. }
            | Id3Frame::Comment { text, .. } => Some(text),
            Id3Frame::Picture { .. } | Id3Frame::Private { .. } => None,
        }
    }

    /// Front-cover picture frame with empty description
    pub fn cover(mime: String, data: Vec<u8>) -> Self {
        Id3Frame::Picture {
            mime,
            picture_type: PICTURE_TYPE_COVER_FRONT,
            desc: String::new(),
            data,
        }
    }
}

/// Frame payload family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Plain text frame constructible from a text list
    Text,
    /// Anything else (pictures, comments, binary frames)
    Other,
}

/// One entry of the frame-type catalog
pub struct FrameSpec {
    pub id: &'static str,
    pub description: &'static str,
    pub kind: FrameKind,
}

/// Frame-type catalog: known frame IDs of the v2.3 and v2.4 schemas with
/// their one-line descriptions. The translator consults it as the explicit
/// constructor registry for text frames; the classifier uses the
/// descriptions for display.
pub static FRAME_CATALOG: &[FrameSpec] = &[
    FrameSpec { id: "TALB", description: "Album/Movie/Show title", kind: FrameKind::Text },
    FrameSpec { id: "TBPM", description: "BPM", kind: FrameKind::Text },
    FrameSpec { id: "TCMP", description: "iTunes Compilation Flag", kind: FrameKind::Text },
    FrameSpec { id: "TCOM", description: "Composer", kind: FrameKind::Text },
    FrameSpec { id: "TCON", description: "Content type", kind: FrameKind::Text },
    FrameSpec { id: "TCOP", description: "Copyright", kind: FrameKind::Text },
    FrameSpec { id: "TDAT", description: "Date of recording", kind: FrameKind::Text },
    FrameSpec { id: "TDEN", description: "Encoding Time", kind: FrameKind::Text },
    FrameSpec { id: "TDLY", description: "Audio Delay", kind: FrameKind::Text },
    FrameSpec { id: "TDOR", description: "Original Release Time", kind: FrameKind::Text },
    FrameSpec { id: "TDRC", description: "Recording Time", kind: FrameKind::Text },
    FrameSpec { id: "TDRL", description: "Release Time", kind: FrameKind::Text },
    FrameSpec { id: "TDTG", description: "Tagging Time", kind: FrameKind::Text },
    FrameSpec { id: "TENC", description: "Encoder", kind: FrameKind::Text },
    FrameSpec { id: "TEXT", description: "Lyricist", kind: FrameKind::Text },
    FrameSpec { id: "TFLT", description: "File type", kind: FrameKind::Text },
    FrameSpec { id: "TIME", description: "Time of recording", kind: FrameKind::Text },
    FrameSpec { id: "TIPL", description: "Involved People List", kind: FrameKind::Text },
    FrameSpec { id: "TIT1", description: "Content group description", kind: FrameKind::Text },
    FrameSpec { id: "TIT2", description: "Title/songname/content description", kind: FrameKind::Text },
    FrameSpec { id: "TIT3", description: "Subtitle/Description refinement", kind: FrameKind::Text },
    FrameSpec { id: "TKEY", description: "Starting Key", kind: FrameKind::Text },
    FrameSpec { id: "TLAN", description: "Audio Languages", kind: FrameKind::Text },
    FrameSpec { id: "TLEN", description: "Audio Length", kind: FrameKind::Text },
    FrameSpec { id: "TMCL", description: "Musicians Credits List", kind: FrameKind::Text },
    FrameSpec { id: "TMED", description: "Source Media Type", kind: FrameKind::Text },
    FrameSpec { id: "TMOO", description: "Mood", kind: FrameKind::Text },
    FrameSpec { id: "TOAL", description: "Original Album", kind: FrameKind::Text },
    FrameSpec { id: "TOFN", description: "Original Filename", kind: FrameKind::Text },
    FrameSpec { id: "TOLY", description: "Original Lyricist", kind: FrameKind::Text },
    FrameSpec { id: "TOPE", description: "Original Artist/Performer", kind: FrameKind::Text },
    FrameSpec { id: "TORY", description: "Original Release Year", kind: FrameKind::Text },
    FrameSpec { id: "TOWN", description: "Owner/Licensee", kind: FrameKind::Text },
    FrameSpec { id: "TPE1", description: "Lead Artist/Performer/Soloist/Group", kind: FrameKind::Text },
    FrameSpec { id: "TPE2", description: "Band/Orchestra/Accompaniment", kind: FrameKind::Text },
    FrameSpec { id: "TPE3", description: "Conductor", kind: FrameKind::Text },
    FrameSpec { id: "TPE4", description: "Interpreter/Remixer/Modifier", kind: FrameKind::Text },
    FrameSpec { id: "TPOS", description: "Part of set", kind: FrameKind::Text },
    FrameSpec { id: "TPRO", description: "Produced notice", kind: FrameKind::Text },
    FrameSpec { id: "TPUB", description: "Publisher", kind: FrameKind::Text },
    FrameSpec { id: "TRCK", description: "Track Number", kind: FrameKind::Text },
    FrameSpec { id: "TRSN", description: "Internet Radio Station Name", kind: FrameKind::Text },
    FrameSpec { id: "TRSO", description: "Internet Radio Station Owner", kind: FrameKind::Text },
    FrameSpec { id: "TSIZ", description: "Size of audio data", kind: FrameKind::Text },
    FrameSpec { id: "TSO2", description: "iTunes Album Artist Sort", kind: FrameKind::Text },
    FrameSpec { id: "TSOA", description: "Album Sort Order key", kind: FrameKind::Text },
    FrameSpec { id: "TSOC", description: "iTunes Composer Sort", kind: FrameKind::Text },
    FrameSpec { id: "TSOP", description: "Performer Sort Order key", kind: FrameKind::Text },
    FrameSpec { id: "TSOT", description: "Title Sort Order key", kind: FrameKind::Text },
    FrameSpec { id: "TSRC", description: "International Standard Recording Code (ISRC)", kind: FrameKind::Text },
    FrameSpec { id: "TSSE", description: "Encoder settings", kind: FrameKind::Text },
    FrameSpec { id: "TSST", description: "Set Subtitle", kind: FrameKind::Text },
    FrameSpec { id: "TYER", description: "Year of recording", kind: FrameKind::Text },
    FrameSpec { id: "APIC", description: "Attached (or linked) Picture", kind: FrameKind::Other },
    FrameSpec { id: "COMM", description: "User comment", kind: FrameKind::Other },
    FrameSpec { id: "GEOB", description: "General Encapsulated Object", kind: FrameKind::Other },
    FrameSpec { id: "MCDI", description: "Binary dump of CD's TOC", kind: FrameKind::Other },
    FrameSpec { id: "PCNT", description: "Play counter", kind: FrameKind::Other },
    FrameSpec { id: "POPM", description: "Popularimeter", kind: FrameKind::Other },
    FrameSpec { id: "PRIV", description: "Private frame", kind: FrameKind::Other },
    FrameSpec { id: "RVA2", description: "Relative volume adjustment (2)", kind: FrameKind::Other },
    FrameSpec { id: "SYLT", description: "Synchronised lyrics/text", kind: FrameKind::Other },
    FrameSpec { id: "TXXX", description: "User-defined text data", kind: FrameKind::Other },
    FrameSpec { id: "UFID", description: "Unique file identifier", kind: FrameKind::Other },
    FrameSpec { id: "USLT", description: "Unsynchronised lyrics/text transcription", kind: FrameKind::Other },
    FrameSpec { id: "WCOM", description: "Commercial Information", kind: FrameKind::Other },
    FrameSpec { id: "WOAR", description: "Official artist/performer webpage", kind: FrameKind::Other },
    FrameSpec { id: "WXXX", description: "User-defined URL data", kind: FrameKind::Other },
];

/// Look up a frame ID in the catalog
pub fn frame_spec(id: &str) -> Option<&'static FrameSpec> {
    FRAME_CATALOG.iter().find(|spec| spec.id == id)
}

/// True when the frame ID names a standard text frame
pub fn is_text_frame(id: &str) -> bool {
    matches!(frame_spec(id), Some(spec) if spec.kind == FrameKind::Text)
}

/// Catalog entries for the non-text frame types
pub fn misc_frame_specs() -> impl Iterator<Item = &'static FrameSpec> {
    FRAME_CATALOG
        .iter()
        .filter(|spec| spec.kind == FrameKind::Other)
}

/// Well-known keys with conventional lowercase field labels, used for
/// diagnostic display
static WELL_KNOWN: &[(&str, &str)] = &[
    ("TALB", "album"),
    ("TBPM", "bpm"),
    ("TCMP", "compilation"),
    ("TCOM", "composer"),
    ("TCON", "genre"),
    ("TCOP", "copyright"),
    ("TDRC", "date"),
    ("TIT2", "title"),
    ("TKEY", "initialkey"),
    ("TLAN", "language"),
    ("TLEN", "length"),
    ("TMOO", "mood"),
    ("TPE1", "artist"),
    ("TPE2", "albumartist"),
    ("TPE3", "conductor"),
    ("TPOS", "discnumber"),
    ("TPUB", "organization"),
    ("TRCK", "tracknumber"),
    ("TSOA", "albumsort"),
    ("TSOP", "artistsort"),
    ("TSOT", "titlesort"),
    ("TSRC", "isrc"),
];

/// Conventional label for a well-known frame ID
pub fn well_known_label(id: &str) -> Option<&'static str> {
    WELL_KNOWN
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, label)| *label)
}
