// tagbridge - audio tag metadata translation between tagging schemas
//
// The core is the translation engine: a mapping table grouping native keys
// under canonical labels, a key translator with fallback rules for custom
// and freeform fields, and a value translator converting between the
// schemas' native value shapes. Container-level tag IO and audio
// transcoding are external collaborators reached through narrow
// interfaces (the TagStore trait and the encoder command).

pub mod classify;
pub mod cli;
pub mod error;
pub mod format;
pub mod id3;
pub mod mapping;
pub mod mp4;
pub mod store;
pub mod transcode;
pub mod translate;
pub mod utils;
pub mod value;

pub use error::{Result, TagError};
pub use format::{Container, TagFormat};
pub use mapping::{HttpMappingSource, MappingSource, MappingTable};
pub use store::{DumpFile, TagDump, TagStore};
pub use translate::{copy_metadata, CopySummary, Translator};
pub use value::{IndexTotal, TagRecord, TagValue};
