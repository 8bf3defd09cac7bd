// Encoding utilities for marked text payloads
//
// Freeform atoms carry their text encoding as a data-format marker.
// Decoding is strict: malformed input yields None, never replacement
// characters, so an undecodable payload can be skipped as unrecognised.

use encoding_rs::{UTF_16BE, UTF_8};
use serde::{Deserialize, Serialize};

/// Data-format markers used by freeform payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataEncoding {
    /// No marker; treated as UTF-8 text
    Implicit,
    Utf8,
    /// Big-endian UTF-16, no BOM
    Utf16,
}

/// Decode a marked payload, rejecting malformed input
pub fn decode_text(data: &[u8], encoding: DataEncoding) -> Option<String> {
    let (decoded, _, had_errors) = match encoding {
        DataEncoding::Implicit | DataEncoding::Utf8 => UTF_8.decode(data),
        DataEncoding::Utf16 => UTF_16BE.decode(data),
    };
    if had_errors {
        return None;
    }
    Some(decoded.into_owned())
}

/// Encode text under the given marker
pub fn encode_text(text: &str, encoding: DataEncoding) -> Vec<u8> {
    match encoding {
        DataEncoding::Implicit | DataEncoding::Utf8 => UTF_8.encode(text).0.to_vec(),
        DataEncoding::Utf16 => text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect(),
    }
}
