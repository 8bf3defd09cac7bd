// Shared value types exchanged between the translators

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::format::TagFormat;
use crate::id3::Id3Frame;
use crate::mp4::Mp4Value;

/// Track or disc position, normalized to an index/total pair
///
/// `total == 0` means "no total recorded"; it renders as a bare index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexTotal {
    pub index: u32,
    pub total: u32,
}

impl IndexTotal {
    pub fn new(index: u32, total: u32) -> Self {
        IndexTotal { index, total }
    }
}

impl fmt::Display for IndexTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total != 0 {
            write!(f, "{}/{}", self.index, self.total)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

impl FromStr for IndexTotal {
    type Err = ParseIntError;

    /// Parses `"index"` or `"index/total"`; a missing total defaults to 0
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((index, total)) => Ok(IndexTotal {
                index: index.trim().parse()?,
                total: total.trim().parse()?,
            }),
            None => Ok(IndexTotal {
                index: s.trim().parse()?,
                total: 0,
            }),
        }
    }
}

/// A tag value in one schema's native shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagValue {
    Id3(Id3Frame),
    Mp4(Mp4Value),
}

impl TagValue {
    /// The schema family this value natively belongs to; ID3 frames are
    /// shared between the two ID3 variants
    pub fn is_native_to(&self, format: TagFormat) -> bool {
        match self {
            TagValue::Id3(_) => format.is_id3(),
            TagValue::Mp4(_) => format == TagFormat::Mp4,
        }
    }
}

/// One tag as exchanged between components
#[derive(Debug, Clone, PartialEq)]
pub struct TagRecord {
    pub key: String,
    pub value: TagValue,
    pub format: TagFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_total_display() {
        assert_eq!(IndexTotal::new(3, 12).to_string(), "3/12");
        assert_eq!(IndexTotal::new(5, 0).to_string(), "5");
    }

    #[test]
    fn test_index_total_parse() {
        assert_eq!("3/12".parse::<IndexTotal>().unwrap(), IndexTotal::new(3, 12));
        assert_eq!("5".parse::<IndexTotal>().unwrap(), IndexTotal::new(5, 0));
        assert!("x/2".parse::<IndexTotal>().is_err());
        assert!("".parse::<IndexTotal>().is_err());
    }
}
