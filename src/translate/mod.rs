// Tag translation between schemas
//
// Key translation resolves a source-schema key to the equivalent key in the
// target schema through the mapping table, with an ordered fallback chain
// for version differences and custom/freeform fields. Value translation
// normalizes the source value into an intermediate shape (text list,
// index/total pairs, cover payload) and rebuilds the target schema's native
// shape for the resolved label.

use tracing::{debug, info};

use crate::error::{Result, TagError};
use crate::format::TagFormat;
use crate::id3::{self, Id3Frame};
use crate::mapping::{label, MappingTable};
use crate::mp4::{self, CoverFormat, FreeformData, Mp4Cover, Mp4Value};
use crate::store::TagStore;
use crate::value::{IndexTotal, TagValue};

/// Keys carrying normalization metadata are never propagated
pub const REPLAYGAIN_MARKER: &str = "replaygain";

/// Source value reduced to a schema-independent shape
enum Normalized {
    Text(Vec<String>),
    Pairs(Vec<IndexTotal>),
    Cover { data: Vec<u8>, mime: String },
}

/// Translator over an immutable mapping table
pub struct Translator<'a> {
    table: &'a MappingTable,
}

impl<'a> Translator<'a> {
    pub fn new(table: &'a MappingTable) -> Self {
        Translator { table }
    }

    /// Native custom-field key for a field name in the given schema
    fn misc_field_key(name: &str, format: TagFormat) -> String {
        match format {
            TagFormat::Id3v23 | TagFormat::Id3v24 => id3::custom_field_key(name),
            TagFormat::Mp4 => mp4::freeform_key(name),
        }
    }

    /// Translate a source-schema key to the target schema.
    ///
    /// Fallback chain, each step tried only when the previous found
    /// nothing: direct table lookup; ID3v2.3 retried as ID3v2.4; `TXXX:`
    /// custom fields (label match, else synthesis; never fails);
    /// language-suffixed comment retried as the plain comment key; the
    /// embedded-cover key resolved through the hard-coded COVER entry;
    /// MP4 freeform fields (label match, else synthesis).
    pub fn translate_key(
        &self,
        source_key: &str,
        source_format: TagFormat,
        target_format: TagFormat,
    ) -> Result<String> {
        if let Some(lbl) = self.table.label_for(source_format, source_key) {
            if let Some(target_key) = self.table.native_key(lbl, target_format) {
                // embedded-tags convention: plain comments carry the
                // default language marker
                if target_format.is_id3() && target_key == id3::COMMENT_KEY {
                    return Ok(id3::COMMENT_KEY_DEFAULT_LANG.to_string());
                }
                return Ok(target_key.to_string());
            }
        }

        match source_format {
            // the two ID3 variants share nearly all native keys
            TagFormat::Id3v23 => self.translate_key(source_key, TagFormat::Id3v24, target_format),
            TagFormat::Id3v24 => {
                if let Some(name) = id3::custom_field_name(source_key) {
                    if let Some(target_key) = self.table.native_key(name, target_format) {
                        return Ok(target_key.to_string());
                    }
                    return Ok(Self::misc_field_key(name, target_format));
                }
                if source_key == id3::COMMENT_KEY_DEFAULT_LANG {
                    return self
                        .table
                        .label_for(TagFormat::Id3v24, id3::COMMENT_KEY)
                        .and_then(|lbl| self.table.native_key(lbl, target_format))
                        .map(str::to_string)
                        .ok_or_else(|| TagError::UnrecognisedTag(source_key.to_string()));
                }
                if source_key == id3::COVER_KEY {
                    // present in every format by construction
                    if let Some(target_key) = self.table.native_key(label::COVER, target_format) {
                        return Ok(target_key.to_string());
                    }
                }
                Err(TagError::UnrecognisedTag(source_key.to_string()))
            }
            TagFormat::Mp4 => {
                if let Some(name) = mp4::freeform_field_name(source_key) {
                    if let Some(target_key) = self.table.native_key(name, target_format) {
                        return Ok(target_key.to_string());
                    }
                    return Ok(Self::misc_field_key(name, target_format));
                }
                Err(TagError::UnrecognisedTag(source_key.to_string()))
            }
        }
    }

    /// Canonical label of a native key in its own schema, None for custom
    /// and unmapped keys. The key is first normalized through a same-format
    /// translation so qualified variants (language-suffixed comments,
    /// synthesized custom keys) resolve to their table form.
    pub fn tag_label(&self, key: &str, format: TagFormat) -> Option<String> {
        let normalized = self.translate_key(key, format, format).ok()?;
        self.table.label_for(format, &normalized).map(str::to_string)
    }

    /// Translate a source value into the shape the target key requires
    pub fn translate_value(
        &self,
        target_key: &str,
        source_value: &TagValue,
        source_format: TagFormat,
        target_format: TagFormat,
    ) -> Result<TagValue> {
        if source_format == target_format {
            return Ok(source_value.clone());
        }

        let lbl = self.tag_label(target_key, target_format);
        let normalized = normalize(source_value, source_format, lbl.as_deref())?;

        match target_format {
            TagFormat::Id3v23 | TagFormat::Id3v24 => {
                build_id3_value(target_key, normalized, lbl.as_deref())
            }
            TagFormat::Mp4 => build_mp4_value(normalized, lbl.as_deref()),
        }
    }

    /// Translate one tag: key, value and the tag's canonical label
    pub fn translate_tag(
        &self,
        source_key: &str,
        source_value: &TagValue,
        source_format: TagFormat,
        target_format: TagFormat,
    ) -> Result<(String, TagValue, Option<String>)> {
        let target_key = self.translate_key(source_key, source_format, target_format)?;
        let lbl = self.tag_label(source_key, source_format);
        let target_value =
            self.translate_value(&target_key, source_value, source_format, target_format)?;
        Ok((target_key, target_value, lbl))
    }
}

/// Pull `(bytes, mime)` out of the source schema's native cover shape.
/// Only the first cover image is preserved when multiple are present.
fn extract_cover(source_value: &TagValue, source_format: TagFormat) -> Result<(Vec<u8>, String)> {
    match source_value {
        TagValue::Id3(Id3Frame::Picture { mime, data, .. }) if source_format.is_id3() => {
            Ok((data.clone(), mime.clone()))
        }
        TagValue::Mp4(Mp4Value::Covers { values }) if source_format == TagFormat::Mp4 => {
            let cover = values.first().ok_or_else(|| {
                TagError::UnrecognisedValue("cover atom holds no images".to_string())
            })?;
            Ok((cover.data.clone(), cover.format.mime().to_string()))
        }
        other => Err(TagError::UnrecognisedValue(format!(
            "{} is not a cover value in {source_format}",
            shape_name(other)
        ))),
    }
}

fn normalize(
    source_value: &TagValue,
    source_format: TagFormat,
    lbl: Option<&str>,
) -> Result<Normalized> {
    if lbl == Some(label::COVER) {
        let (data, mime) = extract_cover(source_value, source_format)?;
        return Ok(Normalized::Cover { data, mime });
    }

    match source_value {
        TagValue::Id3(frame) => frame
            .text()
            .map(|text| Normalized::Text(text.to_vec()))
            .ok_or_else(|| {
                TagError::UnrecognisedValue(format!(
                    "{} carries no text",
                    shape_name(source_value)
                ))
            }),
        TagValue::Mp4(Mp4Value::Text { values }) => Ok(Normalized::Text(values.clone())),
        TagValue::Mp4(Mp4Value::Freeform { values }) => {
            let mut text = Vec::with_capacity(values.len());
            for payload in values {
                text.push(payload.decode().ok_or_else(|| {
                    TagError::UnrecognisedValue("undecodable freeform payload".to_string())
                })?);
            }
            Ok(Normalized::Text(text))
        }
        TagValue::Mp4(Mp4Value::Pairs { values }) => Ok(Normalized::Pairs(values.clone())),
        TagValue::Mp4(Mp4Value::Covers { .. }) => Err(TagError::UnrecognisedValue(
            "cover images under a non-cover key".to_string(),
        )),
    }
}

/// Build the ID3 native value for a resolved target key. Known text frames
/// take the text list directly; qualified comment keys become comment
/// frames in the default language; custom keys become user-text frames
/// carrying the field name; the cover label becomes a front-cover picture.
fn build_id3_value(
    target_key: &str,
    normalized: Normalized,
    lbl: Option<&str>,
) -> Result<TagValue> {
    if lbl == Some(label::COVER) {
        return match normalized {
            Normalized::Cover { data, mime } => Ok(TagValue::Id3(Id3Frame::cover(mime, data))),
            _ => Err(TagError::UnrecognisedValue(
                "cover label without cover payload".to_string(),
            )),
        };
    }

    let is_position = matches!(lbl, Some(label::TRACK) | Some(label::DISCNUMBER));
    let text = match normalized {
        Normalized::Text(text) => text,
        Normalized::Pairs(pairs) if is_position => {
            pairs.iter().map(IndexTotal::to_string).collect()
        }
        _ => {
            return Err(TagError::UnrecognisedValue(format!(
                "no text shape for ID3 key {target_key:?}"
            )))
        }
    };

    if id3::is_text_frame(target_key) {
        return Ok(TagValue::Id3(Id3Frame::Text { text }));
    }
    if target_key.starts_with(id3::COMMENT_PREFIX) {
        return Ok(TagValue::Id3(Id3Frame::Comment {
            lang: id3::DEFAULT_LANG.to_string(),
            desc: String::new(),
            text,
        }));
    }
    if let Some(name) = id3::custom_field_name(target_key) {
        return Ok(TagValue::Id3(Id3Frame::UserText {
            desc: name.to_string(),
            text,
        }));
    }
    Err(TagError::UnrecognisedValue(format!(
        "no ID3 frame constructor for key {target_key:?}"
    )))
}

/// Build the MP4 native value for a resolved label. Track and disc
/// positions become index/total pairs, covers become cover atoms with the
/// format code re-derived from the MIME type, unclassified fields take the
/// UTF-8 freeform convention, everything else is a text atom.
fn build_mp4_value(normalized: Normalized, lbl: Option<&str>) -> Result<TagValue> {
    match lbl {
        Some(label::TRACK) | Some(label::DISCNUMBER) => {
            let pairs = match normalized {
                Normalized::Pairs(pairs) => pairs,
                Normalized::Text(text) => text
                    .iter()
                    .map(|s| {
                        s.parse::<IndexTotal>().map_err(|_| {
                            TagError::UnrecognisedValue(format!("bad position value {s:?}"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
                Normalized::Cover { .. } => {
                    return Err(TagError::UnrecognisedValue(
                        "cover payload under a position label".to_string(),
                    ))
                }
            };
            Ok(TagValue::Mp4(Mp4Value::Pairs { values: pairs }))
        }
        Some(label::COVER) => match normalized {
            Normalized::Cover { data, mime } => {
                let format = CoverFormat::from_mime(&mime).ok_or_else(|| {
                    TagError::UnrecognisedValue(format!("unsupported cover MIME {mime:?}"))
                })?;
                Ok(TagValue::Mp4(Mp4Value::Covers {
                    values: vec![Mp4Cover { format, data }],
                }))
            }
            _ => Err(TagError::UnrecognisedValue(
                "cover label without cover payload".to_string(),
            )),
        },
        None => match normalized {
            Normalized::Text(text) => Ok(TagValue::Mp4(Mp4Value::Freeform {
                values: text.iter().map(|s| FreeformData::utf8(s)).collect(),
            })),
            _ => Err(TagError::UnrecognisedValue(
                "non-text value for a freeform field".to_string(),
            )),
        },
        Some(_) => match normalized {
            Normalized::Text(values) => Ok(TagValue::Mp4(Mp4Value::Text { values })),
            Normalized::Pairs(values) => Ok(TagValue::Mp4(Mp4Value::Pairs { values })),
            Normalized::Cover { .. } => Err(TagError::UnrecognisedValue(
                "cover payload under a text label".to_string(),
            )),
        },
    }
}

fn shape_name(value: &TagValue) -> &'static str {
    match value {
        TagValue::Id3(Id3Frame::Text { .. }) => "ID3 text frame",
        TagValue::Id3(Id3Frame::UserText { .. }) => "ID3 user-text frame",
        TagValue::Id3(Id3Frame::Comment { .. }) => "ID3 comment frame",
        TagValue::Id3(Id3Frame::Picture { .. }) => "ID3 picture frame",
        TagValue::Id3(Id3Frame::Private { .. }) => "ID3 private frame",
        TagValue::Mp4(Mp4Value::Text { .. }) => "MP4 text atom",
        TagValue::Mp4(Mp4Value::Pairs { .. }) => "MP4 pair atom",
        TagValue::Mp4(Mp4Value::Freeform { .. }) => "MP4 freeform atom",
        TagValue::Mp4(Mp4Value::Covers { .. }) => "MP4 cover atom",
    }
}

/// Outcome of a whole-file translation
#[derive(Debug, Default)]
pub struct CopySummary {
    pub applied: usize,
    /// Skipped keys with the diagnostic reason
    pub skipped: Vec<(String, String)>,
}

/// Copy all tags of the source store onto the target store, translating
/// each key and value between the two schemas. Unrecognised tags and
/// values are skipped with a diagnostic; replaygain keys are never
/// propagated. The target is saved once after the full iteration; there is
/// no atomicity across individual tags.
pub fn copy_metadata(
    translator: &Translator,
    source: &dyn TagStore,
    target: &mut dyn TagStore,
) -> Result<CopySummary> {
    let source_format = source.tag_format();
    let target_format = target.tag_format();
    let mut summary = CopySummary::default();

    for record in source.entries() {
        let key = record.key;
        if key.contains(REPLAYGAIN_MARKER) {
            debug!("not propagating normalization tag {key:?}");
            continue;
        }
        match translator.translate_tag(&key, &record.value, source_format, target_format) {
            Ok((target_key, target_value, lbl)) => {
                info!(
                    "{}: {key:?} -> {target_key:?}",
                    lbl.as_deref().unwrap_or("custom")
                );
                target.set(target_key, target_value);
                summary.applied += 1;
            }
            Err(err) if err.is_recoverable() => {
                info!("skipping tag {key:?}: {err}");
                summary.skipped.push((key, err.to_string()));
            }
            Err(err) => return Err(err),
        }
    }

    target.save()?;
    Ok(summary)
}
