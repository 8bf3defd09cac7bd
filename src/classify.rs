// Human-readable classification of raw tag keys
//
// Used for diagnostic display only: given any raw key, infer a short
// description even when the key is absent from the mapping table, using
// each schema's own key catalog as the knowledge source. Never fails;
// unclassifiable keys keep their raw spelling and get no label.

use crate::format::TagFormat;
use crate::id3;
use crate::mp4;

/// A raw key with its display form and inferred description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedKey {
    pub raw: String,
    pub display: String,
    pub label: Option<String>,
}

impl ClassifiedKey {
    pub fn is_known(&self) -> bool {
        self.label.is_some()
    }

    fn new(raw: &str, display: impl Into<String>, label: Option<String>) -> Self {
        ClassifiedKey {
            raw: raw.to_string(),
            display: display.into(),
            label,
        }
    }
}

/// Classify a raw key of the given schema
pub fn classify(raw_key: &str, format: TagFormat) -> ClassifiedKey {
    match format {
        TagFormat::Id3v23 | TagFormat::Id3v24 => classify_id3(raw_key),
        TagFormat::Mp4 => classify_mp4(raw_key),
    }
}

fn classify_mp4(raw: &str) -> ClassifiedKey {
    if let Some(lbl) = mp4::well_known_label(raw) {
        return ClassifiedKey::new(raw, raw, Some(lbl.to_string()));
    }

    if raw.is_ascii() {
        if let Some(spec) = mp4::atom_spec(raw) {
            return ClassifiedKey::new(raw, raw, Some(spec.description.to_string()));
        }
    }

    if let Some(name) = mp4::freeform_field_name(raw) {
        return ClassifiedKey::new(raw, mp4::FREEFORM_DISPLAY, Some(name.to_string()));
    }

    // keys shaped as raw byte identifiers still match the catalog by
    // value, not by ASCII text
    if let Some(bytes) = mp4::key_raw_bytes(raw) {
        if let Some(spec) = mp4::atom_spec_by_raw(&bytes) {
            return ClassifiedKey::new(raw, raw, Some(spec.description.to_string()));
        }
    }

    ClassifiedKey::new(raw, raw, None)
}

fn classify_id3(raw: &str) -> ClassifiedKey {
    if let Some(lbl) = id3::well_known_label(raw) {
        return ClassifiedKey::new(raw, raw, Some(lbl.to_string()));
    }

    if let Some(spec) = id3::misc_frame_specs().find(|spec| spec.id == raw) {
        return ClassifiedKey::new(raw, raw, Some(spec.description.to_string()));
    }

    if let Some(name) = id3::custom_field_name(raw) {
        return ClassifiedKey::new(raw, "TXXX", Some(name.to_string()));
    }

    if raw.starts_with(id3::PRIVATE_PREFIX) {
        let owner = raw.split(':').nth(1).unwrap_or_default();
        return ClassifiedKey::new(raw, "PRIV", Some(owner.to_string()));
    }

    // frame keys carrying extra parameters, e.g. a language suffix
    if let Some(spec) = id3::misc_frame_specs().find(|spec| raw.starts_with(spec.id)) {
        return ClassifiedKey::new(raw, spec.id, Some(spec.description.to_string()));
    }

    let type_token = raw.split(':').next().unwrap_or(raw);
    if let Some(spec) = id3::frame_spec(type_token) {
        return ClassifiedKey::new(raw, spec.id, Some(spec.description.to_string()));
    }

    ClassifiedKey::new(raw, raw, None)
}
