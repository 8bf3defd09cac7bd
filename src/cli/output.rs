// Display formatting for tag dumps
//
// Pictures and covers are summarized by type and size rather than dumped
// as bytes; freeform payloads are decoded when their marker allows it.

use crate::classify::classify;
use crate::id3::Id3Frame;
use crate::mp4::Mp4Value;
use crate::store::TagDump;
use crate::translate::REPLAYGAIN_MARKER;
use crate::value::TagValue;

/// Toggles of the view command
#[derive(Debug, Default)]
pub struct ViewOptions {
    /// Show raw keys instead of display forms
    pub raw: bool,
    /// Also show keys that are hidden by default
    pub show_skipped: bool,
    /// Include replaygain keys
    pub include_replaygain: bool,
}

/// Print a dump's tags, one line per key, classified for human reading
pub fn view_dump(dump: &TagDump, options: &ViewOptions) {
    let format = dump.format;
    for (raw_key, value) in &dump.tags {
        let key = classify(raw_key, format);
        if format.is_id3() && !key.is_known() && !options.show_skipped {
            continue;
        }
        if raw_key.contains(REPLAYGAIN_MARKER)
            && !options.include_replaygain
            && !options.show_skipped
        {
            continue;
        }

        let shown_key = if options.raw { &key.raw } else { &key.display };
        match &key.label {
            Some(lbl) => println!("[{shown_key}] {lbl}: {}", format_value(value)),
            None => println!("[{shown_key}]: {}", format_value(value)),
        }
    }
}

/// Human form of a native value
pub fn format_value(value: &TagValue) -> String {
    match value {
        TagValue::Id3(Id3Frame::Text { text })
        | TagValue::Id3(Id3Frame::UserText { text, .. }) => format!("{text:?}"),
        TagValue::Id3(Id3Frame::Comment { lang, text, .. }) => {
            format!("{text:?} (lang={lang})")
        }
        TagValue::Id3(Id3Frame::Picture { mime, data, .. }) => {
            format!("<picture {mime}, {} bytes>", data.len())
        }
        TagValue::Id3(Id3Frame::Private { owner, data }) => {
            format!("<private owner={owner}, {} bytes>", data.len())
        }
        TagValue::Mp4(Mp4Value::Text { values }) => format!("{values:?}"),
        TagValue::Mp4(Mp4Value::Pairs { values }) => {
            let shown: Vec<String> = values.iter().map(|p| p.to_string()).collect();
            format!("{shown:?}")
        }
        TagValue::Mp4(Mp4Value::Freeform { values }) => {
            let shown: Vec<String> = values
                .iter()
                .map(|payload| match payload.decode() {
                    Some(text) => text,
                    None => format!("<{} bytes>", payload.data.len()),
                })
                .collect();
            format!("{shown:?}")
        }
        TagValue::Mp4(Mp4Value::Covers { values }) => {
            let shown: Vec<String> = values
                .iter()
                .map(|cover| format!("<cover {}, {} bytes>", cover.format.mime(), cover.data.len()))
                .collect();
            format!("{shown:?}")
        }
    }
}
