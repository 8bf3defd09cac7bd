// End-to-end translation flows over in-memory tag stores

use std::collections::BTreeMap;

use tagbridge::id3::Id3Frame;
use tagbridge::mapping::{LabelMatrix, MappingTable};
use tagbridge::mp4::{CoverFormat, FreeformData, Mp4Cover, Mp4Value};
use tagbridge::store::TagStore;
use tagbridge::{copy_metadata, IndexTotal, TagDump, TagFormat, TagValue, Translator};

fn row(cells: &[(&str, &str)]) -> BTreeMap<String, String> {
    cells
        .iter()
        .map(|(column, key)| (column.to_string(), key.to_string()))
        .collect()
}

fn matrix() -> LabelMatrix {
    BTreeMap::from([
        (
            "TITLE".to_string(),
            row(&[("ID3v2.3", "TIT2"), ("ID3v2.4", "TIT2"), ("MP4", "\u{a9}nam")]),
        ),
        (
            "ARTIST".to_string(),
            row(&[("ID3v2.3", "TPE1"), ("ID3v2.4", "TPE1"), ("MP4", "\u{a9}ART")]),
        ),
        (
            "ALBUM".to_string(),
            row(&[("ID3v2.3", "TALB"), ("ID3v2.4", "TALB"), ("MP4", "\u{a9}alb")]),
        ),
        (
            "TRACK".to_string(),
            row(&[("ID3v2.3", "TRCK"), ("ID3v2.4", "TRCK"), ("MP4", "trkn")]),
        ),
        (
            "DISCNUMBER".to_string(),
            row(&[("ID3v2.3", "TPOS"), ("ID3v2.4", "TPOS"), ("MP4", "disk")]),
        ),
        (
            "COMMENT".to_string(),
            row(&[("ID3v2.3", "COMM"), ("ID3v2.4", "COMM"), ("MP4", "\u{a9}cmt")]),
        ),
        (
            "GENRE".to_string(),
            row(&[("ID3v2.3", "TCON"), ("ID3v2.4", "TCON"), ("MP4", "\u{a9}gen | gnre")]),
        ),
    ])
}

fn table() -> MappingTable {
    MappingTable::from_matrix(matrix())
}

fn id3_text(values: &[&str]) -> TagValue {
    TagValue::Id3(Id3Frame::Text {
        text: values.iter().map(|s| s.to_string()).collect(),
    })
}

fn mp4_text(values: &[&str]) -> TagValue {
    TagValue::Mp4(Mp4Value::Text {
        values: values.iter().map(|s| s.to_string()).collect(),
    })
}

#[test]
fn mp3_to_m4a_full_copy() {
    let table = table();
    let translator = Translator::new(&table);

    let jpeg = vec![0xff, 0xd8, 0xff, 0xe0, 0x10, 0x4a];
    let mut source = TagDump::new(TagFormat::Id3v24);
    source.set("TIT2".into(), id3_text(&["A Song"]));
    source.set("TPE1".into(), id3_text(&["Artist A", "Artist B"]));
    source.set("TRCK".into(), id3_text(&["3/12"]));
    source.set("TPOS".into(), id3_text(&["1"]));
    source.set(
        "COMM::eng".into(),
        TagValue::Id3(Id3Frame::Comment {
            lang: "eng".into(),
            desc: String::new(),
            text: vec!["a comment".into()],
        }),
    );
    source.set(
        "APIC:".into(),
        TagValue::Id3(Id3Frame::cover("image/jpeg".into(), jpeg.clone())),
    );
    source.set(
        "TXXX:MyField".into(),
        TagValue::Id3(Id3Frame::UserText {
            desc: "MyField".into(),
            text: vec!["custom value".into()],
        }),
    );
    source.set(
        "TXXX:replaygain_track_gain".into(),
        TagValue::Id3(Id3Frame::UserText {
            desc: "replaygain_track_gain".into(),
            text: vec!["-6.0 dB".into()],
        }),
    );
    source.set(
        "WEIRD".into(),
        TagValue::Id3(Id3Frame::Private {
            owner: "x".into(),
            data: vec![0],
        }),
    );

    let mut target = TagDump::new(TagFormat::Mp4);
    let summary = copy_metadata(&translator, &source, &mut target).unwrap();

    assert_eq!(summary.applied, 7);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].0, "WEIRD");

    assert_eq!(target.tags.get("\u{a9}nam"), Some(&mp4_text(&["A Song"])));
    assert_eq!(
        target.tags.get("\u{a9}ART"),
        Some(&mp4_text(&["Artist A", "Artist B"]))
    );
    assert_eq!(
        target.tags.get("trkn"),
        Some(&TagValue::Mp4(Mp4Value::Pairs {
            values: vec![IndexTotal::new(3, 12)]
        }))
    );
    assert_eq!(
        target.tags.get("disk"),
        Some(&TagValue::Mp4(Mp4Value::Pairs {
            values: vec![IndexTotal::new(1, 0)]
        }))
    );
    assert_eq!(target.tags.get("\u{a9}cmt"), Some(&mp4_text(&["a comment"])));
    assert_eq!(
        target.tags.get("covr"),
        Some(&TagValue::Mp4(Mp4Value::Covers {
            values: vec![Mp4Cover {
                format: CoverFormat::Jpeg,
                data: jpeg,
            }]
        }))
    );
    assert_eq!(
        target.tags.get("----:com.apple.iTunes:MyField"),
        Some(&TagValue::Mp4(Mp4Value::Freeform {
            values: vec![FreeformData::utf8("custom value")]
        }))
    );

    // every produced value is native to the target schema
    for record in target.entries() {
        assert!(record.value.is_native_to(TagFormat::Mp4), "{}", record.key);
    }
}

#[test]
fn replaygain_never_propagates() {
    let table = table();
    let translator = Translator::new(&table);

    for (source_format, target_format, key, value) in [
        (
            TagFormat::Id3v24,
            TagFormat::Mp4,
            "TXXX:replaygain_album_peak",
            TagValue::Id3(Id3Frame::UserText {
                desc: "replaygain_album_peak".into(),
                text: vec!["0.98".into()],
            }),
        ),
        (
            TagFormat::Mp4,
            TagFormat::Id3v24,
            "----:com.apple.iTunes:replaygain_track_gain",
            TagValue::Mp4(Mp4Value::Freeform {
                values: vec![FreeformData::utf8("-6.0 dB")],
            }),
        ),
    ] {
        let mut source = TagDump::new(source_format);
        source.set(key.to_string(), value);
        let mut target = TagDump::new(target_format);
        let summary = copy_metadata(&translator, &source, &mut target).unwrap();
        assert_eq!(summary.applied, 0);
        assert!(summary.skipped.is_empty());
        assert!(target.tags.is_empty());
    }
}

#[test]
fn same_format_copy_is_identity() {
    let table = table();
    let translator = Translator::new(&table);

    let mut source = TagDump::new(TagFormat::Mp4);
    source.set("\u{a9}nam".into(), mp4_text(&["A Song"]));
    source.set(
        "trkn".into(),
        TagValue::Mp4(Mp4Value::Pairs {
            values: vec![IndexTotal::new(3, 12)],
        }),
    );
    source.set(
        "covr".into(),
        TagValue::Mp4(Mp4Value::Covers {
            values: vec![Mp4Cover {
                format: CoverFormat::Png,
                data: vec![0x89, 0x50],
            }],
        }),
    );

    let mut target = TagDump::new(TagFormat::Mp4);
    copy_metadata(&translator, &source, &mut target).unwrap();
    assert_eq!(target.tags, source.tags);
}

#[test]
fn round_trip_preserves_values_across_schemas() {
    let table = table();
    let translator = Translator::new(&table);

    let jpeg = vec![0xff, 0xd8, 0x01, 0x02, 0x03];
    let mut original = TagDump::new(TagFormat::Mp4);
    original.set("\u{a9}nam".into(), mp4_text(&["A Song"]));
    original.set("\u{a9}alb".into(), mp4_text(&["An Album"]));
    original.set(
        "trkn".into(),
        TagValue::Mp4(Mp4Value::Pairs {
            values: vec![IndexTotal::new(3, 12)],
        }),
    );
    original.set(
        "disk".into(),
        TagValue::Mp4(Mp4Value::Pairs {
            values: vec![IndexTotal::new(5, 0)],
        }),
    );
    original.set(
        "covr".into(),
        TagValue::Mp4(Mp4Value::Covers {
            values: vec![Mp4Cover {
                format: CoverFormat::Jpeg,
                data: jpeg,
            }],
        }),
    );

    let mut intermediate = TagDump::new(TagFormat::Id3v23);
    copy_metadata(&translator, &original, &mut intermediate).unwrap();

    let mut back = TagDump::new(TagFormat::Mp4);
    copy_metadata(&translator, &intermediate, &mut back).unwrap();

    assert_eq!(back.tags, original.tags);
}

#[test]
fn custom_field_survives_both_directions() {
    let table = table();
    let translator = Translator::new(&table);

    let mut mp3 = TagDump::new(TagFormat::Id3v24);
    mp3.set(
        "TXXX:MyField".into(),
        TagValue::Id3(Id3Frame::UserText {
            desc: "MyField".into(),
            text: vec!["v".into()],
        }),
    );

    let mut m4a = TagDump::new(TagFormat::Mp4);
    copy_metadata(&translator, &mp3, &mut m4a).unwrap();
    assert!(m4a.tags.contains_key("----:com.apple.iTunes:MyField"));

    let mut mp3_again = TagDump::new(TagFormat::Id3v24);
    copy_metadata(&translator, &m4a, &mut mp3_again).unwrap();
    assert_eq!(mp3_again.tags, mp3.tags);
}

#[test]
fn id3_v23_source_uses_v24_catalog() {
    let table = table();
    let translator = Translator::new(&table);

    let mut source = TagDump::new(TagFormat::Id3v23);
    source.set("TIT2".into(), id3_text(&["A Song"]));
    source.set("COMM::eng".into(), TagValue::Id3(Id3Frame::Comment {
        lang: "eng".into(),
        desc: String::new(),
        text: vec!["note".into()],
    }));

    let mut target = TagDump::new(TagFormat::Mp4);
    let summary = copy_metadata(&translator, &source, &mut target).unwrap();
    assert_eq!(summary.applied, 2);
    assert_eq!(target.tags.get("\u{a9}cmt"), Some(&mp4_text(&["note"])));
}

#[test]
fn comment_translated_to_id3_gets_language_suffix() {
    let table = table();
    let translator = Translator::new(&table);

    let mut source = TagDump::new(TagFormat::Mp4);
    source.set("\u{a9}cmt".into(), mp4_text(&["hello"]));

    let mut target = TagDump::new(TagFormat::Id3v24);
    copy_metadata(&translator, &source, &mut target).unwrap();

    assert_eq!(
        target.tags.get("COMM::eng"),
        Some(&TagValue::Id3(Id3Frame::Comment {
            lang: "eng".into(),
            desc: String::new(),
            text: vec!["hello".into()],
        }))
    );
}
