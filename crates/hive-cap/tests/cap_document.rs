//! Structural checks on encoded CAP documents, read back with a streaming
//! XML reader.

use hive_cap::{CapContent, CapEncoder, CAP_NAMESPACE};
use hive_testkit::MockEffects;
use proptest::prelude::*;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;

/// Element name -> text of every leaf element, plus the root namespace.
#[derive(Debug, Default)]
struct Parsed {
    namespace: Option<String>,
    counts: BTreeMap<String, usize>,
    texts: BTreeMap<String, String>,
}

fn parse(doc: &str) -> Parsed {
    let mut reader = Reader::from_str(doc);
    let mut parsed = Parsed::default();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event().expect("well-formed CAP document") {
            Event::Start(start) => {
                let name = String::from_utf8(start.name().as_ref().to_vec()).unwrap();
                if name == "alert" {
                    for attr in start.attributes() {
                        let attr = attr.unwrap();
                        if attr.key.as_ref() == b"xmlns" {
                            parsed.namespace =
                                Some(attr.unescape_value().unwrap().into_owned());
                        }
                    }
                }
                *parsed.counts.entry(name.clone()).or_default() += 1;
                parsed.texts.entry(name.clone()).or_default();
                current = Some(name);
            }
            Event::Text(text) => {
                if let Some(name) = &current {
                    let value = text.unescape().unwrap().into_owned();
                    if !value.trim().is_empty() {
                        parsed.texts.insert(name.clone(), value);
                    }
                }
            }
            Event::Empty(empty) => {
                let name = String::from_utf8(empty.name().as_ref().to_vec()).unwrap();
                *parsed.counts.entry(name.clone()).or_default() += 1;
                parsed.texts.insert(name, String::new());
            }
            Event::End(_) => current = None,
            Event::Eof => break,
            _ => {}
        }
    }
    parsed
}

fn content<'a>(event: &'a str, area: &'a str, instruction: &'a str) -> CapContent<'a> {
    CapContent {
        event,
        urgency: "Immediate",
        severity: "Severe",
        certainty: "Likely",
        area,
        instruction,
    }
}

#[tokio::test]
async fn test_minimal_document_fields() {
    let effects = MockEffects::deterministic();
    let encoder = CapEncoder::new("s");
    let doc = encoder
        .encode(&effects, &content("E", "A", "I"))
        .await
        .unwrap();

    assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    let parsed = parse(&doc);
    assert_eq!(parsed.namespace.as_deref(), Some(CAP_NAMESPACE));
    for element in ["alert", "info", "area", "event", "urgency", "areaDesc"] {
        assert_eq!(parsed.counts.get(element), Some(&1), "{element}");
    }
    assert_eq!(parsed.texts["sender"], "s");
    assert_eq!(parsed.texts["status"], "Actual");
    assert_eq!(parsed.texts["msgType"], "Alert");
    assert_eq!(parsed.texts["scope"], "Public");
    assert_eq!(parsed.texts["category"], "Safety");
    assert_eq!(parsed.texts["event"], "E");
    assert_eq!(parsed.texts["urgency"], "Immediate");
    assert_eq!(parsed.texts["areaDesc"], "A");
    assert_eq!(parsed.texts["instruction"], "I");
    assert_eq!(parsed.texts["sent"], "2022-01-01T00:00:00+00:00");
    assert!(parsed.texts["identifier"].parse::<uuid::Uuid>().is_ok());
}

#[tokio::test]
async fn test_each_encoding_gets_a_fresh_identifier() {
    let effects = MockEffects::deterministic();
    let encoder = CapEncoder::default();
    let c = content("E", "A", "I");

    let first = parse(&encoder.encode(&effects, &c).await.unwrap());
    let second = parse(&encoder.encode(&effects, &c).await.unwrap());
    assert_ne!(first.texts["identifier"], second.texts["identifier"]);
    assert_eq!(first.texts["sender"], "the-hive@example.invalid");
}

#[tokio::test]
async fn test_markup_in_content_is_escaped() {
    let effects = MockEffects::deterministic();
    let doc = CapEncoder::new("ops@example.org")
        .encode(&effects, &content("<b>Fire</b> & smoke", "Hall \"B\"", "Leave 'now'"))
        .await
        .unwrap();

    assert!(!doc.contains("<b>"));
    let parsed = parse(&doc);
    assert_eq!(parsed.texts["event"], "<b>Fire</b> & smoke");
    assert_eq!(parsed.texts["areaDesc"], "Hall \"B\"");
    assert_eq!(parsed.texts["instruction"], "Leave 'now'");
}

#[test]
fn test_text_stripped_to_nothing_reads_back_empty() {
    let sent = hive_core::PhysicalTime::from_millis(1_640_995_200_000)
        .to_timestamp()
        .unwrap();
    let doc = CapEncoder::new("s").encode_at(
        uuid::Uuid::nil(),
        &sent,
        &content("\u{1}\u{8}", "A", "I"),
    );

    let parsed = parse(&doc);
    assert_eq!(parsed.counts["event"], 1);
    assert_eq!(parsed.texts["event"], "");
    assert_eq!(parsed.texts["areaDesc"], "A");
}

proptest! {
    #[test]
    fn prop_any_text_yields_a_well_formed_document(
        event in any::<String>(),
        area in any::<String>(),
        instruction in any::<String>(),
        sender in "[a-z@.]{0,20}",
    ) {
        let sent = hive_core::PhysicalTime::from_millis(1_640_995_200_000)
            .to_timestamp()
            .unwrap();
        let doc = CapEncoder::new(sender)
            .encode_at(uuid::Uuid::nil(), &sent, &content(&event, &area, &instruction));
        let parsed = parse(&doc);
        prop_assert_eq!(parsed.counts.get("event"), Some(&1));
        prop_assert_eq!(parsed.counts.get("areaDesc"), Some(&1));
        prop_assert_eq!(parsed.namespace.as_deref(), Some(CAP_NAMESPACE));
    }
}
