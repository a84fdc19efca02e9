//! CAP 1.2 document encoding
//!
//! Produces an indented `alert` document in the CAP 1.2 namespace with a
//! single `info` block and a single `area` block:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <alert xmlns="urn:oasis:names:tc:emergency:cap:1.2">
//!   <identifier/> <sender/> <sent/> <status>Actual</status>
//!   <msgType>Alert</msgType> <scope>Public</scope>
//!   <info>
//!     <category>Safety</category> <event/> <urgency/> <severity/>
//!     <certainty/> <instruction/>
//!     <area><areaDesc/></area>
//!   </info>
//! </alert>
//! ```
//!
//! Supplied strings are escaped and stripped of characters XML 1.0 cannot
//! carry; text left empty is written as an empty element. Urgency, severity
//! and certainty are written as given; checking them against the CAP
//! enumerations is the caller's job.

use hive_core::domain::Alert;
use hive_core::effects::{PhysicalTimeEffects, RandomEffects};
use hive_core::time::{cap_date_time, Timestamp};
use hive_core::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::Write;
use uuid::Uuid;

/// CAP 1.2 XML namespace
pub const CAP_NAMESPACE: &str = "urn:oasis:names:tc:emergency:cap:1.2";
/// Fixed `status`
pub const CAP_STATUS: &str = "Actual";
/// Fixed `msgType`
pub const CAP_MSG_TYPE: &str = "Alert";
/// Fixed `scope`
pub const CAP_SCOPE: &str = "Public";
/// Fixed `info/category`
pub const CAP_CATEGORY: &str = "Safety";

/// Alert content carried into the `info` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapContent<'a> {
    /// Event headline
    pub event: &'a str,
    /// CAP urgency spelling
    pub urgency: &'a str,
    /// CAP severity spelling
    pub severity: &'a str,
    /// CAP certainty spelling
    pub certainty: &'a str,
    /// Written to `area/areaDesc`
    pub area: &'a str,
    /// What the public should do
    pub instruction: &'a str,
}

impl<'a> CapContent<'a> {
    /// Content fields of a stored alert.
    pub fn from_alert(alert: &'a Alert) -> Self {
        Self {
            event: &alert.event,
            urgency: alert.urgency.as_str(),
            severity: alert.severity.as_str(),
            certainty: alert.certainty.as_str(),
            area: &alert.area,
            instruction: &alert.instruction,
        }
    }
}

/// Encoder bound to a configured sender address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapEncoder {
    sender: String,
}

impl CapEncoder {
    /// Encoder writing `sender` into every document.
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }

    /// Configured `sender` address.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Encode with a fresh random identifier and the current time.
    ///
    /// Every call mints a new identifier, so re-encoding unchanged content
    /// still yields a distinct document.
    pub async fn encode<E>(&self, effects: &E, content: &CapContent<'_>) -> Result<String>
    where
        E: RandomEffects + PhysicalTimeEffects + ?Sized,
    {
        let identifier = effects.random_uuid().await;
        let sent = effects.now().await?;
        Ok(self.encode_at(identifier, &sent, content))
    }

    /// Encode with an explicit identifier and `sent` time. Never fails.
    pub fn encode_at(&self, identifier: Uuid, sent: &Timestamp, content: &CapContent<'_>) -> String {
        encode_document(&self.sender, identifier, sent, content)
    }
}

/// Pure CAP document construction.
pub fn encode_document(
    sender: &str,
    identifier: Uuid,
    sent: &Timestamp,
    content: &CapContent<'_>,
) -> String {
    let mut buffer = Vec::with_capacity(768);
    #[allow(clippy::expect_used)] // writes go to an in-memory buffer and cannot fail
    write_document(&mut buffer, sender, identifier, sent, content)
        .expect("CAP document writes into a Vec");
    String::from_utf8_lossy(&buffer).into_owned()
}

fn write_document<W: Write>(
    out: W,
    sender: &str,
    identifier: Uuid,
    sent: &Timestamp,
    content: &CapContent<'_>,
) -> quick_xml::Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("alert");
    root.push_attribute(("xmlns", CAP_NAMESPACE));
    writer.write_event(Event::Start(root))?;

    text_element(&mut writer, "identifier", &identifier.to_string())?;
    text_element(&mut writer, "sender", sender)?;
    text_element(&mut writer, "sent", &cap_date_time(sent))?;
    text_element(&mut writer, "status", CAP_STATUS)?;
    text_element(&mut writer, "msgType", CAP_MSG_TYPE)?;
    text_element(&mut writer, "scope", CAP_SCOPE)?;

    writer.write_event(Event::Start(BytesStart::new("info")))?;
    text_element(&mut writer, "category", CAP_CATEGORY)?;
    text_element(&mut writer, "event", content.event)?;
    text_element(&mut writer, "urgency", content.urgency)?;
    text_element(&mut writer, "severity", content.severity)?;
    text_element(&mut writer, "certainty", content.certainty)?;
    text_element(&mut writer, "instruction", content.instruction)?;

    writer.write_event(Event::Start(BytesStart::new("area")))?;
    text_element(&mut writer, "areaDesc", content.area)?;
    writer.write_event(Event::End(BytesEnd::new("area")))?;

    writer.write_event(Event::End(BytesEnd::new("info")))?;
    writer.write_event(Event::End(BytesEnd::new("alert")))?;
    Ok(())
}

/// `<name>text</name>`, or `<name/>` when nothing survives `xml_safe`.
fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> quick_xml::Result<()> {
    let text = xml_safe(text);
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(&text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Drop characters outside the XML 1.0 `Char` production.
fn xml_safe(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r')
            || ('\u{20}'..='\u{D7FF}').contains(&c)
            || ('\u{E000}'..='\u{FFFD}').contains(&c)
            || c >= '\u{10000}'
    }

    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| allowed(*c)).collect())
    }
}
