//! Public alerts and their publication state machine.
//!
//! ```text
//! draft ──► approved ──► published ──► withdrawn
//!   │  ▲        │                          │
//!   │  └────────┘ (back to draft)          │
//!   └──────────► withdrawn ──► draft ◄─────┘
//! ```
//!
//! The transition table is a static lookup ([`AlertStatus::allowed_targets`]);
//! the workflow consults it before any write.

use super::{limit_text, require_text, string_enum};
use crate::errors::Result;
use crate::identifiers::{ActorId, AlertId, ReportId};
use crate::time::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum length of `event`
pub const MAX_EVENT_CHARS: usize = 255;
/// Maximum length of `area`
pub const MAX_AREA_CHARS: usize = 500;

string_enum! {
    /// Publication state of an alert
    AlertStatus, field = "status" {
        Draft => "draft",
        Approved => "approved",
        Published => "published",
        Withdrawn => "withdrawn",
    }
}

impl AlertStatus {
    /// Statuses reachable in one step from `self`.
    pub fn allowed_targets(self) -> &'static [AlertStatus] {
        match self {
            AlertStatus::Draft => &[AlertStatus::Approved, AlertStatus::Withdrawn],
            AlertStatus::Approved => &[
                AlertStatus::Published,
                AlertStatus::Withdrawn,
                AlertStatus::Draft,
            ],
            AlertStatus::Published => &[AlertStatus::Withdrawn],
            AlertStatus::Withdrawn => &[AlertStatus::Draft],
        }
    }

    /// Whether the table allows `self -> to`.
    pub fn can_transition_to(self, to: AlertStatus) -> bool {
        self.allowed_targets().contains(&to)
    }
}

string_enum! {
    /// CAP `urgency`
    Urgency, field = "urgency" {
        Immediate => "Immediate",
        Expected => "Expected",
        Future => "Future",
        Past => "Past",
        Unknown => "Unknown",
    }
}

string_enum! {
    /// CAP `severity`
    CapSeverity, field = "severity" {
        Extreme => "Extreme",
        Severe => "Severe",
        Moderate => "Moderate",
        Minor => "Minor",
        Unknown => "Unknown",
    }
}

string_enum! {
    /// CAP `certainty`
    Certainty, field = "certainty" {
        Observed => "Observed",
        Likely => "Likely",
        Possible => "Possible",
        Unlikely => "Unlikely",
        Unknown => "Unknown",
    }
}

/// Fields supplied when drafting an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAlert {
    /// Originating report, if any
    #[serde(default)]
    pub report_id: Option<ReportId>,
    /// Event headline
    pub event: String,
    /// CAP urgency
    pub urgency: Urgency,
    /// CAP severity
    pub severity: CapSeverity,
    /// CAP certainty
    pub certainty: Certainty,
    /// Affected area description
    pub area: String,
    /// What the public should do
    pub instruction: String,
    /// Optional public-facing message
    #[serde(default)]
    pub public_message: Option<String>,
    /// Distribution channel names
    #[serde(default)]
    pub channels: Vec<String>,
}

impl NewAlert {
    /// Check required fields and length limits.
    pub fn validate(&self) -> Result<()> {
        require_text("event", &self.event, Some(MAX_EVENT_CHARS))?;
        require_text("area", &self.area, Some(MAX_AREA_CHARS))?;
        require_text("instruction", &self.instruction, None)?;
        Ok(())
    }
}

/// Partial alert update.
///
/// Every field uses explicit presence: `None` leaves the stored value
/// unchanged, `Some(..)` replaces it. Blank strings are never read as
/// "unchanged"; a blank required field is a validation error.
/// `public_message: Some(None)` clears the message and
/// `channels: Some(vec![])` clears the channel list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPatch {
    /// Requested status
    #[serde(default)]
    pub status: Option<AlertStatus>,
    /// Event headline
    #[serde(default)]
    pub event: Option<String>,
    /// CAP urgency
    #[serde(default)]
    pub urgency: Option<Urgency>,
    /// CAP severity
    #[serde(default)]
    pub severity: Option<CapSeverity>,
    /// CAP certainty
    #[serde(default)]
    pub certainty: Option<Certainty>,
    /// Affected area description
    #[serde(default)]
    pub area: Option<String>,
    /// What the public should do
    #[serde(default)]
    pub instruction: Option<String>,
    /// Optional public-facing message
    #[serde(default, deserialize_with = "present")]
    pub public_message: Option<Option<String>>,
    /// Distribution channel names
    #[serde(default)]
    pub channels: Option<Vec<String>>,
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent key (`None`).
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl AlertPatch {
    /// Patch that only requests a status change.
    pub fn status(status: AlertStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Check every present field.
    pub fn validate(&self) -> Result<()> {
        if let Some(event) = &self.event {
            require_text("event", event, Some(MAX_EVENT_CHARS))?;
        }
        if let Some(area) = &self.area {
            require_text("area", area, Some(MAX_AREA_CHARS))?;
        }
        if let Some(instruction) = &self.instruction {
            require_text("instruction", instruction, None)?;
        }
        if let Some(Some(message)) = &self.public_message {
            limit_text("public_message", message, None)?;
        }
        Ok(())
    }

    /// Whether the patch touches any content field.
    pub fn has_content(&self) -> bool {
        self.event.is_some()
            || self.urgency.is_some()
            || self.severity.is_some()
            || self.certainty.is_some()
            || self.area.is_some()
            || self.instruction.is_some()
            || self.public_message.is_some()
            || self.channels.is_some()
    }
}

/// A public alert derived from a triaged incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert identifier
    pub id: AlertId,
    /// Originating report, if any
    pub report_id: Option<ReportId>,
    /// Publication state
    pub status: AlertStatus,
    /// Event headline
    pub event: String,
    /// CAP urgency
    pub urgency: Urgency,
    /// CAP severity
    pub severity: CapSeverity,
    /// CAP certainty
    pub certainty: Certainty,
    /// Affected area description
    pub area: String,
    /// What the public should do
    pub instruction: String,
    /// Optional public-facing message
    pub public_message: Option<String>,
    /// CAP 1.2 document for the current content; regenerated, never patched
    pub cap_xml: String,
    /// Distribution channels in insertion order
    pub channels: Vec<String>,
    /// Actor who last moved the alert into approved
    pub approved_by: Option<ActorId>,
    /// When the alert was drafted
    pub created_at: Timestamp,
    /// Most recent entry into published
    pub published_at: Option<Timestamp>,
    /// Last update
    pub updated_at: Timestamp,
}

impl Alert {
    /// Build a new draft alert around an already encoded CAP document.
    pub fn drafted(id: AlertId, fields: NewAlert, cap_xml: String, now: Timestamp) -> Self {
        Self {
            id,
            report_id: fields.report_id,
            status: AlertStatus::Draft,
            event: fields.event,
            urgency: fields.urgency,
            severity: fields.severity,
            certainty: fields.certainty,
            area: fields.area,
            instruction: fields.instruction,
            public_message: fields.public_message.filter(|m| !m.trim().is_empty()),
            cap_xml,
            channels: fields.channels,
            approved_by: None,
            created_at: now,
            published_at: None,
            updated_at: now,
        }
    }

    /// Overlay the present content fields of `patch`.
    ///
    /// Returns the names of the fields whose value actually changed, in a
    /// fixed order. Status is not touched here.
    pub fn apply_content(&mut self, patch: &AlertPatch) -> Vec<&'static str> {
        let mut changed = Vec::new();

        fn set<T: PartialEq + Clone>(
            slot: &mut T,
            value: &Option<T>,
            name: &'static str,
            changed: &mut Vec<&'static str>,
        ) {
            if let Some(value) = value {
                if slot != value {
                    *slot = value.clone();
                    changed.push(name);
                }
            }
        }

        set(&mut self.event, &patch.event, "event", &mut changed);
        set(&mut self.urgency, &patch.urgency, "urgency", &mut changed);
        set(&mut self.severity, &patch.severity, "severity", &mut changed);
        set(&mut self.certainty, &patch.certainty, "certainty", &mut changed);
        set(&mut self.area, &patch.area, "area", &mut changed);
        set(&mut self.instruction, &patch.instruction, "instruction", &mut changed);

        if let Some(message) = &patch.public_message {
            let message = message.clone().filter(|m| !m.trim().is_empty());
            if self.public_message != message {
                self.public_message = message;
                changed.push("public_message");
            }
        }
        set(&mut self.channels, &patch.channels, "channels", &mut changed);

        changed
    }
}
