//! Identifier types for workflow entities
//!
//! Every entity is keyed by a UUID wrapped in its own newtype so a report id
//! can never be passed where an alert id is expected. Identifiers are minted
//! from `RandomEffects` by the workflow; nothing here touches system randomness.

use crate::errors::HiveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create from a UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = HiveError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| HiveError::validation($field, "malformed identifier"))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_identifier!(
    /// Identifier of a community incident report
    ReportId,
    "report_id"
);

uuid_identifier!(
    /// Identifier of an immutable triage decision
    DecisionId,
    "decision_id"
);

uuid_identifier!(
    /// Identifier of a public alert
    AlertId,
    "alert_id"
);

uuid_identifier!(
    /// Identifier of an audit ledger entry
    AuditEntryId,
    "audit_entry_id"
);

uuid_identifier!(
    /// Identifier of an authenticated staff member
    ActorId,
    "actor_id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_round_trip() {
        let raw = "6f1c1a8e-1b9b-4e44-9a52-5f4f7a3b2c10";
        let id: ReportId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
        assert_eq!(Uuid::from(id), Uuid::parse_str(raw).unwrap());
    }

    #[test]
    fn test_malformed_identifier_names_field() {
        let err = "not-a-uuid".parse::<AlertId>().unwrap_err();
        assert_matches!(err, HiveError::Validation { ref field, .. } if field == "alert_id");
    }
}
