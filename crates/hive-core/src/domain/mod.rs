//! Domain entities and their fixed enumerations
//!
//! Enumerations persist as fixed string sets. Each one is generated by
//! `string_enum!` so the wire spelling, the `ALL` table and the parser can
//! never drift apart; parsing an unknown value is a `Validation` error naming
//! the field it came from.

use crate::errors::{HiveError, Result};

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Persisted spelling
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::HiveError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err($crate::errors::HiveError::validation(
                        $field,
                        format!("unknown value {other:?}"),
                    )),
                }
            }
        }
    };
}

pub(crate) use string_enum;

pub mod alert;
pub mod audit;
pub mod report;
pub mod triage;

pub use alert::{Alert, AlertPatch, AlertStatus, CapSeverity, Certainty, NewAlert, Urgency};
pub use audit::{AuditAction, AuditDiff, AuditValue, ObjectType};
pub use report::{Category, NewReport, Report, ReportStatus, Severity};
pub use triage::{EvidenceLevel, TriageDecision, TriageInput, TriageOutcome};

/// Reject blank text and text longer than `max_chars`.
pub(crate) fn require_text(field: &str, value: &str, max_chars: Option<usize>) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HiveError::validation(field, "required"));
    }
    limit_text(field, value, max_chars)
}

/// Reject text longer than `max_chars`.
pub(crate) fn limit_text(field: &str, value: &str, max_chars: Option<usize>) -> Result<()> {
    match max_chars {
        Some(max) if value.chars().count() > max => Err(HiveError::validation(
            field,
            format!("must be at most {max} characters"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_limits_count_characters() {
        assert!(require_text("area", "   ", None).is_err());
        assert!(require_text("area", "ok", Some(2)).is_ok());
        // Two characters, six bytes
        assert!(limit_text("area", "日本", Some(2)).is_ok());
        assert!(limit_text("area", "日本語", Some(2)).is_err());
    }
}
