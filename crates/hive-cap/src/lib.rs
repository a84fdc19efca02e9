//! # Hive CAP - Layer 2: Alert Document Encoding
//!
//! Renders alert content as a Common Alerting Protocol 1.2 XML document.
//! Pure apart from the identifier and `sent` time, which come from the
//! random and clock effects when [`CapEncoder::encode`] is used.

#![forbid(unsafe_code)]

pub mod encoder;

pub use encoder::{encode_document, CapContent, CapEncoder, CAP_NAMESPACE};

/// Sender used when no `cap_sender` is configured
pub const DEFAULT_SENDER: &str = "the-hive@example.invalid";

impl Default for CapEncoder {
    fn default() -> Self {
        CapEncoder::new(DEFAULT_SENDER)
    }
}
