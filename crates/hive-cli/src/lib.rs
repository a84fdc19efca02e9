//! Library half of the `hive` binary: configuration and command
//! implementations, kept out of `main.rs` so they can be tested.

#![forbid(unsafe_code)]

pub mod commands;
pub mod config;

pub use config::{HiveConfig, LoggingConfig, SENDER_ENV};
