//! `hive` subcommands.

pub mod cap;
pub mod scenario;
pub mod verify;
