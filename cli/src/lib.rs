//! Host side of the `board` command: a ureq transport for the core
//! synchronizer and the subcommand handlers that drive it.

pub mod commands;
pub mod transport;
