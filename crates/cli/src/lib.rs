//! Bookmark bridge CLI: the caller-facing transports and the operator
//! purge surface, wired around the `bridge` core crate.

pub mod cli;
pub mod commands;
pub mod extension;
pub mod logging;
pub mod server;
pub mod styles;
