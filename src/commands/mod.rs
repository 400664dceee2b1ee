//! Command implementations.
//!
//! CHANGELOG:
//! - 10/16/2026 - load, locate, send and config commands

pub mod config;
pub mod load;
pub mod locate;
pub mod send;
