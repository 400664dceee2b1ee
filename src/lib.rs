//! wolfies-whatsapp library
//!
//! Spreadsheet import, phone normalization and WhatsApp Desktop automation,
//! shared by the CLI binary and integration tests.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial library structure

pub mod automation;
pub mod commands;
pub mod config;
pub mod locator;
pub mod message;
pub mod output;
pub mod phone;
pub mod session;
pub mod sheet;
