//! Config command: show the effective settings.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use crate::config::{default_settings_path, Settings};
use crate::output::OutputControls;
use anyhow::Result;
use serde_json::json;

/// Print where settings come from and their effective values.
pub fn show(settings: &Settings, output: &OutputControls) -> Result<()> {
    let path = default_settings_path();
    let exists = path.as_ref().map(|p| p.exists()).unwrap_or(false);

    if output.json {
        output.print(&json!({
            "path": path,
            "exists": exists,
            "settings": settings,
        }));
        return Ok(());
    }

    match path {
        Some(ref p) if exists => println!("Settings file: {}", p.display()),
        Some(ref p) => println!("Settings file: {} (not found, using defaults)", p.display()),
        None => println!("Settings file: none (using defaults)"),
    }
    println!("{}", "-".repeat(50));
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}
