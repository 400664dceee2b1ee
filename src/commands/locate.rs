//! Locate command and the interactive install fallback.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use crate::config::Settings;
use crate::locator::{locate_installed_app, AppTarget, LocatorConfig, EXE_NAME};
use crate::output::OutputControls;
use crate::session::log::LogSink;
use anyhow::{anyhow, Result};
use serde_json::json;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

/// Ask on the terminal for the path to WhatsApp.exe.
///
/// Returns `None` when stdin is not interactive or the answer is empty.
pub fn prompt_for_executable() -> Option<PathBuf> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return None;
    }
    eprint!("Locate {} (full path, empty to cancel): ", EXE_NAME);
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    stdin.lock().read_line(&mut answer).ok()?;
    let answer = answer.trim().trim_matches('"');
    (!answer.is_empty()).then(|| PathBuf::from(answer))
}

/// Resolve the WhatsApp target, prompting if discovery fails.
pub fn resolve_target(settings: &Settings, log: &LogSink) -> Result<AppTarget> {
    log.info("Finding WhatsApp installation…");
    let config = LocatorConfig::from_env(settings.app_path.clone());

    let mut fallback = || {
        log.warn("WhatsApp Installation not found");
        prompt_for_executable()
    };

    match locate_installed_app(&config, &mut fallback) {
        Some(target) => Ok(target),
        None => {
            log.error("Kindly install WhatsApp Desktop to continue.");
            Err(anyhow!("WhatsApp Desktop not found"))
        }
    }
}

/// Print the resolved target.
pub fn run(settings: &Settings, output: &OutputControls) -> Result<()> {
    let (log, rx) = LogSink::channel();
    let result = resolve_target(settings, &log);
    output.flush_log(&rx);

    let target = result?;
    if output.json {
        output.print(&json!({ "success": true, "target": target }));
    } else {
        println!("{}", target);
    }
    Ok(())
}
