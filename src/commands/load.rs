//! Load command: import a spreadsheet and report the detected numbers.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use crate::output::OutputControls;
use crate::phone::{Detection, DetectionRule};
use crate::session::log::LogSink;
use crate::session::Session;
use anyhow::{Context, Result};
use std::path::Path;

/// Load `path` into the session, logging progress the way the form did.
pub fn load_into(session: &mut Session, path: &Path, log: &LogSink) -> Result<Detection> {
    log.info(format!("Opening spreadsheet: {}", path.display()));
    let detection = session
        .load_spreadsheet(path)
        .with_context(|| format!("Failed to import {}", path.display()))?;

    log.info(format!(
        "Detected phone column: {} ({})",
        detection.column.name,
        describe_rule(&detection.column.rule)
    ));
    for number in &detection.accepted {
        log.debug(number.to_string());
    }
    for rejection in &detection.rejected {
        log.debug(format!(
            "Row {}: '{}' is not a valid number",
            rejection.row, rejection.raw
        ));
    }
    log.info(format!(
        "Parsed {} numbers, failed to parse {} entries.",
        detection.accepted.len(),
        detection.rejected_count
    ));
    Ok(detection)
}

fn describe_rule(rule: &DetectionRule) -> String {
    match rule {
        DetectionRule::Keyword { keyword } => format!("header contains '{}'", keyword),
        DetectionRule::Fuzzy { score } => format!("header similar to 'phone', {:.2}", score),
        DetectionRule::ContentSniff => "first numeric-looking column".to_string(),
        DetectionRule::Fallback => "first column".to_string(),
    }
}

/// Import a spreadsheet and print what would be sent.
pub fn run(path: &Path, output: &OutputControls) -> Result<()> {
    let (log, rx) = LogSink::channel();
    let mut session = Session::new();
    let result = load_into(&mut session, path, &log);
    output.flush_log(&rx);

    let detection = result?;
    if output.json {
        output.print(&detection);
    } else {
        println!("{}", "-".repeat(50));
        for number in &detection.accepted {
            println!("{}", number);
        }
        if !detection.rejected.is_empty() {
            println!("Rejected ({}):", detection.rejected_count);
            for rejection in &detection.rejected {
                println!("  row {}: '{}'", rejection.row, rejection.raw);
            }
        }
    }
    Ok(())
}
