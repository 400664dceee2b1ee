//! Output formatting for the terminal front end.
//!
//! CHANGELOG:
//! - 10/16/2026 - Drain worker log events on the presentation thread
//! - 10/16/2026 - Initial implementation

use crate::session::log::{LogEvent, LogLevel, LogLine, SendOutcome};
use serde::Serialize;
use serde_json::json;
use std::sync::mpsc::Receiver;

/// Output control settings from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct OutputControls {
    pub json: bool,
    pub compact: bool,
    /// Show debug-level log lines (every click/wait step)
    pub verbose: bool,
}

impl OutputControls {
    /// Serialize a report according to the controls.
    pub fn emit<T: Serialize>(&self, data: &T) -> String {
        let rendered = if self.compact {
            serde_json::to_string(data)
        } else {
            serde_json::to_string_pretty(data)
        };
        rendered.unwrap_or_else(|e| format_error(&e.to_string()))
    }

    /// Print a report to stdout.
    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", self.emit(data));
    }

    /// Drain log events until the run finishes or every sender is gone.
    ///
    /// Lines are printed as `[HH:MM:SS] message` unless JSON output is on,
    /// in which case they go to stderr so stdout stays machine-readable.
    pub fn follow_log(&self, rx: &Receiver<LogEvent>) -> Option<SendOutcome> {
        for event in rx.iter() {
            match event {
                LogEvent::Line(line) => self.print_line(&line),
                LogEvent::Finished(outcome) => return Some(outcome),
            }
        }
        None
    }

    /// Print whatever is already queued without blocking.
    pub fn flush_log(&self, rx: &Receiver<LogEvent>) {
        for event in rx.try_iter() {
            if let LogEvent::Line(line) = event {
                self.print_line(&line);
            }
        }
    }

    fn print_line(&self, line: &LogLine) {
        if line.level == LogLevel::Debug && !self.verbose {
            return;
        }
        if self.json {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Format error as JSON.
pub fn format_error(error: &str) -> String {
    serde_json::to_string(&json!({
        "error": error,
        "success": false
    }))
    .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::SendSummary;
    use crate::session::log::LogSink;

    #[test]
    fn test_emit_compact() {
        let controls = OutputControls {
            compact: true,
            ..Default::default()
        };
        assert_eq!(controls.emit(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_format_error() {
        assert_eq!(format_error("boom"), r#"{"error":"boom","success":false}"#);
    }

    #[test]
    fn test_follow_log_returns_outcome() {
        let (log, rx) = LogSink::channel();
        log.info("working");
        log.finished(SendOutcome::Completed(SendSummary::default()));
        log.info("after finish is not read");

        let controls = OutputControls::default();
        assert!(matches!(
            controls.follow_log(&rx),
            Some(SendOutcome::Completed(_))
        ));
    }

    #[test]
    fn test_follow_log_without_finish() {
        let (log, rx) = LogSink::channel();
        log.info("only line");
        drop(log);
        assert!(OutputControls::default().follow_log(&rx).is_none());
    }
}
