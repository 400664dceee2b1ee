//! Time-stamped user log, handed from the worker to the presentation thread.
//!
//! The worker only ever holds a [`LogSink`] (channel sender); the
//! presentation side drains the receiver and renders lines itself.

use crate::automation::SendSummary;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// How a send run ended.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendOutcome {
    Completed(SendSummary),
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub enum LogEvent {
    Line(LogLine),
    /// Last event of a send run.
    Finished(SendOutcome),
}

impl LogEvent {
    pub fn line(&self) -> Option<&LogLine> {
        match self {
            LogEvent::Line(line) => Some(line),
            LogEvent::Finished(_) => None,
        }
    }
}

/// Sending half of the user log. Cheap to clone, safe to move to a worker.
#[derive(Debug, Clone)]
pub struct LogSink {
    tx: Sender<LogEvent>,
}

impl LogSink {
    pub fn channel() -> (Self, Receiver<LogEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Record a line. Mirrored to tracing at debug level so `-vv` interleaves
    /// it with internal events; a closed receiver is ignored.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(?level, "{}", message);
        let _ = self.tx.send(LogEvent::Line(LogLine {
            at: Local::now(),
            level,
            message,
        }));
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn finished(&self, outcome: SendOutcome) {
        let _ = self.tx.send(LogEvent::Finished(outcome));
    }
}
