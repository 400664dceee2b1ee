//! UI automation of WhatsApp Desktop through a WinAppDriver session.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial module structure

pub mod driver;
pub mod sequencer;
pub mod service;

pub use driver::DriverSession;
pub use sequencer::{send_to_all, SendPlan, SendSummary};

use thiserror::Error;

/// Errors from the automation driver.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("HTTP error talking to driver: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Driver error ({code}): {message}")]
    Remote { code: String, message: String },

    #[error("Unexpected driver response: {0}")]
    Protocol(String),
}

/// Element lookup strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum By {
    AccessibilityId(&'static str),
    ClassName(&'static str),
    Name(&'static str),
}

impl By {
    /// WebDriver `using` value.
    pub fn strategy(&self) -> &'static str {
        match self {
            By::AccessibilityId(_) => "accessibility id",
            By::ClassName(_) => "class name",
            By::Name(_) => "name",
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            By::AccessibilityId(v) | By::ClassName(v) | By::Name(v) => v,
        }
    }
}

impl std::fmt::Display for By {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}'", self.strategy(), self.value())
    }
}

/// Opaque element handle returned by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementId(pub String);

/// The operations the sequencer needs from an automation session.
pub trait UiSession {
    /// Find one element; `DriverError::NoSuchElement` when absent.
    fn find(&mut self, by: By) -> Result<ElementId, DriverError>;

    /// Find all matching elements; empty when none.
    fn find_all(&mut self, by: By) -> Result<Vec<ElementId>, DriverError>;

    fn click(&mut self, element: &ElementId) -> Result<(), DriverError>;

    fn send_keys(&mut self, element: &ElementId, text: &str) -> Result<(), DriverError>;
}
