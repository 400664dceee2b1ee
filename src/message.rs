//! Message text and image attachment options.
//!
//! CHANGELOG:
//! - 10/16/2026 - Added %PHONE% / %DATE% placeholders
//! - 10/16/2026 - Initial implementation

use crate::phone::CanonicalNumber;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Maximum message length in characters.
pub const MAX_MESSAGE_CHARS: usize = 1024;

pub const PLACEHOLDER_PHONE: &str = "%PHONE%";
pub const PLACEHOLDER_DATE: &str = "%DATE%";

/// WebDriver key code for Enter.
pub const ENTER_KEY: char = '\u{E007}';

#[derive(Error, Debug, PartialEq)]
pub enum MessageError {
    #[error("No Message Entered")]
    Empty,

    #[error("Message is {0} characters; the limit is {max}", max = MAX_MESSAGE_CHARS)]
    TooLong(usize),
}

/// The user-authored message body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MessageText(String);

impl MessageText {
    /// Validate message text: not blank, at most [`MAX_MESSAGE_CHARS`]
    /// once placeholders are expanded.
    pub fn new(text: impl Into<String>) -> Result<Self, MessageError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(MessageError::Empty);
        }
        let len = expanded_len(&text);
        if len > MAX_MESSAGE_CHARS {
            return Err(MessageError::TooLong(len));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expand placeholders for one recipient.
    pub fn personalize(&self, number: &CanonicalNumber) -> String {
        let mut text = self.0.clone();
        if text.contains(PLACEHOLDER_PHONE) {
            text = text.replace(PLACEHOLDER_PHONE, number.as_str());
        }
        if text.contains(PLACEHOLDER_DATE) {
            let today = chrono::Local::now().format("%Y-%m-%d").to_string();
            text = text.replace(PLACEHOLDER_DATE, &today);
        }
        text
    }
}

/// Length in chars after placeholder expansion. Both expansions have a
/// fixed width, so this is exact for every recipient.
fn expanded_len(text: &str) -> usize {
    text.replace(PLACEHOLDER_PHONE, "+920000000000")
        .replace(PLACEHOLDER_DATE, "0000-00-00")
        .chars()
        .count()
}

/// Turn line breaks into Enter keystrokes so each line is submitted.
pub fn to_keystrokes(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', &ENTER_KEY.to_string())
}

/// Where an image goes relative to the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    #[default]
    None,
    Append,
    Prepend,
}

/// Optional image attachment chosen on the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageAttachment {
    pub mode: ImageMode,
    pub path: Option<PathBuf>,
}

impl ImageAttachment {
    pub fn is_requested(&self) -> bool {
        self.mode != ImageMode::None && self.path.is_some()
    }
}
