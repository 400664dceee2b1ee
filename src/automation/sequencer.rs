//! The per-number click/type script against WhatsApp Desktop.
//!
//! Element identifiers below are WhatsApp's accessibility ids and are the
//! only coupling to the app's UI tree.
//!
//! CHANGELOG:
//! - 10/16/2026 - Poll for elements instead of failing on first lookup
//! - 10/16/2026 - Initial implementation

use super::{By, DriverError, ElementId, UiSession};
use crate::config::Settings;
use crate::message::{to_keystrokes, ImageAttachment, MessageText, ENTER_KEY};
use crate::phone::CanonicalNumber;
use crate::session::log::LogSink;
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};

pub const TITLE: By = By::AccessibilityId("LeftPanelTitleText");
pub const NEW_CONVERSATION: By = By::AccessibilityId("NewConvoButton");
pub const KEYPAD_TOGGLE: By = By::ClassName("ToggleButton");
pub const PHONE_NUMBER_BOX: By = By::AccessibilityId("PhoneNumberTextBox");
pub const CHAT_RESULT: By = By::Name("Chat");
pub const INPUT_BAR: By = By::AccessibilityId("InputBarTextBox");

/// Timings and options for one send run.
#[derive(Debug, Clone, Default)]
pub struct SendPlan {
    /// Pause after every interaction
    pub step_delay: Duration,
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    pub image: ImageAttachment,
}

impl SendPlan {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            step_delay: settings.step_delay(),
            wait_timeout: settings.wait_timeout(),
            poll_interval: settings.poll_interval(),
            image: ImageAttachment::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SendSummary {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Sent,
    Skipped,
}

struct Runner<'a, S: UiSession> {
    ui: &'a mut S,
    plan: &'a SendPlan,
    log: &'a LogSink,
}

impl<'a, S: UiSession> Runner<'a, S> {
    fn settle(&self) {
        if !self.plan.step_delay.is_zero() {
            thread::sleep(self.plan.step_delay);
        }
    }

    /// Poll until the element shows up or the wait times out.
    fn wait_for(&mut self, by: By) -> Result<ElementId, DriverError> {
        let start = Instant::now();
        loop {
            match self.ui.find(by) {
                Ok(element) => return Ok(element),
                Err(DriverError::NoSuchElement(_)) if start.elapsed() < self.plan.wait_timeout => {
                    thread::sleep(self.plan.poll_interval);
                }
                Err(DriverError::NoSuchElement(_)) => {
                    return Err(DriverError::Timeout(by.to_string()))
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Like [`wait_for`](Self::wait_for) but `None` on timeout.
    fn wait_for_any(&mut self, by: By) -> Result<Option<ElementId>, DriverError> {
        let start = Instant::now();
        loop {
            if let Some(first) = self.ui.find_all(by)?.into_iter().next() {
                return Ok(Some(first));
            }
            if start.elapsed() >= self.plan.wait_timeout {
                return Ok(None);
            }
            thread::sleep(self.plan.poll_interval);
        }
    }

    fn click(&mut self, by: By, label: &str) -> Result<ElementId, DriverError> {
        self.log.debug(format!("Waiting for {}…", label));
        let element = self.wait_for(by)?;
        self.log.debug(format!("Clicking {}…", label));
        self.ui.click(&element)?;
        self.settle();
        Ok(element)
    }

    fn type_text(&mut self, element: &ElementId, text: &str) -> Result<(), DriverError> {
        self.ui.send_keys(element, text)?;
        self.settle();
        Ok(())
    }

    fn reset(&mut self, title: &ElementId) {
        match self.ui.click(title) {
            Ok(()) => self.settle(),
            Err(e) => self.log.warn(format!("Could not reset UI: {}", e)),
        }
    }

    fn send_one(
        &mut self,
        number: &CanonicalNumber,
        message: &MessageText,
    ) -> Result<Outcome, DriverError> {
        self.click(NEW_CONVERSATION, "NewConvoButton")?;
        self.click(KEYPAD_TOGGLE, "ToggleButton")?;
        let search = self.click(PHONE_NUMBER_BOX, "SearchBar")?;
        self.type_text(&search, number.local_digits())?;

        let chat = match self.wait_for_any(CHAT_RESULT)? {
            Some(chat) => chat,
            None => {
                self.log.warn(format!(
                    "Number {} is not valid or not on WhatsApp",
                    number.local_digits()
                ));
                return Ok(Outcome::Skipped);
            }
        };
        self.log.debug("Clicking ChatButton…");
        self.ui.click(&chat)?;
        self.settle();

        let input = self.click(INPUT_BAR, "InputBar")?;
        let text = to_keystrokes(&message.personalize(number));
        self.type_text(&input, &text)?;
        self.type_text(&input, &ENTER_KEY.to_string())?;
        Ok(Outcome::Sent)
    }
}

/// Send `message` to every number, one after another.
///
/// Per-number failures are logged, the UI is reset through the title
/// element, and the loop moves on. Only failing to reach the initial
/// title element is returned as an error.
pub fn send_to_all<S: UiSession>(
    ui: &mut S,
    numbers: &[CanonicalNumber],
    message: &MessageText,
    plan: &SendPlan,
    log: &LogSink,
) -> Result<SendSummary, DriverError> {
    let mut runner = Runner { ui, plan, log };
    let mut summary = SendSummary::default();

    if plan.image.is_requested() {
        log.warn("Image attachments are not automated yet; sending text only");
    }

    let title = runner.click(TITLE, "LeftPanelTitleText")?;

    for number in numbers {
        log.info(format!("Sending message to {}", number));
        match runner.send_one(number, message) {
            Ok(Outcome::Sent) => summary.sent += 1,
            Ok(Outcome::Skipped) => {
                summary.skipped += 1;
                runner.reset(&title);
            }
            Err(e) => {
                summary.failed += 1;
                log.error(format!("Unexpected error occurred: {}", e));
                runner.reset(&title);
            }
        }
    }

    log.info(format!(
        "Done! sent {}, skipped {}, failed {}",
        summary.sent, summary.skipped, summary.failed
    ));
    Ok(summary)
}
