//! Session state and the background send worker.
//!
//! The session owns the loaded number list, the message, and the launch
//! control. A send run snapshots the list, moves it to a single worker
//! thread, and reports back only through the [`log::LogSink`] channel.
//!
//! CHANGELOG:
//! - 10/16/2026 - Launch guard re-enables on every exit path
//! - 10/16/2026 - Initial implementation

pub mod log;

use self::log::{LogSink, SendOutcome};
use crate::automation::{send_to_all, DriverError, SendPlan, UiSession};
use crate::locator::AppTarget;
use crate::message::{ImageAttachment, MessageError, MessageText};
use crate::phone::{detect_and_normalize, CanonicalNumber, DetectError, Detection};
use crate::sheet::{read_table, SheetError};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error("No Message Entered")]
    NoMessage,

    #[error("Please load some valid numbers.")]
    NoNumbers,

    #[error("A send is already in progress")]
    SendInProgress,

    #[error("Failed to start worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Enable flag for the launch action, shared with the worker.
#[derive(Debug, Clone)]
pub struct LaunchControl {
    enabled: Arc<AtomicBool>,
}

impl Default for LaunchControl {
    fn default() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl LaunchControl {
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Disable launching until the returned guard is dropped.
    pub fn try_acquire(&self) -> Option<LaunchGuard> {
        self.enabled
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| LaunchGuard {
                enabled: Arc::clone(&self.enabled),
            })
    }
}

/// Re-enables the launch control when dropped.
#[derive(Debug)]
pub struct LaunchGuard {
    enabled: Arc<AtomicBool>,
}

impl Drop for LaunchGuard {
    fn drop(&mut self) {
        self.enabled.store(true, Ordering::SeqCst);
    }
}

/// Everything the user has entered for the current run.
#[derive(Debug, Default)]
pub struct Session {
    numbers: Vec<CanonicalNumber>,
    message: Option<MessageText>,
    image: ImageAttachment,
    launch: LaunchControl,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a spreadsheet, replacing the current number list.
    pub fn load_spreadsheet<P: AsRef<Path>>(&mut self, path: P) -> Result<Detection, SessionError> {
        let table = read_table(path)?;
        let detection = detect_and_normalize(&table)?;
        self.numbers = detection.accepted.clone();
        Ok(detection)
    }

    pub fn set_numbers(&mut self, numbers: Vec<CanonicalNumber>) {
        self.numbers = numbers;
    }

    pub fn numbers(&self) -> &[CanonicalNumber] {
        &self.numbers
    }

    pub fn set_message(&mut self, text: &str) -> Result<(), MessageError> {
        self.message = Some(MessageText::new(text)?);
        Ok(())
    }

    pub fn message(&self) -> Option<&MessageText> {
        self.message.as_ref()
    }

    pub fn set_image(&mut self, image: ImageAttachment) {
        self.image = image;
    }

    pub fn image(&self) -> &ImageAttachment {
        &self.image
    }

    pub fn launch_control(&self) -> &LaunchControl {
        &self.launch
    }

    /// Check the inputs a send needs: message first, then numbers.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.message.is_none() {
            return Err(SessionError::NoMessage);
        }
        if self.numbers.is_empty() {
            return Err(SessionError::NoNumbers);
        }
        Ok(())
    }

    /// Validate, then run the send sequence on one background thread.
    ///
    /// The session's image option replaces `plan.image`. `connect` opens
    /// the automation session on the worker. The worker
    /// always ends with a [`log::LogEvent::Finished`] event and re-enables
    /// the launch control, whatever happened.
    pub fn launch<S, F>(
        &self,
        target: AppTarget,
        plan: SendPlan,
        connect: F,
        log: LogSink,
    ) -> Result<JoinHandle<SendOutcome>, SessionError>
    where
        S: UiSession,
        F: FnOnce(&AppTarget, &LogSink) -> Result<S, DriverError> + Send + 'static,
    {
        self.validate()?;
        let guard = self.launch.try_acquire().ok_or(SessionError::SendInProgress)?;

        let numbers = self.numbers.clone();
        let plan = SendPlan {
            image: self.image.clone(),
            ..plan
        };
        let message = self.message.clone().ok_or(SessionError::NoMessage)?;

        let handle = thread::Builder::new()
            .name("send-worker".to_string())
            .spawn(move || {
                let _guard = guard;
                log.info(format!("Using `{}`", target));
                let result = connect(&target, &log)
                    .and_then(|mut ui| send_to_all(&mut ui, &numbers, &message, &plan, &log));

                let outcome = match result {
                    Ok(summary) => SendOutcome::Completed(summary),
                    Err(e) => {
                        log.error(format!("ERROR: {}", e));
                        SendOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                log.finished(outcome.clone());
                outcome
            })?;

        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::log::LogEvent;
    use super::*;
    use crate::automation::sequencer::tests::FakeUi;
    use crate::automation::SendSummary;
    use crate::phone::normalize;
    use std::io::Write;
    use std::path::PathBuf;

    fn target() -> AppTarget {
        AppTarget::Executable(PathBuf::from("WhatsApp.exe"))
    }

    fn ready_session() -> Session {
        let mut session = Session::new();
        session.set_numbers(vec![normalize("03001234567").unwrap()]);
        session.set_message("Hello").unwrap();
        session
    }

    #[test]
    fn test_launch_guard_reenables_on_drop() {
        let control = LaunchControl::default();
        let guard = control.try_acquire().unwrap();
        assert!(!control.is_enabled());
        assert!(control.try_acquire().is_none());
        drop(guard);
        assert!(control.is_enabled());
    }

    #[test]
    fn test_validation_order() {
        let mut session = Session::new();
        assert!(matches!(session.validate(), Err(SessionError::NoMessage)));
        session.set_message("Hi").unwrap();
        assert!(matches!(session.validate(), Err(SessionError::NoNumbers)));
    }

    #[test]
    fn test_failed_validation_is_not_logged() {
        let session = Session::new();
        let (log, rx) = LogSink::channel();
        let result = session.launch(
            target(),
            SendPlan::default(),
            |_, _| Ok(FakeUi::default()),
            log,
        );
        assert!(matches!(result, Err(SessionError::NoMessage)));
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_launch_runs_worker_and_reenables() {
        let session = ready_session();
        let (log, rx) = LogSink::channel();

        let handle = session
            .launch(target(), SendPlan::default(), |_, _| Ok(FakeUi::default()), log)
            .unwrap();
        let outcome = handle.join().unwrap();

        assert!(matches!(
            outcome,
            SendOutcome::Completed(SendSummary { sent: 1, .. })
        ));
        assert!(session.launch_control().is_enabled());
        let events: Vec<LogEvent> = rx.iter().collect();
        assert!(matches!(events.last(), Some(LogEvent::Finished(_))));
    }

    #[test]
    fn test_connect_failure_is_logged_and_reenables() {
        let session = ready_session();
        let (log, rx) = LogSink::channel();

        let handle = session
            .launch(
                target(),
                SendPlan::default(),
                |_, _| -> Result<FakeUi, DriverError> {
                    Err(DriverError::Protocol("connection refused".into()))
                },
                log,
            )
            .unwrap();
        assert!(matches!(handle.join().unwrap(), SendOutcome::Failed { .. }));
        assert!(session.launch_control().is_enabled());

        let lines: Vec<String> = rx
            .iter()
            .filter_map(|e| e.line().map(|l| l.message.clone()))
            .collect();
        assert!(lines.iter().any(|l| l.starts_with("ERROR: ")));
    }

    #[test]
    fn test_second_launch_rejected_while_running() {
        let session = ready_session();
        let _busy = session.launch_control().try_acquire().unwrap();
        let (log, _rx) = LogSink::channel();

        let result = session.launch(
            target(),
            SendPlan::default(),
            |_, _| Ok(FakeUi::default()),
            log,
        );
        assert!(matches!(result, Err(SessionError::SendInProgress)));
    }

    #[test]
    fn test_load_replaces_numbers() {
        let mut session = ready_session();
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name,Phone").unwrap();
        writeln!(file, "A,0321-7654321").unwrap();
        writeln!(file, "B,bad").unwrap();

        let detection = session.load_spreadsheet(file.path()).unwrap();
        assert_eq!(detection.rejected_count, 1);
        assert_eq!(session.numbers().len(), 1);
        assert_eq!(session.numbers()[0].as_str(), "+923217654321");
    }
}
