//! Send command: load numbers, resolve WhatsApp, run the worker.
//!
//! CHANGELOG:
//! - 10/16/2026 - Resolve the app before checking the message
//! - 10/16/2026 - Added --dry-run
//! - 10/16/2026 - Initial implementation

use super::load::load_into;
use super::locate::resolve_target;
use crate::automation::service::winappdriver_connector;
use crate::automation::SendPlan;
use crate::config::Settings;
use crate::locator::AppTarget;
use crate::message::ImageAttachment;
use crate::output::OutputControls;
use crate::phone::CanonicalNumber;
use crate::session::log::{LogSink, SendOutcome};
use crate::session::{Session, SessionError};
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything the form collected.
#[derive(Debug, Clone, Default)]
pub struct SendRequest {
    pub file: PathBuf,
    pub message: Option<String>,
    pub message_file: Option<PathBuf>,
    pub image: ImageAttachment,
    pub dry_run: bool,
}

fn message_text(request: &SendRequest) -> Result<Option<String>> {
    match (&request.message, &request.message_file) {
        (Some(_), Some(_)) => bail!("Pass either a message or --message-file, not both"),
        (Some(text), None) => Ok(Some(text.clone())),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map(Some)
            .with_context(|| format!("Failed to read message file: {:?}", path)),
        (None, None) => Ok(None),
    }
}

/// Load the numbers and image option. The message is set later, once the
/// app has been resolved.
pub fn prepare(request: &SendRequest, log: &LogSink) -> Result<Session> {
    let mut session = Session::new();
    load_into(&mut session, &request.file, log)?;

    if let Some(ref path) = request.image.path {
        if !Path::new(path).is_file() {
            bail!("Image not found: {:?}", path);
        }
    }
    session.set_image(request.image.clone());
    Ok(session)
}

/// What a send would do, without touching the driver.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunReport {
    pub dry_run: bool,
    pub target: AppTarget,
    pub recipients: Vec<CanonicalNumber>,
    pub message: String,
}

/// Validate a prepared session and list its recipients.
pub fn dry_run(session: &Session, target: AppTarget) -> Result<DryRunReport, SessionError> {
    session.validate()?;
    Ok(DryRunReport {
        dry_run: true,
        target,
        recipients: session.numbers().to_vec(),
        message: session
            .message()
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    })
}

/// Run a full send and stream the log until the worker finishes.
///
/// Order: load numbers, resolve the app, then check the message and the
/// number list.
pub fn run(request: &SendRequest, settings: &Settings, output: &OutputControls) -> Result<()> {
    let (log, rx) = LogSink::channel();

    let prepared = prepare(request, &log).and_then(|session| {
        let target = resolve_target(settings, &log)?;
        Ok((session, target))
    });
    output.flush_log(&rx);
    let (mut session, target) = prepared?;

    if let Some(text) = message_text(request)? {
        session.set_message(&text)?;
    }

    if request.dry_run {
        let report = dry_run(&session, target)?;
        if output.json {
            output.print(&report);
        } else {
            println!(
                "Dry run: would send to {} numbers using {}",
                report.recipients.len(),
                report.target
            );
            for number in &report.recipients {
                println!("  {}", number);
            }
        }
        return Ok(());
    }

    let handle = session.launch(
        target,
        SendPlan::from_settings(settings),
        winappdriver_connector(settings.clone()),
        log,
    )?;

    let streamed = output.follow_log(&rx);
    let outcome = handle
        .join()
        .map_err(|_| anyhow!("send worker panicked"))?;
    // the worker always reports; fall back to its return value regardless
    let outcome = streamed.unwrap_or(outcome);

    if output.json {
        output.print(&outcome);
    }
    match outcome {
        SendOutcome::Completed(_) => Ok(()),
        SendOutcome::Failed { error } => Err(anyhow!(error)),
    }
}
