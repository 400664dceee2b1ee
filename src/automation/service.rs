//! Starting the local WinAppDriver service.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use super::driver::{is_reachable, DriverSession};
use super::DriverError;
use crate::config::Settings;
use crate::locator::AppTarget;
use crate::session::log::LogSink;
use std::process::{Command, Stdio};
use std::thread;

/// Make sure a driver answers at `settings.driver_url`.
///
/// Spawns the configured executable when the endpoint is down. A spawn
/// failure is logged and ignored: the service is assumed to be running
/// already (or about to be), and session creation reports the real error.
pub fn ensure_driver_running(settings: &Settings, log: &LogSink) {
    if is_reachable(&settings.driver_url) {
        log.debug(format!("Driver already listening at {}", settings.driver_url));
        return;
    }

    log.info("Ensuring WinAppDriver is running…");
    match Command::new(&settings.driver_executable)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => {
            log.debug(format!("Started driver (pid {})", child.id()));
            thread::sleep(settings.driver_start_delay());
        }
        Err(e) => {
            log.warn(format!(
                "Could not start {} ({}); assuming it is already active",
                settings.driver_executable, e
            ));
        }
    }
}

/// Connector for [`Session::launch`](crate::session::Session::launch):
/// starts the driver if needed, opens a session on `target`, and waits for
/// the app window to settle.
pub fn winappdriver_connector(
    settings: Settings,
) -> impl FnOnce(&AppTarget, &LogSink) -> Result<DriverSession, DriverError> + Send + 'static {
    move |target, log| {
        ensure_driver_running(&settings, log);
        log.info("Connecting to WinAppDriver…");
        let session = DriverSession::create(&settings.driver_url, target)?;
        thread::sleep(settings.session_settle());
        Ok(session)
    }
}
