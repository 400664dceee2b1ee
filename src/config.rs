//! Settings for the driver endpoint, timings and install overrides.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var pointing at an explicit settings file.
pub const CONFIG_ENV: &str = "WHATSAPP_AUTOMATOR_CONFIG";

pub const DEFAULT_DRIVER_URL: &str = "http://127.0.0.1:4723";
pub const DEFAULT_DRIVER_EXECUTABLE: &str =
    r"C:\Program Files (x86)\Windows Application Driver\WinAppDriver.exe";

/// Default settings.json path.
///
/// Tries in order:
/// 1. WHATSAPP_AUTOMATOR_CONFIG env var
/// 2. <config dir>/wolfies-whatsapp/settings.json
pub fn default_settings_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("wolfies-whatsapp").join("settings.json"))
}

/// Effective settings. Every field has a default so partial files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// WinAppDriver endpoint
    pub driver_url: String,
    /// Executable started when the endpoint is not reachable
    pub driver_executable: String,
    pub driver_start_delay_ms: u64,
    /// Pause after the automation session opens
    pub session_settle_ms: u64,
    /// Pause after every click/keystroke
    pub step_delay_ms: u64,
    /// How long to wait for an element to appear
    pub wait_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Explicit WhatsApp.exe path or package family id; skips discovery
    pub app_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            driver_url: DEFAULT_DRIVER_URL.to_string(),
            driver_executable: DEFAULT_DRIVER_EXECUTABLE.to_string(),
            driver_start_delay_ms: 500,
            session_settle_ms: 1000,
            step_delay_ms: 300,
            wait_timeout_ms: 5000,
            poll_interval_ms: 500,
            app_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;
        let mut settings: Settings =
            serde_json::from_str(&content).with_context(|| "Failed to parse settings JSON")?;
        settings.expand_paths();
        Ok(settings)
    }

    /// Load from the default path, falling back to built-in defaults when
    /// no file exists.
    pub fn load_default() -> Result<Self> {
        match default_settings_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    fn expand_paths(&mut self) {
        self.driver_executable = expand(&self.driver_executable);
        self.app_path = self.app_path.as_deref().map(expand);
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn session_settle(&self) -> Duration {
        Duration::from_millis(self.session_settle_ms)
    }

    pub fn driver_start_delay(&self) -> Duration {
        Duration::from_millis(self.driver_start_delay_ms)
    }
}

/// Expand `~` and `$VAR`; unknown variables leave the input untouched.
fn expand(path: &str) -> String {
    shellexpand::full(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
