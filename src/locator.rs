//! WhatsApp Desktop install discovery.
//!
//! Probes, in order:
//! 1. explicit `app_path` override
//! 2. %LOCALAPPDATA%\WhatsApp\app-<version>\WhatsApp.exe (highest version)
//! 3. %ProgramFiles%\WindowsApps\5319275A.WhatsAppDesktop_* (Store package)
//! 4. interactive fallback supplied by the caller
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const EXE_NAME: &str = "WhatsApp.exe";
pub const VERSION_DIR_PREFIX: &str = "app-";
pub const PACKAGE_PREFIX: &str = "5319275A.WhatsAppDesktop_";
/// Application id from WhatsApp's package manifest.
pub const PACKAGE_APP_ID: &str = "App";

/// What the automation session launches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AppTarget {
    Executable(PathBuf),
    PackageFamily(String),
}

impl AppTarget {
    /// Value for the WebDriver `app` capability.
    pub fn capability(&self) -> String {
        match self {
            AppTarget::Executable(path) => path.display().to_string(),
            AppTarget::PackageFamily(id) => id.clone(),
        }
    }
}

impl fmt::Display for AppTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.capability())
    }
}

/// Base directories probed for an install. Injectable for tests.
#[derive(Debug, Clone, Default)]
pub struct LocatorConfig {
    pub override_path: Option<String>,
    pub local_app_data: Option<PathBuf>,
    pub program_files: Option<PathBuf>,
}

impl LocatorConfig {
    /// Directories from the environment (Windows layout).
    pub fn from_env(override_path: Option<String>) -> Self {
        let local_app_data = std::env::var_os("LOCALAPPDATA")
            .map(PathBuf::from)
            .or_else(dirs::data_local_dir);
        let program_files = std::env::var_os("ProgramFiles").map(PathBuf::from);
        Self {
            override_path,
            local_app_data,
            program_files,
        }
    }
}

/// Resolve the WhatsApp target, asking `fallback` when every probe misses.
///
/// A fallback path that does not exist is rejected.
pub fn locate_installed_app(
    config: &LocatorConfig,
    fallback: &mut dyn FnMut() -> Option<PathBuf>,
) -> Option<AppTarget> {
    if let Some(target) = probe_installed(config) {
        return Some(target);
    }

    warn!("WhatsApp installation not found; asking user");
    let picked = fallback()?;
    if picked.is_file() {
        Some(AppTarget::Executable(picked))
    } else {
        warn!(path = %picked.display(), "selected path does not exist");
        None
    }
}

/// Every non-interactive probe.
pub fn probe_installed(config: &LocatorConfig) -> Option<AppTarget> {
    if let Some(ref path) = config.override_path {
        if let Some(target) = from_override(path) {
            return Some(target);
        }
        warn!(path = %path, "configured app_path not found, continuing discovery");
    }

    if let Some(exe) = config.local_app_data.as_deref().and_then(find_in_local_app_data) {
        return Some(AppTarget::Executable(exe));
    }

    config
        .program_files
        .as_deref()
        .and_then(find_in_windows_apps)
        .map(AppTarget::PackageFamily)
}

fn from_override(value: &str) -> Option<AppTarget> {
    if value.starts_with(PACKAGE_PREFIX) && value.contains('!') {
        return Some(AppTarget::PackageFamily(value.to_string()));
    }
    let path = PathBuf::from(value);
    path.is_file().then_some(AppTarget::Executable(path))
}

/// Parse `app-1.2.3` into `[1, 2, 3]`.
fn parse_version(dir_name: &str) -> Option<Vec<u64>> {
    dir_name
        .strip_prefix(VERSION_DIR_PREFIX)?
        .split('.')
        .map(|part| part.parse().ok())
        .collect()
}

fn subdirectories_with_prefix(base: &Path, prefix: &str) -> Vec<String> {
    let entries = match std::fs::read_dir(base) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %base.display(), error = %e, "cannot read directory");
            return Vec::new();
        }
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(prefix))
        .collect()
}

/// Latest `WhatsApp\app-*\WhatsApp.exe` under LocalAppData.
///
/// Folders with unparseable versions sort lowest.
pub fn find_in_local_app_data(local_app_data: &Path) -> Option<PathBuf> {
    let base = local_app_data.join("WhatsApp");
    let mut versions = subdirectories_with_prefix(&base, VERSION_DIR_PREFIX);
    versions.sort_by_key(|name| parse_version(name));

    let latest = versions.last()?;
    let exe = base.join(latest).join(EXE_NAME);
    debug!(path = %exe.display(), "checking local install");
    exe.is_file().then_some(exe)
}

/// Package family id (`Name_PublisherId!App`) of the latest Store install.
pub fn find_in_windows_apps(program_files: &Path) -> Option<String> {
    let base = program_files.join("WindowsApps");
    let mut packages = subdirectories_with_prefix(&base, PACKAGE_PREFIX);
    packages.sort();
    package_family_name(packages.last()?)
}

/// `5319275A.WhatsAppDesktop_2.2324.1.0_x64__cv1g1gvanyjgm`
/// -> `5319275A.WhatsAppDesktop_cv1g1gvanyjgm!App`
pub fn package_family_name(folder: &str) -> Option<String> {
    let parts: Vec<&str> = folder.split("__").collect();
    if parts.len() != 2 {
        return None;
    }
    let name = parts[0].split('_').next()?;
    Some(format!("{}_{}!{}", name, parts[1], PACKAGE_APP_ID))
}
