//! Settings file and data file resolution.
//!
//! Settings live in `settings.toml` in the platform config directory:
//! - macOS: ~/Library/Application Support/com.forms.Forms/
//! - Windows: %APPDATA%/forms/Forms/config/
//! - Linux: ~/.config/forms/

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use form_core::DEFAULT_POLL_INTERVAL;
use form_model::DEFAULT_LOCALE;
use form_report::{DEFAULT_TIMESTAMP_FORMAT, ExportOptions};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "forms";
const APP_NAME: &str = "Forms";
const CONFIG_FILENAME: &str = "settings.toml";
const DATA_FILENAME: &str = "forms.json";

/// Environment variable naming the data file.
pub const DATA_FILE_ENV: &str = "FORMS_DATA_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_file: Option<PathBuf>,
    /// Locale for labels in tables and exports.
    pub locale: String,
    pub poll_interval_secs: u64,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub timestamp_format: String,
    pub utc_offset_minutes: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            locale: DEFAULT_LOCALE.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            export: ExportSettings::default(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl Settings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Export options, with `locale` overriding the configured one.
    pub fn export_options(&self, locale: Option<&str>) -> ExportOptions {
        ExportOptions::default()
            .with_locale(locale.unwrap_or(&self.locale))
            .with_timestamp_format(self.export.timestamp_format.clone())
            .with_utc_offset_minutes(self.export.utc_offset_minutes)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Default settings location, if the platform has one.
pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings.
///
/// An explicit path must exist and parse. Without one, the default location
/// is tried and any problem there falls back to defaults with a warning.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return read_settings(path);
    }
    let Some(path) = settings_path() else {
        tracing::warn!("could not determine settings path, using defaults");
        return Ok(Settings::default());
    };
    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::debug!(path = %path.display(), "loaded settings");
                Ok(settings)
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "invalid settings file, using defaults");
                Ok(Settings::default())
            }
        },
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(Settings::default()),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "unreadable settings file, using defaults");
            Ok(Settings::default())
        }
    }
}

/// Read and parse a settings file.
pub fn read_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read settings: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parse settings: {}", path.display()))
}

/// Write settings as TOML, creating the parent directory.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory: {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(settings).context("serialize settings")?;
    fs::write(path, content).with_context(|| format!("write settings: {}", path.display()))
}

/// Pick the data file: flag, then environment, then settings, then the
/// platform data directory.
pub fn resolve_data_file(
    flag: Option<&Path>,
    env_value: Option<&str>,
    settings: &Settings,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(value) = env_value.map(str::trim).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(value));
    }
    if let Some(path) = &settings.data_file {
        return Ok(path.clone());
    }
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DATA_FILENAME))
        .ok_or_else(|| anyhow!("no data file given and no platform data directory; use --data"))
}
