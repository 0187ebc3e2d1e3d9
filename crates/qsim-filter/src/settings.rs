//! Persisted fast-access settings.
//!
//! Settings live in a TOML file in the platform-specific config folder:
//! - macOS: ~/Library/Application Support/org.qsim.QSim-Report/
//! - Windows: %APPDATA%/qsim/QSim Report/config/
//! - Linux: ~/.config/qsimreport/

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use qsim_format::NumberLocale;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::{DEFAULT_DO_NOT_FORMAT, FormatOptions, split_path};
use crate::list::FilterList;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "qsim";
const APP_NAME: &str = "QSim Report";
const CONFIG_FILENAME: &str = "settings.toml";

/// Errors raised while saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to create config directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize settings")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write settings file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings of the fast-access report view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastAccessSettings {
    /// The last used filter list in its saved text form.
    pub filter_list: String,
    pub number_digits: u8,
    pub percent_digits: u8,
    pub locale: NumberLocale,
    /// Comma-separated tag paths whose values are never reformatted.
    pub do_not_format: Vec<String>,
}

impl Default for FastAccessSettings {
    fn default() -> Self {
        Self {
            filter_list: String::new(),
            number_digits: 1,
            percent_digits: 1,
            locale: NumberLocale::default(),
            do_not_format: DEFAULT_DO_NOT_FORMAT.iter().map(|entry| (*entry).to_string()).collect(),
        }
    }
}

impl FastAccessSettings {
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            locale: self.locale,
            number_digits: usize::from(self.number_digits),
            percent_digits: usize::from(self.percent_digits),
            do_not_format: self
                .do_not_format
                .iter()
                .map(|entry| split_path(entry))
                .filter(|path| !path.is_empty())
                .collect(),
        }
    }

    /// Stores `list` as the last used filter list.
    ///
    /// Returns true when the stored text changed and the settings need saving.
    pub fn remember(&mut self, list: &FilterList) -> bool {
        let saved = list.save();
        if saved == self.filter_list {
            return false;
        }
        self.filter_list = saved;
        true
    }

    /// The remembered filter list, if any.
    pub fn stored_list(&self) -> Option<FilterList> {
        if self.filter_list.trim().is_empty() {
            return None;
        }
        let outcome = FilterList::load(&self.filter_list);
        if !outcome.fully_read {
            tracing::warn!("Stored filter list was only partially readable");
        }
        Some(outcome.list)
    }
}

/// Default location of the settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Loads settings from `path`, falling back to defaults when the file is
/// missing or cannot be parsed.
pub fn load_settings(path: &Path) -> FastAccessSettings {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings file: {}, using defaults", e);
                FastAccessSettings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No settings file found at {:?}, using defaults", path);
            FastAccessSettings::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read settings file: {}, using defaults", e);
            FastAccessSettings::default()
        }
    }
}

/// Saves settings to `path`, creating the parent directory if needed.
pub fn save_settings(path: &Path, settings: &FastAccessSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    fs::write(path, content).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Saved settings to {:?}", path);
    Ok(())
}
