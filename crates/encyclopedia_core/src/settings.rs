//! User-facing settings for the description editor.
//!
//! # Responsibility
//! - Load and save the global settings JSON file.
//! - Clamp numeric settings into their supported ranges.
//! - Resolve the export/import file location.
//!
//! # Invariants
//! - A missing settings file yields defaults, never an error.
//! - Out-of-range numbers are clamped, never rejected.

use crate::model::entity::EntityKind;
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// File name used for export and default import.
pub const EXPORT_FILE_NAME: &str = "descriptions_export.json";
/// Character cap applied by the edit dialog when no limit is configured.
pub const DIALOG_MAX_LENGTH: usize = 10_000;

const INITIAL_KEY_POLL_DELAY_RANGE: RangeInclusive<u64> = 100..=2000;
const KEY_POLL_INTERVAL_RANGE: RangeInclusive<u64> = 10..=500;
const MAX_DESCRIPTION_LENGTH_RANGE: RangeInclusive<usize> = 0..=DIALOG_MAX_LENGTH;

#[derive(Debug)]
pub enum SettingsError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Encode { path: PathBuf, source: serde_json::Error },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "settings file `{}` is not accessible: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "settings file `{}` is invalid: {source}", path.display())
            }
            Self::Encode { path, source } => {
                write!(f, "settings for `{}` could not be encoded: {source}", path.display())
            }
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } | Self::Encode { source, .. } => Some(source),
        }
    }
}

/// Global editor settings, persisted as camelCase JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EncyclopediaSettings {
    /// Announce the edit shortcut when a page opens.
    pub show_edit_hint: bool,
    /// Show success messages after saving/resetting a description.
    pub show_confirmation_messages: bool,
    pub enable_hero_editing: bool,
    pub enable_clan_editing: bool,
    pub enable_kingdom_editing: bool,
    pub enable_settlement_editing: bool,
    /// Delay before the edit chord is first polled on a page.
    pub initial_key_poll_delay_ms: u64,
    pub key_poll_interval_ms: u64,
    /// Character limit applied on save. `0` means unlimited.
    pub max_description_length: usize,
    pub debug_mode: bool,
    /// Overrides the default export directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for EncyclopediaSettings {
    fn default() -> Self {
        Self {
            show_edit_hint: true,
            show_confirmation_messages: true,
            enable_hero_editing: true,
            enable_clan_editing: true,
            enable_kingdom_editing: true,
            enable_settlement_editing: true,
            initial_key_poll_delay_ms: 500,
            key_poll_interval_ms: 50,
            max_description_length: 0,
            debug_mode: false,
            export_dir: None,
        }
    }
}

impl EncyclopediaSettings {
    /// Loads settings from `path`, falling back to defaults when the file is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings: Self = serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(settings.clamped())
    }

    /// Writes settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Returns a copy with every numeric field clamped into its supported range.
    pub fn clamped(mut self) -> Self {
        self.initial_key_poll_delay_ms = clamp_setting(
            "initialKeyPollDelayMs",
            self.initial_key_poll_delay_ms,
            INITIAL_KEY_POLL_DELAY_RANGE,
        );
        self.key_poll_interval_ms = clamp_setting(
            "keyPollIntervalMs",
            self.key_poll_interval_ms,
            KEY_POLL_INTERVAL_RANGE,
        );
        self.max_description_length = clamp_setting(
            "maxDescriptionLength",
            self.max_description_length,
            MAX_DESCRIPTION_LENGTH_RANGE,
        );
        self
    }

    /// Returns whether editing is enabled for pages of `kind`.
    pub fn is_kind_enabled(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Hero => self.enable_hero_editing,
            EntityKind::Clan => self.enable_clan_editing,
            EntityKind::Kingdom => self.enable_kingdom_editing,
            EntityKind::Settlement => self.enable_settlement_editing,
        }
    }

    /// Character cap shown by the edit dialog.
    pub fn effective_max_length(&self) -> usize {
        if self.max_description_length == 0 {
            DIALOG_MAX_LENGTH
        } else {
            self.max_description_length
        }
    }

    pub fn export_file_path(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(default_export_dir)
            .join(EXPORT_FILE_NAME)
    }
}

/// Default export directory under the user's documents folder:
/// `Documents/Mount and Blade II Bannerlord/Configs/ModSettings/Global/EditableEncyclopedia`.
pub fn default_export_dir() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Mount and Blade II Bannerlord")
        .join("Configs")
        .join("ModSettings")
        .join("Global")
        .join("EditableEncyclopedia")
}

fn clamp_setting<T>(name: &str, value: T, range: RangeInclusive<T>) -> T
where
    T: PartialOrd + Copy + Display,
{
    let (min, max) = (*range.start(), *range.end());
    let clamped = if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    };
    if clamped != value {
        warn!(
            "event=settings_clamp module=settings field={name} value={value} clamped={clamped}"
        );
    }
    clamped
}
