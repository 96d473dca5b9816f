//! Host persistence slot boundary.
//!
//! # Responsibility
//! - Define the key-value `syncField` contract the host save system offers.
//! - Provide in-memory and SQLite-backed save slot implementations.
//!
//! # Invariants
//! - Maps are stored and returned verbatim; no transformation at this boundary.
//! - SQLite save files must have migrations applied before any field access.

use crate::store::DescriptionMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod migrations;
mod sqlite;

pub use memory::MemorySaveSlot;
pub use sqlite::SqliteSaveSlot;

/// Save-data field that carries the description map.
pub const DESCRIPTIONS_FIELD_KEY: &str = "_editableEncyclopediaDescriptions";

pub type SlotResult<T> = Result<T, SlotError>;

#[derive(Debug)]
pub enum SlotError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A stored field payload is not a string-to-string map.
    CorruptField {
        key: String,
        message: String,
    },
    /// A field value could not be encoded for storage.
    Encode {
        key: String,
        message: String,
    },
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "save schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::CorruptField { key, message } => {
                write!(f, "save field `{key}` is corrupt: {message}")
            }
            Self::Encode { key, message } => {
                write!(f, "save field `{key}` could not be encoded: {message}")
            }
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::CorruptField { .. }
            | Self::Encode { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Key-value persistence slot owned by the host save system.
pub trait SaveSlot {
    /// Reads a previously written map. `None` when the field was never written.
    fn read_field(&self, key: &str) -> SlotResult<Option<DescriptionMap>>;
    /// Writes `value` under `key`, replacing any previous content.
    fn write_field(&mut self, key: &str, value: &DescriptionMap) -> SlotResult<()>;
}
