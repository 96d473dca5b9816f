//! SQLite-backed save slot.
//!
//! # Responsibility
//! - Open file or in-memory save databases and apply migrations.
//! - Store each field as a JSON-encoded map in `save_fields`.
//!
//! # Invariants
//! - Returned slots have migrations fully applied.
//! - Corrupt payloads surface as `SlotError::CorruptField`, never as empty maps.

use super::migrations::apply_migrations;
use super::{SaveSlot, SlotError, SlotResult};
use crate::store::DescriptionMap;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// Save slot persisted in a SQLite file.
pub struct SqliteSaveSlot {
    conn: Connection,
}

impl SqliteSaveSlot {
    /// Opens (or creates) a save file and applies pending migrations.
    ///
    /// # Side effects
    /// - Emits `slot_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> SlotResult<Self> {
        bootstrap("file", || Connection::open(path))
    }

    /// Opens an in-memory save database, mostly for tests.
    pub fn open_in_memory() -> SlotResult<Self> {
        bootstrap("memory", Connection::open_in_memory)
    }

    /// Returns the schema version recorded in the save file.
    pub fn schema_version(&self) -> SlotResult<u32> {
        let version = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        Ok(version)
    }
}

impl SaveSlot for SqliteSaveSlot {
    fn read_field(&self, key: &str) -> SlotResult<Option<DescriptionMap>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM save_fields WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(text) => serde_json::from_str::<DescriptionMap>(&text)
                .map(Some)
                .map_err(|err| SlotError::CorruptField {
                    key: key.to_string(),
                    message: err.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn write_field(&mut self, key: &str, value: &DescriptionMap) -> SlotResult<()> {
        let payload = serde_json::to_string(value).map_err(|err| SlotError::Encode {
            key: key.to_string(),
            message: err.to_string(),
        })?;

        self.conn.execute(
            "INSERT INTO save_fields (key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, payload],
        )?;
        info!(
            "event=slot_write module=slot status=ok key={} entries={}",
            key,
            value.len()
        );
        Ok(())
    }
}

fn bootstrap(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> SlotResult<SqliteSaveSlot> {
    let started_at = Instant::now();
    info!("event=slot_open module=slot status=start mode={mode}");

    let result = open()
        .map_err(SlotError::from)
        .and_then(|mut conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            conn.busy_timeout(Duration::from_secs(5))?;
            apply_migrations(&mut conn)?;
            Ok(conn)
        });

    match result {
        Ok(conn) => {
            info!(
                "event=slot_open module=slot status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(SqliteSaveSlot { conn })
        }
        Err(err) => {
            error!(
                "event=slot_open module=slot status=error mode={mode} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}
