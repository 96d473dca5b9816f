//! Export/import workflow for sharing descriptions between campaigns.
//!
//! # Responsibility
//! - Compose store snapshot, codec and filesystem into export/import use-cases.
//! - Convert every failure into a user-facing `ExchangeOutcome`.
//!
//! # Invariants
//! - Export and import never return `Err` and never panic.
//! - A failed import leaves the session store untouched.
//! - File I/O is synchronous; there is no retry.

use crate::codec::{self, CodecError};
use crate::session::AnnotationSession;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Failure taxonomy for export/import.
#[derive(Debug)]
pub enum ExchangeError {
    /// No campaign session is loaded.
    NoActiveSession,
    /// The store has nothing to export.
    EmptyStore,
    /// Import path does not exist.
    FileNotFound(PathBuf),
    /// Import file is unparsable or has the wrong shape.
    MalformedDocument(String),
    /// Import file parsed but yields no usable description.
    EmptyResult,
    /// Any other filesystem or encoding failure.
    Io { path: PathBuf, message: String },
}

impl ExchangeError {
    fn from_codec(err: CodecError, path: &Path) -> Self {
        match err {
            CodecError::EmptyStore => Self::EmptyStore,
            CodecError::MalformedDocument(detail) => Self::MalformedDocument(detail),
            CodecError::EmptyResult => Self::EmptyResult,
            CodecError::Encode(err) => Self::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        }
    }

    fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoActiveSession => "no_active_session",
            Self::EmptyStore => "empty_store",
            Self::FileNotFound(_) => "file_not_found",
            Self::MalformedDocument(_) => "malformed_document",
            Self::EmptyResult => "empty_result",
            Self::Io { .. } => "io",
        }
    }
}

impl Display for ExchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveSession => write!(f, "No active campaign. Load a campaign first."),
            Self::EmptyStore => write!(f, "No custom descriptions to export."),
            Self::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            Self::MalformedDocument(detail) => write!(f, "Invalid JSON format: {detail}"),
            Self::EmptyResult => write!(f, "The file contains no descriptions."),
            Self::Io { message, .. } => write!(f, "{message}"),
        }
    }
}

impl Error for ExchangeError {}

/// Outcome envelope returned to UI/CLI callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub ok: bool,
    /// Human-readable message suitable for direct display.
    pub message: String,
    /// Descriptions exported or merged. `0` on failure.
    pub count: usize,
    /// File written or read. `None` on failure.
    pub file_path: Option<PathBuf>,
}

impl ExchangeOutcome {
    fn success(message: String, count: usize, file_path: PathBuf) -> Self {
        Self {
            ok: true,
            message,
            count,
            file_path: Some(file_path),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            count: 0,
            file_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Export,
    Import,
}

impl Direction {
    fn event(self) -> &'static str {
        match self {
            Self::Export => "descriptions_export",
            Self::Import => "descriptions_import",
        }
    }

    fn io_prefix(self) -> &'static str {
        match self {
            Self::Export => "Export failed",
            Self::Import => "Import failed",
        }
    }
}

/// Export/import service bound to one export file location.
#[derive(Debug, Clone)]
pub struct ExchangeService {
    export_path: PathBuf,
}

impl ExchangeService {
    pub fn new(export_path: impl Into<PathBuf>) -> Self {
        Self {
            export_path: export_path.into(),
        }
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    /// Writes every description of `session` to the export file.
    pub fn export(&self, session: Option<&AnnotationSession>) -> ExchangeOutcome {
        let started_at = Instant::now();
        let result = self.try_export(session);
        finish(Direction::Export, started_at, result, |count, path| {
            format!("Exported {count} description(s) to {}", path.display())
        })
    }

    /// Imports from the default export file.
    pub fn import(&self, session: Option<&AnnotationSession>) -> ExchangeOutcome {
        self.import_from(session, &self.export_path)
    }

    /// Imports from `path` and merges into `session`.
    pub fn import_from(
        &self,
        session: Option<&AnnotationSession>,
        path: impl AsRef<Path>,
    ) -> ExchangeOutcome {
        let started_at = Instant::now();
        let result = try_import(session, path.as_ref());
        finish(Direction::Import, started_at, result, |count, path| {
            format!("Imported {count} description(s) from {}", path.display())
        })
    }

    fn try_export(
        &self,
        session: Option<&AnnotationSession>,
    ) -> Result<(usize, PathBuf), ExchangeError> {
        let session = active(session)?;
        let descriptions = session.all();
        if descriptions.is_empty() {
            return Err(ExchangeError::EmptyStore);
        }

        let path = self.export_path.as_path();
        let bytes =
            codec::serialize(&descriptions).map_err(|err| ExchangeError::from_codec(err, path))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| ExchangeError::io(parent, err))?;
        }
        std::fs::write(path, bytes).map_err(|err| ExchangeError::io(path, err))?;

        Ok((descriptions.len(), path.to_path_buf()))
    }
}

fn try_import(
    session: Option<&AnnotationSession>,
    path: &Path,
) -> Result<(usize, PathBuf), ExchangeError> {
    let session = active(session)?;
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => return Err(ExchangeError::FileNotFound(path.to_path_buf())),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ExchangeError::FileNotFound(path.to_path_buf()));
        }
        Err(err) => return Err(ExchangeError::io(path, err)),
    }

    let bytes = std::fs::read(path).map_err(|err| ExchangeError::io(path, err))?;
    let document = codec::deserialize(&bytes).map_err(|err| ExchangeError::from_codec(err, path))?;
    info!(
        "event=descriptions_import module=exchange status=decoded version={} entries={}",
        document
            .format_version
            .map_or_else(|| "legacy".to_string(), |v| v.to_string()),
        document.entries.len()
    );

    let merged = session.merge_all(document.entries);
    Ok((merged, path.to_path_buf()))
}

fn active(session: Option<&AnnotationSession>) -> Result<&AnnotationSession, ExchangeError> {
    session
        .filter(|session| session.is_active())
        .ok_or(ExchangeError::NoActiveSession)
}

fn finish(
    direction: Direction,
    started_at: Instant,
    result: Result<(usize, PathBuf), ExchangeError>,
    success_message: impl FnOnce(usize, &Path) -> String,
) -> ExchangeOutcome {
    match result {
        Ok((count, path)) => {
            info!(
                "event={} module=exchange status=ok count={} path={} duration_ms={}",
                direction.event(),
                count,
                path.display(),
                started_at.elapsed().as_millis()
            );
            let message = success_message(count, &path);
            ExchangeOutcome::success(message, count, path)
        }
        Err(err) => {
            error!(
                "event={} module=exchange status=error error_code={} duration_ms={} error={}",
                direction.event(),
                err.code(),
                started_at.elapsed().as_millis(),
                err
            );
            let message = match &err {
                ExchangeError::Io { .. } => format!("{}: {err}", direction.io_prefix()),
                _ => err.to_string(),
            };
            ExchangeOutcome::failure(message)
        }
    }
}
