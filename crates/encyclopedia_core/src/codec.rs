//! Description export document codec.
//!
//! # Responsibility
//! - Encode a description map into the versioned JSON export document.
//! - Decode current and legacy documents into a description map.
//!
//! # Invariants
//! - `formatVersion` is informational; no document is rejected for its version.
//! - `descriptionCount` is never trusted on read.
//! - Decoding never touches a store; callers merge the returned map.
//!
//! # Wire shape
//! ```json
//! { "version": 1, "exportedAt": "...", "descriptionCount": 2,
//!   "descriptions": { "lord_1_1": "...", "town_V3": "..." } }
//! ```
//! Legacy files carry only the `descriptions` object.

use crate::store::DescriptionMap;
use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Format generation written by this build.
pub const CURRENT_FORMAT_VERSION: i64 = 1;

/// Field names tried, in order, when falling back to generic decoding.
const DESCRIPTION_FIELDS: &[&str] = &["descriptions", "entries"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug)]
pub enum CodecError {
    /// Nothing to export.
    EmptyStore,
    /// Input is not JSON, or the descriptions field is missing or mis-shaped.
    MalformedDocument(String),
    /// Input parsed but carries no usable description.
    EmptyResult,
    /// JSON encoding failed.
    Encode(serde_json::Error),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStore => write!(f, "no descriptions to export"),
            Self::MalformedDocument(detail) => write!(f, "malformed export document: {detail}"),
            Self::EmptyResult => write!(f, "export document contains no descriptions"),
            Self::Encode(err) => write!(f, "failed to encode export document: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

/// Current (v1) export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: i64,
    /// RFC 3339 / ISO-8601 UTC timestamp.
    pub exported_at: String,
    /// Cached size of `descriptions` at write time. Metadata only.
    pub description_count: usize,
    pub descriptions: BTreeMap<String, String>,
}

/// Result of decoding one export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDocument {
    /// Declared `version`, when present and integral.
    pub format_version: Option<i64>,
    /// Usable (non-empty) descriptions.
    pub entries: DescriptionMap,
}

/// Serializes `entries` stamped with the current UTC time.
pub fn serialize(entries: &DescriptionMap) -> Result<Vec<u8>, CodecError> {
    serialize_at(entries, Utc::now())
}

/// Serializes `entries` with an explicit export timestamp.
pub fn serialize_at(
    entries: &DescriptionMap,
    exported_at: DateTime<Utc>,
) -> Result<Vec<u8>, CodecError> {
    if entries.is_empty() {
        return Err(CodecError::EmptyStore);
    }

    let document = ExportDocument {
        version: CURRENT_FORMAT_VERSION,
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        description_count: entries.len(),
        descriptions: entries
            .iter()
            .map(|(id, text)| (id.clone(), text.clone()))
            .collect(),
    };
    serde_json::to_vec_pretty(&document).map_err(CodecError::Encode)
}

/// Decodes an export file of any known format generation.
///
/// Strict decoding into `ExportDocument` is attempted first; documents that do
/// not fit (legacy shape, `null` values, extra wrapping) fall back to a generic
/// walk that only requires a flat `descriptions` object.
pub fn deserialize(bytes: &[u8]) -> Result<ImportedDocument, CodecError> {
    let bytes = strip_utf8_bom(bytes);
    let (format_version, raw_entries) = match serde_json::from_slice::<ExportDocument>(bytes) {
        Ok(document) => (
            Some(document.version),
            document.descriptions.into_iter().collect::<DescriptionMap>(),
        ),
        Err(strict_err) => {
            debug!("event=codec_decode module=codec mode=fallback reason={strict_err}");
            decode_generic(bytes)?
        }
    };

    let entries: DescriptionMap = raw_entries
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
        .collect();
    if entries.is_empty() {
        return Err(CodecError::EmptyResult);
    }

    debug!(
        "event=codec_decode module=codec status=ok version={} entries={}",
        format_version.map_or_else(|| "none".to_string(), |v| v.to_string()),
        entries.len()
    );
    Ok(ImportedDocument {
        format_version,
        entries,
    })
}

/// Convenience wrapper returning only the decoded descriptions.
pub fn deserialize_entries(bytes: &[u8]) -> Result<DescriptionMap, CodecError> {
    deserialize(bytes).map(|document| document.entries)
}

/// Files saved by some Windows editors start with a UTF-8 byte-order mark.
fn strip_utf8_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

fn decode_generic(bytes: &[u8]) -> Result<(Option<i64>, DescriptionMap), CodecError> {
    let root: Value = serde_json::from_slice(bytes)
        .map_err(|err| CodecError::MalformedDocument(err.to_string()))?;
    let Value::Object(object) = &root else {
        return Err(CodecError::MalformedDocument(format!(
            "document root must be an object, found {}",
            json_kind(&root)
        )));
    };

    let format_version = object.get("version").and_then(Value::as_i64);
    let field = DESCRIPTION_FIELDS
        .iter()
        .find_map(|name| object.get(*name))
        .ok_or_else(|| {
            CodecError::MalformedDocument("missing `descriptions` object".to_string())
        })?;
    let Value::Object(raw) = field else {
        return Err(CodecError::MalformedDocument(format!(
            "`descriptions` must be an object, found {}",
            json_kind(field)
        )));
    };

    Ok((format_version, flatten_descriptions(raw)?))
}

fn flatten_descriptions(raw: &Map<String, Value>) -> Result<DescriptionMap, CodecError> {
    let mut entries = DescriptionMap::with_capacity(raw.len());
    for (entity_id, value) in raw {
        match value {
            Value::String(text) => {
                entries.insert(entity_id.clone(), text.clone());
            }
            Value::Null => {}
            other => {
                return Err(CodecError::MalformedDocument(format!(
                    "description for `{entity_id}` must be a string, found {}",
                    json_kind(other)
                )));
            }
        }
    }
    Ok(entries)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{deserialize, deserialize_entries, serialize, serialize_at, CodecError};
    use crate::store::DescriptionMap;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    fn sample(pairs: &[(&str, &str)]) -> DescriptionMap {
        pairs
            .iter()
            .map(|(id, text)| (id.to_string(), text.to_string()))
            .collect()
    }

    #[test]
    fn serialize_rejects_empty_map() {
        let err = serialize(&DescriptionMap::new()).unwrap_err();
        assert!(matches!(err, CodecError::EmptyStore));
    }

    #[test]
    fn serialize_writes_versioned_header() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let bytes = serialize_at(&sample(&[("lord_1_1", "a"), ("town_V3", "b")]), at).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["exportedAt"], "2024-03-01T12:30:00Z");
        assert_eq!(value["descriptionCount"], 2);
        assert_eq!(value["descriptions"]["town_V3"], "b");
    }

    #[test]
    fn legacy_document_without_header_is_accepted() {
        let document = deserialize(br#"{"descriptions": {"x": "y"}}"#).unwrap();
        assert_eq!(document.format_version, None);
        assert_eq!(document.entries, sample(&[("x", "y")]));
    }

    #[test]
    fn future_version_is_not_rejected() {
        let document = deserialize(
            br#"{"version": 7, "exportedAt": "later", "descriptionCount": 99,
                "descriptions": {"x": "y"}}"#,
        )
        .unwrap();
        assert_eq!(document.format_version, Some(7));
        assert_eq!(document.entries.len(), 1);
    }

    #[test]
    fn descriptions_that_are_not_an_object_are_malformed() {
        let err = deserialize(br#"{"version": 1, "descriptions": "not-an-object"}"#).unwrap_err();
        assert!(matches!(err, CodecError::MalformedDocument(_)));

        let err = deserialize(br#"{"version": 1}"#).unwrap_err();
        assert!(matches!(err, CodecError::MalformedDocument(_)));
    }

    #[test]
    fn unparsable_or_non_object_input_is_malformed() {
        let err = deserialize(b"{ not json").unwrap_err();
        assert!(matches!(err, CodecError::MalformedDocument(_)));

        let err = deserialize(br#"[{"descriptions": {}}]"#).unwrap_err();
        match err {
            CodecError::MalformedDocument(detail) => assert!(detail.contains("array")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nested_values_are_malformed() {
        let err = deserialize(br#"{"descriptions": {"x": {"text": "y"}}}"#).unwrap_err();
        assert!(matches!(err, CodecError::MalformedDocument(_)));

        let err = deserialize(br#"{"descriptions": {"x": 42}}"#).unwrap_err();
        assert!(matches!(err, CodecError::MalformedDocument(_)));
    }

    #[test]
    fn empty_and_null_values_are_dropped() {
        let entries =
            deserialize_entries(br#"{"descriptions": {"a": "", "b": null, "c": "kept"}}"#)
                .unwrap();
        assert_eq!(entries, sample(&[("c", "kept")]));
    }

    #[test]
    fn document_without_usable_values_is_empty_result() {
        let err = deserialize(br#"{"descriptions": {"a": "", "b": null}}"#).unwrap_err();
        assert!(matches!(err, CodecError::EmptyResult));

        let err = deserialize(br#"{"version": 1, "exportedAt": "x", "descriptionCount": 0, "descriptions": {}}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::EmptyResult));
    }

    #[test]
    fn entries_alias_is_accepted_when_descriptions_is_absent() {
        let entries = deserialize_entries(br#"{"entries": {"x": "y"}}"#).unwrap();
        assert_eq!(entries, sample(&[("x", "y")]));
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let entries = deserialize_entries(b"\xEF\xBB\xBF{\"descriptions\":{\"x\":\"y\"}}").unwrap();
        assert_eq!(entries, sample(&[("x", "y")]));

        let mut exported = b"\xEF\xBB\xBF".to_vec();
        exported.extend(serialize(&sample(&[("lord_1_1", "veteran")])).unwrap());
        let document = deserialize(&exported).unwrap();
        assert_eq!(document.format_version, Some(1));
        assert_eq!(document.entries, sample(&[("lord_1_1", "veteran")]));
    }
}
