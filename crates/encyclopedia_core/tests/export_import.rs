use encyclopedia_core::{
    deserialize_entries, serialize, AnnotationSession, DescriptionMap, ExchangeService,
};
use serde_json::Value;
use std::path::Path;

fn map(pairs: &[(&str, &str)]) -> DescriptionMap {
    pairs
        .iter()
        .map(|(id, text)| (id.to_string(), text.to_string()))
        .collect()
}

fn session_with(pairs: &[(&str, &str)]) -> AnnotationSession {
    let session = AnnotationSession::start();
    for (id, text) in pairs {
        session.set(id, Some(text));
    }
    session
}

fn write_file(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

#[test]
fn serialize_then_deserialize_preserves_every_pair() {
    let original = map(&[
        ("lord_1_1", "Fought at Pravend."),
        ("clan_empire_south_1", "Unreliable allies.\nWatch them."),
        ("town_V3", "Ünïcödé and \"quotes\""),
    ]);
    let bytes = serialize(&original).unwrap();
    assert_eq!(deserialize_entries(&bytes).unwrap(), original);
}

#[test]
fn round_trip_holds_for_varied_mappings() {
    let long_text = "Veteran of many sieges. ".repeat(500);
    let mut many = DescriptionMap::new();
    for idx in 0..200 {
        many.insert(format!("hero_{idx}"), format!("note {idx}"));
    }
    let cases = vec![
        map(&[("lord_1_1", "single")]),
        map(&[("", "empty id"), ("town_V3", "port")]),
        map(&[("lord_2_7", long_text.as_str())]),
        map(&[
            ("id \"quoted\"", "back\\slash"),
            ("path\\like\\id", "tab\tand\r\nbreaks"),
        ]),
        map(&[("kingdom_😀", "𝔊𝔬𝔱𝔥𝔦𝔠 and 🏰"), ("clan_é", "ünïcödé")]),
        many,
    ];

    for original in cases {
        let bytes = serialize(&original).unwrap();
        assert_eq!(deserialize_entries(&bytes).unwrap(), original);
    }
}

#[test]
fn export_on_empty_store_fails() {
    let dir = tempfile::tempdir().unwrap();
    let service = ExchangeService::new(dir.path().join("descriptions_export.json"));
    let session = AnnotationSession::start();

    let outcome = service.export(Some(&session));
    assert!(!outcome.ok);
    assert_eq!(outcome.message, "No custom descriptions to export.");
    assert!(!service.export_path().exists());
}

#[test]
fn export_of_three_entries_writes_parseable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir
        .path()
        .join("Configs")
        .join("EditableEncyclopedia")
        .join("descriptions_export.json");
    let service = ExchangeService::new(&path);
    let session = session_with(&[("a", "1"), ("b", "2"), ("c", "3")]);

    let outcome = service.export(Some(&session));
    assert!(outcome.ok, "{}", outcome.message);
    assert_eq!(outcome.count, 3);
    assert_eq!(outcome.file_path.as_deref(), Some(path.as_path()));
    assert!(outcome.message.starts_with("Exported 3 description(s) to "));

    let bytes = std::fs::read(&path).unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["descriptionCount"], 3);
    assert!(value["exportedAt"].as_str().is_some());
    assert_eq!(deserialize_entries(&bytes).unwrap().len(), 3);
}

#[test]
fn export_and_import_require_active_session() {
    let dir = tempfile::tempdir().unwrap();
    let service = ExchangeService::new(dir.path().join("descriptions_export.json"));

    let exported = service.export(None);
    assert!(!exported.ok);
    assert_eq!(exported.message, "No active campaign. Load a campaign first.");

    let imported = service.import(None);
    assert!(!imported.ok);
    assert_eq!(imported.count, 0);
    assert!(imported.file_path.is_none());
}

#[test]
fn import_merges_into_existing_session() {
    let dir = tempfile::tempdir().unwrap();
    let service = ExchangeService::new(dir.path().join("descriptions_export.json"));
    let source = session_with(&[("a", "new"), ("c", "3")]);
    assert!(service.export(Some(&source)).ok);

    let target = session_with(&[("a", "old"), ("b", "2")]);
    let outcome = service.import(Some(&target));
    assert!(outcome.ok, "{}", outcome.message);
    assert_eq!(outcome.count, 2);
    assert_eq!(target.all(), map(&[("a", "new"), ("b", "2"), ("c", "3")]));
}

#[test]
fn legacy_file_imports_successfully() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    write_file(&path, r#"{"descriptions": {"x": "y"}}"#);

    let session = AnnotationSession::start();
    let service = ExchangeService::new(dir.path().join("unused.json"));
    let outcome = service.import_from(Some(&session), &path);
    assert!(outcome.ok, "{}", outcome.message);
    assert_eq!(outcome.count, 1);
    assert_eq!(session.get("x").as_deref(), Some("y"));
}

#[test]
fn import_skips_empty_values_and_reports_written_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("descriptions_export.json");
    write_file(
        &path,
        r#"{"version": 1, "exportedAt": "2024-01-01T00:00:00Z", "descriptionCount": 5,
            "descriptions": {"a": "", "b": null, "c": "kept"}}"#,
    );

    let session = session_with(&[("a", "old")]);
    let outcome = ExchangeService::new(&path).import(Some(&session));
    assert!(outcome.ok, "{}", outcome.message);
    assert_eq!(outcome.count, 1);
    assert_eq!(session.all(), map(&[("a", "old"), ("c", "kept")]));
}

#[test]
fn malformed_files_fail_without_touching_store() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_with(&[("a", "old")]);
    let cases = [
        ("not_object.json", r#"{"descriptions": "not-an-object"}"#),
        ("missing.json", r#"{"version": 1}"#),
        ("broken.json", "{ this is not json"),
    ];

    for (name, contents) in cases {
        let path = dir.path().join(name);
        write_file(&path, contents);
        let outcome = ExchangeService::new(&path).import(Some(&session));
        assert!(!outcome.ok, "{name} should fail");
        assert!(
            outcome.message.starts_with("Invalid JSON format:"),
            "{name}: {}",
            outcome.message
        );
    }
    assert_eq!(session.all(), map(&[("a", "old")]));
}

#[test]
fn empty_document_reports_no_descriptions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    write_file(&path, r#"{"descriptions": {}}"#);

    let session = AnnotationSession::start();
    let outcome = ExchangeService::new(&path).import(Some(&session));
    assert!(!outcome.ok);
    assert_eq!(outcome.message, "The file contains no descriptions.");
}

#[test]
fn missing_file_reports_attempted_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");
    let session = AnnotationSession::start();

    let outcome = ExchangeService::new(&path).import(Some(&session));
    assert!(!outcome.ok);
    assert_eq!(outcome.message, format!("File not found: {}", path.display()));
}

#[test]
fn unwritable_export_location_reports_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    write_file(&blocker, "a file, not a directory");
    let service = ExchangeService::new(blocker.join("descriptions_export.json"));
    let session = session_with(&[("a", "1")]);

    let outcome = service.export(Some(&session));
    assert!(!outcome.ok);
    assert!(outcome.message.starts_with("Export failed:"), "{}", outcome.message);
}

#[test]
fn import_accepts_file_with_byte_order_mark() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("descriptions_export.json");
    std::fs::write(&path, b"\xEF\xBB\xBF{\"descriptions\":{\"x\":\"y\"}}").unwrap();

    let session = AnnotationSession::start();
    let outcome = ExchangeService::new(&path).import(Some(&session));
    assert!(outcome.ok, "{}", outcome.message);
    assert_eq!(outcome.count, 1);
    assert_eq!(session.get("x").as_deref(), Some("y"));
}

#[test]
fn ended_session_is_treated_as_no_campaign() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("descriptions_export.json");
    write_file(&path, r#"{"descriptions": {"x": "y"}}"#);
    let service = ExchangeService::new(&path);

    let session = session_with(&[("a", "1")]);
    let handle = session.clone();
    session.end();

    let imported = service.import(Some(&handle));
    assert!(!imported.ok);
    assert_eq!(imported.message, "No active campaign. Load a campaign first.");
    assert!(!handle.has("x"));

    let exported = service.export(Some(&handle));
    assert_eq!(exported.message, "No active campaign. Load a campaign first.");
}

#[cfg(unix)]
#[test]
fn unreadable_import_location_reports_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    write_file(&blocker, "a file, not a directory");
    let session = session_with(&[("a", "old")]);

    let service = ExchangeService::new(blocker.join("descriptions_export.json"));
    let outcome = service.import(Some(&session));
    assert!(!outcome.ok);
    assert!(outcome.message.starts_with("Import failed:"), "{}", outcome.message);
    assert_eq!(session.all(), map(&[("a", "old")]));
}
