use encyclopedia_core::{AnnotationSession, AnnotationStore, DescriptionMap};

fn map(pairs: &[(&str, &str)]) -> DescriptionMap {
    pairs
        .iter()
        .map(|(id, text)| (id.to_string(), text.to_string()))
        .collect()
}

#[test]
fn repeated_set_is_idempotent() {
    let mut once = AnnotationStore::new();
    once.set("lord_1_1", Some("t"));

    let mut twice = AnnotationStore::new();
    twice.set("lord_1_1", Some("t"));
    twice.set("lord_1_1", Some("t"));

    assert_eq!(once, twice);
    assert_eq!(twice.count(), 1);
}

#[test]
fn set_overwrites_without_history() {
    let mut store = AnnotationStore::new();
    store.set("lord_1_1", Some("first"));
    store.set("lord_1_1", Some("second"));
    assert_eq!(store.get("lord_1_1"), Some("second"));
    assert_eq!(store.count(), 1);
}

#[test]
fn empty_text_deletes_existing_description() {
    let mut store = AnnotationStore::new();
    store.set("lord_1_1", Some("x"));
    store.set("lord_1_1", Some(""));
    assert!(!store.has("lord_1_1"));
    assert_eq!(store.get("lord_1_1"), None);
}

#[test]
fn merge_keeps_non_conflicting_entries() {
    let mut store = AnnotationStore::new();
    store.set("b", Some("2"));

    let written = store.merge_all(map(&[("a", "1")]));
    assert_eq!(written, 1);
    assert_eq!(store.get_all(), map(&[("a", "1"), ("b", "2")]));
}

#[test]
fn merge_overwrites_conflicting_entries_and_counts_them() {
    let mut store = AnnotationStore::new();
    store.set("a", Some("old"));

    let written = store.merge_all(map(&[("a", "new")]));
    assert_eq!(written, 1);
    assert_eq!(store.get("a"), Some("new"));
}

#[test]
fn merge_skips_empty_values_without_deleting() {
    let mut store = AnnotationStore::new();
    store.set("a", Some("old"));

    let written = store.merge_all(map(&[("a", ""), ("b", "fresh")]));
    assert_eq!(written, 1);
    assert_eq!(store.get_all(), map(&[("a", "old"), ("b", "fresh")]));
}

#[test]
fn session_is_safe_to_share_across_threads() {
    let session = AnnotationSession::start();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let session = session.clone();
            std::thread::spawn(move || {
                for idx in 0..25 {
                    session.set(&format!("hero_{worker}_{idx}"), Some("note"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(session.count(), 100);
}
