//! Session-scoped description context.
//!
//! # Responsibility
//! - Own the store for exactly one loaded campaign session.
//! - Bridge the store to the host save slot at load/save time.
//! - Replace any process-wide singleton with an explicit handle.
//!
//! # Invariants
//! - A session's store starts empty until `load_from` adopts persisted data.
//! - All store access goes through one `RwLock`, so host callbacks may arrive
//!   on any thread.
//! - `SessionHost` holds at most one active session.
//! - Once ended, every clone of a session refuses writes and reads as empty.

use crate::slot::{SaveSlot, SlotResult, DESCRIPTIONS_FIELD_KEY};
use crate::store::{AnnotationStore, DescriptionMap};
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Shared handle to one session's description store.
#[derive(Debug, Clone)]
pub struct AnnotationSession {
    id: Uuid,
    store: Arc<RwLock<AnnotationStore>>,
    ended: Arc<AtomicBool>,
}

impl AnnotationSession {
    /// Starts a session with an empty store.
    pub fn start() -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            store: Arc::new(RwLock::new(AnnotationStore::new())),
            ended: Arc::new(AtomicBool::new(false)),
        };
        info!(
            "event=session_start module=session status=ok session_id={}",
            session.id
        );
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// False once any clone of this session has been ended.
    pub fn is_active(&self) -> bool {
        !self.ended.load(Ordering::Acquire)
    }

    /// Runs the load hook against `slot`.
    pub fn load_from(&self, slot: &impl SaveSlot) -> SlotResult<usize> {
        let persisted = slot.read_field(DESCRIPTIONS_FIELD_KEY)?;
        let first_run = persisted.is_none();
        let mut store = self.store.write();
        store.restore(persisted);
        info!(
            "event=session_load module=session status=ok session_id={} entries={} first_run={}",
            self.id,
            store.count(),
            first_run
        );
        Ok(store.count())
    }

    /// Runs the save hook against `slot`.
    pub fn save_to(&self, slot: &mut impl SaveSlot) -> SlotResult<usize> {
        let snapshot = self.store.read().snapshot();
        slot.write_field(DESCRIPTIONS_FIELD_KEY, &snapshot)?;
        info!(
            "event=session_save module=session status=ok session_id={} entries={}",
            self.id,
            snapshot.len()
        );
        Ok(snapshot.len())
    }

    pub fn get(&self, entity_id: &str) -> Option<String> {
        self.store.read().get(entity_id).map(str::to_string)
    }

    pub fn has(&self, entity_id: &str) -> bool {
        self.store.read().has(entity_id)
    }

    /// Sets or clears one description. Empty text removes the entry.
    ///
    /// Returns `false` without writing when the session has ended.
    pub fn set(&self, entity_id: &str, text: Option<&str>) -> bool {
        let mut store = self.store.write();
        if !self.is_active() {
            warn!(
                "event=description_set module=session status=rejected reason=session_ended session_id={} entity_id={}",
                self.id, entity_id
            );
            return false;
        }
        store.set(entity_id, text);
        debug!(
            "event=description_set module=session entity_id={} chars={}",
            entity_id,
            text.map_or(0, |value| value.chars().count())
        );
        true
    }

    /// Removes one description. Always `None` after the session has ended.
    pub fn remove(&self, entity_id: &str) -> Option<String> {
        let mut store = self.store.write();
        if !self.is_active() {
            return None;
        }
        store.remove(entity_id)
    }

    pub fn all(&self) -> DescriptionMap {
        self.store.read().get_all()
    }

    pub fn count(&self) -> usize {
        self.store.read().count()
    }

    /// Bulk import path; see `AnnotationStore::merge_all`. Writes nothing
    /// after the session has ended.
    pub fn merge_all(&self, incoming: DescriptionMap) -> usize {
        let mut store = self.store.write();
        if !self.is_active() {
            return 0;
        }
        store.merge_all(incoming)
    }

    /// Ends the session, discarding its in-memory state for every clone.
    pub fn end(self) {
        let mut store = self.store.write();
        self.ended.store(true, Ordering::Release);
        store.restore(None);
        drop(store);
        info!(
            "event=session_end module=session status=ok session_id={}",
            self.id
        );
    }
}

/// Owner of the currently active session, if any.
#[derive(Debug, Default)]
pub struct SessionHost {
    active: Option<AnnotationSession>,
}

impl SessionHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session, ending any previous one.
    pub fn begin_session(&mut self) -> AnnotationSession {
        if let Some(previous) = self.active.take() {
            previous.end();
        }
        let session = AnnotationSession::start();
        self.active = Some(session.clone());
        session
    }

    pub fn end_session(&mut self) {
        if let Some(session) = self.active.take() {
            session.end();
        }
    }

    pub fn active(&self) -> Option<&AnnotationSession> {
        self.active.as_ref()
    }
}
