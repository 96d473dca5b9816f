//! One edit-dialog round-trip for a single entity.
//!
//! # Invariants
//! - The prompt is prefilled with the description at open time.
//! - `save` truncates to `maxDescriptionLength` characters when the limit is set.
//! - `dismiss` resets to the host default only when a description existed.
//! - Nothing is written or announced once the owning session has ended.

use crate::edit::notifier::Notifier;
use crate::model::entity::{Annotatable, EntityKind, EntityRef};
use crate::session::AnnotationSession;
use crate::settings::EncyclopediaSettings;
use std::sync::Arc;

/// Dialog contents for the host's modal text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPrompt {
    pub title: String,
    pub prefill: String,
    pub affirmative_label: &'static str,
    pub negative_label: &'static str,
    pub max_length: usize,
}

/// Result of `EditSession::save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedDescription {
    /// Stored length in characters. `0` means the description was cleared.
    pub chars: usize,
    pub truncated: bool,
}

/// In-flight edit of one entity's description.
pub struct EditSession {
    session: AnnotationSession,
    entity: EntityRef,
    existing: Option<String>,
    settings: Arc<EncyclopediaSettings>,
    notifier: Arc<dyn Notifier>,
}

impl EditSession {
    /// Captures the current description of `entity` and prepares the prompt.
    pub fn open(
        session: &AnnotationSession,
        entity: &impl Annotatable,
        settings: Arc<EncyclopediaSettings>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let entity = EntityRef::new(entity.entity_kind(), entity.annotation_id());
        let existing = session.get(&entity.id);
        Self {
            session: session.clone(),
            entity,
            existing,
            settings,
            notifier,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity.id
    }

    pub fn kind(&self) -> EntityKind {
        self.entity.kind
    }

    pub fn prompt(&self) -> EditPrompt {
        let has_existing = self.existing.is_some();
        EditPrompt {
            title: format!("Edit {} Description", self.entity.kind.label()),
            prefill: self.existing.clone().unwrap_or_default(),
            affirmative_label: "Save",
            negative_label: if has_existing { "Reset" } else { "Cancel" },
            max_length: self.settings.effective_max_length(),
        }
    }

    /// Stores `text`, truncated to the configured limit. Empty text clears.
    ///
    /// Returns `None` when the session ended while the dialog was open.
    pub fn save(self, text: &str) -> Option<SavedDescription> {
        let saved = save_description(&self.session, &self.entity.id, text, &self.settings)?;

        if self.settings.show_confirmation_messages {
            self.notifier.success("Description saved.");
        }
        self.notifier.debug(&format!(
            "Saved description for {} ({} chars)",
            self.entity.id, saved.chars
        ));
        Some(saved)
    }

    /// Handles the negative button. Returns whether a description was reset.
    pub fn dismiss(self) -> bool {
        if self.existing.is_none() {
            return false;
        }
        if self.session.remove(&self.entity.id).is_none() {
            return false;
        }
        if self.settings.show_confirmation_messages {
            self.notifier.success("Description reset to default.");
        }
        true
    }
}

/// Applies the save policy shared by the dialog and the CLI: `text` is cut to
/// `maxDescriptionLength` characters and empty text clears the entry.
///
/// Returns `None` without writing when `session` has ended.
pub fn save_description(
    session: &AnnotationSession,
    entity_id: &str,
    text: &str,
    settings: &EncyclopediaSettings,
) -> Option<SavedDescription> {
    let (stored, truncated) = truncate_chars(text, settings.max_description_length);
    if !session.set(entity_id, Some(stored)) {
        return None;
    }
    Some(SavedDescription {
        chars: stored.chars().count(),
        truncated,
    })
}

/// Truncates to at most `limit` characters. `0` disables the limit.
fn truncate_chars(text: &str, limit: usize) -> (&str, bool) {
    if limit == 0 {
        return (text, false);
    }
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}
