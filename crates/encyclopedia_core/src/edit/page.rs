//! Encyclopedia page tracking.
//!
//! # Responsibility
//! - React to the host showing an encyclopedia page for any annotatable entity.
//! - Own the single key poller for the page currently on screen.
//! - Hand a ready `EditSession` to the host dialog when the chord fires.

use crate::edit::dialog::EditSession;
use crate::edit::notifier::Notifier;
use crate::edit::poller::{log_spawn_failure, ChordSource, KeyPoller};
use crate::model::entity::{Annotatable, EntityRef};
use crate::session::AnnotationSession;
use crate::settings::EncyclopediaSettings;
use std::sync::Arc;
use std::time::Duration;

/// Host modal text dialog.
pub trait EditDialogHost: Send + Sync {
    /// Shows the dialog for `edit.prompt()` and later calls `save` or `dismiss`.
    fn show_edit_dialog(&self, edit: EditSession);
}

/// Tracks the page on screen and its edit-chord poller.
pub struct PageTracker {
    session: AnnotationSession,
    settings: Arc<EncyclopediaSettings>,
    notifier: Arc<dyn Notifier>,
    chord: Arc<dyn ChordSource>,
    dialogs: Arc<dyn EditDialogHost>,
    current: Option<EntityRef>,
    poller: Option<KeyPoller>,
}

impl PageTracker {
    pub fn new(
        session: AnnotationSession,
        settings: Arc<EncyclopediaSettings>,
        notifier: Arc<dyn Notifier>,
        chord: Arc<dyn ChordSource>,
        dialogs: Arc<dyn EditDialogHost>,
    ) -> Self {
        Self {
            session,
            settings,
            notifier,
            chord,
            dialogs,
            current: None,
            poller: None,
        }
    }

    /// Called whenever the host (re)renders a page.
    ///
    /// Returns whether an edit poll was started. Pages whose kind is disabled
    /// in settings are ignored, as is every page once the session has ended.
    pub fn page_opened(&mut self, entity: &impl Annotatable) -> bool {
        if !self.session.is_active() || !self.settings.is_kind_enabled(entity.entity_kind()) {
            return false;
        }

        self.stop_polling();
        let entity = EntityRef::new(entity.entity_kind(), entity.annotation_id());

        if self.settings.show_edit_hint {
            self.notifier.info("[Ctrl+E to Edit Description]");
        }
        self.notifier.debug(&format!(
            "Encyclopedia page opened: {} ({})",
            entity.kind.label(),
            entity.id
        ));

        let session = self.session.clone();
        let settings = Arc::clone(&self.settings);
        let notifier = Arc::clone(&self.notifier);
        let dialogs = Arc::clone(&self.dialogs);
        let target = entity.clone();
        let started = KeyPoller::start(
            Duration::from_millis(self.settings.initial_key_poll_delay_ms),
            Duration::from_millis(self.settings.key_poll_interval_ms),
            Arc::clone(&self.chord),
            move || {
                if !session.is_active() {
                    return;
                }
                let edit = EditSession::open(&session, &target, settings, notifier);
                dialogs.show_edit_dialog(edit);
            },
        );

        self.current = Some(entity);
        match started {
            Ok(poller) => {
                self.poller = Some(poller);
                true
            }
            Err(err) => {
                log_spawn_failure(&err);
                false
            }
        }
    }

    /// Called when the host leaves the encyclopedia page.
    pub fn page_closed(&mut self) {
        self.stop_polling();
        self.current = None;
    }

    pub fn current_page(&self) -> Option<&EntityRef> {
        self.current.as_ref()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(KeyPoller::is_running)
    }

    fn stop_polling(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }
}
