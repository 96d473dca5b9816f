//! Core logic for player-editable encyclopedia descriptions.
//! This crate is the single source of truth for description storage,
//! save-data synchronization and the export/import file format.

pub mod api;
pub mod codec;
pub mod edit;
pub mod exchange;
pub mod logging;
pub mod model;
pub mod session;
pub mod settings;
pub mod slot;
pub mod store;

pub use api::DescriptionApi;
pub use codec::{
    deserialize, deserialize_entries, serialize, CodecError, ExportDocument, ImportedDocument,
    CURRENT_FORMAT_VERSION,
};
pub use edit::dialog::{save_description, EditPrompt, EditSession, SavedDescription};
pub use edit::notifier::{report_outcome, LogNotifier, Notifier};
pub use edit::page::{EditDialogHost, PageTracker};
pub use edit::poller::{ChordSource, KeyPoller};
pub use exchange::{ExchangeError, ExchangeOutcome, ExchangeService};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{Annotatable, EntityId, EntityKind, EntityRef};
pub use session::{AnnotationSession, SessionHost};
pub use settings::{EncyclopediaSettings, SettingsError};
pub use slot::{
    MemorySaveSlot, SaveSlot, SlotError, SlotResult, SqliteSaveSlot, DESCRIPTIONS_FIELD_KEY,
};
pub use store::{AnnotationStore, DescriptionMap};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
