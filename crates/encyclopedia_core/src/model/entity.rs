//! Annotatable entity capability.
//!
//! # Responsibility
//! - Name the page kinds the host encyclopedia can show.
//! - Expose one identifier-extraction trait applied uniformly by edit and query paths.
//!
//! # Invariants
//! - `annotation_id()` must be stable for the lifetime of the entity.

/// Opaque stable identifier supplied by the host (e.g. `lord_1_1`, `town_V3`).
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = String;

/// Encyclopedia page kinds that support editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Hero,
    Clan,
    Kingdom,
    Settlement,
}

impl EntityKind {
    /// Human-readable label used in dialog titles and debug messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::Clan => "Clan",
            Self::Kingdom => "Kingdom",
            Self::Settlement => "Settlement",
        }
    }
}

/// Anything the host can attach a description to.
pub trait Annotatable {
    /// Stable identifier used as the store key.
    fn annotation_id(&self) -> &str;
    /// Page kind, used for labels and per-kind enable toggles.
    fn entity_kind(&self) -> EntityKind;
}

/// Plain annotatable value for hosts that only have `(kind, id)` pairs at hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: impl Into<EntityId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl Annotatable for EntityRef {
    fn annotation_id(&self) -> &str {
        &self.id
    }

    fn entity_kind(&self) -> EntityKind {
        self.kind
    }
}

/// Returns whether `text` counts as "no description".
pub fn is_blank_text(text: Option<&str>) -> bool {
    text.map_or(true, str::is_empty)
}
