//! Read-only description API for other integrations.
//!
//! # Invariants
//! - Every query is safe without an active session and returns an empty answer.
//! - Callers never receive a handle that can mutate the store.

use crate::model::entity::Annotatable;
use crate::session::AnnotationSession;
use crate::store::DescriptionMap;

/// Query facade over the active session, if any.
#[derive(Debug, Clone, Copy)]
pub struct DescriptionApi<'a> {
    session: Option<&'a AnnotationSession>,
}

impl<'a> DescriptionApi<'a> {
    pub fn new(session: Option<&'a AnnotationSession>) -> Self {
        Self { session }
    }

    /// True once a store exists for the active session.
    pub fn is_available(&self) -> bool {
        self.session.is_some_and(AnnotationSession::is_active)
    }

    pub fn get_description(&self, entity_id: &str) -> Option<String> {
        self.session.and_then(|session| session.get(entity_id))
    }

    pub fn has_description(&self, entity_id: &str) -> bool {
        self.session.is_some_and(|session| session.has(entity_id))
    }

    pub fn get_all_descriptions(&self) -> DescriptionMap {
        self.session.map(AnnotationSession::all).unwrap_or_default()
    }

    pub fn get_description_count(&self) -> usize {
        self.session.map_or(0, AnnotationSession::count)
    }

    /// Description for any annotatable entity (hero, clan, kingdom, settlement).
    pub fn description_for(&self, entity: &impl Annotatable) -> Option<String> {
        self.get_description(entity.annotation_id())
    }

    /// Pairs each entity that has a description with its text, in input order.
    pub fn descriptions_for<'e, E, I>(&self, entities: I) -> Vec<(&'e E, String)>
    where
        E: Annotatable + 'e,
        I: IntoIterator<Item = &'e E>,
    {
        let all = self.get_all_descriptions();
        entities
            .into_iter()
            .filter_map(|entity| {
                all.get(entity.annotation_id())
                    .map(|text| (entity, text.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::DescriptionApi;
    use crate::model::entity::{EntityKind, EntityRef};
    use crate::session::AnnotationSession;

    #[test]
    fn unavailable_api_returns_empty_answers() {
        let api = DescriptionApi::new(None);
        assert!(!api.is_available());
        assert_eq!(api.get_description("lord_1_1"), None);
        assert!(!api.has_description("lord_1_1"));
        assert!(api.get_all_descriptions().is_empty());
        assert_eq!(api.get_description_count(), 0);
    }

    #[test]
    fn descriptions_for_keeps_only_described_entities() {
        let session = AnnotationSession::start();
        session.set("lord_1_1", Some("veteran"));
        let heroes = vec![
            EntityRef::new(EntityKind::Hero, "lord_1_1"),
            EntityRef::new(EntityKind::Hero, "lord_2_1"),
        ];

        let api = DescriptionApi::new(Some(&session));
        let described = api.descriptions_for(&heroes);
        assert_eq!(described.len(), 1);
        assert_eq!(described[0].0.id, "lord_1_1");
        assert_eq!(described[0].1, "veteran");
        assert_eq!(api.description_for(&heroes[0]).as_deref(), Some("veteran"));
    }

    #[test]
    fn ended_session_is_unavailable() {
        let session = AnnotationSession::start();
        session.set("lord_1_1", Some("veteran"));
        let handle = session.clone();
        session.end();

        let api = DescriptionApi::new(Some(&handle));
        assert!(!api.is_available());
        assert_eq!(api.get_description_count(), 0);
    }
}
