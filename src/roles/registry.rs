//! Role registry for definition lookup.
//!
//! The `RoleRegistry` stores every character the engine can resolve. It is
//! built once and read-only afterwards.

use rustc_hash::FxHashMap;

use crate::core::{Alignment, RoleId, RoleType, Seat};
use crate::error::{EngineError, EngineResult};

use super::catalog;
use super::definition::RoleDefinition;

/// Registry of role definitions.
///
/// ## Example
///
/// ```
/// use clocktower_engine::core::RoleType;
/// use clocktower_engine::roles::{RoleDefinition, RoleRegistry};
///
/// let mut registry = RoleRegistry::new();
/// registry.register(RoleDefinition::new("villager", "Villager", RoleType::Townsfolk));
///
/// let found = registry.lookup("villager").unwrap();
/// assert_eq!(found.name, "Villager");
/// assert!(registry.lookup("nobody").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RoleRegistry {
    roles: FxHashMap<RoleId, RoleDefinition>,
}

impl RoleRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The full shipped catalog.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        catalog::register_all(&mut registry);
        registry
    }

    /// Register a definition, returning the one it replaced.
    pub fn register(&mut self, role: RoleDefinition) -> Option<RoleDefinition> {
        self.roles.insert(role.id.clone(), role)
    }

    /// Look up a role by key.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&RoleDefinition> {
        self.roles.get(&RoleId::owned(key))
    }

    /// Look up a role by id.
    #[must_use]
    pub fn get(&self, id: &RoleId) -> Option<&RoleDefinition> {
        self.roles.get(id)
    }

    /// Look up a role, failing with a configuration error if unknown.
    pub fn require(&self, id: &RoleId) -> EngineResult<&RoleDefinition> {
        self.get(id).ok_or_else(|| EngineError::UnknownRole(id.clone()))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleDefinition> {
        self.roles.values()
    }

    /// Roles of one category.
    pub fn of_type(&self, role_type: RoleType) -> impl Iterator<Item = &RoleDefinition> {
        self.roles.values().filter(move |r| r.role_type == role_type)
    }

    /// Roles matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &RoleDefinition>
    where
        F: Fn(&RoleDefinition) -> bool,
    {
        self.roles.values().filter(move |r| predicate(r))
    }

    /// Category of a seat's real role.
    #[must_use]
    pub fn type_of(&self, seat: &Seat) -> Option<RoleType> {
        seat.role.as_ref().and_then(|r| self.get(r)).map(|r| r.role_type)
    }

    /// True alignment: the override if converted, the faction default otherwise.
    #[must_use]
    pub fn alignment_of(&self, seat: &Seat) -> Alignment {
        seat.alignment_override.unwrap_or_else(|| {
            self.type_of(seat)
                .map_or(Alignment::Good, RoleType::default_alignment)
        })
    }

    /// Whether the seat really is the demon.
    #[must_use]
    pub fn is_demon(&self, seat: &Seat) -> bool {
        seat.is_demon_successor || self.type_of(seat) == Some(RoleType::Demon)
    }

    /// Display name for a role id; falls back to the key.
    #[must_use]
    pub fn name_of<'a>(&'a self, id: &'a RoleId) -> &'a str {
        self.get(id).map_or(id.as_str(), |r| r.name)
    }

    /// "Seat 3 (Empath)" or "Seat 3" for an unassigned seat.
    #[must_use]
    pub fn seat_label(&self, seat: &Seat) -> String {
        match &seat.role {
            Some(role) => format!("{} ({})", seat.id, self.name_of(role)),
            None => seat.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SeatId;

    #[test]
    fn test_register_replaces() {
        let mut registry = RoleRegistry::new();
        assert!(registry
            .register(RoleDefinition::new("chef", "Chef", RoleType::Townsfolk))
            .is_none());
        let old = registry.register(RoleDefinition::new("chef", "Head Chef", RoleType::Townsfolk));
        assert_eq!(old.map(|r| r.name), Some("Chef"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_require_unknown_is_config_error() {
        let registry = RoleRegistry::new();
        let err = registry.require(&RoleId::new("nobody")).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_of_type() {
        let registry = RoleRegistry::standard();
        assert!(registry.of_type(RoleType::Demon).any(|r| r.id == "imp"));
        assert!(registry.of_type(RoleType::Demon).all(|r| r.is_evil()));
    }

    #[test]
    fn test_seat_label() {
        let registry = RoleRegistry::standard();
        let seat = Seat::new(SeatId::new(2)).with_role(RoleId::new("empath"));
        assert_eq!(registry.seat_label(&seat), "Seat 3 (Empath)");
        assert_eq!(registry.seat_label(&Seat::new(SeatId::new(0))), "Seat 1");
    }

    #[test]
    fn test_alignment_of() {
        let registry = RoleRegistry::standard();
        let imp = Seat::new(SeatId::new(0)).with_role(RoleId::new("imp"));
        assert_eq!(registry.alignment_of(&imp), Alignment::Evil);
        assert!(registry.is_demon(&imp));

        let mut converted = Seat::new(SeatId::new(1)).with_role(RoleId::new("chef"));
        assert_eq!(registry.alignment_of(&converted), Alignment::Good);
        converted.alignment_override = Some(Alignment::Evil);
        assert_eq!(registry.alignment_of(&converted), Alignment::Evil);
    }
}
