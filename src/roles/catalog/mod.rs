//! The shipped character catalog.
//!
//! One file per character type. Entries only declare data; anything with
//! behaviour points at a function in `roles::handlers`. Characters whose
//! night effect the moderator adjudicates by hand still get an entry with
//! a `Manual` action so they are queued and labelled.

mod demons;
mod minions;
mod outsiders;
mod townsfolk;
mod travelers;

use super::definition::{ActionTag, NightAction, NightOrder, RoleDefinition};
use super::registry::RoleRegistry;
use super::targeting::TargetSpec;

/// Register every shipped character.
pub fn register_all(registry: &mut RoleRegistry) {
    let all = townsfolk::roles()
        .into_iter()
        .chain(outsiders::roles())
        .chain(minions::roles())
        .chain(demons::roles())
        .chain(travelers::roles());
    for role in all {
        registry.register(role);
    }
}

/// A fixed-order action.
fn at(order: i32, tag: ActionTag) -> NightAction {
    NightAction::new(NightOrder::Fixed(order), tag)
}

/// Wake, learn, close.
fn info(order: i32, instruction: &'static str) -> NightAction {
    at(order, ActionTag::Info).with_instruction(instruction)
}

/// Wake and let the moderator resolve the ability by hand.
fn manual(order: i32, instruction: &'static str) -> NightAction {
    at(order, ActionTag::Manual).with_instruction(instruction)
}

/// One living player.
fn one_alive() -> TargetSpec {
    TargetSpec::exactly(1).alive()
}

/// One living player other than the actor.
fn one_other() -> TargetSpec {
    TargetSpec::exactly(1).alive().not_self()
}

#[cfg(test)]
mod tests {
    use crate::core::RoleType;
    use crate::roles::RoleRegistry;
    use crate::schedule::overrides::{FIRST_NIGHT, OTHER_NIGHT};

    #[test]
    fn test_every_ordered_role_is_registered() {
        let registry = RoleRegistry::standard();
        for key in FIRST_NIGHT.iter().chain(OTHER_NIGHT) {
            assert!(registry.contains(key), "missing catalog entry for {key}");
        }
    }

    #[test]
    fn test_ordered_roles_declare_the_night() {
        let registry = RoleRegistry::standard();
        for key in FIRST_NIGHT {
            let def = registry.lookup(key).unwrap();
            assert!(def.first_night.is_some(), "{key} listed first night but never wakes");
        }
    }

    #[test]
    fn test_base_scripts_are_complete() {
        let registry = RoleRegistry::standard();
        for key in crate::core::config::TROUBLE_BREWING
            .iter()
            .chain(crate::core::config::BAD_MOON_RISING)
            .chain(crate::core::config::SECTS_AND_VIOLETS)
        {
            assert!(registry.contains(key), "missing base character {key}");
        }
    }

    #[test]
    fn test_every_demon_wakes_first_night() {
        let registry = RoleRegistry::standard();
        for demon in registry.of_type(RoleType::Demon) {
            if demon.id == "riot" || demon.id == "legion" {
                continue;
            }
            assert!(demon.first_night.is_some(), "{} has no first night", demon.id);
        }
    }

    #[test]
    fn test_travelers_present() {
        let registry = RoleRegistry::standard();
        assert!(registry.of_type(RoleType::Traveler).count() >= 5);
        assert!(registry.contains("scapegoat"));
    }
}
