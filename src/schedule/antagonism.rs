//! Djinn antagonism rules.
//!
//! Two kinds of rule: pairs of characters that may never share the board,
//! and characters a creator (the Pit-Hag) is not allowed to make. They only
//! bind when a Djinn is in play or the session forces them on.

use crate::core::{Board, RoleId, Seat, SessionConfig};

/// Characters that cannot be in play at the same time.
const MUTUALLY_EXCLUSIVE: &[(&str, &str)] = &[
    ("heretic", "baron"),
    ("heretic", "leech"),
    ("heretic", "pit_hag"),
    ("actor", "spy"),
    ("actor", "godfather"),
    ("actor", "evil_twin"),
    ("actor", "widow"),
    ("actor", "ghost"),
    ("actor", "summoner"),
    ("actor", "riot"),
    ("actor", "legion"),
    ("actor", "leviathan"),
    ("actor", "lil_monsta"),
    ("actor", "pukka"),
    ("actor", "zombuul"),
    ("actor", "yaggababble"),
    ("actor", "kazali"),
];

/// (creator, characters it cannot create).
const CANNOT_CREATE: &[(&str, &[&str])] = &[("pit_hag", &["heretic", "actor"])];

/// Whether the rules are in force for this board.
#[must_use]
pub fn antagonism_enabled(seats: &[Seat], config: &SessionConfig) -> bool {
    config.enforce_antagonism || seats.in_play("djinn")
}

/// The characters `role` may not share the board with.
pub fn excluded_by(role: &str) -> impl Iterator<Item = &'static str> + '_ {
    MUTUALLY_EXCLUSIVE.iter().filter_map(move |&(a, b)| {
        if a == role {
            Some(b)
        } else if b == role {
            Some(a)
        } else {
            None
        }
    })
}

/// Why `candidate` may not enter play, if it may not.
///
/// `creator` names the character bringing it in, when there is one.
///
/// ```
/// use clocktower_engine::core::RoleId;
/// use clocktower_engine::schedule::antagonism_violation;
///
/// let in_play = vec![RoleId::new("baron"), RoleId::new("imp")];
/// assert!(antagonism_violation(&RoleId::new("heretic"), &in_play, None).is_some());
/// assert!(antagonism_violation(&RoleId::new("actor"), &in_play, Some("pit_hag")).is_some());
/// assert!(antagonism_violation(&RoleId::new("chef"), &in_play, Some("pit_hag")).is_none());
/// ```
#[must_use]
pub fn antagonism_violation(candidate: &RoleId, in_play: &[RoleId], creator: Option<&str>) -> Option<String> {
    if let Some(creator) = creator {
        let forbidden = CANNOT_CREATE
            .iter()
            .any(|(who, list)| *who == creator && list.contains(&candidate.as_str()));
        if forbidden {
            return Some(format!("{creator} cannot create {candidate}"));
        }
    }

    excluded_by(candidate.as_str())
        .find(|other| in_play.iter().any(|r| r.is(other)))
        .map(|other| format!("{candidate} and {other} cannot both be in play"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SeatId;

    #[test]
    fn test_pairs_are_symmetric() {
        let heretic = vec![RoleId::new("heretic")];
        assert!(antagonism_violation(&RoleId::new("baron"), &heretic, None).is_some());
        let baron = vec![RoleId::new("baron")];
        assert!(antagonism_violation(&RoleId::new("heretic"), &baron, None).is_some());
    }

    #[test]
    fn test_creator_restriction() {
        let reason = antagonism_violation(&RoleId::new("heretic"), &[], Some("pit_hag"));
        assert_eq!(reason.as_deref(), Some("pit_hag cannot create heretic"));
        assert!(antagonism_violation(&RoleId::new("heretic"), &[], None).is_none());
    }

    #[test]
    fn test_excluded_by() {
        assert_eq!(excluded_by("heretic").count(), 3);
        assert_eq!(excluded_by("actor").count(), 14);
        assert_eq!(excluded_by("chef").count(), 0);
    }

    #[test]
    fn test_enabled_by_djinn_or_config() {
        let config = SessionConfig::default();
        let plain = vec![Seat::new(SeatId::new(0)).with_role(RoleId::new("chef"))];
        assert!(!antagonism_enabled(&plain, &config));
        assert!(antagonism_enabled(&plain, &config.clone().with_antagonism(true)));

        let djinn = vec![Seat::new(SeatId::new(0)).with_role(RoleId::new("djinn"))];
        assert!(antagonism_enabled(&djinn, &config));
    }
}
