//! Global hand-authored night order.
//!
//! A role listed here wakes at its 1-based position in the list for that
//! night kind, whatever its own definition declares. Roles missing from the
//! lists fall back to their declared order.

use rustc_hash::FxHashMap;

pub const FIRST_NIGHT: &[&str] = &[
    "lord_of_typhon", "wraith", "boffin", "amnesiac", "philosopher", "alchemist",
    "poppy_grower", "kazali", "magician", "snitch", "damsel", "summoner", "lunatic",
    "king", "marionette", "sailor", "engineer", "preacher", "lil_monsta", "lleech",
    "xaan", "poisoner", "widow", "courtier", "wizard", "snake_charmer", "godfather",
    "organ_grinder", "devils_advocate", "evil_twin", "witch", "cerenovus",
    "fearmonger", "harpy", "mezepheles", "pukka", "yaggababble", "pixie", "huntsman",
    "washerwoman", "librarian", "investigator", "chef", "empath", "fortune_teller",
    "butler", "grandmother", "clockmaker", "dreamer", "seamstress", "steward",
    "knight", "noble", "balloonist", "village_idiot", "bounty_hunter",
    "nightwatchman", "cult_leader", "spy", "ogre", "priestess", "shugenja",
    "general", "chambermaid", "mathematician", "leviathan", "vizier",
];

pub const OTHER_NIGHT: &[&str] = &[
    "wraith", "amnesiac", "philosopher", "hatter", "poppy_grower", "sailor",
    "engineer", "preacher", "pit_hag", "xaan", "poisoner", "innkeeper", "courtier",
    "wizard", "gambler", "acrobat", "snake_charmer", "monk", "organ_grinder",
    "devils_advocate", "witch", "cerenovus", "fearmonger", "harpy", "mezepheles",
    "scarlet_woman", "summoner", "lunatic", "exorcist", "lycanthrope", "princess",
    "legion", "imp", "zombuul", "pukka", "shabaloth", "po", "fang_gu", "no_dashii",
    "vortox", "vigormortis", "ojo", "lord_of_typhon", "al_hadikhia", "lleech",
    "lil_monsta", "yaggababble", "kazali", "assassin", "godfather", "gossip",
    "tinker", "moonchild", "barber", "sweetheart", "ravenkeeper", "sage",
    "plague_doctor", "choirboy", "farmer", "banshee", "professor", "huntsman",
    "empath", "fortune_teller", "butler", "undertaker", "dreamer", "flowergirl",
    "town_crier", "oracle", "seamstress", "juggler", "balloonist", "village_idiot",
    "king", "bounty_hunter", "nightwatchman", "cult_leader", "spy", "priestess",
    "general", "chambermaid", "mathematician", "leviathan",
];

/// Indexed override lists.
///
/// ```
/// use clocktower_engine::schedule::OverrideTable;
///
/// let table = OverrideTable::standard();
/// assert_eq!(table.order("lord_of_typhon", true), Some(1));
/// assert_eq!(table.order("imp", true), None);
/// assert!(table.order("monk", false) < table.order("imp", false));
/// ```
#[derive(Clone, Debug, Default)]
pub struct OverrideTable {
    first: FxHashMap<&'static str, i32>,
    other: FxHashMap<&'static str, i32>,
}

impl OverrideTable {
    /// Build a table from two ordered lists.
    #[must_use]
    pub fn from_lists(first: &[&'static str], other: &[&'static str]) -> Self {
        let index = |list: &[&'static str]| {
            list.iter()
                .enumerate()
                .map(|(i, key)| (*key, i as i32 + 1))
                .collect::<FxHashMap<_, _>>()
        };
        Self {
            first: index(first),
            other: index(other),
        }
    }

    /// The shipped global order.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_lists(FIRST_NIGHT, OTHER_NIGHT)
    }

    /// The override order for a role, if it is listed.
    #[must_use]
    pub fn order(&self, role: &str, first_night: bool) -> Option<i32> {
        let table = if first_night { &self.first } else { &self.other };
        table.get(role).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_have_no_duplicates() {
        for list in [FIRST_NIGHT, OTHER_NIGHT] {
            let table = OverrideTable::from_lists(list, &[]);
            assert_eq!(table.first.len(), list.len());
        }
    }

    #[test]
    fn test_one_based_positions() {
        let table = OverrideTable::standard();
        assert_eq!(table.order("wraith", false), Some(1));
        assert_eq!(table.order("vizier", true), Some(FIRST_NIGHT.len() as i32));
    }

    #[test]
    fn test_protection_and_poison_precede_demons() {
        let table = OverrideTable::standard();
        let imp = table.order("imp", false);
        for early in ["poisoner", "monk", "innkeeper", "exorcist"] {
            assert!(table.order(early, false) < imp, "{early} must act before the Imp");
        }
        assert!(table.order("ravenkeeper", false) > imp);
        assert!(table.order("mathematician", false) > imp);
    }
}
