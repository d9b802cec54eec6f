//! Jinxes: house rules for character pairs that misbehave together.
//!
//! The table is symmetric; lookups work with the pair in either order.
//! Most jinxes are only shown to the moderator. Two change state: the
//! Spy/Ogre registration rule (handled in `info::registration`) and the
//! Damsel poisoning applied by `apply_setup_jinxes`.

use serde::Serialize;

use crate::core::{Board, LogEntry, RoleId, Seat, SeatChange, SeatDelta, StatusEffect, StatusKind, StatusOrigin};

/// One jinx between two characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Jinx {
    pub first: RoleId,
    pub second: RoleId,
    pub description: &'static str,
}

impl Jinx {
    const fn new(first: &'static str, second: &'static str, description: &'static str) -> Self {
        Self {
            first: RoleId::new(first),
            second: RoleId::new(second),
            description,
        }
    }

    #[must_use]
    pub fn involves(&self, role: &str) -> bool {
        self.first.is(role) || self.second.is(role)
    }

    /// Whether this jinx is between `a` and `b`, in either order.
    #[must_use]
    pub fn between(&self, a: &str, b: &str) -> bool {
        (self.first.is(a) && self.second.is(b)) || (self.first.is(b) && self.second.is(a))
    }
}

impl std::fmt::Display for Jinx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}: {}", self.first, self.second, self.description)
    }
}

pub static JINXES: &[Jinx] = &[
    Jinx::new("chambermaid", "mathematician", "The Chambermaid learns if the Mathematician wakes tonight or not, even though the Chambermaid wakes first."),
    Jinx::new("mathematician", "drunk", "The Mathematician might learn if the Drunk's ability yielded false information or failed to work properly."),
    Jinx::new("mathematician", "lunatic", "The Mathematician might learn if the Lunatic attacks a different player than the real Demon attacked."),
    Jinx::new("mathematician", "marionette", "The Mathematician might learn if the Marionette's ability yielded false information or failed to work properly."),
    Jinx::new("philosopher", "bounty_hunter", "If the Philosopher gains the Bounty Hunter ability, a Townsfolk might turn evil."),
    Jinx::new("spy", "ogre", "The Spy always registers as evil to the Ogre."),
    Jinx::new("spy", "damsel", "Only 1 jinxed character can be in play. The Damsel is poisoned if a Spy is in play."),
    Jinx::new("widow", "damsel", "Only 1 jinxed character can be in play. The Damsel is poisoned if a Widow is in play."),
    Jinx::new("spy", "poppy_grower", "If the Poppy Grower is in play, the Spy does not see the Grimoire until the Poppy Grower dies."),
    Jinx::new("widow", "poppy_grower", "If the Poppy Grower is in play, the Widow does not see the Grimoire until the Poppy Grower dies."),
    Jinx::new("marionette", "wraith", "The Marionette does not open their eyes with the Wraith."),
    Jinx::new("vizier", "magician", "If the Vizier and Magician are both in play, the Demon does not learn the Minions."),
    Jinx::new("riot", "exorcist", "If the Exorcist chooses Riot on the 3rd night, Minions do not become Riot."),
    Jinx::new("riot", "mayor", "The Mayor may choose to stop nominations. If they do so when only 1 Riot is alive, good wins."),
    Jinx::new("leviathan", "exorcist", "Evil wins on day 5 unless the Exorcist chooses the Leviathan the night before."),
    Jinx::new("leviathan", "mayor", "If the Mayor's ability would win on day 5 or later, good wins instead of evil."),
    Jinx::new("alchemist", "spy", "If the Alchemist has the Spy ability, they do not; the Spy is in play instead."),
    Jinx::new("alchemist", "widow", "If the Alchemist has the Widow ability, they do not; the Widow is in play instead."),
    Jinx::new("alchemist", "mastermind", "If the Alchemist has the Mastermind ability, they do not; the Mastermind is not in play."),
    Jinx::new("alchemist", "organ_grinder", "If both the Alchemist and Organ Grinder are sober, both are drunk."),
    Jinx::new("cannibal", "butler", "If the Cannibal gains the Butler ability, the Cannibal learns this."),
    Jinx::new("magician", "legion", "If Legion and the Magician are both in play, the Magician does not register as a Minion."),
];

/// Every jinx that involves a role.
pub fn jinxes_for<'a>(role: &'a str) -> impl Iterator<Item = &'static Jinx> + 'a {
    JINXES.iter().filter(move |j| j.involves(role))
}

/// The jinx between two roles, in either order.
#[must_use]
pub fn jinx_between(a: &str, b: &str) -> Option<&'static Jinx> {
    JINXES.iter().find(|j| j.between(a, b))
}

/// Jinxes for every pair of characters in play, in table order.
#[must_use]
pub fn active_jinxes(seats: &[Seat]) -> Vec<&'static Jinx> {
    JINXES
        .iter()
        .filter(|j| seats.in_play(j.first.as_str()) && seats.in_play(j.second.as_str()))
        .collect()
}

/// Deltas for jinxes that change state at setup.
///
/// A Damsel sharing the board with a Spy or a Widow is poisoned for the
/// rest of the game.
#[must_use]
pub fn apply_setup_jinxes(seats: &[Seat]) -> (Vec<SeatDelta>, Vec<LogEntry>) {
    let mut deltas = Vec::new();
    let mut log = Vec::new();
    if seats.in_play("spy") || seats.in_play("widow") {
        for damsel in seats.with_role("damsel") {
            deltas.push(SeatDelta::single(
                damsel.id,
                SeatChange::AddStatus(StatusEffect::new(StatusKind::Poisoned, StatusOrigin::Jinx)),
            ));
            log.push(LogEntry::private(format!("{} is poisoned by a jinx", damsel.id)));
        }
    }
    (deltas, log)
}
