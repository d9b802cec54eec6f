//! One-shot capability tokens.
//!
//! "Once per game" abilities are tokens granted when a role is assigned and
//! consumed on first use. The scheduler refuses to queue a seat whose
//! night action needs a token it no longer holds.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A once-per-game ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Slayer: one public shot at the demon.
    SlayerShot,
    /// Virgin: the first nomination triggers.
    VirginNomination,
    /// Seamstress: one alignment comparison.
    SeamstressReading,
    /// Professor: one resurrection.
    ProfessorRevival,
    /// Courtier: one character is drunk for three nights.
    CourtierDrink,
    /// Assassin: one kill that ignores protection.
    AssassinKill,
    /// Fool: survives the first death.
    FoolReprieve,
    /// Zombuul: the first death is a fake death.
    FakeDeath,
    /// Fang Gu: an outsider kill converts it (once per game).
    FangGuLeap,
    /// Engineer: one rebuild of the evil team.
    EngineerRebuild,
    /// Nightwatchman: one reveal of self.
    NightwatchmanReveal,
    /// Huntsman: one guess at the Damsel.
    HuntsmanGuess,
    /// Philosopher: one choice of a good character.
    PhilosopherChoice,
    /// Artist: one yes/no question.
    ArtistQuestion,
    /// Evil twin pair marking on the first night.
    TwinPairing,
    /// The Po chose no one last night and may kill three.
    PoCharge,
}

impl Capability {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Capability::SlayerShot => "slayer shot",
            Capability::VirginNomination => "virgin nomination",
            Capability::SeamstressReading => "seamstress reading",
            Capability::ProfessorRevival => "professor revival",
            Capability::CourtierDrink => "courtier drink",
            Capability::AssassinKill => "assassin kill",
            Capability::FoolReprieve => "fool reprieve",
            Capability::FakeDeath => "fake death",
            Capability::FangGuLeap => "fang gu leap",
            Capability::EngineerRebuild => "engineer rebuild",
            Capability::NightwatchmanReveal => "nightwatchman reveal",
            Capability::HuntsmanGuess => "huntsman guess",
            Capability::PhilosopherChoice => "philosopher choice",
            Capability::ArtistQuestion => "artist question",
            Capability::TwinPairing => "twin pairing",
            Capability::PoCharge => "po charge",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Tokens a seat still holds.
///
/// ## Example
///
/// ```
/// use clocktower_engine::core::{Capability, CapabilitySet};
///
/// let mut caps = CapabilitySet::default();
/// caps.grant(Capability::SlayerShot);
///
/// assert!(caps.consume(Capability::SlayerShot));
/// assert!(!caps.consume(Capability::SlayerShot));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    held: SmallVec<[Capability; 2]>,
    spent: SmallVec<[Capability; 2]>,
}

impl CapabilitySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a token. Granting a token already held is a no-op; granting a
    /// spent token makes it available again (a new character).
    pub fn grant(&mut self, cap: Capability) {
        self.spent.retain(|c| *c != cap);
        if !self.held.contains(&cap) {
            self.held.push(cap);
        }
    }

    /// Whether the token is available.
    #[must_use]
    pub fn has(&self, cap: Capability) -> bool {
        self.held.contains(&cap)
    }

    /// Whether the token was granted and then used.
    #[must_use]
    pub fn is_spent(&self, cap: Capability) -> bool {
        self.spent.contains(&cap)
    }

    /// Use the token. Returns `false` if it was not held.
    pub fn consume(&mut self, cap: Capability) -> bool {
        match self.held.iter().position(|c| *c == cap) {
            Some(idx) => {
                self.held.remove(idx);
                self.spent.push(cap);
                true
            }
            None => false,
        }
    }

    /// Drop every token, spent or not. Used when a seat changes character.
    pub fn clear(&mut self) {
        self.held.clear();
        self.spent.clear();
    }

    /// Tokens still held.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.held.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_once() {
        let mut caps = CapabilitySet::new();
        caps.grant(Capability::FakeDeath);
        assert!(caps.has(Capability::FakeDeath));
        assert!(caps.consume(Capability::FakeDeath));
        assert!(!caps.has(Capability::FakeDeath));
        assert!(caps.is_spent(Capability::FakeDeath));
        assert!(!caps.consume(Capability::FakeDeath));
    }

    #[test]
    fn test_regrant_after_spend() {
        let mut caps = CapabilitySet::new();
        caps.grant(Capability::SlayerShot);
        caps.consume(Capability::SlayerShot);
        caps.grant(Capability::SlayerShot);
        assert!(caps.has(Capability::SlayerShot));
        assert!(!caps.is_spent(Capability::SlayerShot));
    }

    #[test]
    fn test_grant_is_idempotent() {
        let mut caps = CapabilitySet::new();
        caps.grant(Capability::AssassinKill);
        caps.grant(Capability::AssassinKill);
        assert_eq!(caps.iter().count(), 1);
    }
}
