//! Seats: one player position and its game state.
//!
//! ## SeatId
//!
//! Stable 0-based identity. Displayed 1-based, the way the table counts.
//!
//! ## Seat
//!
//! Created once at setup with no role, then mutated for the rest of the
//! session. Seats are never removed; a dead seat keeps its role and status
//! history for the post-game review.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::capability::{Capability, CapabilitySet};
use super::role::{Alignment, RoleId};
use super::status::{StatusEffect, StatusKind};

/// Seat identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatId(pub u8);

impl SeatId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// 0-based index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over the ids of a table with `seat_count` seats.
    ///
    /// ```
    /// use clocktower_engine::core::SeatId;
    ///
    /// let ids: Vec<_> = SeatId::all(3).collect();
    /// assert_eq!(ids, vec![SeatId::new(0), SeatId::new(1), SeatId::new(2)]);
    /// ```
    pub fn all(seat_count: usize) -> impl Iterator<Item = SeatId> {
        (0..seat_count.min(u8::MAX as usize) as u8).map(SeatId)
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", u16::from(self.0) + 1)
    }
}

/// One player position.
///
/// ## Example
///
/// ```
/// use clocktower_engine::core::{RoleId, Seat, SeatId};
///
/// let drunk = Seat::new(SeatId::new(4))
///     .with_role(RoleId::new("drunk"))
///     .with_displayed_role(RoleId::new("empath"));
///
/// assert_eq!(drunk.effective_role().map(|r| r.as_str()), Some("empath"));
/// assert!(drunk.is_alive());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,

    /// The real character.
    pub role: Option<RoleId>,

    /// The character this seat believes it is, when that differs from the
    /// real one (Drunk, Lunatic, Marionette).
    pub displayed_role: Option<RoleId>,

    pub is_dead: bool,

    /// Seat currently protecting this one. At most one protection reference
    /// is live at a time.
    pub protected_by: Option<SeatId>,

    pub statuses: SmallVec<[StatusEffect; 4]>,

    pub capabilities: CapabilitySet,

    /// The Zombuul's first death: publicly dead, logically alive.
    pub feigning_death: bool,

    /// Became the demon mid-game (star pass, Scarlet Woman).
    pub is_demon_successor: bool,

    /// Keeps acting after death (Vigormortis kill).
    pub keeps_ability_when_dead: bool,

    /// Alignment changed during play.
    pub alignment_override: Option<Alignment>,

    /// Fortune Teller decoy: registers as the demon to the Fortune Teller.
    pub is_red_herring: bool,

    /// Butler's chosen master.
    pub master: Option<SeatId>,

    /// Evil Twin pairing partner.
    pub twin: Option<SeatId>,
}

impl Seat {
    /// An empty seat with no role.
    #[must_use]
    pub fn new(id: SeatId) -> Self {
        Self {
            id,
            role: None,
            displayed_role: None,
            is_dead: false,
            protected_by: None,
            statuses: SmallVec::new(),
            capabilities: CapabilitySet::new(),
            feigning_death: false,
            is_demon_successor: false,
            keeps_ability_when_dead: false,
            alignment_override: None,
            is_red_herring: false,
            master: None,
            twin: None,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: RoleId) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn with_displayed_role(mut self, role: RoleId) -> Self {
        self.displayed_role = Some(role);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.add_status(status);
        self
    }

    #[must_use]
    pub fn with_capability(mut self, cap: Capability) -> Self {
        self.capabilities.grant(cap);
        self
    }

    #[must_use]
    pub fn dead(mut self) -> Self {
        self.is_dead = true;
        self
    }

    #[must_use]
    pub fn red_herring(mut self) -> Self {
        self.is_red_herring = true;
        self
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Real role id, if assigned.
    #[must_use]
    pub fn role_id(&self) -> Option<&RoleId> {
        self.role.as_ref()
    }

    /// Whether the real role is `key`.
    #[must_use]
    pub fn has_role(&self, key: &str) -> bool {
        self.role.as_ref().is_some_and(|r| r.is(key))
    }

    /// The role whose night action this seat performs.
    ///
    /// A masked seat acts as its displayed role. A Drunk with no displayed
    /// role has nothing to act as.
    #[must_use]
    pub fn effective_role(&self) -> Option<&RoleId> {
        match (&self.displayed_role, &self.role) {
            (Some(shown), _) => Some(shown),
            (None, Some(real)) if real.is("drunk") => None,
            (None, real) => real.as_ref(),
        }
    }

    /// Add a status, replacing any status in the same slot.
    pub fn add_status(&mut self, status: StatusEffect) {
        self.statuses.retain(|s| !s.same_slot(&status));
        self.statuses.push(status);
    }

    /// Remove statuses matching a predicate. Returns how many were removed.
    pub fn remove_statuses<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&StatusEffect) -> bool,
    {
        let before = self.statuses.len();
        self.statuses.retain(|s| !predicate(s));
        before - self.statuses.len()
    }

    /// Whether any status of the kind is present.
    #[must_use]
    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.iter().any(|s| s.kind == kind)
    }

    /// Statuses of one kind.
    pub fn statuses_of(&self, kind: StatusKind) -> impl Iterator<Item = &StatusEffect> {
        self.statuses.iter().filter(move |s| s.kind == kind)
    }
}
