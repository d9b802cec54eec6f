//! Status effects carried by seats.
//!
//! Poison and drunkenness are never stored as a single flag. Each effect is
//! a separate record with its own origin and duration, so several sources
//! can stack on one seat and expire independently.

use serde::{Deserialize, Serialize};

use super::role::RoleId;
use super::seat::SeatId;

/// Which effect a status applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Ability malfunctions; information may be false.
    Poisoned,
    /// Ability malfunctions; information may be false.
    Drunk,
    /// Cannot die by execution.
    ExecutionImmune,
    /// Must be mad about a character (Cerenovus).
    Mad,
    /// Dies if they nominate (Witch).
    Cursed,
    /// Chosen by the Exorcist: the demon does not wake tonight.
    Exorcised,
}

impl StatusKind {
    /// Whether this status makes the seat's ability unreliable.
    #[must_use]
    pub const fn impairs_ability(self) -> bool {
        matches!(self, StatusKind::Poisoned | StatusKind::Drunk)
    }
}

/// How long a status lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Duration {
    /// Lasts for the rest of the game.
    Permanent,
    /// Removed by the dusk cleanup (poisoner: "tonight and tomorrow day").
    UntilNextDusk,
    /// Removed at dawn (night-only effects).
    UntilDawn,
    /// Removed when the source seat dies (Widow, No Dashii).
    WhileSourceLives,
    /// Removed after this many more dawns (Courtier).
    Nights(u8),
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Duration::Permanent => f.write_str("permanent"),
            Duration::UntilNextDusk => f.write_str("until next dusk"),
            Duration::UntilDawn => f.write_str("until dawn"),
            Duration::WhileSourceLives => f.write_str("while its source lives"),
            Duration::Nights(1) => f.write_str("1 more night"),
            Duration::Nights(n) => write!(f, "{n} more nights"),
        }
    }
}

/// What applied a status.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusOrigin {
    /// A character ability.
    Role(RoleId),
    /// A jinx applied at setup.
    Jinx,
    /// The moderator, by hand.
    Storyteller,
}

impl std::fmt::Display for StatusOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusOrigin::Role(role) => write!(f, "{role}"),
            StatusOrigin::Jinx => f.write_str("jinx"),
            StatusOrigin::Storyteller => f.write_str("storyteller"),
        }
    }
}

/// A single status record on a seat.
///
/// ## Example
///
/// ```
/// use clocktower_engine::core::{Duration, RoleId, SeatId, StatusEffect, StatusKind};
///
/// let poison = StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("poisoner"))
///     .with_source(SeatId::new(0))
///     .lasting(Duration::UntilNextDusk);
///
/// assert_eq!(poison.kind, StatusKind::Poisoned);
/// assert_eq!(poison.duration, Duration::UntilNextDusk);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub origin: StatusOrigin,
    /// Seat whose ability applied the effect, if any.
    pub source: Option<SeatId>,
    pub duration: Duration,
}

impl StatusEffect {
    /// A permanent status with the given origin.
    #[must_use]
    pub fn new(kind: StatusKind, origin: StatusOrigin) -> Self {
        Self {
            kind,
            origin,
            source: None,
            duration: Duration::Permanent,
        }
    }

    /// A permanent status applied by a role ability.
    #[must_use]
    pub fn from_role(kind: StatusKind, role: RoleId) -> Self {
        Self::new(kind, StatusOrigin::Role(role))
    }

    #[must_use]
    pub fn with_source(mut self, source: SeatId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn lasting(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Two statuses occupy the same slot when kind, origin and source match.
    /// Adding a status replaces any status in the same slot.
    #[must_use]
    pub fn same_slot(&self, other: &StatusEffect) -> bool {
        self.kind == other.kind && self.origin == other.origin && self.source == other.source
    }

    /// Whether the origin is the given role.
    #[must_use]
    pub fn from_role_id(&self, role: &str) -> bool {
        matches!(&self.origin, StatusOrigin::Role(r) if r.is(role))
    }
}

impl std::fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            StatusKind::Poisoned => "poisoned",
            StatusKind::Drunk => "drunk",
            StatusKind::ExecutionImmune => "execution-immune",
            StatusKind::Mad => "mad",
            StatusKind::Cursed => "cursed",
            StatusKind::Exorcised => "exorcised",
        };
        write!(f, "{kind} by {} ({})", self.origin, self.duration)
    }
}
