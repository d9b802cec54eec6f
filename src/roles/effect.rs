//! What handlers see and what they return.
//!
//! A handler is a pure function: it reads the board through a
//! `HandlerContext` and describes the result as a `HandlerOutput`. Kill
//! requests are not applied by the handler; the death pipeline runs them
//! through immunity and protection checks.

use serde::{Deserialize, Serialize};

use crate::context::SessionContext;
use crate::core::{Board, LogEntry, Phase, RoleId, Seat, SeatDelta, SeatId};
use crate::resolution::PendingPrompt;

use super::registry::RoleRegistry;

/// The moderator's selection for an action.
///
/// ```
/// use clocktower_engine::core::{RoleId, SeatId};
/// use clocktower_engine::roles::ActionChoice;
///
/// let choice = ActionChoice::from(vec![SeatId::new(2)]).with_role(RoleId::new("imp"));
/// assert_eq!(choice.targets.len(), 1);
/// assert_eq!(choice.role, Some(RoleId::new("imp")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionChoice {
    pub targets: Vec<SeatId>,
    /// A character chosen as part of the action (Pit-Hag, Courtier, Gambler).
    pub role: Option<RoleId>,
}

impl ActionChoice {
    /// No targets, no character.
    #[must_use]
    pub fn nothing() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn seats(targets: &[SeatId]) -> Self {
        Self {
            targets: targets.to_vec(),
            role: None,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: RoleId) -> Self {
        self.role = Some(role);
        self
    }
}

impl From<Vec<SeatId>> for ActionChoice {
    fn from(targets: Vec<SeatId>) -> Self {
        Self { targets, role: None }
    }
}

impl From<&[SeatId]> for ActionChoice {
    fn from(targets: &[SeatId]) -> Self {
        Self::seats(targets)
    }
}

/// What caused a death attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KillCause {
    /// A demon's night kill.
    Demon,
    /// Any other character ability.
    Ability,
    Execution,
    /// The moderator, by hand.
    Storyteller,
}

/// A request to kill a seat, resolved by the death pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillRequest {
    pub target: SeatId,
    pub cause: KillCause,
    pub killer: Option<SeatId>,
    pub killer_role: Option<RoleId>,
    /// Protection of every kind is ignored (Assassin).
    pub ignores_protection: bool,
    /// Already redirected once; the Mayor does not bounce it again.
    pub redirected: bool,
}

impl KillRequest {
    /// A demon kill from `killer` acting as `role`.
    #[must_use]
    pub fn demon(target: SeatId, killer: SeatId, role: RoleId) -> Self {
        Self {
            target,
            cause: KillCause::Demon,
            killer: Some(killer),
            killer_role: Some(role),
            ignores_protection: false,
            redirected: false,
        }
    }

    /// A non-demon ability kill.
    #[must_use]
    pub fn ability(target: SeatId, killer: SeatId, role: RoleId) -> Self {
        Self {
            cause: KillCause::Ability,
            ..Self::demon(target, killer, role)
        }
    }

    /// A kill by the moderator.
    #[must_use]
    pub fn storyteller(target: SeatId) -> Self {
        Self {
            target,
            cause: KillCause::Storyteller,
            killer: None,
            killer_role: None,
            ignores_protection: false,
            redirected: false,
        }
    }

    #[must_use]
    pub fn ignoring_protection(mut self) -> Self {
        self.ignores_protection = true;
        self
    }

    #[must_use]
    pub fn redirected(mut self) -> Self {
        self.redirected = true;
        self
    }

    /// Whether the killer role is `key`.
    #[must_use]
    pub fn by_role(&self, key: &str) -> bool {
        self.killer_role.as_ref().is_some_and(|r| r.is(key))
    }
}

/// Read-only view handed to a role handler.
pub struct HandlerContext<'a> {
    pub seats: &'a [Seat],
    pub actor: &'a Seat,
    /// The role being acted out (the displayed role for a masked seat).
    pub role: &'a RoleId,
    pub choice: &'a ActionChoice,
    pub phase: Phase,
    pub session: &'a SessionContext,
    pub registry: &'a RoleRegistry,
}

impl<'a> HandlerContext<'a> {
    /// Chosen target seats that exist on the board, in order.
    pub fn targets(&self) -> impl Iterator<Item = &'a Seat> + '_ {
        self.choice.targets.iter().filter_map(|id| self.seats.seat(*id))
    }

    /// The i-th chosen target.
    #[must_use]
    pub fn target(&self, i: usize) -> Option<&'a Seat> {
        self.choice.targets.get(i).and_then(|id| self.seats.seat(*id))
    }

    #[must_use]
    pub fn first_night(&self) -> bool {
        self.phase.is_first_night()
    }

    /// Display label for a seat: "Seat 3 (Empath)".
    #[must_use]
    pub fn label(&self, seat: &Seat) -> String {
        self.registry.seat_label(seat)
    }
}

/// The result of a handler.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandlerOutput {
    pub deltas: Vec<SeatDelta>,
    pub kills: Vec<KillRequest>,
    pub log: Vec<LogEntry>,
    /// Seats to insert right after the current queue position.
    pub requeue: Vec<SeatId>,
    pub prompt: Option<PendingPrompt>,
}

impl HandlerOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delta(mut self, delta: SeatDelta) -> Self {
        self.deltas.push(delta);
        self
    }

    #[must_use]
    pub fn with_kill(mut self, kill: KillRequest) -> Self {
        self.kills.push(kill);
        self
    }

    #[must_use]
    pub fn with_log(mut self, entry: LogEntry) -> Self {
        self.log.push(entry);
        self
    }

    #[must_use]
    pub fn with_requeue(mut self, seat: SeatId) -> Self {
        self.requeue.push(seat);
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: PendingPrompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// A storyteller-only note and nothing else.
    #[must_use]
    pub fn note(text: impl Into<String>) -> Self {
        Self::new().with_log(LogEntry::private(text))
    }
}
