//! Seat deltas: the only way resolution changes the board.
//!
//! Handlers and the death pipeline describe what happens as a list of
//! `SeatDelta`s. `apply_deltas` validates every seat id before touching
//! anything, so a bad delta leaves the whole board as it was.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::capability::Capability;
use super::role::{Alignment, RoleId};
use super::seat::{Seat, SeatId};
use super::status::{Duration, StatusEffect, StatusKind, StatusOrigin};
use crate::error::{EngineError, EngineResult};

/// One field-level edit to a seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SeatChange {
    Die,
    Revive,
    /// Publicly dead, logically alive.
    FeignDeath,
    AddStatus(StatusEffect),
    /// Remove statuses from an origin, optionally narrowed by kind and source.
    RemoveStatuses {
        kind: Option<StatusKind>,
        origin: StatusOrigin,
        source: Option<SeatId>,
    },
    /// Remove every status (character change).
    ClearStatuses,
    /// Remove every status of one duration class (phase cleanup).
    Expire(Duration),
    /// Count down `Nights(n)` statuses, removing those that run out.
    TickNights,
    Protect(SeatId),
    Unprotect,
    SetRole(RoleId),
    SetDisplayedRole(Option<RoleId>),
    Grant(Capability),
    Consume(Capability),
    /// Drop every capability (character change).
    ResetCapabilities,
    SetDemonSuccessor(bool),
    KeepAbilityWhenDead(bool),
    SetAlignment(Option<Alignment>),
    SetMaster(Option<SeatId>),
    SetTwin(Option<SeatId>),
    SetRedHerring(bool),
}

impl SeatChange {
    /// Apply to one seat.
    pub fn apply(&self, seat: &mut Seat) {
        match self {
            SeatChange::Die => {
                seat.is_dead = true;
                seat.feigning_death = false;
            }
            SeatChange::Revive => {
                seat.is_dead = false;
                seat.feigning_death = false;
            }
            SeatChange::FeignDeath => {
                seat.is_dead = false;
                seat.feigning_death = true;
            }
            SeatChange::AddStatus(status) => seat.add_status(status.clone()),
            SeatChange::RemoveStatuses { kind, origin, source } => {
                seat.remove_statuses(|s| {
                    &s.origin == origin
                        && kind.map_or(true, |k| s.kind == k)
                        && source.map_or(true, |src| s.source == Some(src))
                });
            }
            SeatChange::ClearStatuses => seat.statuses.clear(),
            SeatChange::Expire(duration) => {
                seat.remove_statuses(|s| s.duration == *duration);
            }
            SeatChange::TickNights => {
                seat.remove_statuses(|s| s.duration == Duration::Nights(1) || s.duration == Duration::Nights(0));
                for status in &mut seat.statuses {
                    if let Duration::Nights(n) = status.duration {
                        status.duration = Duration::Nights(n - 1);
                    }
                }
            }
            SeatChange::Protect(by) => seat.protected_by = Some(*by),
            SeatChange::Unprotect => seat.protected_by = None,
            SeatChange::SetRole(role) => seat.role = Some(role.clone()),
            SeatChange::SetDisplayedRole(role) => seat.displayed_role = role.clone(),
            SeatChange::Grant(cap) => seat.capabilities.grant(*cap),
            SeatChange::Consume(cap) => {
                seat.capabilities.consume(*cap);
            }
            SeatChange::ResetCapabilities => seat.capabilities.clear(),
            SeatChange::SetDemonSuccessor(v) => seat.is_demon_successor = *v,
            SeatChange::KeepAbilityWhenDead(v) => seat.keeps_ability_when_dead = *v,
            SeatChange::SetAlignment(a) => seat.alignment_override = *a,
            SeatChange::SetMaster(m) => seat.master = *m,
            SeatChange::SetTwin(t) => seat.twin = *t,
            SeatChange::SetRedHerring(v) => seat.is_red_herring = *v,
        }
    }
}

/// Changes to one seat.
///
/// ## Example
///
/// ```
/// use clocktower_engine::core::{apply_deltas, Seat, SeatChange, SeatDelta, SeatId};
///
/// let mut seats = vec![Seat::new(SeatId::new(0)), Seat::new(SeatId::new(1))];
/// let deltas = vec![SeatDelta::single(SeatId::new(1), SeatChange::Die)];
///
/// apply_deltas(&mut seats, &deltas).unwrap();
/// assert!(seats[1].is_dead);
///
/// // An unknown seat rejects the whole batch
/// let bad = vec![
///     SeatDelta::single(SeatId::new(0), SeatChange::Die),
///     SeatDelta::single(SeatId::new(9), SeatChange::Die),
/// ];
/// assert!(apply_deltas(&mut seats, &bad).is_err());
/// assert!(!seats[0].is_dead);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatDelta {
    pub seat: SeatId,
    pub changes: SmallVec<[SeatChange; 2]>,
}

impl SeatDelta {
    #[must_use]
    pub fn new(seat: SeatId) -> Self {
        Self {
            seat,
            changes: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn single(seat: SeatId, change: SeatChange) -> Self {
        Self::new(seat).with(change)
    }

    #[must_use]
    pub fn with(mut self, change: SeatChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Whether any change kills the seat.
    #[must_use]
    pub fn kills(&self) -> bool {
        self.changes.iter().any(|c| matches!(c, SeatChange::Die))
    }
}

/// Apply deltas atomically, in order.
///
/// Fails with `UnknownSeat` before any change is made if a delta names a
/// seat that is not on the board.
pub fn apply_deltas(seats: &mut [Seat], deltas: &[SeatDelta]) -> EngineResult<()> {
    if let Some(missing) = deltas
        .iter()
        .find(|d| !seats.iter().any(|s| s.id == d.seat))
    {
        return Err(EngineError::UnknownSeat(missing.seat));
    }

    for delta in deltas {
        if let Some(seat) = seats.iter_mut().find(|s| s.id == delta.seat) {
            for change in &delta.changes {
                change.apply(seat);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Vec<Seat> {
        (0..3).map(|i| Seat::new(SeatId::new(i))).collect()
    }

    #[test]
    fn test_remove_statuses_narrowed_by_source() {
        let mut seats = board();
        let origin = StatusOrigin::Role(RoleId::new("poisoner"));
        for src in [0, 1] {
            seats[2].add_status(
                StatusEffect::new(StatusKind::Poisoned, origin.clone())
                    .with_source(SeatId::new(src))
                    .lasting(Duration::UntilNextDusk),
            );
        }

        let delta = SeatDelta::single(
            SeatId::new(2),
            SeatChange::RemoveStatuses {
                kind: Some(StatusKind::Poisoned),
                origin,
                source: Some(SeatId::new(0)),
            },
        );
        apply_deltas(&mut seats, &[delta]).unwrap();

        assert_eq!(seats[2].statuses.len(), 1);
        assert_eq!(seats[2].statuses[0].source, Some(SeatId::new(1)));
    }

    #[test]
    fn test_feign_then_die() {
        let mut seats = board();
        apply_deltas(&mut seats, &[SeatDelta::single(SeatId::new(0), SeatChange::FeignDeath)]).unwrap();
        assert!(!seats[0].is_dead);
        assert!(seats[0].feigning_death);

        apply_deltas(&mut seats, &[SeatDelta::single(SeatId::new(0), SeatChange::Die)]).unwrap();
        assert!(seats[0].is_dead);
        assert!(!seats[0].feigning_death);
    }

    #[test]
    fn test_unknown_seat_is_atomic() {
        let mut seats = board();
        let before = seats.clone();
        let deltas = vec![
            SeatDelta::single(SeatId::new(1), SeatChange::Die),
            SeatDelta::single(SeatId::new(7), SeatChange::Die),
        ];
        assert_eq!(
            apply_deltas(&mut seats, &deltas),
            Err(EngineError::UnknownSeat(SeatId::new(7)))
        );
        assert_eq!(seats, before);
    }

    #[test]
    fn test_consume_capability() {
        let mut seats = board();
        seats[0].capabilities.grant(Capability::SlayerShot);
        apply_deltas(
            &mut seats,
            &[SeatDelta::single(SeatId::new(0), SeatChange::Consume(Capability::SlayerShot))],
        )
        .unwrap();
        assert!(seats[0].capabilities.is_spent(Capability::SlayerShot));
    }

    #[test]
    fn test_expire_and_tick() {
        let mut seats = board();
        let origin = StatusOrigin::Role(RoleId::new("courtier"));
        seats[0].add_status(StatusEffect::new(StatusKind::Drunk, origin.clone()).lasting(Duration::Nights(2)));
        seats[0].add_status(
            StatusEffect::new(StatusKind::Poisoned, StatusOrigin::Storyteller).lasting(Duration::UntilNextDusk),
        );

        let dusk = SeatDelta::single(SeatId::new(0), SeatChange::Expire(Duration::UntilNextDusk));
        apply_deltas(&mut seats, &[dusk]).unwrap();
        assert!(!seats[0].has_status(StatusKind::Poisoned));

        let tick = SeatDelta::single(SeatId::new(0), SeatChange::TickNights);
        apply_deltas(&mut seats, &[tick.clone()]).unwrap();
        assert_eq!(seats[0].statuses[0].duration, Duration::Nights(1));
        apply_deltas(&mut seats, &[tick]).unwrap();
        assert!(seats[0].statuses.is_empty());
    }
}
