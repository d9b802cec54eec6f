//! Poison and drunkenness queries.
//!
//! Both are derived from the status list every time. A seat is poisoned
//! while any poison record remains, whatever its source, so clearing one
//! source never cures a seat another source still poisons.

use crate::core::{Seat, StatusEffect, StatusKind};

/// Whether any poison record marks the seat.
///
/// ```
/// use clocktower_engine::core::{RoleId, Seat, SeatId, StatusEffect, StatusKind};
/// use clocktower_engine::info::is_poisoned;
///
/// let mut seat = Seat::new(SeatId::new(0))
///     .with_status(StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("poisoner")))
///     .with_status(StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("widow")));
///
/// seat.remove_statuses(|s| s.from_role_id("poisoner"));
/// assert!(is_poisoned(&seat));
/// ```
#[must_use]
pub fn is_poisoned(seat: &Seat) -> bool {
    seat.has_status(StatusKind::Poisoned)
}

/// Whether an explicit drunk status marks the seat.
#[must_use]
pub fn is_drunk(seat: &Seat) -> bool {
    seat.has_status(StatusKind::Drunk)
}

/// Poisoned, drunk, or really the Drunk.
#[must_use]
pub fn ability_disabled(seat: &Seat) -> bool {
    is_poisoned(seat) || is_drunk(seat) || seat.has_role("drunk")
}

/// The poison records on a seat, in the order they were applied.
pub fn poison_sources(seat: &Seat) -> impl Iterator<Item = &StatusEffect> {
    seat.statuses_of(StatusKind::Poisoned)
}

/// One line per impairment, for the moderator's grimoire view.
#[must_use]
pub fn impairment_summary(seat: &Seat) -> Vec<String> {
    let mut lines: Vec<String> = seat
        .statuses
        .iter()
        .filter(|s| s.kind.impairs_ability())
        .map(ToString::to_string)
        .collect();
    if seat.has_role("drunk") {
        lines.push("is the Drunk".to_string());
    }
    lines
}
