//! Night queue construction and traversal.
//!
//! The queue is a per-night projection of the board: which seats wake, as
//! which role, in what order. It is rebuilt at the start of every night and
//! never persisted.

use serde::{Deserialize, Serialize};

use crate::core::{Board, RoleId, Seat, SeatId, StatusKind};
use crate::roles::RoleRegistry;

use super::overrides::OverrideTable;

/// Orders at or above this value mean "does not wake".
pub const NO_WAKE_ORDER: i32 = 999;

/// One seat's turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NightQueueItem {
    pub seat: SeatId,
    /// Effective role: the displayed role for a masked seat.
    pub role: RoleId,
    pub order: i32,
    /// The role wakes on the first night and never again.
    pub first_night_only: bool,
}

impl NightQueueItem {
    #[must_use]
    pub fn is_first_night_only(&self) -> bool {
        self.first_night_only
    }
}

/// Ordered list of turns with a cursor.
///
/// ## Example
///
/// ```
/// use clocktower_engine::core::{RoleId, Seat, SeatId};
/// use clocktower_engine::roles::RoleRegistry;
/// use clocktower_engine::schedule::build_queue;
///
/// let registry = RoleRegistry::standard();
/// let seats = vec![
///     Seat::new(SeatId::new(0)).with_role(RoleId::new("imp")),
///     Seat::new(SeatId::new(1)).with_role(RoleId::new("monk")),
///     Seat::new(SeatId::new(2)).with_role(RoleId::new("soldier")),
/// ];
///
/// let queue = build_queue(&seats, &registry, false);
/// let order: Vec<_> = queue.iter().map(|item| item.role.as_str()).collect();
/// assert_eq!(order, vec!["monk", "imp"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightQueue {
    items: Vec<NightQueueItem>,
    cursor: usize,
}

impl NightQueue {
    #[must_use]
    pub fn new(items: Vec<NightQueueItem>) -> Self {
        Self { items, cursor: 0 }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NightQueueItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&NightQueueItem> {
        self.items.get(index)
    }

    /// Index of the turn being resolved.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current(&self) -> Option<&NightQueueItem> {
        self.items.get(self.cursor)
    }

    /// Move the cursor. Past the end means the night is done.
    pub fn seek(&mut self, index: usize) {
        self.cursor = index.min(self.items.len());
    }

    /// First index at or after `from` whose seat can still act.
    ///
    /// Skips seats that died without a reason to keep waking, seats that
    /// left the board, and an exorcised Demon.
    #[must_use]
    pub fn next_valid_index(&self, from: usize, seats: &[Seat], registry: &RoleRegistry) -> Option<usize> {
        (from..self.items.len()).find(|&i| {
            let item = &self.items[i];
            let Some(seat) = seats.seat(item.seat) else {
                return false;
            };
            if seat.is_dead {
                let wakes = registry.get(&item.role).is_some_and(|r| r.wakes_when_dead);
                if !wakes && !seat.keeps_ability_when_dead {
                    return false;
                }
            }
            !(seat.has_status(StatusKind::Exorcised) && registry.is_demon(seat))
        })
    }

    /// Insert a turn among the turns still to come, keeping the queue
    /// sorted by (order, seat).
    ///
    /// Returns `false` without change when the seat is already queued after
    /// the cursor, already took a turn earlier tonight, or when the turn's
    /// order is not later than the current one: a character created after
    /// its slot has passed does not act tonight.
    pub fn insert_after_current(&mut self, item: NightQueueItem) -> bool {
        let start = (self.cursor + 1).min(self.items.len());
        let handled = self.cursor.min(self.items.len());
        if self.items[..handled].iter().any(|done| done.seat == item.seat)
            || self.items[start..].iter().any(|queued| queued.seat == item.seat)
        {
            return false;
        }
        if self.current().is_some_and(|current| item.order <= current.order) {
            return false;
        }
        let at = self.items[start..]
            .iter()
            .position(|queued| (queued.order, queued.seat) > (item.order, item.seat))
            .map_or(self.items.len(), |offset| start + offset);
        self.items.insert(at, item);
        true
    }
}

/// Build a queue with the shipped override table.
#[must_use]
pub fn build_queue(seats: &[Seat], registry: &RoleRegistry, first_night: bool) -> NightQueue {
    build_queue_with(seats, registry, &OverrideTable::standard(), first_night)
}

/// Build a queue against an explicit override table.
#[must_use]
pub fn build_queue_with(
    seats: &[Seat],
    registry: &RoleRegistry,
    overrides: &OverrideTable,
    first_night: bool,
) -> NightQueue {
    let mut items: Vec<NightQueueItem> = seats
        .iter()
        .filter_map(|seat| queue_item(seat, registry, overrides, first_night, false))
        .collect();
    items.sort_by_key(|item| (item.order, item.seat));

    tracing::debug!(count = items.len(), first_night, "built night queue");
    NightQueue::new(items)
}

/// The turn a seat takes tonight, if any.
///
/// `requeued` admits actions that only run for a seat that died tonight.
#[must_use]
pub fn queue_item(
    seat: &Seat,
    registry: &RoleRegistry,
    overrides: &OverrideTable,
    first_night: bool,
    requeued: bool,
) -> Option<NightQueueItem> {
    let role = seat.effective_role()?;
    let Some(def) = registry.get(role) else {
        tracing::warn!(seat = %seat.id, role = %role, "unknown role: seat does not wake");
        return None;
    };
    let action = def.action_for(first_night)?;

    if seat.is_dead && !(def.wakes_when_dead || seat.keeps_ability_when_dead) {
        return None;
    }
    if action.only_if_died_tonight && !requeued {
        return None;
    }
    if let Some(cap) = action.requires {
        if !seat.capabilities.has(cap) {
            return None;
        }
    }

    let order = overrides
        .order(role.as_str(), first_night)
        .unwrap_or_else(|| action.order.resolve(first_night));
    if order <= 0 || order >= NO_WAKE_ORDER {
        return None;
    }

    Some(NightQueueItem {
        seat: seat.id,
        role: role.clone(),
        order,
        first_night_only: def.is_first_night_only(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Capability, RoleType};
    use crate::roles::{ActionTag, NightAction, NightOrder, RoleDefinition};

    fn seat(i: u8, role: &'static str) -> Seat {
        Seat::new(SeatId::new(i)).with_role(RoleId::new(role))
    }

    #[test]
    fn test_masked_seat_uses_displayed_role() {
        let registry = RoleRegistry::standard();
        let seats = vec![seat(0, "drunk").with_displayed_role(RoleId::new("empath"))];
        let queue = build_queue(&seats, &registry, true);
        assert_eq!(queue.current().map(|i| i.role.as_str()), Some("empath"));
    }

    #[test]
    fn test_bare_drunk_skipped() {
        let registry = RoleRegistry::standard();
        let queue = build_queue(&[seat(0, "drunk")], &registry, true);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_zero_order_excluded() {
        let mut registry = RoleRegistry::new();
        registry.register(
            RoleDefinition::new("sleeper", "Sleeper", RoleType::Townsfolk)
                .with_other_nights(NightAction::new(NightOrder::Fixed(0), ActionTag::Info)),
        );
        registry.register(
            RoleDefinition::new("late", "Late", RoleType::Townsfolk)
                .with_other_nights(NightAction::new(NightOrder::Fixed(999), ActionTag::Info)),
        );
        let queue = build_queue_with(
            &[seat(0, "sleeper"), seat(1, "late")],
            &registry,
            &OverrideTable::default(),
            false,
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dead_seats_need_a_reason() {
        let registry = RoleRegistry::standard();
        let mut minion = seat(1, "poisoner").dead();
        let seats = vec![seat(0, "empath").dead(), minion.clone()];
        assert!(build_queue(&seats, &registry, false).is_empty());

        minion.keeps_ability_when_dead = true;
        let seats = vec![seat(0, "empath").dead(), minion];
        let queue = build_queue(&seats, &registry, false);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.current().map(|i| i.seat), Some(SeatId::new(1)));
    }

    #[test]
    fn test_ravenkeeper_only_when_requeued() {
        let registry = RoleRegistry::standard();
        let raven = seat(0, "ravenkeeper").dead();
        assert!(build_queue(&[raven.clone()], &registry, false).is_empty());
        assert!(queue_item(&raven, &registry, &OverrideTable::standard(), false, true).is_some());
    }

    #[test]
    fn test_spent_capability_excluded() {
        let registry = RoleRegistry::standard();
        let mut assassin = seat(0, "assassin").with_capability(Capability::AssassinKill);
        assert_eq!(build_queue(&[assassin.clone()], &registry, false).len(), 1);
        assassin.capabilities.consume(Capability::AssassinKill);
        assert!(build_queue(&[assassin], &registry, false).is_empty());
    }

    #[test]
    fn test_unknown_role_skipped() {
        let registry = RoleRegistry::standard();
        let seats = vec![seat(0, "made_up"), seat(1, "poisoner")];
        let queue = build_queue(&seats, &registry, false);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_ties_broken_by_seat() {
        let registry = RoleRegistry::standard();
        let seats = vec![seat(3, "empath"), seat(1, "empath")];
        let queue = build_queue(&seats, &registry, false);
        let ids: Vec<_> = queue.iter().map(|i| i.seat).collect();
        assert_eq!(ids, vec![SeatId::new(1), SeatId::new(3)]);
    }

    fn item(seat: u8, role: &'static str, order: i32) -> NightQueueItem {
        NightQueueItem {
            seat: SeatId::new(seat),
            role: RoleId::new(role),
            order,
            first_night_only: false,
        }
    }

    #[test]
    fn test_insert_after_current_keeps_order() {
        let mut queue = NightQueue::new(vec![
            item(0, "poisoner", 10),
            item(1, "imp", 30),
            item(2, "empath", 60),
        ]);
        queue.seek(1);

        assert!(queue.insert_after_current(item(3, "ravenkeeper", 50)));
        let seats: Vec<_> = queue.iter().map(|i| i.seat.0).collect();
        assert_eq!(seats, vec![0, 1, 3, 2]);

        assert!(queue.insert_after_current(item(4, "dreamer", 70)));
        assert_eq!(queue.get(4).map(|i| i.seat), Some(SeatId::new(4)));
    }

    #[test]
    fn test_insert_refuses_passed_slots() {
        let mut queue = NightQueue::new(vec![
            item(0, "pit_hag", 9),
            item(1, "monk", 18),
            item(2, "empath", 64),
        ]);
        // A Sailor created by the Pit-Hag: its slot is before the Pit-Hag's
        assert!(!queue.insert_after_current(item(3, "sailor", 6)));
        // Same order as the current turn: a second copy of a role that just acted
        assert!(!queue.insert_after_current(item(3, "pit_hag", 9)));
        // Already queued later
        assert!(!queue.insert_after_current(item(2, "empath", 64)));

        queue.seek(2);
        // Seat 0 already took its turn tonight
        assert!(!queue.insert_after_current(item(0, "dreamer", 70)));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_next_valid_skips_dead_and_exorcised() {
        let registry = RoleRegistry::standard();
        let mut seats = vec![seat(0, "poisoner"), seat(1, "imp"), seat(2, "empath")];
        let queue = build_queue(&seats, &registry, false);
        seats[0].is_dead = true;
        seats[1].add_status(crate::core::StatusEffect::from_role(
            StatusKind::Exorcised,
            RoleId::new("exorcist"),
        ));
        assert_eq!(queue.next_valid_index(0, &seats, &registry), Some(2));
    }

    #[test]
    fn test_first_night_only_flag() {
        let registry = RoleRegistry::standard();
        let queue = build_queue(&[seat(0, "washerwoman"), seat(1, "empath")], &registry, true);
        let flags: Vec<_> = queue.iter().map(NightQueueItem::is_first_night_only).collect();
        assert_eq!(flags, vec![true, false]);
    }
}
