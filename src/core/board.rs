//! Read helpers over the seat collection.
//!
//! The board is a plain `[Seat]` in table order. Seat 0 sits next to the
//! last seat, so neighbour walks wrap around.

use super::role::RoleId;
use super::seat::{Seat, SeatId};

/// Lookups and neighbour walks over a seat slice.
pub trait Board {
    /// Find a seat by id.
    fn seat(&self, id: SeatId) -> Option<&Seat>;

    /// Table position of a seat.
    fn position(&self, id: SeatId) -> Option<usize>;

    /// Living seats, in table order.
    fn alive(&self) -> Box<dyn Iterator<Item = &Seat> + '_>;

    /// Seats whose real role is `key`.
    fn with_role<'a>(&'a self, key: &'a str) -> Box<dyn Iterator<Item = &'a Seat> + 'a>;

    /// Whether a role is held by any seat, dead or alive.
    fn in_play(&self, key: &str) -> bool;

    /// Nearest living seat on each side of `id`, skipping the dead.
    ///
    /// Returns `(left, right)`. With only one other living seat both sides
    /// are the same seat; with none, both are `None`.
    fn alive_neighbours(&self, id: SeatId) -> (Option<&Seat>, Option<&Seat>);

    /// Immediate seats on each side, dead or alive.
    fn adjacent(&self, id: SeatId) -> (Option<&Seat>, Option<&Seat>);

    /// Shortest number of steps around the table between two seats.
    fn circular_distance(&self, a: SeatId, b: SeatId) -> Option<usize>;

    /// Role ids currently held (real roles).
    fn roles_in_play(&self) -> Vec<RoleId>;
}

impl Board for [Seat] {
    fn seat(&self, id: SeatId) -> Option<&Seat> {
        self.iter().find(|s| s.id == id)
    }

    fn position(&self, id: SeatId) -> Option<usize> {
        self.iter().position(|s| s.id == id)
    }

    fn alive(&self) -> Box<dyn Iterator<Item = &Seat> + '_> {
        Box::new(self.iter().filter(|s| s.is_alive()))
    }

    fn with_role<'a>(&'a self, key: &'a str) -> Box<dyn Iterator<Item = &'a Seat> + 'a> {
        Box::new(self.iter().filter(move |s| s.has_role(key)))
    }

    fn in_play(&self, key: &str) -> bool {
        self.iter().any(|s| s.has_role(key))
    }

    fn alive_neighbours(&self, id: SeatId) -> (Option<&Seat>, Option<&Seat>) {
        let Some(pos) = self.position(id) else {
            return (None, None);
        };
        let n = self.len();
        let left = (1..n)
            .map(|step| &self[(pos + n - step) % n])
            .find(|s| s.is_alive() && s.id != id);
        let right = (1..n)
            .map(|step| &self[(pos + step) % n])
            .find(|s| s.is_alive() && s.id != id);
        (left, right)
    }

    fn adjacent(&self, id: SeatId) -> (Option<&Seat>, Option<&Seat>) {
        let Some(pos) = self.position(id) else {
            return (None, None);
        };
        let n = self.len();
        if n < 2 {
            return (None, None);
        }
        (Some(&self[(pos + n - 1) % n]), Some(&self[(pos + 1) % n]))
    }

    fn circular_distance(&self, a: SeatId, b: SeatId) -> Option<usize> {
        let pa = self.position(a)?;
        let pb = self.position(b)?;
        let diff = pa.abs_diff(pb);
        Some(diff.min(self.len() - diff))
    }

    fn roles_in_play(&self) -> Vec<RoleId> {
        self.iter().filter_map(|s| s.role.clone()).collect()
    }
}
