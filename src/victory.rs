//! Win condition evaluation.
//!
//! `WinEvaluator::check` inspects a board and the session ledgers and says
//! whether the game is over. It is pure: calling it twice on the same
//! state returns the same verdict and changes nothing. Callers decide what
//! to do with a verdict; `NightSession` latches the first one it sees.
//!
//! # Key Types
//!
//! - [`Verdict`] - Winner, reason and a line for the moderator
//! - [`WinReason`] - Which rule ended the game
//! - [`Checkpoint`] - When the check runs; some rules only apply at dusk

use serde::{Deserialize, Serialize};

use crate::context::SessionContext;
use crate::core::{Alignment, Board, RoleType, Seat, SeatId};
use crate::info::ability_disabled;
use crate::roles::RoleRegistry;

/// Why the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinReason {
    EvilTwinExecuted,
    SaintExecuted,
    KlutzChoseEvil,
    DemonDead,
    TwoPlayersLeft,
    VortoxNoExecution,
    MayorQuorum,
    /// The Mastermind's extra day ended.
    Mastermind,
}

/// A finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub winner: Alignment,
    pub reason: WinReason,
    pub text: String,
}

impl Verdict {
    #[must_use]
    pub fn new(winner: Alignment, reason: WinReason, text: impl Into<String>) -> Self {
        Self {
            winner,
            reason,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = match self.winner {
            Alignment::Good => "Good",
            Alignment::Evil => "Evil",
        };
        write!(f, "{side} wins: {}", self.text)
    }
}

/// When a check runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Checkpoint {
    /// After any death outside an execution.
    AfterDeath,
    AfterExecution,
    /// Dusk. Stalemate rules (Vortox, Mayor) only apply here.
    EndOfDay,
}

/// Stateless win checker.
pub struct WinEvaluator;

impl WinEvaluator {
    /// Check every win condition, in precedence order.
    ///
    /// ## Example
    ///
    /// ```
    /// use clocktower_engine::context::SessionContext;
    /// use clocktower_engine::core::{Alignment, RoleId, Seat, SeatId};
    /// use clocktower_engine::roles::RoleRegistry;
    /// use clocktower_engine::victory::{Checkpoint, WinEvaluator, WinReason};
    ///
    /// let registry = RoleRegistry::standard();
    /// let session = SessionContext::default();
    /// let seats = vec![
    ///     Seat::new(SeatId::new(0)).with_role(RoleId::new("imp")).dead(),
    ///     Seat::new(SeatId::new(1)).with_role(RoleId::new("chef")),
    ///     Seat::new(SeatId::new(2)).with_role(RoleId::new("empath")),
    /// ];
    ///
    /// let verdict = WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterDeath).unwrap();
    /// assert_eq!(verdict.winner, Alignment::Good);
    /// assert_eq!(verdict.reason, WinReason::DemonDead);
    /// ```
    #[must_use]
    pub fn check(
        seats: &[Seat],
        session: &SessionContext,
        registry: &RoleRegistry,
        checkpoint: Checkpoint,
    ) -> Option<Verdict> {
        let verdict = Self::evaluate(seats, session, registry, checkpoint);
        if let Some(v) = &verdict {
            tracing::info!(winner = %v.winner, reason = ?v.reason, "game over");
        }
        verdict
    }

    fn evaluate(
        seats: &[Seat],
        session: &SessionContext,
        registry: &RoleRegistry,
        checkpoint: Checkpoint,
    ) -> Option<Verdict> {
        let executed = session.day.executed.and_then(|id| seats.seat(id));

        if let Some(seat) = executed {
            if evil_twin_of(seats, registry, seat).is_some() {
                return Some(Verdict::new(
                    Alignment::Evil,
                    WinReason::EvilTwinExecuted,
                    format!("the good twin ({}) was executed", seat.id),
                ));
            }
            if seat.has_role("saint") && seat.is_dead && !ability_disabled(seat) {
                return Some(Verdict::new(
                    Alignment::Evil,
                    WinReason::SaintExecuted,
                    format!("the Saint ({}) was executed", seat.id),
                ));
            }
        }

        if session.klutz_chose_evil {
            return Some(Verdict::new(
                Alignment::Evil,
                WinReason::KlutzChoseEvil,
                "the Klutz chose an evil player",
            ));
        }

        let demon_alive = seats.iter().any(|s| s.is_alive() && registry.is_demon(s));
        if !demon_alive {
            if scarlet_heir(seats, registry).is_some() || twins_alive(seats, registry) {
                return None;
            }
            if let Some(day) = session.mastermind_day {
                return mastermind(session, registry, executed, day, checkpoint);
            }
            return Some(Verdict::new(Alignment::Good, WinReason::DemonDead, "the Demon is dead"));
        }

        let living = living_players(seats, registry);
        if living <= 2 {
            return Some(Verdict::new(
                Alignment::Evil,
                WinReason::TwoPlayersLeft,
                format!("only {living} players are alive"),
            ));
        }

        if checkpoint == Checkpoint::EndOfDay && !session.day.execution_happened {
            let vortox = seats.with_role("vortox").any(|s| s.is_alive());
            if vortox {
                return Some(Verdict::new(
                    Alignment::Evil,
                    WinReason::VortoxNoExecution,
                    "there was no execution while the Vortox lives",
                ));
            }
            let mayor = seats
                .with_role("mayor")
                .any(|s| s.is_alive() && !ability_disabled(s));
            if living == 3 && mayor {
                return Some(Verdict::new(
                    Alignment::Good,
                    WinReason::MayorQuorum,
                    "three players remain and the Mayor's town chose not to execute",
                ));
            }
        }

        None
    }
}

/// The Mastermind's extra day: an execution makes the executed player's
/// team lose; no execution by dusk hands the game to evil. Once that day
/// has gone by unresolved, the Demon's death stands and good wins.
fn mastermind(
    session: &SessionContext,
    registry: &RoleRegistry,
    executed: Option<&Seat>,
    day: u32,
    checkpoint: Checkpoint,
) -> Option<Verdict> {
    if session.day_number < day {
        return None;
    }
    if session.day_number > day {
        return Some(Verdict::new(
            Alignment::Good,
            WinReason::DemonDead,
            "the Demon is dead and the Mastermind's day has passed",
        ));
    }
    match executed {
        Some(seat) if session.day.execution_happened => {
            let loser = registry.alignment_of(seat);
            Some(Verdict::new(
                loser.opposite(),
                WinReason::Mastermind,
                format!("{} was executed on the Mastermind's day", seat.id),
            ))
        }
        _ if checkpoint == Checkpoint::EndOfDay => Some(Verdict::new(
            Alignment::Evil,
            WinReason::Mastermind,
            "nobody was executed on the Mastermind's day",
        )),
        _ => None,
    }
}

/// The working Evil Twin whose good twin is `seat`.
fn evil_twin_of<'a>(seats: &'a [Seat], registry: &RoleRegistry, seat: &Seat) -> Option<&'a Seat> {
    if registry.alignment_of(seat).is_evil() {
        return None;
    }
    seats
        .with_role("evil_twin")
        .find(|t| t.twin == Some(seat.id) && t.is_alive() && !ability_disabled(t))
}

/// An Evil Twin and its good twin both alive.
fn twins_alive(seats: &[Seat], registry: &RoleRegistry) -> bool {
    seats.with_role("evil_twin").any(|t| {
        t.is_alive()
            && registry.alignment_of(t).is_evil()
            && t.twin
                .and_then(|id| seats.seat(id))
                .is_some_and(|twin| twin.is_alive())
    })
}

/// Living players, travelers excluded. A Zombuul feigning death counts.
#[must_use]
pub fn living_players(seats: &[Seat], registry: &RoleRegistry) -> usize {
    seats
        .iter()
        .filter(|s| s.is_alive() && registry.type_of(s) != Some(RoleType::Traveler))
        .count()
}

/// The Scarlet Woman who takes over a dead demon: alive, healthy, and
/// with five or more players alive counting the demon.
#[must_use]
pub fn scarlet_heir(seats: &[Seat], registry: &RoleRegistry) -> Option<SeatId> {
    if living_players(seats, registry) + 1 < 5 {
        return None;
    }
    seats
        .with_role("scarlet_woman")
        .find(|s| s.is_alive() && !ability_disabled(s) && !registry.is_demon(s))
        .map(|s| s.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RoleId, StatusEffect, StatusKind};

    fn board(roles: &[&'static str]) -> Vec<Seat> {
        roles
            .iter()
            .enumerate()
            .map(|(i, r)| Seat::new(SeatId::new(i as u8)).with_role(RoleId::new(r)))
            .collect()
    }

    fn day() -> SessionContext {
        let mut session = SessionContext::default();
        session.begin_day();
        session
    }

    fn executed(session: &mut SessionContext, seat: u8) {
        session.day.execution_happened = true;
        session.day.executed = Some(SeatId::new(seat));
    }

    #[test]
    fn test_saint_execution_evil_wins() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let mut seats = board(&["saint", "imp", "chef", "empath", "monk"]);
        seats[0].is_dead = true;
        executed(&mut session, 0);
        let v = WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterExecution).unwrap();
        assert_eq!(v.reason, WinReason::SaintExecuted);
        assert_eq!(v.winner, Alignment::Evil);
    }

    #[test]
    fn test_poisoned_saint_execution_continues() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let mut seats = board(&["saint", "imp", "chef", "empath", "monk"]);
        seats[0].is_dead = true;
        seats[0].add_status(StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("poisoner")));
        executed(&mut session, 0);
        assert!(WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterExecution).is_none());
    }

    #[test]
    fn test_good_twin_executed() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let mut seats = board(&["evil_twin", "chef", "imp", "empath", "monk"]);
        seats[0].twin = Some(SeatId::new(1));
        seats[1].twin = Some(SeatId::new(0));
        seats[1].is_dead = true;
        executed(&mut session, 1);
        let v = WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterExecution).unwrap();
        assert_eq!(v.reason, WinReason::EvilTwinExecuted);
    }

    #[test]
    fn test_twins_alive_block_good_win() {
        let registry = RoleRegistry::standard();
        let session = day();
        let mut seats = board(&["evil_twin", "chef", "imp", "empath", "monk"]);
        seats[0].twin = Some(SeatId::new(1));
        seats[1].twin = Some(SeatId::new(0));
        seats[2].is_dead = true;
        assert!(WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterExecution).is_none());
    }

    #[test]
    fn test_feigning_zombuul_counts_as_alive() {
        let registry = RoleRegistry::standard();
        let session = day();
        let mut seats = board(&["zombuul", "chef", "empath", "monk"]);
        seats[0].feigning_death = true;
        assert!(WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterDeath).is_none());
    }

    #[test]
    fn test_two_left_evil_wins() {
        let registry = RoleRegistry::standard();
        let session = day();
        let mut seats = board(&["imp", "chef", "empath", "gunslinger"]);
        seats[2].is_dead = true;
        let v = WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterDeath).unwrap();
        assert_eq!(v.reason, WinReason::TwoPlayersLeft);
    }

    #[test]
    fn test_vortox_without_execution_only_at_dusk() {
        let registry = RoleRegistry::standard();
        let session = day();
        let seats = board(&["vortox", "chef", "empath", "monk", "clockmaker"]);
        assert!(WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterDeath).is_none());
        let v = WinEvaluator::check(&seats, &session, &registry, Checkpoint::EndOfDay).unwrap();
        assert_eq!(v.reason, WinReason::VortoxNoExecution);
    }

    #[test]
    fn test_mayor_quorum() {
        let registry = RoleRegistry::standard();
        let session = day();
        let mut seats = board(&["mayor", "imp", "chef", "empath"]);
        seats[3].is_dead = true;
        let v = WinEvaluator::check(&seats, &session, &registry, Checkpoint::EndOfDay).unwrap();
        assert_eq!(v.reason, WinReason::MayorQuorum);
        assert_eq!(v.winner, Alignment::Good);
    }

    #[test]
    fn test_mastermind_extra_day() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let mut seats = board(&["imp", "mastermind", "chef", "empath", "monk"]);
        seats[0].is_dead = true;
        session.mastermind_day = Some(2);
        assert!(WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterExecution).is_none());

        session.begin_day();
        seats[2].is_dead = true;
        executed(&mut session, 2);
        let v = WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterExecution).unwrap();
        assert_eq!(v.reason, WinReason::Mastermind);
        assert_eq!(v.winner, Alignment::Evil);
    }

    #[test]
    fn test_mastermind_day_passed() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let mut seats = board(&["imp", "mastermind", "chef", "empath", "monk"]);
        seats[0].is_dead = true;
        session.mastermind_day = Some(2);
        session.begin_night();
        session.begin_day();
        session.begin_night();
        session.begin_day();
        assert_eq!(session.day_number, 3);
        let v = WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterDeath).unwrap();
        assert_eq!(v.reason, WinReason::DemonDead);
        assert_eq!(v.winner, Alignment::Good);
    }

    #[test]
    fn test_scarlet_heir_threshold() {
        let registry = RoleRegistry::standard();
        let mut seats = board(&["imp", "scarlet_woman", "chef", "empath", "monk"]);
        seats[0].is_dead = true;
        assert_eq!(scarlet_heir(&seats, &registry), Some(SeatId::new(1)));
        seats[4].is_dead = true;
        assert_eq!(scarlet_heir(&seats, &registry), None);
    }

    #[test]
    fn test_check_is_idempotent() {
        let registry = RoleRegistry::standard();
        let session = day();
        let mut seats = board(&["imp", "chef", "empath"]);
        seats[0].is_dead = true;
        let before = seats.clone();
        let first = WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterDeath);
        let second = WinEvaluator::check(&seats, &session, &registry, Checkpoint::AfterDeath);
        assert_eq!(first, second);
        assert_eq!(seats, before);
    }
}
