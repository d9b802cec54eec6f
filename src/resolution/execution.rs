//! Day executions.

use crate::context::SessionContext;
use crate::core::{Board, Capability, LogEntry, Seat, SeatChange, SeatDelta, SeatId, StatusKind};
use crate::error::{EngineError, EngineResult};
use crate::info::ability_disabled;
use crate::roles::RoleRegistry;
use crate::victory::{scarlet_heir, Checkpoint, WinEvaluator};

use super::kill::{after_death, tea_lady_shields};
use super::outcome::{staged, ActionOutcome, Turn};

/// Execute a seat.
///
/// The execution is recorded in the day ledger whether or not the seat
/// dies. A Zombuul's first execution is a fake death: the seat stays alive
/// and wakes again tonight.
///
/// ## Example
///
/// ```
/// use clocktower_engine::context::SessionContext;
/// use clocktower_engine::core::{RoleId, Seat, SeatId};
/// use clocktower_engine::resolution::execute;
/// use clocktower_engine::roles::RoleRegistry;
///
/// let registry = RoleRegistry::standard();
/// let mut session = SessionContext::default();
/// session.begin_day();
/// let seats = vec![
///     Seat::new(SeatId::new(0)).with_role(RoleId::new("imp")),
///     Seat::new(SeatId::new(1)).with_role(RoleId::new("chef")),
///     Seat::new(SeatId::new(2)).with_role(RoleId::new("empath")),
/// ];
///
/// let outcome = execute(&seats, SeatId::new(0), &mut session, &registry).unwrap();
/// assert!(outcome.updated_seats[0].is_dead);
/// assert!(outcome.verdict.is_some());
/// ```
pub fn execute(
    seats: &[Seat],
    target: SeatId,
    session: &mut SessionContext,
    registry: &RoleRegistry,
) -> EngineResult<ActionOutcome> {
    let seat = seats.seat(target).cloned().ok_or(EngineError::UnknownSeat(target))?;
    staged(session, |session| {
        let mut turn = Turn::new(seats);
        put_to_death(&mut turn, session, registry, &seat)?;
        Ok(finish(turn, session, registry))
    })
}

/// Record an execution of `seat` and resolve its death on `turn`.
pub(super) fn put_to_death(
    turn: &mut Turn,
    session: &mut SessionContext,
    registry: &RoleRegistry,
    seat: &Seat,
) -> EngineResult<()> {
    let target = seat.id;
    let label = registry.seat_label(seat);
    session.day.execution_happened = true;
    session.day.executed = Some(target);
    turn.note(LogEntry::public(format!("{target} is executed")));

    if seat.is_dead {
        turn.note(LogEntry::private(format!("{label} was already dead")));
        return Ok(());
    }

    if let Some(reason) = immunity(&turn.seats, registry, seat) {
        if seat.has_role("fool") {
            turn.apply(SeatDelta::single(target, SeatChange::Consume(Capability::FoolReprieve)))?;
        }
        turn.note(LogEntry::public(format!("{target} does not die")));
        turn.note(LogEntry::private(format!("{label} survives the execution: {reason}")));
        return Ok(());
    }

    if seat.has_role("zombuul") && seat.capabilities.has(Capability::FakeDeath) && !ability_disabled(seat) {
        turn.apply(
            SeatDelta::new(target)
                .with(SeatChange::FeignDeath)
                .with(SeatChange::Consume(Capability::FakeDeath)),
        )?;
        session.record_death(target);
        turn.note(LogEntry::public(format!("{target} dies")));
        turn.note(LogEntry::private(format!("{label} feigns death and wakes tonight")));
        tracing::info!(seat = %target, "zombuul survives execution");
        return Ok(());
    }

    turn.apply(SeatDelta::new(target).with(SeatChange::Die).with(SeatChange::Unprotect))?;
    session.record_death(target);
    turn.note(LogEntry::public(format!("{target} dies")));
    tracing::info!(seat = %target, "executed");

    if registry.is_demon(seat) && scarlet_heir(&turn.seats, registry).is_none() {
        let mastermind = turn
            .seats
            .with_role("mastermind")
            .any(|s| s.is_alive() && !ability_disabled(s));
        if mastermind && session.mastermind_day.is_none() {
            session.mastermind_day = Some(session.day_number + 1);
            turn.note(LogEntry::private("the Mastermind plays one more day"));
        }
    }

    after_death(turn, session, registry, seat, None)
}

pub(super) fn finish(turn: Turn, session: &SessionContext, registry: &RoleRegistry) -> ActionOutcome {
    let verdict = WinEvaluator::check(&turn.seats, session, registry, Checkpoint::AfterExecution);
    turn.finish(verdict)
}

/// Why an execution fails to kill.
fn immunity(seats: &[Seat], registry: &RoleRegistry, seat: &Seat) -> Option<&'static str> {
    if seat.has_status(StatusKind::ExecutionImmune) {
        return Some("protected by the Devil's Advocate");
    }
    if tea_lady_shields(seats, registry, seat) {
        return Some("protected by the Tea Lady");
    }
    if ability_disabled(seat) {
        return None;
    }
    if seat.has_role("sailor") {
        return Some("the Sailor cannot die");
    }
    if seat.has_role("fool") && seat.capabilities.has(Capability::FoolReprieve) {
        return Some("the Fool's first death");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Duration, RoleId, StatusEffect};
    use crate::victory::WinReason;

    fn board(roles: &[&'static str]) -> Vec<Seat> {
        roles
            .iter()
            .enumerate()
            .map(|(i, r)| Seat::new(SeatId::new(i as u8)).with_role(RoleId::new(r)))
            .collect()
    }

    fn day() -> SessionContext {
        let mut session = SessionContext::default();
        session.begin_night();
        session.begin_day();
        session
    }

    #[test]
    fn test_execution_recorded_even_when_survived() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let mut seats = board(&["chef", "imp", "empath", "monk"]);
        seats[0].add_status(
            StatusEffect::from_role(StatusKind::ExecutionImmune, RoleId::new("devils_advocate"))
                .lasting(Duration::UntilNextDusk),
        );
        let out = execute(&seats, SeatId::new(0), &mut session, &registry).unwrap();
        assert!(!out.updated_seats[0].is_dead);
        assert!(session.day.execution_happened);
        assert_eq!(session.day.executed, Some(SeatId::new(0)));
        assert!(out.logged("Devil's Advocate"));
    }

    #[test]
    fn test_saint_execution_ends_game() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let seats = board(&["saint", "imp", "empath", "monk", "chef"]);
        let out = execute(&seats, SeatId::new(0), &mut session, &registry).unwrap();
        assert_eq!(out.verdict.unwrap().reason, WinReason::SaintExecuted);
    }

    #[test]
    fn test_fool_survives_first_execution() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let mut seats = board(&["fool", "imp", "empath", "monk"]);
        seats[0].capabilities.grant(Capability::FoolReprieve);
        let out = execute(&seats, SeatId::new(0), &mut session, &registry).unwrap();
        assert!(!out.updated_seats[0].is_dead);
        let again = execute(&out.updated_seats, SeatId::new(0), &mut session, &registry).unwrap();
        assert!(again.updated_seats[0].is_dead);
    }

    #[test]
    fn test_zombuul_feigns_first_execution() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let mut seats = board(&["zombuul", "chef", "empath", "monk"]);
        seats[0].capabilities.grant(Capability::FakeDeath);
        let out = execute(&seats, SeatId::new(0), &mut session, &registry).unwrap();
        let zombuul = &out.updated_seats[0];
        assert!(!zombuul.is_dead);
        assert!(zombuul.feigning_death);
        assert!(zombuul.capabilities.is_spent(Capability::FakeDeath));
        assert!(out.verdict.is_none());
    }

    #[test]
    fn test_poisoned_zombuul_execution_is_real() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let mut seats = board(&["zombuul", "chef", "empath", "monk"]);
        seats[0].capabilities.grant(Capability::FakeDeath);
        seats[0].add_status(StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("poisoner")));
        let out = execute(&seats, SeatId::new(0), &mut session, &registry).unwrap();
        assert!(out.updated_seats[0].is_dead);
        assert!(!out.updated_seats[0].feigning_death);
        assert_eq!(out.verdict.unwrap().reason, WinReason::DemonDead);
    }

    #[test]
    fn test_demon_execution_hands_over_to_scarlet_woman() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let seats = board(&["imp", "scarlet_woman", "chef", "empath", "monk", "saint"]);
        let out = execute(&seats, SeatId::new(0), &mut session, &registry).unwrap();
        assert!(out.updated_seats[1].has_role("imp"));
        assert!(out.verdict.is_none());
    }

    #[test]
    fn test_mastermind_delays_good_win() {
        let registry = RoleRegistry::standard();
        let mut session = day();
        let seats = board(&["imp", "mastermind", "chef", "empath"]);
        let out = execute(&seats, SeatId::new(0), &mut session, &registry).unwrap();
        assert_eq!(session.mastermind_day, Some(2));
        assert!(out.verdict.is_none());
    }
}
