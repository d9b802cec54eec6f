//! Day abilities: the Slayer's shot and nominations.

use crate::context::SessionContext;
use crate::core::{
    Board, Capability, LogEntry, RoleId, RoleType, Seat, SeatChange, SeatDelta, SeatId, StatusKind,
    StatusOrigin,
};
use crate::error::{EngineError, EngineResult};
use crate::info::{ability_disabled, registration};
use crate::roles::{KillRequest, RoleRegistry};
use crate::victory::{Checkpoint, WinEvaluator};

use super::execution::{finish, put_to_death};
use super::kill;
use super::outcome::{staged, ActionOutcome, Turn};

/// Alive players needed for the Witch's curse to work.
const CURSE_MIN_ALIVE: usize = 4;

/// `shooter` publicly claims Slayer and shoots `target`.
///
/// Anyone may claim; only a sober, living Slayer with an unspent shot can
/// kill, and only a target that registers as the Demon to the Slayer dies.
/// The shot is spent whether or not it works.
///
/// ## Example
///
/// ```
/// use clocktower_engine::context::SessionContext;
/// use clocktower_engine::core::{Capability, RoleId, Seat, SeatId};
/// use clocktower_engine::resolution::slayer_shot;
/// use clocktower_engine::roles::RoleRegistry;
///
/// let registry = RoleRegistry::standard();
/// let mut session = SessionContext::default();
/// session.begin_day();
/// let seats = vec![
///     Seat::new(SeatId::new(0)).with_role(RoleId::new("slayer")).with_capability(Capability::SlayerShot),
///     Seat::new(SeatId::new(1)).with_role(RoleId::new("imp")),
///     Seat::new(SeatId::new(2)).with_role(RoleId::new("chef")),
/// ];
///
/// let outcome = slayer_shot(&seats, SeatId::new(0), SeatId::new(1), &mut session, &registry).unwrap();
/// assert!(outcome.updated_seats[1].is_dead);
/// assert!(outcome.updated_seats[0].capabilities.is_spent(Capability::SlayerShot));
/// ```
pub fn slayer_shot(
    seats: &[Seat],
    shooter: SeatId,
    target: SeatId,
    session: &mut SessionContext,
    registry: &RoleRegistry,
) -> EngineResult<ActionOutcome> {
    let slayer = seats.seat(shooter).cloned().ok_or(EngineError::UnknownSeat(shooter))?;
    let aim = seats.seat(target).cloned().ok_or(EngineError::UnknownSeat(target))?;
    let observer = RoleId::new("slayer");

    staged(session, |session| {
        let mut turn = Turn::new(seats);
        turn.note(LogEntry::public(format!("{shooter} shoots {target}")));

        let loaded = slayer.capabilities.has(Capability::SlayerShot);
        if loaded {
            turn.apply(SeatDelta::single(shooter, SeatChange::Consume(Capability::SlayerShot)))?;
        }

        let genuine = loaded && slayer.has_role("slayer") && slayer.is_alive();
        if !genuine {
            turn.note(LogEntry::public("nothing happens"));
        } else if ability_disabled(&slayer) {
            turn.note(LogEntry::public("nothing happens"));
            turn.note(LogEntry::private(format!(
                "{} is poisoned or drunk: the shot has no effect",
                registry.seat_label(&slayer)
            )));
        } else if aim.is_dead {
            turn.note(LogEntry::public("nothing happens"));
            turn.note(LogEntry::private(format!("{} is already dead", registry.seat_label(&aim))));
        } else if registration(&turn.seats, &aim, Some(&observer), session, registry).registers_as_demon {
            let request = KillRequest::ability(target, shooter, observer.clone());
            let result = kill::attempt(&mut turn, session, registry, &request)?;
            tracing::info!(seat = %target, outcome = ?result, "slayer shot");
        } else {
            turn.note(LogEntry::public("nothing happens"));
        }

        session.refresh_world(&turn.seats);
        let verdict = WinEvaluator::check(&turn.seats, session, registry, Checkpoint::AfterDeath);
        Ok(turn.finish(verdict))
    })
}

/// `nominator` nominates `nominee`.
///
/// Dead players cannot nominate, and each player nominates and is
/// nominated at most once a day. A cursed nominator dies instead when more
/// than three players are alive. The Virgin's first nomination executes a
/// nominator who registers as a Townsfolk to her; her token is spent on
/// that first nomination even when nothing happens.
pub fn nominate(
    seats: &[Seat],
    nominator: SeatId,
    nominee: SeatId,
    session: &mut SessionContext,
    registry: &RoleRegistry,
) -> EngineResult<ActionOutcome> {
    let accuser = seats.seat(nominator).cloned().ok_or(EngineError::UnknownSeat(nominator))?;
    let accused = seats.seat(nominee).cloned().ok_or(EngineError::UnknownSeat(nominee))?;

    let refuse = |reason: &str| EngineError::NominationRefused {
        seat: nominator,
        reason: reason.to_string(),
    };
    if accuser.is_dead {
        return Err(refuse("the dead cannot nominate"));
    }
    if session.day.nominations.iter().any(|(by, _)| *by == nominator) {
        return Err(refuse("they have already nominated today"));
    }
    if session.day.nominations.iter().any(|(_, of)| *of == nominee) {
        return Err(refuse(&format!("{nominee} has already been nominated today")));
    }

    staged(session, |session| {
        let mut turn = Turn::new(seats);
        session.day.record_nomination(nominator, nominee);
        turn.note(LogEntry::public(format!("{nominator} nominates {nominee}")));
        tracing::debug!(%nominator, %nominee, "nomination");

        if let Some(witch) = live_curse(&turn.seats, &accuser) {
            cursed_death(&mut turn, session, registry, &accuser, witch)?;
            session.refresh_world(&turn.seats);
            let verdict = WinEvaluator::check(&turn.seats, session, registry, Checkpoint::AfterDeath);
            return Ok(turn.finish(verdict));
        }

        if !accused.capabilities.has(Capability::VirginNomination) {
            return Ok(turn.finish(None));
        }
        turn.apply(SeatDelta::single(nominee, SeatChange::Consume(Capability::VirginNomination)))?;

        let observer = RoleId::new("virgin");
        let works = accused.has_role("virgin") && accused.is_alive() && !ability_disabled(&accused);
        let townsfolk = works
            && registration(&turn.seats, &accuser, Some(&observer), session, registry).role_type
                == Some(RoleType::Townsfolk);
        if !townsfolk {
            if works {
                turn.note(LogEntry::private(format!(
                    "{} does not register as a Townsfolk to the Virgin",
                    registry.seat_label(&accuser)
                )));
            } else if accused.has_role("virgin") && accused.is_alive() {
                turn.note(LogEntry::private(format!(
                    "{} is poisoned or drunk: the Virgin's ability has no effect",
                    registry.seat_label(&accused)
                )));
            }
            return Ok(turn.finish(None));
        }

        turn.note(LogEntry::public(format!("{nominator} nominated the Virgin")));
        tracing::info!(seat = %nominator, "virgin executes nominator");
        put_to_death(&mut turn, session, registry, &accuser)?;
        Ok(finish(turn, session, registry))
    })
}

/// The Witch behind a curse on `seat` that still bites.
fn live_curse(seats: &[Seat], seat: &Seat) -> Option<Option<SeatId>> {
    let curse = seat.statuses.iter().find(|s| s.kind == StatusKind::Cursed)?;
    if seats.alive().count() < CURSE_MIN_ALIVE {
        return None;
    }
    match curse.source.and_then(|id| seats.seat(id)) {
        Some(witch) if ability_disabled(witch) => None,
        _ => Some(curse.source),
    }
}

fn cursed_death(
    turn: &mut Turn,
    session: &mut SessionContext,
    registry: &RoleRegistry,
    seat: &Seat,
    witch: Option<SeatId>,
) -> EngineResult<()> {
    turn.apply(SeatDelta::single(
        seat.id,
        SeatChange::RemoveStatuses {
            kind: Some(StatusKind::Cursed),
            origin: StatusOrigin::Role(RoleId::new("witch")),
            source: None,
        },
    ))?;
    turn.note(LogEntry::private(format!("{} was cursed by the Witch", registry.seat_label(seat))));
    let request = match witch {
        Some(witch) => KillRequest::ability(seat.id, witch, RoleId::new("witch")),
        None => KillRequest::storyteller(seat.id),
    };
    let result = kill::attempt(turn, session, registry, &request)?;
    tracing::info!(seat = %seat.id, outcome = ?result, "witch curse");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DisguiseMode, Duration, Script, SessionConfig, StatusEffect};
    use crate::victory::WinReason;

    fn board(roles: &[&'static str]) -> Vec<Seat> {
        roles
            .iter()
            .enumerate()
            .map(|(i, r)| Seat::new(SeatId::new(i as u8)).with_role(RoleId::new(r)))
            .collect()
    }

    fn day(config: SessionConfig) -> SessionContext {
        let mut session = SessionContext::new(config);
        session.begin_night();
        session.begin_day();
        session
    }

    fn plain_day() -> SessionContext {
        day(SessionConfig::new(Script::TroubleBrewing).with_disguise(DisguiseMode::Off, 0.0))
    }

    fn slayer_board(roles: &[&'static str]) -> Vec<Seat> {
        let mut seats = board(roles);
        seats[0].capabilities.grant(Capability::SlayerShot);
        seats
    }

    #[test]
    fn test_slayer_kills_demon() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let seats = slayer_board(&["slayer", "imp", "chef", "empath"]);
        let out = slayer_shot(&seats, SeatId::new(0), SeatId::new(1), &mut session, &registry).unwrap();
        assert!(out.updated_seats[1].is_dead);
        assert!(out.updated_seats[0].capabilities.is_spent(Capability::SlayerShot));
        assert_eq!(out.verdict.unwrap().reason, WinReason::DemonDead);
        assert_eq!(session.day.deaths, vec![SeatId::new(1)]);
    }

    #[test]
    fn test_poisoned_slayer_spends_shot() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let mut seats = slayer_board(&["slayer", "imp", "chef", "empath"]);
        seats[0].add_status(StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("poisoner")));
        let out = slayer_shot(&seats, SeatId::new(0), SeatId::new(1), &mut session, &registry).unwrap();
        assert!(!out.updated_seats[1].is_dead);
        assert!(out.updated_seats[0].capabilities.is_spent(Capability::SlayerShot));
        assert!(out.logged("nothing happens"));
        assert!(out.verdict.is_none());

        let again = slayer_shot(&out.updated_seats, SeatId::new(0), SeatId::new(1), &mut session, &registry).unwrap();
        assert!(!again.updated_seats[1].is_dead);
    }

    #[test]
    fn test_slayer_misses_non_demon() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let seats = slayer_board(&["slayer", "imp", "recluse", "chef"]);
        let out = slayer_shot(&seats, SeatId::new(0), SeatId::new(2), &mut session, &registry).unwrap();
        assert!(!out.updated_seats[2].is_dead);
        assert!(out.logged("nothing happens"));
    }

    #[test]
    fn test_slayer_follows_recluse_registration() {
        let registry = RoleRegistry::standard();
        let mut session = day(SessionConfig::new(Script::TroubleBrewing).with_disguise(DisguiseMode::Forced, 1.0));
        let seats = slayer_board(&["slayer", "imp", "recluse", "chef", "empath"]);
        let seen = registration(&seats, &seats[2], Some(&RoleId::new("slayer")), &mut session, &registry);
        let out = slayer_shot(&seats, SeatId::new(0), SeatId::new(2), &mut session, &registry).unwrap();
        assert_eq!(out.updated_seats[2].is_dead, seen.registers_as_demon);
    }

    #[test]
    fn test_false_claim_does_nothing() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let seats = board(&["chef", "imp", "empath"]);
        let out = slayer_shot(&seats, SeatId::new(0), SeatId::new(1), &mut session, &registry).unwrap();
        assert!(!out.updated_seats[1].is_dead);
        assert!(out.deltas.is_empty());
    }

    fn virgin_board(roles: &[&'static str]) -> Vec<Seat> {
        let mut seats = board(roles);
        seats[0].capabilities.grant(Capability::VirginNomination);
        seats
    }

    #[test]
    fn test_virgin_executes_townsfolk() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let seats = virgin_board(&["virgin", "chef", "imp", "empath", "monk"]);
        let out = nominate(&seats, SeatId::new(1), SeatId::new(0), &mut session, &registry).unwrap();
        assert!(out.updated_seats[1].is_dead);
        assert!(out.updated_seats[0].capabilities.is_spent(Capability::VirginNomination));
        assert_eq!(session.day.executed, Some(SeatId::new(1)));
        assert_eq!(session.day.nominations, vec![(SeatId::new(1), SeatId::new(0))]);
        assert!(out.logged("nominated the Virgin"));
    }

    #[test]
    fn test_virgin_ignores_outsider_and_spends_token() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let seats = virgin_board(&["virgin", "butler", "imp", "chef", "monk"]);
        let out = nominate(&seats, SeatId::new(1), SeatId::new(0), &mut session, &registry).unwrap();
        assert!(!out.updated_seats[1].is_dead);
        assert!(out.updated_seats[0].capabilities.is_spent(Capability::VirginNomination));
        assert!(!session.day.execution_happened);
    }

    #[test]
    fn test_virgin_ignores_drunk() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let mut seats = virgin_board(&["virgin", "chef", "imp", "monk"]);
        seats.push(
            Seat::new(SeatId::new(4))
                .with_role(RoleId::new("drunk"))
                .with_displayed_role(RoleId::new("empath")),
        );
        let out = nominate(&seats, SeatId::new(4), SeatId::new(0), &mut session, &registry).unwrap();
        assert!(!out.updated_seats[4].is_dead);
    }

    #[test]
    fn test_virgin_fires_once() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let seats = virgin_board(&["virgin", "butler", "imp", "chef", "monk"]);
        let first = nominate(&seats, SeatId::new(1), SeatId::new(0), &mut session, &registry).unwrap();

        session.begin_night();
        session.begin_day();
        let second = nominate(&first.updated_seats, SeatId::new(3), SeatId::new(0), &mut session, &registry).unwrap();
        assert!(!second.updated_seats[3].is_dead);
    }

    #[test]
    fn test_poisoned_virgin_spends_token() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let mut seats = virgin_board(&["virgin", "chef", "imp", "monk"]);
        seats[0].add_status(StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("poisoner")));
        let out = nominate(&seats, SeatId::new(1), SeatId::new(0), &mut session, &registry).unwrap();
        assert!(!out.updated_seats[1].is_dead);
        assert!(out.updated_seats[0].capabilities.is_spent(Capability::VirginNomination));
    }

    #[test]
    fn test_nomination_limits() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let mut seats = board(&["chef", "imp", "empath", "monk"]);
        seats[3].is_dead = true;

        let err = nominate(&seats, SeatId::new(3), SeatId::new(1), &mut session, &registry).unwrap_err();
        assert!(matches!(err, EngineError::NominationRefused { .. }));

        nominate(&seats, SeatId::new(0), SeatId::new(1), &mut session, &registry).unwrap();
        let twice = nominate(&seats, SeatId::new(0), SeatId::new(2), &mut session, &registry).unwrap_err();
        assert!(matches!(twice, EngineError::NominationRefused { .. }));
        let again = nominate(&seats, SeatId::new(2), SeatId::new(1), &mut session, &registry).unwrap_err();
        assert!(matches!(again, EngineError::NominationRefused { .. }));
        assert_eq!(session.day.nominations.len(), 1);
    }

    #[test]
    fn test_cursed_nominator_dies() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let mut seats = board(&["witch", "imp", "chef", "empath", "monk"]);
        seats[2].add_status(
            StatusEffect::from_role(StatusKind::Cursed, RoleId::new("witch"))
                .with_source(SeatId::new(0))
                .lasting(Duration::UntilNextDusk),
        );
        let out = nominate(&seats, SeatId::new(2), SeatId::new(3), &mut session, &registry).unwrap();
        assert!(out.updated_seats[2].is_dead);
        assert!(!out.updated_seats[2].has_status(StatusKind::Cursed));
        assert_eq!(session.day.deaths, vec![SeatId::new(2)]);
    }

    #[test]
    fn test_curse_fails_with_three_alive() {
        let registry = RoleRegistry::standard();
        let mut session = plain_day();
        let mut seats = board(&["witch", "imp", "chef", "empath"]);
        seats[3].is_dead = true;
        seats[2].add_status(
            StatusEffect::from_role(StatusKind::Cursed, RoleId::new("witch")).with_source(SeatId::new(0)),
        );
        let out = nominate(&seats, SeatId::new(2), SeatId::new(1), &mut session, &registry).unwrap();
        assert!(!out.updated_seats[2].is_dead);
    }
}
