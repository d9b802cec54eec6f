//! The death pipeline.
//!
//! Every kill attempt runs the same checks in a fixed order:
//!
//! 1. already dead: nothing happens
//! 2. innate immunity (Soldier, Sailor, Fool)
//! 3. protection, if the protector is still healthy
//! 4. a moderator decision (Mayor redirect)
//! 5. death, then whatever the death sets off
//!
//! Assassin and moderator kills skip steps 2 to 4.

use serde::{Deserialize, Serialize};

use crate::context::SessionContext;
use crate::core::{
    Alignment, Board, Capability, Duration, LogEntry, RoleId, RoleType, Seat, SeatChange,
    SeatDelta, SeatId, StatusEffect, StatusKind, StatusOrigin,
};
use crate::error::{EngineError, EngineResult};
use crate::info::ability_disabled;
use crate::roles::{KillCause, KillRequest, RoleRegistry};
use crate::victory::scarlet_heir;

use super::housekeeping::no_dashii_deltas;
use super::outcome::Turn;
use super::prompt::{DeathChoiceKind, PendingPrompt};

/// How a kill attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KillOutcome {
    AlreadyDead,
    Immune,
    Protected,
    /// Waiting on the moderator.
    Suspended,
    /// Zombuul: publicly dead, still alive.
    FeignedDeath,
    /// Fang Gu: the target became the Demon and the killer died instead.
    Converted,
    Died,
}

/// Run one kill request against the working board.
pub(crate) fn attempt(
    turn: &mut Turn,
    session: &mut SessionContext,
    registry: &RoleRegistry,
    kill: &KillRequest,
) -> EngineResult<KillOutcome> {
    let target = turn
        .seats
        .seat(kill.target)
        .cloned()
        .ok_or(EngineError::UnknownSeat(kill.target))?;
    let label = registry.seat_label(&target);

    if target.is_dead {
        turn.note(LogEntry::private(format!("{label} is already dead")));
        return Ok(KillOutcome::AlreadyDead);
    }

    let bypass = kill.ignores_protection || kill.cause == KillCause::Storyteller;
    if !bypass {
        if let Some(reason) = immunity(&target, kill.cause) {
            if target.has_role("fool") {
                turn.apply(SeatDelta::single(target.id, SeatChange::Consume(Capability::FoolReprieve)))?;
            }
            turn.note(LogEntry::private(format!("{label} survives: blocked: {reason}")));
            return Ok(KillOutcome::Immune);
        }

        if let Some(reason) = protection(turn, session, registry, &target, kill.cause)? {
            turn.note(LogEntry::private(format!("{label} survives: blocked: {reason}")));
            return Ok(KillOutcome::Protected);
        }

        if target.has_role("mayor")
            && kill.cause == KillCause::Demon
            && !kill.redirected
            && !ability_disabled(&target)
        {
            turn.note(LogEntry::private(format!(
                "the Demon attacked {label}: another player might die instead"
            )));
            turn.ask(PendingPrompt::MayorRedirect { kill: kill.clone() });
            return Ok(KillOutcome::Suspended);
        }
    }

    die(turn, session, registry, &target, kill)
}

/// An innate reason the target cannot die to this cause.
fn immunity(target: &Seat, cause: KillCause) -> Option<&'static str> {
    if ability_disabled(target) {
        return None;
    }
    if target.has_role("soldier") && cause == KillCause::Demon {
        return Some("the Soldier is safe from the Demon");
    }
    if target.has_role("sailor") {
        return Some("the Sailor cannot die");
    }
    if target.has_role("fool") && target.capabilities.has(Capability::FoolReprieve) {
        return Some("the Fool's first death does not happen");
    }
    None
}

/// Check the target's protector, clearing a protection that no longer holds.
fn protection(
    turn: &mut Turn,
    session: &mut SessionContext,
    registry: &RoleRegistry,
    target: &Seat,
    cause: KillCause,
) -> EngineResult<Option<String>> {
    if let Some(by) = target.protected_by {
        match turn.seats.seat(by).cloned() {
            None => {
                turn.warn(format!("{} is protected by {by}, who is not on the board", target.id));
                turn.apply(SeatDelta::single(target.id, SeatChange::Unprotect))?;
            }
            Some(protector) if ability_disabled(&protector) => {
                session.tonight.record_failure(protector.id);
                turn.apply(SeatDelta::single(target.id, SeatChange::Unprotect))?;
                turn.note(LogEntry::private(format!(
                    "protection by {} is ineffective: the protector is compromised",
                    registry.seat_label(&protector)
                )));
            }
            Some(protector) => {
                let innkeeper = protector.effective_role().is_some_and(|r| r.is("innkeeper"));
                if innkeeper || cause == KillCause::Demon {
                    return Ok(Some(format!("protection by {}", registry.seat_label(&protector))));
                }
            }
        }
    }

    if tea_lady_shields(&turn.seats, registry, target) {
        return Ok(Some("protection by the Tea Lady".to_string()));
    }
    Ok(None)
}

/// A living, healthy, good Tea Lady keeps a good neighbour alive.
pub(crate) fn tea_lady_shields(seats: &[Seat], registry: &RoleRegistry, target: &Seat) -> bool {
    if registry.alignment_of(target).is_evil() {
        return false;
    }
    let (left, right) = seats.alive_neighbours(target.id);
    [left, right].into_iter().flatten().any(|n| {
        n.has_role("tea_lady") && !ability_disabled(n) && registry.alignment_of(n) == Alignment::Good
    })
}

fn die(
    turn: &mut Turn,
    session: &mut SessionContext,
    registry: &RoleRegistry,
    target: &Seat,
    kill: &KillRequest,
) -> EngineResult<KillOutcome> {
    let label = registry.seat_label(target);

    if kill.by_role("fang_gu") && registry.type_of(target) == Some(RoleType::Outsider) {
        let killer = kill.killer.and_then(|k| turn.seats.seat(k).cloned());
        if let Some(killer) = killer.filter(|k| k.capabilities.has(Capability::FangGuLeap) && !ability_disabled(k)) {
            return leap(turn, session, registry, target, &killer);
        }
    }

    if target.has_role("zombuul") && target.capabilities.has(Capability::FakeDeath) && !ability_disabled(target) {
        turn.apply(
            SeatDelta::new(target.id)
                .with(SeatChange::FeignDeath)
                .with(SeatChange::Consume(Capability::FakeDeath)),
        )?;
        session.record_death(target.id);
        turn.note(LogEntry::public(format!("{} died", target.id)));
        turn.note(LogEntry::private(format!("{label} registers as dead but lives on")));
        tracing::info!(seat = %target.id, "zombuul feigns death");
        return Ok(KillOutcome::FeignedDeath);
    }

    turn.apply(
        SeatDelta::new(target.id)
            .with(SeatChange::Die)
            .with(SeatChange::Unprotect),
    )?;
    session.record_death(target.id);
    if kill.cause == KillCause::Demon && !session.tonight.demon_kills.contains(&target.id) {
        session.tonight.demon_kills.push(target.id);
    }
    turn.note(LogEntry::public(format!("{} died", target.id)));
    tracing::info!(seat = %target.id, cause = ?kill.cause, "seat died");

    after_death(turn, session, registry, target, Some(kill))?;
    Ok(KillOutcome::Died)
}

/// Fang Gu kills an Outsider: the Outsider becomes the Fang Gu, evil, and
/// the old Fang Gu dies.
fn leap(
    turn: &mut Turn,
    session: &mut SessionContext,
    registry: &RoleRegistry,
    target: &Seat,
    killer: &Seat,
) -> EngineResult<KillOutcome> {
    turn.apply(
        SeatDelta::new(target.id)
            .with(SeatChange::SetRole(RoleId::new("fang_gu")))
            .with(SeatChange::SetDisplayedRole(None))
            .with(SeatChange::SetAlignment(Some(Alignment::Evil))),
    )?;
    turn.apply(
        SeatDelta::new(killer.id)
            .with(SeatChange::Consume(Capability::FangGuLeap))
            .with(SeatChange::Die),
    )?;
    session.record_death(killer.id);
    turn.note(LogEntry::public(format!("{} died", killer.id)));
    turn.note(LogEntry::private(format!(
        "{} becomes the evil Fang Gu; {} dies instead",
        registry.seat_label(target),
        registry.seat_label(killer)
    )));
    tracing::info!(seat = %target.id, old = %killer.id, "fang gu leap");

    after_death(turn, session, registry, killer, None)?;
    Ok(KillOutcome::Converted)
}

/// Everything a death sets off. `dead` is the seat as it was before dying.
pub(crate) fn after_death(
    turn: &mut Turn,
    session: &mut SessionContext,
    registry: &RoleRegistry,
    dead: &Seat,
    kill: Option<&KillRequest>,
) -> EngineResult<()> {
    release_sourced(turn, dead.id)?;

    if let Some(kill) = kill {
        if kill.by_role("vigormortis") && registry.type_of(dead) == Some(RoleType::Minion) {
            vigormortis(turn, registry, dead, kill.killer)?;
        }
        if kill.by_role("no_dashii") {
            let refresh = no_dashii_deltas(&turn.seats, registry);
            turn.apply_all(refresh)?;
        }
        if kill.by_role("imp") && kill.killer == Some(dead.id) {
            star_pass(turn, registry, dead)?;
        }
    }

    if session.phase.is_night() {
        let wakes_on_death = dead
            .effective_role()
            .and_then(|r| registry.get(r))
            .and_then(|d| d.action_for(session.is_first_night()))
            .is_some_and(|a| a.only_if_died_tonight);
        if wakes_on_death {
            turn.requeue(dead.id);
        }
    }

    if registry.is_demon(dead) {
        scarlet_woman(turn, registry, dead)?;
    }

    let choice = if dead.has_role("moonchild") {
        Some(DeathChoiceKind::Moonchild)
    } else if dead.has_role("sweetheart") {
        Some(DeathChoiceKind::Sweetheart)
    } else if dead.has_role("klutz") {
        Some(DeathChoiceKind::Klutz)
    } else {
        None
    };
    if let Some(kind) = choice.filter(|_| !ability_disabled(dead)) {
        turn.ask(PendingPrompt::DeathChoice { source: dead.id, kind });
    }

    session.refresh_world(&turn.seats);
    Ok(())
}

/// Poison that lasts while its source lives, and Poisoner poison, ends
/// with the source.
fn release_sourced(turn: &mut Turn, dead: SeatId) -> EngineResult<()> {
    let mut releases = Vec::new();
    for seat in &turn.seats {
        let mut slots: Vec<(StatusKind, StatusOrigin)> = seat
            .statuses
            .iter()
            .filter(|s| s.source == Some(dead))
            .filter(|s| s.duration == Duration::WhileSourceLives || s.from_role_id("poisoner"))
            .map(|s| (s.kind, s.origin.clone()))
            .collect();
        slots.dedup();
        if slots.is_empty() {
            continue;
        }
        let mut delta = SeatDelta::new(seat.id);
        for (kind, origin) in slots {
            delta = delta.with(SeatChange::RemoveStatuses {
                kind: Some(kind),
                origin,
                source: Some(dead),
            });
        }
        releases.push(delta);
    }
    turn.apply_all(releases)
}

/// A Minion killed by the Vigormortis keeps their ability and poisons a
/// Townsfolk neighbour.
fn vigormortis(turn: &mut Turn, registry: &RoleRegistry, dead: &Seat, killer: Option<SeatId>) -> EngineResult<()> {
    turn.apply(SeatDelta::single(dead.id, SeatChange::KeepAbilityWhenDead(true)))?;
    let (left, right) = turn.seats.adjacent(dead.id);
    let victim = [left, right]
        .into_iter()
        .flatten()
        .find(|s| registry.type_of(s) == Some(RoleType::Townsfolk))
        .map(|s| s.id);
    let Some(victim) = victim else {
        return Ok(());
    };
    let mut poison = StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("vigormortis")).lasting(Duration::Permanent);
    if let Some(killer) = killer {
        poison = poison.with_source(killer);
    }
    turn.apply(SeatDelta::single(victim, SeatChange::AddStatus(poison)))?;
    turn.note(LogEntry::private(format!(
        "{} keeps their ability; {victim} is poisoned",
        registry.seat_label(dead)
    )));
    Ok(())
}

/// The Imp killed itself: a living Minion becomes the Imp.
fn star_pass(turn: &mut Turn, registry: &RoleRegistry, old: &Seat) -> EngineResult<()> {
    let role = old.role.clone().unwrap_or_else(|| RoleId::new("imp"));
    if let Some(heir) = scarlet_heir(&turn.seats, registry) {
        return become_demon(turn, registry, heir, role);
    }
    let candidates: Vec<SeatId> = turn
        .seats
        .iter()
        .filter(|s| s.is_alive() && registry.type_of(s) == Some(RoleType::Minion))
        .map(|s| s.id)
        .collect();
    match candidates.as_slice() {
        [] => {
            turn.note(LogEntry::private("no living Minion can catch the star pass"));
            Ok(())
        }
        [only] => become_demon(turn, registry, *only, role),
        _ => {
            turn.ask(PendingPrompt::StarPass { from: old.id, candidates });
            Ok(())
        }
    }
}

/// The Scarlet Woman takes over from a dead Demon when no other Demon lives.
fn scarlet_woman(turn: &mut Turn, registry: &RoleRegistry, dead: &Seat) -> EngineResult<()> {
    if turn.seats.iter().any(|s| s.is_alive() && registry.is_demon(s)) {
        return Ok(());
    }
    let (Some(heir), Some(role)) = (scarlet_heir(&turn.seats, registry), dead.role.clone()) else {
        return Ok(());
    };
    become_demon(turn, registry, heir, role)
}

pub(crate) fn become_demon(turn: &mut Turn, registry: &RoleRegistry, seat: SeatId, role: RoleId) -> EngineResult<()> {
    turn.apply(
        SeatDelta::new(seat)
            .with(SeatChange::SetRole(role.clone()))
            .with(SeatChange::SetDisplayedRole(None)),
    )?;
    turn.note(LogEntry::private(format!("{seat} becomes the {}", registry.name_of(&role))));
    tracing::info!(seat = %seat, role = %role, "new demon");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(roles: &[&'static str]) -> Vec<Seat> {
        roles
            .iter()
            .enumerate()
            .map(|(i, r)| Seat::new(SeatId::new(i as u8)).with_role(RoleId::new(r)))
            .collect()
    }

    fn night() -> SessionContext {
        let mut session = SessionContext::default();
        session.begin_night();
        session.begin_day();
        session.begin_night();
        session
    }

    fn imp_kill(target: u8, killer: u8) -> KillRequest {
        KillRequest::demon(SeatId::new(target), SeatId::new(killer), RoleId::new("imp"))
    }

    #[test]
    fn test_soldier_immune_to_demon_only() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let mut turn = Turn::new(&board(&["soldier", "imp", "gambler"]));
        assert_eq!(attempt(&mut turn, &mut session, &registry, &imp_kill(0, 1)).unwrap(), KillOutcome::Immune);

        let ability = KillRequest::ability(SeatId::new(0), SeatId::new(2), RoleId::new("gambler"));
        assert_eq!(attempt(&mut turn, &mut session, &registry, &ability).unwrap(), KillOutcome::Died);
    }

    #[test]
    fn test_poisoned_soldier_dies() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let mut seats = board(&["soldier", "imp"]);
        seats[0].add_status(StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("poisoner")));
        let mut turn = Turn::new(&seats);
        assert_eq!(attempt(&mut turn, &mut session, &registry, &imp_kill(0, 1)).unwrap(), KillOutcome::Died);
        assert_eq!(session.tonight.demon_kills, vec![SeatId::new(0)]);
    }

    #[test]
    fn test_fool_survives_once() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let seats = vec![
            Seat::new(SeatId::new(0))
                .with_role(RoleId::new("fool"))
                .with_capability(Capability::FoolReprieve),
            Seat::new(SeatId::new(1)).with_role(RoleId::new("imp")),
        ];
        let mut turn = Turn::new(&seats);
        assert_eq!(attempt(&mut turn, &mut session, &registry, &imp_kill(0, 1)).unwrap(), KillOutcome::Immune);
        assert_eq!(attempt(&mut turn, &mut session, &registry, &imp_kill(0, 1)).unwrap(), KillOutcome::Died);
    }

    #[test]
    fn test_innkeeper_blocks_ability_kills_monk_does_not() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let mut seats = board(&["innkeeper", "monk", "chef", "empath", "gambler"]);
        seats[2].protected_by = Some(SeatId::new(0));
        seats[3].protected_by = Some(SeatId::new(1));
        let mut turn = Turn::new(&seats);
        let on = |t: u8| KillRequest::ability(SeatId::new(t), SeatId::new(4), RoleId::new("gambler"));
        assert_eq!(attempt(&mut turn, &mut session, &registry, &on(2)).unwrap(), KillOutcome::Protected);
        assert_eq!(attempt(&mut turn, &mut session, &registry, &on(3)).unwrap(), KillOutcome::Died);
    }

    #[test]
    fn test_assassin_ignores_protection() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let mut seats = board(&["monk", "soldier", "assassin"]);
        seats[1].protected_by = Some(SeatId::new(0));
        let mut turn = Turn::new(&seats);
        let kill = KillRequest::ability(SeatId::new(1), SeatId::new(2), RoleId::new("assassin")).ignoring_protection();
        assert_eq!(attempt(&mut turn, &mut session, &registry, &kill).unwrap(), KillOutcome::Died);
    }

    #[test]
    fn test_mayor_suspends_then_redirect_resolves() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let mut turn = Turn::new(&board(&["mayor", "imp", "chef"]));
        assert_eq!(attempt(&mut turn, &mut session, &registry, &imp_kill(0, 1)).unwrap(), KillOutcome::Suspended);
        assert!(matches!(turn.prompt, Some(PendingPrompt::MayorRedirect { .. })));
        assert!(!turn.seats[0].is_dead);

        let bounced = imp_kill(0, 1).redirected();
        assert_eq!(attempt(&mut turn, &mut session, &registry, &bounced).unwrap(), KillOutcome::Died);
    }

    #[test]
    fn test_zombuul_feigns_once() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let seats = vec![
            Seat::new(SeatId::new(0))
                .with_role(RoleId::new("zombuul"))
                .with_capability(Capability::FakeDeath),
            Seat::new(SeatId::new(1)).with_role(RoleId::new("gambler")),
        ];
        let mut turn = Turn::new(&seats);
        let kill = KillRequest::ability(SeatId::new(0), SeatId::new(1), RoleId::new("gambler"));
        assert_eq!(attempt(&mut turn, &mut session, &registry, &kill).unwrap(), KillOutcome::FeignedDeath);
        assert!(!turn.seats[0].is_dead);
        assert!(turn.seats[0].feigning_death);
        assert_eq!(attempt(&mut turn, &mut session, &registry, &kill).unwrap(), KillOutcome::Died);
    }

    #[test]
    fn test_poisoned_zombuul_dies_outright() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let seats = vec![
            Seat::new(SeatId::new(0))
                .with_role(RoleId::new("zombuul"))
                .with_capability(Capability::FakeDeath)
                .with_status(StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("poisoner"))),
            Seat::new(SeatId::new(1)).with_role(RoleId::new("gambler")),
        ];
        let mut turn = Turn::new(&seats);
        let kill = KillRequest::ability(SeatId::new(0), SeatId::new(1), RoleId::new("gambler"));
        assert_eq!(attempt(&mut turn, &mut session, &registry, &kill).unwrap(), KillOutcome::Died);
        assert!(turn.seats[0].is_dead);
        assert!(!turn.seats[0].feigning_death);
    }

    #[test]
    fn test_fang_gu_leaps_into_outsider() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let seats = vec![
            Seat::new(SeatId::new(0))
                .with_role(RoleId::new("fang_gu"))
                .with_capability(Capability::FangGuLeap),
            Seat::new(SeatId::new(1)).with_role(RoleId::new("saint")),
            Seat::new(SeatId::new(2)).with_role(RoleId::new("chef")),
        ];
        let mut turn = Turn::new(&seats);
        let kill = KillRequest::demon(SeatId::new(1), SeatId::new(0), RoleId::new("fang_gu"));
        assert_eq!(attempt(&mut turn, &mut session, &registry, &kill).unwrap(), KillOutcome::Converted);
        assert!(turn.seats[0].is_dead);
        assert!(turn.seats[1].has_role("fang_gu"));
        assert_eq!(turn.seats[1].alignment_override, Some(Alignment::Evil));
    }

    #[test]
    fn test_imp_star_pass_single_minion() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let mut turn = Turn::new(&board(&["imp", "baron", "chef", "empath"]));
        assert_eq!(attempt(&mut turn, &mut session, &registry, &imp_kill(0, 0)).unwrap(), KillOutcome::Died);
        assert!(turn.seats[1].has_role("imp"));
        assert!(turn.prompt.is_none());
    }

    #[test]
    fn test_imp_star_pass_prompts_with_many_minions() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let mut turn = Turn::new(&board(&["imp", "baron", "poisoner", "chef"]));
        attempt(&mut turn, &mut session, &registry, &imp_kill(0, 0)).unwrap();
        match &turn.prompt {
            Some(PendingPrompt::StarPass { candidates, .. }) => {
                assert_eq!(candidates, &vec![SeatId::new(1), SeatId::new(2)]);
            }
            other => panic!("expected a star pass prompt, got {other:?}"),
        }
    }

    #[test]
    fn test_scarlet_woman_needs_five_alive() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let storyteller = KillRequest::storyteller(SeatId::new(0));

        let mut turn = Turn::new(&board(&["imp", "scarlet_woman", "chef", "empath", "monk"]));
        attempt(&mut turn, &mut session, &registry, &storyteller).unwrap();
        assert!(turn.seats[1].has_role("imp"));

        let mut small = Turn::new(&board(&["imp", "scarlet_woman", "chef", "empath"]));
        attempt(&mut small, &mut session, &registry, &storyteller).unwrap();
        assert!(small.seats[1].has_role("scarlet_woman"));
    }

    #[test]
    fn test_widow_poison_ends_with_widow() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let mut seats = board(&["widow", "chef", "gambler"]);
        seats[1].add_status(
            StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("widow"))
                .with_source(SeatId::new(0))
                .lasting(Duration::WhileSourceLives),
        );
        let mut turn = Turn::new(&seats);
        let kill = KillRequest::ability(SeatId::new(0), SeatId::new(2), RoleId::new("gambler"));
        attempt(&mut turn, &mut session, &registry, &kill).unwrap();
        assert!(!turn.seats[1].has_status(StatusKind::Poisoned));
    }

    #[test]
    fn test_ravenkeeper_requeued_on_night_death() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let mut turn = Turn::new(&board(&["ravenkeeper", "imp"]));
        attempt(&mut turn, &mut session, &registry, &imp_kill(0, 1)).unwrap();
        assert_eq!(turn.requeue, vec![SeatId::new(0)]);
    }

    #[test]
    fn test_moonchild_asks_for_choice() {
        let registry = RoleRegistry::standard();
        let mut session = night();
        let mut turn = Turn::new(&board(&["moonchild", "imp", "chef"]));
        attempt(&mut turn, &mut session, &registry, &imp_kill(0, 1)).unwrap();
        assert_eq!(
            turn.prompt,
            Some(PendingPrompt::DeathChoice {
                source: SeatId::new(0),
                kind: DeathChoiceKind::Moonchild
            })
        );
    }
}
