//! Resolving one seat's night action, and answering the prompts it raises.

use crate::context::SessionContext;
use crate::core::{
    Board, Duration, LogEntry, RoleId, Seat, SeatChange, SeatDelta, SeatId, StatusEffect,
    StatusKind,
};
use crate::error::{EngineError, EngineResult};
use crate::info::ability_disabled;
use crate::roles::{ActionChoice, ActionTag, HandlerContext, HandlerOutput, KillRequest, RoleRegistry};
use crate::victory::{Checkpoint, WinEvaluator};

use super::kill::{self, become_demon};
use super::outcome::{staged, ActionOutcome, Turn};
use super::prompt::{DeathChoiceKind, PendingPrompt, PromptAnswer};

/// Resolve `actor`'s action for tonight with the moderator's `choice`.
///
/// Targets are checked before anything changes: an invalid choice returns
/// an error and the board is untouched. A poisoned or drunk actor's harmful
/// action does nothing beyond spending its token.
///
/// ## Example
///
/// ```
/// use clocktower_engine::context::SessionContext;
/// use clocktower_engine::core::{RoleId, Seat, SeatId, StatusKind};
/// use clocktower_engine::resolution::resolve_action;
/// use clocktower_engine::roles::{ActionChoice, RoleRegistry};
///
/// let registry = RoleRegistry::standard();
/// let mut session = SessionContext::default();
/// session.begin_night();
/// let seats = vec![
///     Seat::new(SeatId::new(0)).with_role(RoleId::new("poisoner")),
///     Seat::new(SeatId::new(1)).with_role(RoleId::new("imp")),
///     Seat::new(SeatId::new(2)).with_role(RoleId::new("chef")),
/// ];
///
/// let choice = ActionChoice::seats(&[SeatId::new(2)]);
/// let outcome = resolve_action(&seats, SeatId::new(0), &choice, &mut session, &registry).unwrap();
/// assert!(outcome.updated_seats[2].has_status(StatusKind::Poisoned));
/// assert!(!seats[2].has_status(StatusKind::Poisoned));
/// ```
pub fn resolve_action(
    seats: &[Seat],
    actor: SeatId,
    choice: &ActionChoice,
    session: &mut SessionContext,
    registry: &RoleRegistry,
) -> EngineResult<ActionOutcome> {
    let seat = seats.seat(actor).ok_or(EngineError::UnknownSeat(actor))?;
    let role = seat.effective_role().ok_or(EngineError::NoAction(actor))?;
    let def = registry.require(role)?;
    let action = def
        .action_for(session.is_first_night())
        .ok_or(EngineError::NoAction(actor))?;

    if let Some(cap) = action.requires {
        if !seat.capabilities.has(cap) {
            return Err(EngineError::NoAction(actor));
        }
    }

    action.targets.validate(seats, seat, &choice.targets, session)?;

    let ctx = HandlerContext {
        seats,
        actor: seat,
        role,
        choice,
        phase: session.phase,
        session: &*session,
        registry,
    };
    if let Some(rule) = action.role_rule {
        rule(&ctx).map_err(|reason| EngineError::IneligibleTarget {
            seat: choice.targets.first().copied().unwrap_or(actor),
            reason,
        })?;
    }

    let mut output = match action.handler {
        Some(handler) => handler(&ctx),
        None if action.action == ActionTag::Manual => HandlerOutput::note(format!(
            "resolve the {} ability by hand: {}",
            def.name, action.instruction
        )),
        None => HandlerOutput::new(),
    };

    let impaired = ability_disabled(seat) && !action.works_while_impaired;
    let label = registry.seat_label(seat);
    let tag = action.action;
    staged(session, |session| {
        if impaired && harmful(tag) {
            output = hollow(output, actor);
            output.log.push(LogEntry::private(format!(
                "{label} is poisoned or drunk: the ability has no effect"
            )));
        }
        if impaired {
            session.tonight.record_failure(actor);
        }

        tracing::debug!(seat = %actor, role = %role, action = ?tag, "resolving action");
        let mut turn = Turn::new(seats);
        apply_output(&mut turn, session, registry, output)?;

        session.refresh_world(&turn.seats);
        let verdict = WinEvaluator::check(&turn.seats, session, registry, Checkpoint::AfterDeath);
        Ok(turn.finish(verdict))
    })
}

/// Actions whose effect lands on someone else. They fail outright when the
/// actor is impaired.
fn harmful(tag: ActionTag) -> bool {
    matches!(
        tag,
        ActionTag::Kill | ActionTag::KillOrSkip | ActionTag::Poison | ActionTag::Mark | ActionTag::Transform
    )
}

/// Keep only the tokens the actor spends.
fn hollow(output: HandlerOutput, actor: SeatId) -> HandlerOutput {
    let spent: Vec<SeatChange> = output
        .deltas
        .iter()
        .filter(|d| d.seat == actor)
        .flat_map(|d| d.changes.iter())
        .filter(|c| matches!(c, SeatChange::Consume(_)))
        .cloned()
        .collect();
    let mut hollowed = HandlerOutput::new();
    if !spent.is_empty() {
        let delta = spent.into_iter().fold(SeatDelta::new(actor), SeatDelta::with);
        hollowed = hollowed.with_delta(delta);
    }
    hollowed
}

fn apply_output(
    turn: &mut Turn,
    session: &mut SessionContext,
    registry: &RoleRegistry,
    output: HandlerOutput,
) -> EngineResult<()> {
    turn.apply_all(output.deltas)?;
    for entry in output.log {
        turn.note(entry);
    }
    for seat in output.requeue {
        turn.requeue(seat);
    }
    if let Some(prompt) = output.prompt {
        turn.ask(prompt);
    }
    for request in &output.kills {
        let result = kill::attempt(turn, session, registry, request)?;
        tracing::info!(seat = %request.target, outcome = ?result, "kill attempt");
    }
    Ok(())
}

/// Answer the outstanding prompt.
///
/// A multi-seat answer to a single-seat question, or a seat the prompt did
/// not offer, is a `PromptMismatch` and changes nothing.
pub fn answer_prompt(
    seats: &[Seat],
    prompt: &PendingPrompt,
    answer: &PromptAnswer,
    session: &mut SessionContext,
    registry: &RoleRegistry,
) -> EngineResult<ActionOutcome> {
    let single = match (prompt, answer) {
        (PendingPrompt::PitHagDemonCreated { .. }, _) => None,
        (_, PromptAnswer::Seats(list)) if list.len() > 1 => {
            return Err(EngineError::PromptMismatch("this question takes one seat".to_string()));
        }
        _ => answer.seats().first().copied(),
    };
    if let Some(id) = single {
        seats.seat(id).ok_or(EngineError::UnknownSeat(id))?;
    }

    staged(session, |session| {
        let mut turn = Turn::new(seats);
        match prompt {
            PendingPrompt::MayorRedirect { kill: attack } => {
                let target = single.unwrap_or(attack.target);
                if target != attack.target {
                    turn.note(LogEntry::private(format!("the Mayor's death bounces to {target}")));
                }
                let redirected = KillRequest { target, ..attack.clone() }.redirected();
                kill::attempt(&mut turn, session, registry, &redirected)?;
            }
            PendingPrompt::StarPass { from, candidates } => {
                let chosen = single
                    .filter(|id| candidates.contains(id))
                    .ok_or_else(|| EngineError::PromptMismatch("choose one of the offered Minions".to_string()))?;
                let role = seats
                    .seat(*from)
                    .and_then(|s| s.role.clone())
                    .unwrap_or_else(|| RoleId::new("imp"));
                become_demon(&mut turn, registry, chosen, role)?;
            }
            PendingPrompt::DeathChoice { source, kind } => {
                if let Some(chosen) = single {
                    death_choice(&mut turn, session, registry, *source, *kind, chosen)?;
                } else {
                    turn.note(LogEntry::private(format!("{source} makes no choice")));
                }
            }
            PendingPrompt::PitHagDemonCreated { seat } => {
                let victims = answer.seats();
                if victims.is_empty() {
                    turn.note(LogEntry::private(format!("nobody dies for the new Demon at {seat}")));
                }
                for victim in victims {
                    kill::attempt(&mut turn, session, registry, &KillRequest::storyteller(victim))?;
                }
            }
        }

        session.refresh_world(&turn.seats);
        let verdict = WinEvaluator::check(&turn.seats, session, registry, Checkpoint::AfterDeath);
        Ok(turn.finish(verdict))
    })
}

fn death_choice(
    turn: &mut Turn,
    session: &mut SessionContext,
    registry: &RoleRegistry,
    source: SeatId,
    kind: DeathChoiceKind,
    chosen: SeatId,
) -> EngineResult<()> {
    let Some(target) = turn.seats.seat(chosen).cloned() else {
        return Err(EngineError::UnknownSeat(chosen));
    };
    let evil = registry.alignment_of(&target).is_evil();
    match kind {
        DeathChoiceKind::Moonchild => {
            if evil {
                turn.note(LogEntry::private(format!("the Moonchild chose {chosen}, who is evil: nobody dies")));
            } else {
                let request = KillRequest::ability(chosen, source, RoleId::new("moonchild"));
                kill::attempt(turn, session, registry, &request)?;
            }
        }
        DeathChoiceKind::Sweetheart => {
            let drunk = StatusEffect::from_role(StatusKind::Drunk, RoleId::new("sweetheart"))
                .with_source(source)
                .lasting(Duration::Permanent);
            turn.apply(SeatDelta::single(chosen, SeatChange::AddStatus(drunk)))?;
            turn.note(LogEntry::private(format!("{} is drunk from now on", registry.seat_label(&target))));
        }
        DeathChoiceKind::Klutz => {
            if evil {
                session.klutz_chose_evil = true;
            }
            turn.note(LogEntry::public(format!("the Klutz chose {chosen}")));
        }
    }
    Ok(())
}
