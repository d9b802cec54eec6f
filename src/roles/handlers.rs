//! Shared night-action handlers.
//!
//! Every handler is a pure function from a `HandlerContext` to a
//! `HandlerOutput`. None of them touches the board; deaths are requested,
//! never applied.

use crate::core::{
    Alignment, Board, Capability, Duration, LogEntry, RoleType, SeatChange, SeatDelta,
    StatusEffect, StatusKind,
};
use crate::schedule::{antagonism_enabled, antagonism_violation};

use super::effect::{HandlerContext, HandlerOutput, KillRequest};

/// A status from the acting role, sourced at the acting seat.
fn sourced(ctx: &HandlerContext<'_>, kind: StatusKind, duration: Duration) -> StatusEffect {
    StatusEffect::from_role(kind, ctx.role.clone())
        .with_source(ctx.actor.id)
        .lasting(duration)
}

fn mark_each(ctx: &HandlerContext<'_>, kind: StatusKind, duration: Duration, verb: &str) -> HandlerOutput {
    let mut out = HandlerOutput::new();
    for target in ctx.targets() {
        out = out
            .with_delta(SeatDelta::single(
                target.id,
                SeatChange::AddStatus(sourced(ctx, kind, duration)),
            ))
            .with_log(LogEntry::private(format!(
                "{} {verb} {}",
                ctx.label(ctx.actor),
                ctx.label(target)
            )));
    }
    out
}

// ============================================================================
// Poison and drunkenness
// ============================================================================

/// Poisoner: poisoned tonight and tomorrow.
pub fn poison(ctx: &HandlerContext<'_>) -> HandlerOutput {
    mark_each(ctx, StatusKind::Poisoned, Duration::UntilNextDusk, "poisons")
}

/// Widow: poisoned for as long as the Widow lives.
pub fn widow(ctx: &HandlerContext<'_>) -> HandlerOutput {
    mark_each(ctx, StatusKind::Poisoned, Duration::WhileSourceLives, "poisons")
}

/// Pukka: poisoned now, dies when the next night starts.
pub fn pukka(ctx: &HandlerContext<'_>) -> HandlerOutput {
    mark_each(ctx, StatusKind::Poisoned, Duration::Permanent, "poisons")
}

/// Sailor: the chosen player is drunk until dusk.
pub fn sailor(ctx: &HandlerContext<'_>) -> HandlerOutput {
    mark_each(ctx, StatusKind::Drunk, Duration::UntilNextDusk, "gets drunk with")
}

/// Courtier: the player holding the chosen character is drunk for three nights.
pub fn courtier(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let Some(role) = ctx.choice.role.as_ref() else {
        return HandlerOutput::note(format!("{} chooses no character", ctx.label(ctx.actor)));
    };

    let mut out = HandlerOutput::new().with_delta(SeatDelta::single(
        ctx.actor.id,
        SeatChange::Consume(Capability::CourtierDrink),
    ));
    let mut found = false;
    for seat in ctx.seats.iter().filter(|s| s.role.as_ref() == Some(role)) {
        found = true;
        out = out
            .with_delta(SeatDelta::single(
                seat.id,
                SeatChange::AddStatus(sourced(ctx, StatusKind::Drunk, Duration::Nights(3))),
            ))
            .with_log(LogEntry::private(format!(
                "{} makes {} drunk for 3 nights",
                ctx.label(ctx.actor),
                ctx.label(seat)
            )));
    }
    if !found {
        out = out.with_log(LogEntry::private(format!(
            "{} chose {}, who is not in play",
            ctx.label(ctx.actor),
            ctx.registry.name_of(role)
        )));
    }
    out
}

// ============================================================================
// Protection and markers
// ============================================================================

/// Monk and similar: the actor becomes the target's protector.
pub fn protect(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let mut out = HandlerOutput::new();
    for target in ctx.targets() {
        out = out
            .with_delta(SeatDelta::single(target.id, SeatChange::Protect(ctx.actor.id)))
            .with_log(LogEntry::private(format!(
                "{} protects {}",
                ctx.label(ctx.actor),
                ctx.label(target)
            )));
    }
    out
}

/// Innkeeper: both targets protected, the second is drunk until dusk.
pub fn innkeeper(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let mut out = protect(ctx);
    if let Some(second) = ctx.target(1) {
        out = out
            .with_delta(SeatDelta::single(
                second.id,
                SeatChange::AddStatus(sourced(ctx, StatusKind::Drunk, Duration::UntilNextDusk)),
            ))
            .with_log(LogEntry::private(format!("{} is drunk", ctx.label(second))));
    }
    out
}

/// Butler: the target becomes their master.
pub fn butler(ctx: &HandlerContext<'_>) -> HandlerOutput {
    match ctx.target(0) {
        Some(master) => HandlerOutput::new()
            .with_delta(SeatDelta::single(ctx.actor.id, SeatChange::SetMaster(Some(master.id))))
            .with_log(LogEntry::private(format!(
                "{} chooses {} as master",
                ctx.label(ctx.actor),
                ctx.label(master)
            ))),
        None => HandlerOutput::new(),
    }
}

/// Evil Twin: pair with a good player, both ways.
pub fn evil_twin(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let Some(twin) = ctx.target(0) else {
        return HandlerOutput::new();
    };
    HandlerOutput::new()
        .with_delta(
            SeatDelta::single(ctx.actor.id, SeatChange::SetTwin(Some(twin.id)))
                .with(SeatChange::Consume(Capability::TwinPairing)),
        )
        .with_delta(SeatDelta::single(twin.id, SeatChange::SetTwin(Some(ctx.actor.id))))
        .with_log(LogEntry::private(format!(
            "{} and {} are twins",
            ctx.label(ctx.actor),
            ctx.label(twin)
        )))
}

/// Witch: cursed until tomorrow's dusk.
pub fn witch(ctx: &HandlerContext<'_>) -> HandlerOutput {
    mark_each(ctx, StatusKind::Cursed, Duration::UntilNextDusk, "curses")
}

/// Cerenovus: mad about the chosen character tomorrow.
pub fn cerenovus(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let mut out = mark_each(ctx, StatusKind::Mad, Duration::UntilNextDusk, "drives mad");
    if let Some(role) = &ctx.choice.role {
        out = out.with_log(LogEntry::private(format!(
            "they must be mad that they are the {}",
            ctx.registry.name_of(role)
        )));
    }
    out
}

/// Devil's Advocate: cannot die by execution tomorrow.
pub fn devils_advocate(ctx: &HandlerContext<'_>) -> HandlerOutput {
    mark_each(ctx, StatusKind::ExecutionImmune, Duration::UntilNextDusk, "defends")
}

/// Exorcist: if the demon is chosen, it does not wake tonight.
pub fn exorcist(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let mut out = mark_each(ctx, StatusKind::Exorcised, Duration::UntilDawn, "exorcises");
    if ctx.targets().any(|t| ctx.registry.is_demon(t)) {
        out = out.with_log(LogEntry::private("the Demon does not wake tonight"));
    }
    out
}

// ============================================================================
// Kills
// ============================================================================

/// Ordinary demon kill on every target.
pub fn demon_kill(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let mut out = HandlerOutput::new();
    for target in ctx.targets() {
        out = out.with_kill(KillRequest::demon(target.id, ctx.actor.id, ctx.role.clone()));
    }
    if ctx.choice.targets.is_empty() {
        out = out.with_log(LogEntry::private(format!(
            "{} chooses no one",
            ctx.label(ctx.actor)
        )));
    }
    out
}

/// Zombuul: only kills if nobody died today.
pub fn zombuul(ctx: &HandlerContext<'_>) -> HandlerOutput {
    if !ctx.session.day.deaths.is_empty() {
        return HandlerOutput::note("someone died today: the Zombuul does not kill");
    }
    demon_kill(ctx)
}

/// Po: choosing no one charges three kills for the next night.
pub fn po(ctx: &HandlerContext<'_>) -> HandlerOutput {
    if ctx.choice.targets.is_empty() {
        return HandlerOutput::new()
            .with_delta(SeatDelta::single(ctx.actor.id, SeatChange::Grant(Capability::PoCharge)))
            .with_log(LogEntry::private(format!(
                "{} chooses no one and may kill three tomorrow night",
                ctx.label(ctx.actor)
            )));
    }
    let mut out = demon_kill(ctx);
    if ctx.actor.capabilities.has(Capability::PoCharge) {
        out = out.with_delta(SeatDelta::single(
            ctx.actor.id,
            SeatChange::Consume(Capability::PoCharge),
        ));
    }
    out
}

/// Po may only choose three players after a night of choosing no one.
pub fn po_targets(check: &super::targeting::TargetCheck<'_>) -> Result<(), String> {
    if check.selected.len() > 1 && !check.actor.capabilities.has(Capability::PoCharge) {
        Err("the Po kills three only after choosing no one".to_string())
    } else {
        Ok(())
    }
}

/// Assassin: once per game, ignores every protection.
pub fn assassin(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let Some(target) = ctx.target(0) else {
        return HandlerOutput::note(format!("{} does not use their ability", ctx.label(ctx.actor)));
    };
    HandlerOutput::new()
        .with_delta(SeatDelta::single(
            ctx.actor.id,
            SeatChange::Consume(Capability::AssassinKill),
        ))
        .with_kill(KillRequest::ability(target.id, ctx.actor.id, ctx.role.clone()).ignoring_protection())
}

/// Godfather: kills only if an Outsider died today.
pub fn godfather(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let outsider_died = ctx.session.day.deaths.iter().any(|id| {
        ctx.seats
            .seat(*id)
            .is_some_and(|s| ctx.registry.type_of(s) == Some(RoleType::Outsider))
    });
    if !outsider_died {
        return HandlerOutput::note("no Outsider died today: the Godfather does not kill");
    }
    let mut out = HandlerOutput::new();
    for target in ctx.targets() {
        out = out.with_kill(KillRequest::ability(target.id, ctx.actor.id, ctx.role.clone()));
    }
    out
}

/// Gambler: a wrong guess kills the Gambler.
pub fn gambler(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let (Some(target), Some(guess)) = (ctx.target(0), ctx.choice.role.as_ref()) else {
        return HandlerOutput::new();
    };
    if target.role.as_ref() == Some(guess) {
        HandlerOutput::note(format!("{} guessed correctly", ctx.label(ctx.actor)))
    } else {
        HandlerOutput::new()
            .with_log(LogEntry::private(format!("{} guessed wrong", ctx.label(ctx.actor))))
            .with_kill(KillRequest::ability(ctx.actor.id, ctx.actor.id, ctx.role.clone()))
    }
}

// ============================================================================
// Character changes
// ============================================================================

/// Professor: once per game, revive a dead Townsfolk.
pub fn professor(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let Some(target) = ctx.target(0) else {
        return HandlerOutput::new();
    };
    let spend = SeatDelta::single(ctx.actor.id, SeatChange::Consume(Capability::ProfessorRevival));
    if target.is_dead && ctx.registry.type_of(target) == Some(RoleType::Townsfolk) {
        HandlerOutput::new()
            .with_delta(spend)
            .with_delta(SeatDelta::single(target.id, SeatChange::Revive))
            .with_log(LogEntry::public(format!("{} is revived", ctx.label(target))))
    } else {
        HandlerOutput::new()
            .with_delta(spend)
            .with_log(LogEntry::private(format!(
                "{} is not a Townsfolk: nothing happens",
                ctx.label(target)
            )))
    }
}

/// Snake Charmer: choosing the demon swaps characters and alignments; the
/// old demon is poisoned.
pub fn snake_charmer(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let Some(target) = ctx.target(0) else {
        return HandlerOutput::new();
    };
    let Some(demon_role) = target.role.clone().filter(|_| ctx.registry.is_demon(target)) else {
        return HandlerOutput::note(format!("{} is not the Demon", ctx.label(target)));
    };

    HandlerOutput::new()
        .with_delta(
            SeatDelta::new(ctx.actor.id)
                .with(SeatChange::SetRole(demon_role))
                .with(SeatChange::SetDisplayedRole(None))
                .with(SeatChange::SetAlignment(None))
                .with(SeatChange::SetDemonSuccessor(true)),
        )
        .with_delta(
            SeatDelta::new(target.id)
                .with(SeatChange::SetRole(ctx.role.clone()))
                .with(SeatChange::SetAlignment(None))
                .with(SeatChange::SetDemonSuccessor(false))
                .with(SeatChange::AddStatus(sourced(
                    ctx,
                    StatusKind::Poisoned,
                    Duration::Permanent,
                ))),
        )
        .with_log(LogEntry::private(format!(
            "{} charms the Demon: {} swap characters",
            ctx.label(ctx.actor),
            ctx.label(target)
        )))
}

/// Pit-Hag may only create a known character that is not already in play.
pub fn pit_hag_choice(ctx: &HandlerContext<'_>) -> Result<(), String> {
    let Some(role) = ctx.choice.role.as_ref() else {
        return Err("choose a character to create".to_string());
    };
    if ctx.registry.get(role).is_none() {
        return Err(format!("{role} is not a known character"));
    }
    if ctx.seats.iter().any(|s| s.role.as_ref() == Some(role)) {
        return Err(format!("{} is already in play", ctx.registry.name_of(role)));
    }
    if antagonism_enabled(ctx.seats, &ctx.session.config) {
        let in_play = ctx.seats.roles_in_play();
        if let Some(reason) = antagonism_violation(role, &in_play, Some(ctx.role.as_str())) {
            return Err(reason);
        }
    }
    Ok(())
}

/// Pit-Hag: turn a player into a new character with a clean slate.
pub fn pit_hag(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let (Some(target), Some(role)) = (ctx.target(0), ctx.choice.role.as_ref()) else {
        return HandlerOutput::new();
    };
    let Some(def) = ctx.registry.get(role) else {
        return HandlerOutput::new();
    };

    let mut delta = SeatDelta::new(target.id)
        .with(SeatChange::SetRole(role.clone()))
        .with(SeatChange::SetDisplayedRole(None))
        .with(SeatChange::ClearStatuses)
        .with(SeatChange::ResetCapabilities)
        .with(SeatChange::SetAlignment(None))
        .with(SeatChange::SetDemonSuccessor(false));
    for cap in &def.grants {
        delta = delta.with(SeatChange::Grant(*cap));
    }

    let mut out = HandlerOutput::new().with_delta(delta).with_log(LogEntry::private(format!(
        "{} turns {} into the {}",
        ctx.label(ctx.actor),
        ctx.label(target),
        def.name
    )));
    if def.action_for(ctx.first_night()).is_some() {
        out = out.with_requeue(target.id);
    }
    if def.role_type == RoleType::Demon {
        out = out.with_prompt(crate::resolution::PendingPrompt::PitHagDemonCreated { seat: target.id });
    }
    out
}

/// Philosopher: gain a good character's ability; its holder becomes drunk.
pub fn philosopher(ctx: &HandlerContext<'_>) -> HandlerOutput {
    let Some(role) = ctx.choice.role.as_ref() else {
        return HandlerOutput::new();
    };
    let good = ctx
        .registry
        .get(role)
        .is_some_and(|r| r.role_type.default_alignment() == Alignment::Good);
    if !good {
        return HandlerOutput::note(format!("{} must choose a good character", ctx.label(ctx.actor)));
    }

    let mut out = HandlerOutput::new()
        .with_delta(
            SeatDelta::new(ctx.actor.id)
                .with(SeatChange::SetDisplayedRole(Some(role.clone())))
                .with(SeatChange::Consume(Capability::PhilosopherChoice)),
        )
        .with_log(LogEntry::private(format!(
            "{} gains the {} ability",
            ctx.label(ctx.actor),
            ctx.registry.name_of(role)
        )))
        .with_requeue(ctx.actor.id);
    for holder in ctx.seats.iter().filter(|s| s.role.as_ref() == Some(role)) {
        out = out.with_delta(SeatDelta::single(
            holder.id,
            SeatChange::AddStatus(sourced(ctx, StatusKind::Drunk, Duration::Permanent)),
        ));
    }
    out
}

/// Seamstress: spends the once-per-game reading.
pub fn seamstress(ctx: &HandlerContext<'_>) -> HandlerOutput {
    if ctx.choice.targets.is_empty() {
        return HandlerOutput::new();
    }
    HandlerOutput::new().with_delta(SeatDelta::single(
        ctx.actor.id,
        SeatChange::Consume(Capability::SeamstressReading),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SessionContext;
    use crate::core::{Phase, RoleId, Seat, SeatId};
    use crate::roles::{ActionChoice, RoleRegistry};

    fn seats(roles: &[&'static str]) -> Vec<Seat> {
        roles
            .iter()
            .enumerate()
            .map(|(i, r)| Seat::new(SeatId::new(i as u8)).with_role(RoleId::new(r)))
            .collect()
    }

    fn run(
        handler: fn(&HandlerContext<'_>) -> HandlerOutput,
        seats: &[Seat],
        actor: usize,
        choice: ActionChoice,
        session: &SessionContext,
    ) -> HandlerOutput {
        let registry = RoleRegistry::standard();
        let role = seats[actor].role.clone().unwrap();
        let ctx = HandlerContext {
            seats,
            actor: &seats[actor],
            role: &role,
            choice: &choice,
            phase: Phase::Night,
            session,
            registry: &registry,
        };
        handler(&ctx)
    }

    #[test]
    fn test_poison_lasts_until_dusk() {
        let board = seats(&["poisoner", "imp", "chef"]);
        let session = SessionContext::default();
        let out = run(poison, &board, 0, ActionChoice::seats(&[SeatId::new(2)]), &session);
        assert!(out.kills.is_empty());
        assert_eq!(out.deltas.len(), 1);
        match &out.deltas[0].changes[0] {
            SeatChange::AddStatus(s) => {
                assert_eq!(s.kind, StatusKind::Poisoned);
                assert_eq!(s.duration, Duration::UntilNextDusk);
                assert_eq!(s.source, Some(SeatId::new(0)));
            }
            other => panic!("unexpected change {other:?}"),
        }
    }

    #[test]
    fn test_innkeeper_second_target_drunk() {
        let board = seats(&["innkeeper", "chef", "empath", "imp"]);
        let session = SessionContext::default();
        let out = run(
            innkeeper,
            &board,
            0,
            ActionChoice::seats(&[SeatId::new(1), SeatId::new(2)]),
            &session,
        );
        let drunk: Vec<_> = out
            .deltas
            .iter()
            .filter(|d| {
                d.changes
                    .iter()
                    .any(|c| matches!(c, SeatChange::AddStatus(s) if s.kind == StatusKind::Drunk))
            })
            .map(|d| d.seat)
            .collect();
        assert_eq!(drunk, vec![SeatId::new(2)]);
    }

    #[test]
    fn test_zombuul_skips_after_day_death() {
        let board = seats(&["zombuul", "chef", "empath"]);
        let mut session = SessionContext::default();
        session.day.record_death(SeatId::new(2));
        let out = run(zombuul, &board, 0, ActionChoice::seats(&[SeatId::new(1)]), &session);
        assert!(out.kills.is_empty());

        let quiet = SessionContext::default();
        let out = run(zombuul, &board, 0, ActionChoice::seats(&[SeatId::new(1)]), &quiet);
        assert_eq!(out.kills.len(), 1);
    }

    #[test]
    fn test_po_charges_on_no_choice() {
        let board = seats(&["po", "chef", "empath"]);
        let session = SessionContext::default();
        let out = run(po, &board, 0, ActionChoice::nothing(), &session);
        assert!(out.kills.is_empty());
        assert_eq!(
            out.deltas[0].changes[0],
            SeatChange::Grant(Capability::PoCharge)
        );
    }

    #[test]
    fn test_assassin_ignores_protection() {
        let board = seats(&["assassin", "chef", "imp"]);
        let session = SessionContext::default();
        let out = run(assassin, &board, 0, ActionChoice::seats(&[SeatId::new(1)]), &session);
        assert!(out.kills[0].ignores_protection);
        assert_eq!(
            out.deltas[0].changes[0],
            SeatChange::Consume(Capability::AssassinKill)
        );
    }

    #[test]
    fn test_gambler_wrong_guess_kills_self() {
        let board = seats(&["gambler", "chef", "imp"]);
        let session = SessionContext::default();
        let wrong = ActionChoice::seats(&[SeatId::new(1)]).with_role(RoleId::new("empath"));
        let out = run(gambler, &board, 0, wrong, &session);
        assert_eq!(out.kills[0].target, SeatId::new(0));

        let right = ActionChoice::seats(&[SeatId::new(1)]).with_role(RoleId::new("chef"));
        let out = run(gambler, &board, 0, right, &session);
        assert!(out.kills.is_empty());
    }

    #[test]
    fn test_snake_charmer_swaps_with_demon() {
        let board = seats(&["snake_charmer", "vortox", "chef"]);
        let session = SessionContext::default();
        let out = run(snake_charmer, &board, 0, ActionChoice::seats(&[SeatId::new(1)]), &session);
        assert_eq!(out.deltas.len(), 2);
        assert!(out.deltas[0]
            .changes
            .contains(&SeatChange::SetRole(RoleId::new("vortox"))));
        assert!(out.deltas[1]
            .changes
            .contains(&SeatChange::SetRole(RoleId::new("snake_charmer"))));

        let miss = run(snake_charmer, &board, 0, ActionChoice::seats(&[SeatId::new(2)]), &session);
        assert!(miss.deltas.is_empty());
    }

    #[test]
    fn test_pit_hag_choice_rules() {
        let board = seats(&["pit_hag", "chef", "imp"]);
        let registry = RoleRegistry::standard();
        let session = SessionContext::default();
        let pit = RoleId::new("pit_hag");
        let check = |choice: ActionChoice| {
            let ctx = HandlerContext {
                seats: &board,
                actor: &board[0],
                role: &pit,
                choice: &choice,
                phase: Phase::Night,
                session: &session,
                registry: &registry,
            };
            pit_hag_choice(&ctx)
        };
        let base = ActionChoice::seats(&[SeatId::new(1)]);
        assert!(check(base.clone()).is_err());
        assert!(check(base.clone().with_role(RoleId::new("imp"))).is_err());
        assert!(check(base.clone().with_role(RoleId::new("nobody"))).is_err());
        assert!(check(base.with_role(RoleId::new("empath"))).is_ok());
    }

    #[test]
    fn test_pit_hag_demon_prompts() {
        let board = seats(&["pit_hag", "chef", "imp"]);
        let session = SessionContext::default();
        let choice = ActionChoice::seats(&[SeatId::new(1)]).with_role(RoleId::new("fang_gu"));
        let out = run(pit_hag, &board, 0, choice, &session);
        assert!(out.prompt.is_some());
        assert_eq!(out.requeue, vec![SeatId::new(1)]);
        assert!(out.deltas[0].changes.contains(&SeatChange::Grant(Capability::FangGuLeap)));
    }
}
