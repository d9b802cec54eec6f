//! Demon and Minion turns.

use crate::core::{Board, Capability, RoleId, RoleType, Seat, StatusKind};
use crate::info::night_info::{roster, seat_list, RenderCtx, RenderTable, Revelation};
use crate::info::poison::impairment_summary;
use crate::roles::RoleRegistry;
use crate::schedule::{antagonism_enabled, antagonism_violation};

pub(super) fn register(table: &mut RenderTable) {
    for demon in ["imp", "pukka", "po", "shabaloth", "zombuul", "fang_gu", "vigormortis", "no_dashii", "vortox"] {
        table.register(demon, demon_turn);
    }
    table.register("poisoner", poisoner);
    table.register("spy", spy);
    table.register("godfather", godfather);
    table.register("devils_advocate", devils_advocate);
    table.register("assassin", assassin);
    table.register("pit_hag", pit_hag);
    table.register("witch", witch);
    table.register("cerenovus", cerenovus);
    table.register("evil_twin", evil_twin);
    for minion in ["scarlet_woman", "baron", "mastermind"] {
        table.register(minion, minion_info);
    }
}

/// A living Poppy Grower keeps the evil team apart.
fn poppy_blocks(seats: &[Seat]) -> bool {
    seats.with_role("poppy_grower").any(Seat::is_alive)
}

fn of_type<'s>(seats: &'s [Seat], registry: &RoleRegistry, role_type: RoleType) -> Vec<&'s Seat> {
    seats
        .iter()
        .filter(|s| registry.type_of(s) == Some(role_type))
        .collect()
}

// ============================================================================
// First-night evil team information
// ============================================================================

/// Three good characters nobody holds, not even as a believed role.
fn bluffs(ctx: &mut RenderCtx<'_>) -> Vec<RoleId> {
    let registry = ctx.registry;
    let seats = ctx.seats;
    let taken: Vec<&RoleId> = seats
        .iter()
        .flat_map(|s| s.role.iter().chain(s.displayed_role.iter()))
        .collect();
    let pool: Vec<RoleId> = ctx
        .session
        .config
        .script
        .roles()
        .into_iter()
        .filter(|r| {
            registry
                .get(r)
                .is_some_and(|d| matches!(d.role_type, RoleType::Townsfolk | RoleType::Outsider))
        })
        .filter(|r| !taken.contains(&r))
        .collect();
    ctx.session
        .rng
        .choose_distinct(&pool, 3)
        .into_iter()
        .cloned()
        .collect()
}

/// The Demon learns its Minions and three bluffs.
fn learns_minions(ctx: &mut RenderCtx<'_>) -> Revelation {
    if poppy_blocks(ctx.seats) {
        return Revelation::instruct(
            "A Poppy Grower is alive: the Demon does not learn the Minions. Show the bluffs only.",
            "You do not learn your Minions.",
        );
    }
    let minions = of_type(ctx.seats, ctx.registry, RoleType::Minion);
    let bluffs = bluffs(ctx);
    let names: Vec<String> = bluffs.iter().map(|r| ctx.name(r)).collect();

    let spoken = if minions.is_empty() {
        format!("You have no Minions. These characters are not in play: {}.", names.join(", "))
    } else {
        format!(
            "These are your Minions: {}. These characters are not in play: {}.",
            seat_list(&minions),
            names.join(", ")
        )
    };
    Revelation::instruct(
        format!("Minions: {}. Bluffs: {}.", roster(ctx, &minions), names.join(", ")),
        spoken,
    )
}

/// A Minion learns the Demon and the other Minions.
fn learns_demon(ctx: &RenderCtx<'_>) -> Revelation {
    if poppy_blocks(ctx.seats) {
        return Revelation::instruct(
            "A Poppy Grower is alive: the Minions do not learn the Demon.",
            "You do not learn your Demon.",
        );
    }
    let registry = ctx.registry;
    let demons: Vec<&Seat> = ctx.seats.iter().filter(|s| registry.is_demon(s)).collect();
    let me = ctx.seat.id;
    let minions: Vec<&Seat> = of_type(ctx.seats, registry, RoleType::Minion)
        .into_iter()
        .filter(|s| s.id != me)
        .collect();

    let mut spoken = match demons.as_slice() {
        [] => "There is no Demon in play.".to_string(),
        _ => format!("Your Demon is {}.", seat_list(&demons)),
    };
    if !minions.is_empty() {
        spoken.push_str(&format!(" Your fellow Minions: {}.", seat_list(&minions)));
    }
    Revelation::instruct(
        format!("Demon: {}. Minions: {}.", roster(ctx, &demons), roster(ctx, &minions)),
        spoken,
    )
}

/// Put the evil team information in front of a first-night action.
fn with_team(team: Revelation, action: Revelation) -> Revelation {
    Revelation {
        guidance: format!("{}\n{}", team.guidance, action.guidance),
        spoken: format!("{} {}", team.spoken, action.spoken),
        ..action
    }
}

fn minion_info(ctx: &mut RenderCtx<'_>) -> Revelation {
    if ctx.first_night {
        return learns_demon(ctx);
    }
    Revelation::instruct(ctx.instruction(), ctx.instruction())
}

// ============================================================================
// Demons
// ============================================================================

fn demon_turn(ctx: &mut RenderCtx<'_>) -> Revelation {
    let has_action = ctx.action.is_some_and(|a| a.action.takes_targets());
    if ctx.first_night && !has_action {
        return learns_minions(ctx);
    }

    let role = ctx.role;
    let body = match role.as_str() {
        "imp" => imp(ctx),
        "pukka" => pukka(ctx),
        "po" => po(ctx),
        "zombuul" => zombuul(ctx),
        "fang_gu" => fang_gu(ctx),
        "no_dashii" => no_dashii(ctx),
        "shabaloth" => kill_turn(ctx)
            .with_note("A player chosen last night who is dead may be regurgitated: resolve by hand."),
        "vigormortis" => kill_turn(ctx)
            .with_note("A Minion killed keeps their ability, and one of their Townsfolk neighbours is poisoned."),
        "vortox" => kill_turn(ctx)
            .with_note("Townsfolk information is false while the Vortox lives. If nobody is executed tomorrow, evil wins."),
        _ => kill_turn(ctx),
    };
    if ctx.first_night {
        with_team(learns_minions(ctx), body)
    } else {
        body
    }
}

fn kill_turn(ctx: &RenderCtx<'_>) -> Revelation {
    Revelation::instruct(ctx.instruction(), ctx.instruction())
}

fn imp(ctx: &RenderCtx<'_>) -> Revelation {
    let body = kill_turn(ctx)
        .with_note("Choosing themself passes the Demon to a living Minion.");
    if ctx.target(0).map(|t| t.id) != Some(ctx.seat.id) {
        return body;
    }
    let registry = ctx.registry;
    let heirs: Vec<&Seat> = ctx
        .seats
        .alive()
        .filter(|s| registry.type_of(s) == Some(RoleType::Minion))
        .collect();
    match heirs.as_slice() {
        [] => body.with_note("Star pass: no living Minion. The Demon dies and good wins."),
        [heir] => body.with_note(format!("Star pass: {} becomes the Imp.", ctx.label(heir))),
        _ => body.with_note(format!(
            "Star pass: choose which Minion becomes the Imp ({}).",
            roster(ctx, &heirs)
        )),
    }
}

fn pukka(ctx: &RenderCtx<'_>) -> Revelation {
    let victims: Vec<&Seat> = ctx
        .seats
        .iter()
        .filter(|s| {
            s.is_alive() && s.statuses_of(StatusKind::Poisoned).any(|p| p.from_role_id("pukka"))
        })
        .collect();
    let body = kill_turn(ctx);
    if victims.is_empty() {
        body
    } else {
        body.with_note(format!(
            "Poisoned by the Pukka (dies as the next night starts): {}",
            roster(ctx, &victims)
        ))
    }
}

fn po(ctx: &RenderCtx<'_>) -> Revelation {
    let body = kill_turn(ctx);
    if ctx.seat.capabilities.has(Capability::PoCharge) {
        body.with_note("The Po chose no one last time: they may choose up to three players.")
    } else {
        body.with_note("The Po may choose one player, or no one to charge three kills.")
    }
}

fn zombuul(ctx: &RenderCtx<'_>) -> Revelation {
    if !ctx.session.day.deaths.is_empty() {
        return Revelation::rest("Someone died today: the Zombuul does not wake.");
    }
    let body = kill_turn(ctx);
    if ctx.seat.feigning_death {
        body.with_note("The Zombuul registers as dead but still acts.")
    } else {
        body
    }
}

fn fang_gu(ctx: &RenderCtx<'_>) -> Revelation {
    let body = kill_turn(ctx);
    if ctx.seat.capabilities.has(Capability::FangGuLeap) {
        body.with_note("The first Outsider this kills becomes an evil Fang Gu, and this Fang Gu dies instead.")
    } else {
        body.with_note("The Fang Gu has already jumped once.")
    }
}

fn no_dashii(ctx: &RenderCtx<'_>) -> Revelation {
    let poisoned: Vec<&Seat> = ctx
        .seats
        .iter()
        .filter(|s| s.statuses_of(StatusKind::Poisoned).any(|p| p.from_role_id("no_dashii")))
        .collect();
    kill_turn(ctx).with_note(format!(
        "Townsfolk neighbours poisoned by the No Dashii: {}",
        roster(ctx, &poisoned)
    ))
}

// ============================================================================
// Minions
// ============================================================================

/// A Minion's action, with the evil team shown first on the first night.
fn minion_action(ctx: &RenderCtx<'_>, body: Revelation) -> Revelation {
    if ctx.first_night {
        with_team(learns_demon(ctx), body)
    } else {
        body
    }
}

fn poisoner(ctx: &mut RenderCtx<'_>) -> Revelation {
    let mut body = kill_turn(ctx);
    if let Some(target) = ctx.target(0) {
        body = body.with_note(format!("{} is poisoned until dusk tomorrow.", ctx.label(target)));
    }
    minion_action(ctx, body)
}

/// The Spy sees everything; the guidance is a digest of the Grimoire.
fn spy(ctx: &mut RenderCtx<'_>) -> Revelation {
    let mut body = Revelation::instruct(ctx.instruction(), "Look at the Grimoire.");
    for seat in ctx.seats {
        let mut line = ctx.label(seat);
        if seat.is_dead {
            line.push_str(" [dead]");
        }
        let marks = impairment_summary(seat);
        if !marks.is_empty() {
            line.push_str(&format!(": {}", marks.join("; ")));
        }
        body = body.with_note(line);
    }
    minion_action(ctx, body)
}

fn godfather(ctx: &mut RenderCtx<'_>) -> Revelation {
    if ctx.first_night {
        let seats = ctx.seats;
        let mut names: Vec<String> = Vec::new();
        for seat in seats {
            let seen = ctx.registration(seat);
            if seen.role_type == Some(RoleType::Outsider) {
                if let Some(role) = seen.apparent_role {
                    let name = ctx.name(&role);
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
        }
        let spoken = if names.is_empty() {
            "There are no Outsiders in play.".to_string()
        } else {
            format!("These Outsiders are in play: {}.", names.join(", "))
        };
        let body = Revelation::instruct(format!("Tell them: {spoken}"), spoken);
        return minion_action(ctx, body);
    }

    let registry = ctx.registry;
    let seats = ctx.seats;
    let outsider_died = ctx
        .session
        .day
        .deaths
        .iter()
        .filter_map(|id| seats.seat(*id))
        .any(|s| registry.type_of(s) == Some(RoleType::Outsider));
    if outsider_died {
        kill_turn(ctx)
    } else {
        Revelation::rest("No Outsider died today: the Godfather does not wake.")
    }
}

fn devils_advocate(ctx: &mut RenderCtx<'_>) -> Revelation {
    let body = kill_turn(ctx).with_note("They must choose a different player to last night.");
    minion_action(ctx, body)
}

fn assassin(ctx: &mut RenderCtx<'_>) -> Revelation {
    if ctx.seat.capabilities.is_spent(Capability::AssassinKill) {
        return Revelation::rest("The Assassin has used their ability.");
    }
    kill_turn(ctx).with_note("This kill ignores every protection.")
}

fn pit_hag(ctx: &mut RenderCtx<'_>) -> Revelation {
    let mut body = kill_turn(ctx)
        .with_note("The character must not be in play. If a Demon is made, tonight's deaths are arbitrary.");
    if let Some(role) = ctx.choice.role.clone() {
        let in_play = ctx.seats.roles_in_play();
        if in_play.contains(&role) {
            body = body.with_note(format!("{} is already in play: nothing happens.", ctx.name(&role)));
        } else if antagonism_enabled(ctx.seats, &ctx.session.config) {
            if let Some(reason) = antagonism_violation(&role, &in_play, Some(ctx.role.as_str())) {
                body = body.with_note(format!("Not allowed: {reason}."));
            }
        }
    }
    body
}

fn witch(ctx: &mut RenderCtx<'_>) -> Revelation {
    if ctx.seats.alive().count() <= 3 {
        return Revelation::rest("Only three players live: the Witch has no ability.");
    }
    let body = kill_turn(ctx);
    minion_action(ctx, body)
}

fn cerenovus(ctx: &mut RenderCtx<'_>) -> Revelation {
    let mut body = kill_turn(ctx);
    if let (Some(target), Some(role)) = (ctx.target(0), ctx.choice.role.as_ref()) {
        body = body.with_note(format!(
            "Wake {} and tell them they must be mad that they are the {}.",
            ctx.label(target),
            ctx.name(role)
        ));
    }
    minion_action(ctx, body)
}

fn evil_twin(ctx: &mut RenderCtx<'_>) -> Revelation {
    let registry = ctx.registry;
    let goods: Vec<&Seat> = ctx
        .others()
        .filter(|s| !registry.alignment_of(s).is_evil())
        .collect();
    let mut body = kill_turn(ctx).with_note(format!("Good players: {}", roster(ctx, &goods)));
    if let Some(twin) = ctx.target(0) {
        body = body.with_note(format!(
            "Show {} and {} each other's characters.",
            ctx.label(twin),
            ctx.label(ctx.seat)
        ));
    }
    minion_action(ctx, body)
}
