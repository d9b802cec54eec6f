//! Townsfolk and Outsider turns.
//!
//! Information characters compute the true answer from registrations as
//! seen by the learner's role, then ask the context whether tonight's
//! answer must be false. Action characters mostly repeat their instruction
//! with a note about what the choice will do.

use crate::core::{Board, Capability, RoleId, RoleType, Seat, SeatId};
use crate::info::misinfo::{fake_pair, fake_role, not_in_play_role};
use crate::info::night_info::{is_good_type, seat_list, RenderCtx, RenderTable, Revelation};
use crate::schedule::{queue_item, OverrideTable};

pub(super) fn register(table: &mut RenderTable) {
    table.register("washerwoman", washerwoman);
    table.register("librarian", librarian);
    table.register("investigator", investigator);
    table.register("chef", chef);
    table.register("empath", empath);
    table.register("fortune_teller", fortune_teller);
    table.register("undertaker", undertaker);
    table.register("ravenkeeper", ravenkeeper);
    table.register("gambler", gambler);
    table.register("exorcist", exorcist);
    table.register("grandmother", grandmother);
    table.register("chambermaid", chambermaid);
    table.register("snake_charmer", snake_charmer);
    table.register("clockmaker", clockmaker);
    table.register("dreamer", dreamer);
    table.register("mathematician", mathematician);
    table.register("flowergirl", flowergirl);
    table.register("town_crier", town_crier);
    table.register("oracle", oracle);
    table.register("seamstress", seamstress);
    table.register("sage", sage);
    table.register("noble", noble);
    table.register("balloonist", balloonist);
    table.register("steward", steward);
    table.register("knight", knight);
    for acting in ["monk", "innkeeper", "sailor", "courtier", "professor", "butler"] {
        table.register(acting, act);
    }
}

fn pick<'s>(ctx: &mut RenderCtx<'_>, from: &[&'s Seat]) -> Option<&'s Seat> {
    ctx.session.rng.choose(from).copied()
}

fn pick_n<'s>(ctx: &mut RenderCtx<'_>, from: &[&'s Seat], n: usize) -> Vec<&'s Seat> {
    let mut picked: Vec<&Seat> = ctx.session.rng.choose_distinct(from, n).into_iter().copied().collect();
    picked.sort_by_key(|s| s.id);
    picked
}

fn plural(role_type: RoleType) -> &'static str {
    match role_type {
        RoleType::Townsfolk => "Townsfolk",
        RoleType::Outsider => "Outsiders",
        RoleType::Minion => "Minions",
        RoleType::Demon => "Demons",
        RoleType::Traveler => "Travellers",
    }
}

// ============================================================================
// Pair readings: Washerwoman, Librarian, Investigator
// ============================================================================

fn washerwoman(ctx: &mut RenderCtx<'_>) -> Revelation {
    pair_reading(ctx, RoleType::Townsfolk)
}

fn librarian(ctx: &mut RenderCtx<'_>) -> Revelation {
    pair_reading(ctx, RoleType::Outsider)
}

fn investigator(ctx: &mut RenderCtx<'_>) -> Revelation {
    pair_reading(ctx, RoleType::Minion)
}

fn pair_phrase(ctx: &RenderCtx<'_>, a: SeatId, b: SeatId, role: &RoleId) -> String {
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    format!("One of {a} and {b} is the {}.", ctx.name(role))
}

/// "One of these two is the X", from whoever registers as that type.
fn pair_reading(ctx: &mut RenderCtx<'_>, role_type: RoleType) -> Revelation {
    let seats = ctx.seats;
    let me = ctx.seat.id;

    let mut holders: Vec<(SeatId, RoleId)> = Vec::new();
    for seat in seats.iter().filter(|s| s.id != me) {
        let seen = ctx.registration(seat);
        if seen.role_type == Some(role_type) {
            if let Some(role) = seen.apparent_role {
                holders.push((seat.id, role));
            }
        }
    }

    let picked = ctx.session.rng.choose(&holders).cloned();
    let truth = picked.and_then(|(holder, role)| {
        let decoys: Vec<SeatId> = seats
            .iter()
            .map(|s| s.id)
            .filter(|id| *id != me && *id != holder)
            .collect();
        let decoy = ctx.session.rng.choose(&decoys).copied()?;
        Some((holder, decoy, role))
    });
    let truth_text = match &truth {
        Some((a, b, role)) => pair_phrase(ctx, *a, *b, role),
        None => format!("There are no {} in play.", plural(role_type)),
    };

    let reason = ctx.fabrication();
    let shown = match reason {
        Some(why) => {
            let script = ctx.session.config.script.clone();
            let holder = truth.as_ref().map(|(a, _, _)| *a);
            match fake_pair(seats, me, holder, role_type, &script, ctx.registry, &mut ctx.session.rng) {
                Some((a, b, role)) => pair_phrase(ctx, a, b, &role),
                None => return Revelation::unfakeable(truth_text, why),
            }
        }
        None => truth_text.clone(),
    };
    Revelation::told(shown, truth_text, reason)
}

// ============================================================================
// Counts
// ============================================================================

fn chef(ctx: &mut RenderCtx<'_>) -> Revelation {
    let seats = ctx.seats;
    let evil: Vec<bool> = seats.iter().map(|s| ctx.registration(s).is_evil()).collect();
    let n = evil.len();
    let edges = if n == 2 { 1 } else { n };
    let pairs = (0..edges)
        .filter(|i| n > 1 && evil[*i] && evil[(*i + 1) % n])
        .count();
    ctx.count(pairs as u32, (n / 2) as u32, |n| {
        format!("{n} {} of evil players", if n == 1 { "pair" } else { "pairs" })
    })
}

fn empath(ctx: &mut RenderCtx<'_>) -> Revelation {
    let seats = ctx.seats;
    let (left, right) = seats.alive_neighbours(ctx.seat.id);
    let mut neighbours: Vec<&Seat> = left.into_iter().collect();
    if let Some(r) = right.filter(|r| left.map(|l| l.id) != Some(r.id)) {
        neighbours.push(r);
    }
    let evil = neighbours
        .iter()
        .filter(|s| ctx.registration(s).is_evil())
        .count();
    ctx.count(evil as u32, 2, |n| {
        format!("{n} of your alive neighbours {} evil", if n == 1 { "is" } else { "are" })
    })
}

fn clockmaker(ctx: &mut RenderCtx<'_>) -> Revelation {
    let seats = ctx.seats;
    let mut demons = Vec::new();
    let mut minions = Vec::new();
    for seat in seats {
        let seen = ctx.registration(seat);
        if seen.registers_as_demon {
            demons.push(seat.id);
        }
        if seen.registers_as_minion {
            minions.push(seat.id);
        }
    }
    let steps = demons
        .iter()
        .flat_map(|demon| {
            minions
                .iter()
                .filter_map(move |minion| seats.circular_distance(*demon, *minion))
        })
        .min()
        .unwrap_or(0);
    ctx.count(steps as u32, (seats.len() / 2) as u32, |n| {
        format!("The Demon is {n} {} from its nearest Minion", if n == 1 { "step" } else { "steps" })
    })
}

fn mathematician(ctx: &mut RenderCtx<'_>) -> Revelation {
    let me = ctx.seat.id;
    let failed = ctx
        .session
        .tonight
        .failed_abilities
        .iter()
        .filter(|id| **id != me)
        .count();
    let max = ctx.seats.len() as u32;
    ctx.count(failed as u32, max, |n| {
        format!("{n} {} worked abnormally", if n == 1 { "ability" } else { "abilities" })
    })
}

fn oracle(ctx: &mut RenderCtx<'_>) -> Revelation {
    let seats = ctx.seats;
    let dead: Vec<&Seat> = seats.iter().filter(|s| s.is_dead).collect();
    let evil = dead.iter().filter(|s| ctx.registration(s).is_evil()).count();
    ctx.count(evil as u32, dead.len() as u32, |n| {
        format!("{n} dead {} evil", if n == 1 { "player is" } else { "players are" })
    })
}

fn chambermaid(ctx: &mut RenderCtx<'_>) -> Revelation {
    if ctx.choice.targets.len() < 2 {
        return act(ctx);
    }
    let overrides = OverrideTable::standard();
    let registry = ctx.registry;
    let first = ctx.first_night;
    let woke = (0..2)
        .filter_map(|i| ctx.target(i))
        .filter(|s| queue_item(s, registry, &overrides, first, false).is_some())
        .count();
    ctx.count(woke as u32, 2, |n| {
        format!("{n} of them woke tonight due to their ability")
    })
}

// ============================================================================
// Yes or no
// ============================================================================

fn fortune_teller(ctx: &mut RenderCtx<'_>) -> Revelation {
    let (Some(a), Some(b)) = (ctx.target(0), ctx.target(1)) else {
        return act(ctx);
    };
    let demon = ctx.registration(a).registers_as_demon || ctx.registration(b).registers_as_demon;
    ctx.verdict(demon, "Yes, one of them is the Demon", "No, neither is the Demon")
}

fn flowergirl(ctx: &mut RenderCtx<'_>) -> Revelation {
    let seats = ctx.seats;
    let voters = ctx.session.day.voters.clone();
    let voted = voters
        .iter()
        .filter_map(|id| seats.seat(*id))
        .any(|s| ctx.registration(s).registers_as_demon);
    ctx.verdict(voted, "Yes, a Demon voted today", "No Demon voted today")
}

fn town_crier(ctx: &mut RenderCtx<'_>) -> Revelation {
    let seats = ctx.seats;
    let nominators: Vec<SeatId> = ctx.session.day.nominations.iter().map(|(n, _)| *n).collect();
    let nominated = nominators
        .iter()
        .filter_map(|id| seats.seat(*id))
        .any(|s| ctx.registration(s).registers_as_minion);
    ctx.verdict(nominated, "Yes, a Minion nominated today", "No Minion nominated today")
}

fn seamstress(ctx: &mut RenderCtx<'_>) -> Revelation {
    if ctx.seat.capabilities.is_spent(Capability::SeamstressReading) {
        return Revelation::rest("The Seamstress has used their ability.");
    }
    let (Some(a), Some(b)) = (ctx.target(0), ctx.target(1)) else {
        return act(ctx);
    };
    let same = ctx.registration(a).alignment == ctx.registration(b).alignment;
    ctx.verdict(same, "They are the same alignment", "They are different alignments")
}

// ============================================================================
// Characters
// ============================================================================

/// "They are the X", with a random other character when false.
fn role_reading(ctx: &mut RenderCtx<'_>, subject: &Seat) -> Revelation {
    let seen = ctx.registration(subject);
    let Some(truth) = seen.apparent_role.or_else(|| subject.role.clone()) else {
        return Revelation::instruct(format!("{} has no character.", subject.id), "");
    };
    let reason = ctx.fabrication();
    let shown = match reason {
        Some(why) => {
            let script = ctx.session.config.script.clone();
            match fake_role(Some(&truth), &script, ctx.registry, &mut ctx.session.rng) {
                Some(fake) => fake,
                None => {
                    let told = format!("{} is the {}", subject.id, ctx.name(&truth));
                    return Revelation::unfakeable(told, why);
                }
            }
        }
        None => truth.clone(),
    };
    let phrase = |role: &RoleId| format!("{} is the {}", subject.id, ctx.name(role));
    Revelation::told(phrase(&shown), phrase(&truth), reason)
}

fn undertaker(ctx: &mut RenderCtx<'_>) -> Revelation {
    let seats = ctx.seats;
    let Some(executed) = ctx.session.day.executed.and_then(|id| seats.seat(id)) else {
        return Revelation::rest("Nobody was executed today: the Undertaker does not wake.");
    };
    role_reading(ctx, executed)
}

fn ravenkeeper(ctx: &mut RenderCtx<'_>) -> Revelation {
    if !ctx.session.tonight.deaths.contains(&ctx.seat.id) {
        return Revelation::rest("The Ravenkeeper did not die tonight.");
    }
    match ctx.target(0) {
        Some(target) => role_reading(ctx, target),
        None => act(ctx),
    }
}

fn grandmother(ctx: &mut RenderCtx<'_>) -> Revelation {
    let seats = ctx.seats;
    let me = ctx.seat.id;
    let mut goods: Vec<&Seat> = Vec::new();
    for seat in seats.iter().filter(|s| s.id != me) {
        let seen = ctx.registration(seat);
        if !seen.is_evil() && is_good_type(seen.role_type) {
            goods.push(seat);
        }
    }
    match pick(ctx, &goods) {
        Some(grandchild) => role_reading(ctx, grandchild)
            .with_note(format!("Grandchild: {}. If the Demon kills them, the Grandmother dies too.", grandchild.id)),
        None => Revelation::instruct("No good player to show.", ""),
    }
}

/// One good and one evil character, one of which is correct.
fn dreamer(ctx: &mut RenderCtx<'_>) -> Revelation {
    let Some(target) = ctx.target(0) else {
        return act(ctx);
    };
    let seen = ctx.registration(target);
    let (Some(truth), Some(truth_type)) = (seen.apparent_role.clone(), seen.role_type) else {
        return Revelation::instruct(format!("{} has no character.", target.id), "");
    };
    let script = ctx.session.config.script.clone();
    let seats = ctx.seats;
    let registry = ctx.registry;
    let evil_truth = matches!(truth_type, RoleType::Minion | RoleType::Demon);
    let decoy_type = if evil_truth { RoleType::Townsfolk } else { RoleType::Minion };
    let decoy = not_in_play_role(seats, decoy_type, &script, registry, &mut ctx.session.rng);

    let reason = ctx.fabrication();
    let shown_side = match reason {
        Some(_) => not_in_play_role(seats, truth_type, &script, registry, &mut ctx.session.rng),
        None => Some(truth.clone()),
    };
    let phrase = |side: &RoleId| match &decoy {
        Some(decoy) if evil_truth => format!(
            "{} is the {} or the {}",
            target.id,
            ctx.name(decoy),
            ctx.name(side)
        ),
        Some(decoy) => format!("{} is the {} or the {}", target.id, ctx.name(side), ctx.name(decoy)),
        None => format!("{} is the {}", target.id, ctx.name(side)),
    };
    match (shown_side, reason) {
        (None, Some(why)) => Revelation::unfakeable(phrase(&truth), why),
        (shown_side, _) => {
            let shown_side = shown_side.unwrap_or_else(|| truth.clone());
            Revelation::told(phrase(&shown_side), phrase(&truth), reason)
        }
    }
}

// ============================================================================
// Players
// ============================================================================

fn sage(ctx: &mut RenderCtx<'_>) -> Revelation {
    let me = ctx.seat.id;
    if !ctx.session.tonight.demon_kills.contains(&me) {
        return Revelation::rest("The Sage was not killed by the Demon tonight.");
    }
    let seats = ctx.seats;
    let registry = ctx.registry;
    let demons: Vec<&Seat> = seats.iter().filter(|s| registry.is_demon(s)).collect();
    let innocents: Vec<&Seat> = seats
        .iter()
        .filter(|s| s.id != me && !registry.is_demon(s))
        .collect();

    let Some(demon) = pick(ctx, &demons) else {
        return Revelation::instruct("No Demon in play: point to any two players.", "");
    };
    let decoy = pick(ctx, &innocents);
    let mut true_pair: Vec<&Seat> = std::iter::once(demon).chain(decoy).collect();
    true_pair.sort_by_key(|s| s.id);

    let phrase = |pair: &[&Seat]| format!("Your killer is one of {}", seat_list(pair));
    let reason = ctx.fabrication();
    let shown = match reason {
        Some(_) if innocents.len() >= 2 => pick_n(ctx, &innocents, 2),
        Some(why) => return Revelation::unfakeable(phrase(&true_pair), why),
        None => true_pair.clone(),
    };
    Revelation::told(phrase(&shown), phrase(&true_pair), reason)
}

/// Three players, exactly one of them evil.
fn noble(ctx: &mut RenderCtx<'_>) -> Revelation {
    let (evil, good) = split_by_alignment(ctx);
    if evil.is_empty() || good.len() < 2 {
        return Revelation::instruct("Not enough players to show exactly one evil among three.", "");
    }
    let mut trio: Vec<&Seat> = pick_n(ctx, &evil, 1);
    trio.extend(pick_n(ctx, &good, 2));
    trio.sort_by_key(|s| s.id);

    let phrase = |three: &[&Seat]| format!("Exactly one of {} is evil", seat_list(three));
    let reason = ctx.fabrication();
    let shown = match reason {
        Some(_) if good.len() >= 3 => pick_n(ctx, &good, 3),
        Some(_) if evil.len() >= 2 => {
            let mut wrong = pick_n(ctx, &evil, 2);
            wrong.extend(pick_n(ctx, &good, 1));
            wrong.sort_by_key(|s| s.id);
            wrong
        }
        Some(why) => return Revelation::unfakeable(phrase(&trio), why),
        None => trio.clone(),
    };
    Revelation::told(phrase(&shown), phrase(&trio), reason)
}

/// Other seats as the learner sees them: (evil, good).
fn split_by_alignment<'s>(ctx: &mut RenderCtx<'s>) -> (Vec<&'s Seat>, Vec<&'s Seat>) {
    let seats = ctx.seats;
    let me = ctx.seat.id;
    let mut evil = Vec::new();
    let mut good = Vec::new();
    for seat in seats.iter().filter(|s| s.id != me) {
        if ctx.registration(seat).is_evil() {
            evil.push(seat);
        } else {
            good.push(seat);
        }
    }
    (evil, good)
}

fn steward(ctx: &mut RenderCtx<'_>) -> Revelation {
    let (evil, good) = split_by_alignment(ctx);
    let Some(truth) = pick(ctx, &good) else {
        return Revelation::instruct("No good player to show.", "");
    };
    let phrase = |s: &Seat| format!("{} is good", s.id);
    let reason = ctx.fabrication();
    let shown = match reason {
        Some(why) => match pick(ctx, &evil) {
            Some(fake) => fake,
            None => return Revelation::unfakeable(phrase(truth), why),
        },
        None => truth,
    };
    Revelation::told(phrase(shown), phrase(truth), reason)
}

fn knight(ctx: &mut RenderCtx<'_>) -> Revelation {
    let seats = ctx.seats;
    let me = ctx.seat.id;
    let mut demons = Vec::new();
    let mut others = Vec::new();
    for seat in seats.iter().filter(|s| s.id != me) {
        if ctx.registration(seat).registers_as_demon {
            demons.push(seat);
        } else {
            others.push(seat);
        }
    }
    if others.len() < 2 {
        return Revelation::instruct("Not enough players to show two non-Demons.", "");
    }
    let pair = pick_n(ctx, &others, 2);

    let phrase = |two: &[&Seat]| format!("{} are not the Demon", seat_list(two));
    let reason = ctx.fabrication();
    let shown = match (reason, pick(ctx, &demons)) {
        (Some(_), Some(demon)) => {
            let mut wrong = vec![demon];
            wrong.extend(pick_n(ctx, &others, 1));
            wrong.sort_by_key(|s| s.id);
            wrong
        }
        (Some(why), None) => return Revelation::unfakeable(phrase(&pair), why),
        (None, _) => pair.clone(),
    };
    Revelation::told(phrase(&shown), phrase(&pair), reason)
}

/// A player of a different character type to last night.
fn balloonist(ctx: &mut RenderCtx<'_>) -> Revelation {
    let seats = ctx.seats;
    let me = ctx.seat.id;
    let last = ctx
        .session
        .balloonist_seen
        .get(&me)
        .and_then(|seen| seen.last().copied());

    let mut typed: Vec<(&Seat, RoleType)> = Vec::new();
    for seat in seats.iter().filter(|s| s.id != me && s.is_alive()) {
        if let Some(t) = ctx.registration(seat).role_type {
            typed.push((seat, t));
        }
    }
    let fresh: Vec<&Seat> = typed.iter().filter(|(_, t)| Some(*t) != last).map(|(s, _)| *s).collect();
    let repeat: Vec<&Seat> = typed.iter().filter(|(_, t)| Some(*t) == last).map(|(s, _)| *s).collect();

    let Some(truth) = pick(ctx, &fresh) else {
        return Revelation::instruct("No player of a new character type is alive.", "");
    };
    let reason = ctx.fabrication();
    let shown = match reason {
        Some(why) => match pick(ctx, &repeat) {
            Some(fake) => fake,
            None => return Revelation::unfakeable(truth.id.to_string(), why),
        },
        None => truth,
    };
    let type_of = |s: &Seat| typed.iter().find(|(t, _)| t.id == s.id).map(|(_, t)| *t);
    if let Some(t) = type_of(shown) {
        ctx.session.balloonist_seen.entry(me).or_default().push(t);
    }
    let phrase = |s: &Seat| s.id.to_string();
    let mut body = Revelation::told(phrase(shown), phrase(truth), reason);
    if let Some(t) = type_of(truth) {
        body = body.with_note(format!("{} registers as {}.", truth.id, t.label()));
    }
    body
}

// ============================================================================
// Actions
// ============================================================================

/// The instruction, with a note on what the current choice will do.
fn act(ctx: &mut RenderCtx<'_>) -> Revelation {
    let body = Revelation::instruct(ctx.instruction(), ctx.instruction());
    let Some(target) = ctx.target(0) else {
        return body;
    };
    match ctx.role.as_str() {
        "monk" => body.with_note(format!("{} is safe from the Demon tonight.", ctx.label(target))),
        "butler" => body.with_note(format!("Master: {}.", ctx.label(target))),
        "sailor" => body.with_note(format!("{} is drunk until dusk.", ctx.label(target))),
        "professor" if ctx.registry.type_of(target) == Some(RoleType::Townsfolk) => {
            body.with_note(format!("{} is a Townsfolk and returns to life.", ctx.label(target)))
        }
        "professor" => body.with_note(format!("{} is not a Townsfolk: nothing happens.", ctx.label(target))),
        "innkeeper" => match ctx.target(1) {
            Some(second) => body.with_note(format!(
                "{} and {} cannot die tonight; {} is drunk until dusk.",
                target.id,
                second.id,
                second.id
            )),
            None => body,
        },
        _ => body,
    }
}

fn gambler(ctx: &mut RenderCtx<'_>) -> Revelation {
    let body = Revelation::instruct(ctx.instruction(), ctx.instruction());
    match (ctx.target(0), ctx.choice.role.as_ref()) {
        (Some(target), Some(guess)) if target.role.as_ref() == Some(guess) => {
            body.with_note("The guess is correct.")
        }
        (Some(_), Some(_)) => body.with_note("The guess is wrong: the Gambler dies."),
        _ => body,
    }
}

fn exorcist(ctx: &mut RenderCtx<'_>) -> Revelation {
    let body = Revelation::instruct(ctx.instruction(), ctx.instruction())
        .with_note("They must choose a different player to last night.");
    match ctx.target(0) {
        Some(target) if ctx.registry.is_demon(target) => body.with_note(format!(
            "{} is the Demon: wake them to learn the Exorcist; they do not wake tonight.",
            ctx.label(target)
        )),
        _ => body,
    }
}

fn snake_charmer(ctx: &mut RenderCtx<'_>) -> Revelation {
    let body = Revelation::instruct(ctx.instruction(), ctx.instruction());
    match ctx.target(0) {
        Some(target) if ctx.registry.is_demon(target) => body.with_note(format!(
            "{} is the Demon: swap characters and alignments, then the old Demon is poisoned.",
            ctx.label(target)
        )),
        Some(target) => body.with_note(format!("{} is not the Demon: nothing happens.", ctx.label(target))),
        None => body,
    }
}
