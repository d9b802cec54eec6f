//! Phase housekeeping: setup, dusk, night start and dawn.
//!
//! Each step returns an [`ActionOutcome`] like any other resolution, so
//! the caller replaces its board with `updated_seats` and appends the log.

use crate::context::SessionContext;
use crate::core::{
    Board, Duration, LogEntry, Phase, RoleId, RoleType, Seat, SeatChange, SeatDelta, SeatId,
    StatusEffect, StatusKind, StatusOrigin,
};
use crate::error::EngineResult;
use crate::info::ability_disabled;
use crate::roles::{KillRequest, RoleRegistry};
use crate::schedule::apply_setup_jinxes;
use crate::victory::{Checkpoint, WinEvaluator};

use super::kill;
use super::outcome::{ActionOutcome, Turn};

/// Prepare an assigned board for the first night.
///
/// Grants each seat the one-shot capabilities of its role (and of the role
/// it believes it has), picks the Fortune Teller's red herring, and applies
/// setup jinxes. Unknown roles are reported, not rejected.
pub fn setup(seats: &[Seat], session: &mut SessionContext, registry: &RoleRegistry) -> EngineResult<ActionOutcome> {
    let mut turn = Turn::new(seats);

    for seat in seats {
        let mut delta = SeatDelta::new(seat.id);
        for role in seat.role.iter().chain(seat.displayed_role.iter()) {
            match registry.get(role) {
                Some(def) => {
                    for cap in &def.grants {
                        delta = delta.with(SeatChange::Grant(*cap));
                    }
                }
                None => turn.warn(format!("{} has unknown role `{role}`", seat.id)),
            }
        }
        turn.apply(delta)?;
    }

    let fortune_teller = seats.iter().any(|s| s.effective_role().is_some_and(|r| r.is("fortune_teller")));
    if fortune_teller && !seats.iter().any(|s| s.is_red_herring) {
        let good: Vec<SeatId> = seats
            .iter()
            .filter(|s| !registry.alignment_of(s).is_evil())
            .filter(|s| !s.effective_role().is_some_and(|r| r.is("fortune_teller")))
            .map(|s| s.id)
            .collect();
        if let Some(herring) = session.rng.choose(&good).copied() {
            turn.apply(SeatDelta::single(herring, SeatChange::SetRedHerring(true)))?;
            turn.note(LogEntry::private(format!("red herring: {herring}")));
        }
    }

    let (jinxed, notes) = apply_setup_jinxes(&turn.seats);
    turn.apply_all(jinxed)?;
    for note in notes {
        turn.note(note);
    }

    session.phase = Phase::Check;
    session.refresh_world(&turn.seats);
    Ok(turn.finish(None))
}

/// Dusk: "until next dusk" effects end, then the end-of-day win check.
pub fn dusk(seats: &[Seat], session: &mut SessionContext, registry: &RoleRegistry) -> EngineResult<ActionOutcome> {
    session.phase = Phase::Dusk;
    let mut turn = Turn::new(seats);
    let expiring: Vec<SeatDelta> = seats
        .iter()
        .filter(|s| s.statuses.iter().any(|st| st.duration == Duration::UntilNextDusk))
        .map(|s| SeatDelta::single(s.id, SeatChange::Expire(Duration::UntilNextDusk)))
        .collect();
    if !expiring.is_empty() {
        turn.note(LogEntry::private(format!("dusk: effects end on {} seats", expiring.len())));
    }
    turn.apply_all(expiring)?;

    let verdict = WinEvaluator::check(&turn.seats, session, registry, Checkpoint::EndOfDay);
    Ok(turn.finish(verdict))
}

/// Start a night: a new night ledger, the Pukka's previous victim dies,
/// and the No Dashii's neighbours are poisoned afresh.
pub fn night_start(seats: &[Seat], session: &mut SessionContext, registry: &RoleRegistry) -> EngineResult<ActionOutcome> {
    session.begin_night();
    session.refresh_world(seats);
    let mut turn = Turn::new(seats);

    let pukka = RoleId::new("pukka");
    let victims: Vec<(SeatId, Option<SeatId>)> = seats
        .iter()
        .flat_map(|s| {
            s.statuses_of(StatusKind::Poisoned)
                .filter(|st| st.from_role_id("pukka"))
                .map(move |st| (s.id, st.source))
        })
        .collect();
    for (victim, source) in victims {
        turn.apply(SeatDelta::single(
            victim,
            SeatChange::RemoveStatuses {
                kind: Some(StatusKind::Poisoned),
                origin: StatusOrigin::Role(pukka.clone()),
                source,
            },
        ))?;
        let killer = source.and_then(|id| turn.seats.seat(id)).filter(|s| s.is_alive() && !ability_disabled(s));
        match killer.map(|s| s.id) {
            Some(killer) => {
                let request = KillRequest::demon(victim, killer, pukka.clone());
                kill::attempt(&mut turn, session, registry, &request)?;
            }
            None => turn.note(LogEntry::private(format!("{victim} recovers from the Pukka's poison"))),
        }
    }

    let refresh = no_dashii_deltas(&turn.seats, registry);
    turn.apply_all(refresh)?;

    tracing::debug!(night = session.night, "night started");
    let verdict = WinEvaluator::check(&turn.seats, session, registry, Checkpoint::AfterDeath);
    Ok(turn.finish(verdict))
}

/// Dawn: night effects end, protections clear, and the night's deaths are
/// announced.
pub fn dawn(seats: &[Seat], session: &mut SessionContext, registry: &RoleRegistry) -> EngineResult<ActionOutcome> {
    session.phase = Phase::DawnReport;
    let mut turn = Turn::new(seats);

    for seat in seats {
        let mut delta = SeatDelta::new(seat.id);
        if seat.statuses.iter().any(|s| s.duration == Duration::UntilDawn) {
            delta = delta.with(SeatChange::Expire(Duration::UntilDawn));
        }
        if seat.statuses.iter().any(|s| matches!(s.duration, Duration::Nights(_))) {
            delta = delta.with(SeatChange::TickNights);
        }
        if seat.protected_by.is_some() {
            delta = delta.with(SeatChange::Unprotect);
        }
        turn.apply(delta)?;
    }

    let deaths = &session.tonight.deaths;
    let announcement = if deaths.is_empty() {
        "Nobody died in the night.".to_string()
    } else {
        let names: Vec<String> = deaths.iter().map(ToString::to_string).collect();
        format!("Died in the night: {}.", names.join(", "))
    };
    turn.note(LogEntry::public(announcement));

    let verdict = WinEvaluator::check(&turn.seats, session, registry, Checkpoint::AfterDeath);
    Ok(turn.finish(verdict))
}

/// Re-seat the No Dashii's poison on its nearest living Townsfolk in each
/// direction. A dead or impaired No Dashii poisons no one.
pub(crate) fn no_dashii_deltas(seats: &[Seat], registry: &RoleRegistry) -> Vec<SeatDelta> {
    let origin = StatusOrigin::Role(RoleId::new("no_dashii"));
    let mut deltas = Vec::new();

    for demon in seats.with_role("no_dashii") {
        for seat in seats {
            let held = seat
                .statuses
                .iter()
                .any(|s| s.origin == origin && s.source == Some(demon.id));
            if held {
                deltas.push(SeatDelta::single(
                    seat.id,
                    SeatChange::RemoveStatuses {
                        kind: Some(StatusKind::Poisoned),
                        origin: origin.clone(),
                        source: Some(demon.id),
                    },
                ));
            }
        }
        if demon.is_dead || ability_disabled(demon) {
            continue;
        }
        for victim in nearest_townsfolk(seats, registry, demon.id) {
            deltas.push(SeatDelta::single(
                victim,
                SeatChange::AddStatus(
                    StatusEffect::new(StatusKind::Poisoned, origin.clone())
                        .with_source(demon.id)
                        .lasting(Duration::WhileSourceLives),
                ),
            ));
        }
    }
    deltas
}

/// Closest living Townsfolk clockwise and anticlockwise; one seat when
/// both directions meet.
fn nearest_townsfolk(seats: &[Seat], registry: &RoleRegistry, from: SeatId) -> Vec<SeatId> {
    let Some(pos) = seats.position(from) else {
        return Vec::new();
    };
    let n = seats.len();
    let is_townsfolk = |s: &&Seat| s.is_alive() && s.id != from && registry.type_of(s) == Some(RoleType::Townsfolk);
    let left = (1..n).map(|step| &seats[(pos + n - step) % n]).find(is_townsfolk);
    let right = (1..n).map(|step| &seats[(pos + step) % n]).find(is_townsfolk);

    let mut found: Vec<SeatId> = left.into_iter().chain(right).map(|s| s.id).collect();
    found.dedup();
    found
}
