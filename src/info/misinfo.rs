//! Deliberately false information.
//!
//! When a learner is impaired the moderator still gives an answer, just a
//! wrong one that looks plausible: a miscounted number, a swapped pair, a
//! flipped verdict. `should_fabricate` decides whether tonight's answer is
//! false; the generators produce the false value.

use serde::{Deserialize, Serialize};

use crate::context::SessionContext;
use crate::core::{Board, GameRng, RoleId, RoleType, Script, Seat, SeatId};
use crate::roles::{InfoCadence, RoleRegistry};

use super::poison::{is_drunk, is_poisoned};

/// Why an answer is false.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FakeReason {
    /// A living Vortox corrupts Townsfolk information.
    Vortox,
    Poisoned,
    Drunk,
}

impl FakeReason {
    /// The answer must differ from the truth, not merely may.
    #[must_use]
    pub const fn forces_falsehood(self) -> bool {
        matches!(self, FakeReason::Vortox)
    }
}

impl std::fmt::Display for FakeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FakeReason::Vortox => f.write_str("Vortox"),
            FakeReason::Poisoned => f.write_str("poisoned"),
            FakeReason::Drunk => f.write_str("drunk"),
        }
    }
}

/// Decide whether the information this seat learns right now is false.
///
/// - Vortox world and a Townsfolk learner: always.
/// - Poisoned: with `poisoned_fabrication_chance`.
/// - Drunk, one-off information: always.
/// - Drunk, nightly information: the first time, then with
///   `drunk_repeat_fabrication_chance`.
///
/// Rolls consume the session RNG; the Drunk's first-time marker is updated.
pub fn should_fabricate(
    seat: &Seat,
    role: &RoleId,
    session: &mut SessionContext,
    registry: &RoleRegistry,
) -> Option<FakeReason> {
    let learner_type = registry.get(role).map(|r| r.role_type);
    if session.vortox_world && learner_type == Some(RoleType::Townsfolk) {
        return Some(FakeReason::Vortox);
    }

    if is_poisoned(seat) {
        let chance = session.config.poisoned_fabrication_chance;
        return session.rng.gen_bool(chance).then_some(FakeReason::Poisoned);
    }

    if is_drunk(seat) || seat.has_role("drunk") {
        let single_use = registry.get(role).is_some_and(|def| match def.info {
            InfoCadence::Once => true,
            InfoCadence::EveryNight => false,
            InfoCadence::None => def.is_first_night_only(),
        });
        if single_use || session.drunk_first_fake.insert(seat.id) {
            return Some(FakeReason::Drunk);
        }
        let chance = session.config.drunk_repeat_fabrication_chance;
        return session.rng.gen_bool(chance).then_some(FakeReason::Drunk);
    }

    None
}

/// A false yes/no.
///
/// A true "yes" turns into "no" 70% of the time; a true "no" turns into
/// "yes" 80% of the time. Under the Vortox the answer is always flipped.
pub fn fake_verdict(truth: bool, reason: FakeReason, rng: &mut GameRng) -> bool {
    if reason.forces_falsehood() {
        return !truth;
    }
    if truth {
        !rng.gen_bool(0.7)
    } else {
        rng.gen_bool(0.8)
    }
}

/// A false count, always different from `truth`.
///
/// Small truths (0 to 2) are replaced from `0..=2`; larger ones from
/// `0..=max`.
///
/// ```
/// use clocktower_engine::core::GameRng;
/// use clocktower_engine::info::misinfo::fake_count;
///
/// let mut rng = GameRng::new(4);
/// for truth in 0..=2 {
///     let shown = fake_count(truth, 2, &mut rng);
///     assert_ne!(shown, truth);
///     assert!(shown <= 2);
/// }
/// ```
pub fn fake_count(truth: u32, max: u32, rng: &mut GameRng) -> u32 {
    let ceiling = if truth <= 2 { 2 } else { max.max(truth) };
    let options: Vec<u32> = (0..=ceiling).filter(|v| *v != truth).collect();
    rng.choose(&options).copied().unwrap_or(truth + 1)
}

/// A random script character of a type that nobody holds.
pub fn not_in_play_role(
    seats: &[Seat],
    role_type: RoleType,
    script: &Script,
    registry: &RoleRegistry,
    rng: &mut GameRng,
) -> Option<RoleId> {
    let in_play = seats.roles_in_play();
    let mut pool: Vec<RoleId> = script
        .roles()
        .into_iter()
        .filter(|r| registry.get(r).is_some_and(|def| def.role_type == role_type))
        .filter(|r| !in_play.contains(r))
        .collect();
    if pool.is_empty() {
        pool = registry
            .of_type(role_type)
            .map(|def| def.id.clone())
            .filter(|r| !in_play.contains(r))
            .collect();
        // Registry iteration order is unspecified
        pool.sort();
    }
    rng.choose(&pool).cloned()
}

/// A random character other than `actual`, from the script pool.
pub fn fake_role(actual: Option<&RoleId>, script: &Script, registry: &RoleRegistry, rng: &mut GameRng) -> Option<RoleId> {
    let mut pool: Vec<RoleId> = script
        .roles()
        .into_iter()
        .filter(|r| registry.contains(r.as_str()) && Some(r) != actual)
        .collect();
    if pool.is_empty() {
        pool = registry
            .iter()
            .map(|def| def.id.clone())
            .filter(|r| Some(r) != actual)
            .collect();
        pool.sort();
    }
    rng.choose(&pool).cloned()
}

/// A false "one of these two is the X" reading.
///
/// Two seats that are neither the learner nor `true_holder`, and a
/// not-in-play character of the same type.
pub fn fake_pair(
    seats: &[Seat],
    learner: SeatId,
    true_holder: Option<SeatId>,
    role_type: RoleType,
    script: &Script,
    registry: &RoleRegistry,
    rng: &mut GameRng,
) -> Option<(SeatId, SeatId, RoleId)> {
    let candidates: Vec<SeatId> = seats
        .iter()
        .map(|s| s.id)
        .filter(|id| *id != learner && Some(*id) != true_holder)
        .collect();
    let picked = rng.choose_distinct(&candidates, 2);
    let [a, b] = picked.as_slice() else {
        return None;
    };
    let role = not_in_play_role(seats, role_type, script, registry, rng)?;
    Some((**a, **b, role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SessionConfig, StatusEffect, StatusKind};

    fn board(roles: &[&'static str]) -> Vec<Seat> {
        roles
            .iter()
            .enumerate()
            .map(|(i, r)| Seat::new(SeatId::new(i as u8)).with_role(RoleId::new(r)))
            .collect()
    }

    #[test]
    fn test_healthy_is_true() {
        let registry = RoleRegistry::standard();
        let seats = board(&["empath"]);
        let mut session = SessionContext::default();
        assert_eq!(should_fabricate(&seats[0], &RoleId::new("empath"), &mut session, &registry), None);
    }

    #[test]
    fn test_vortox_forces() {
        let registry = RoleRegistry::standard();
        let seats = board(&["empath", "vortox"]);
        let mut session = SessionContext::default();
        session.refresh_world(&seats);
        for _ in 0..5 {
            assert_eq!(
                should_fabricate(&seats[0], &RoleId::new("empath"), &mut session, &registry),
                Some(FakeReason::Vortox)
            );
        }
        // Evil learners keep accurate information
        assert_eq!(should_fabricate(&seats[1], &RoleId::new("vortox"), &mut session, &registry), None);
    }

    #[test]
    fn test_poison_certain_at_full_chance() {
        let registry = RoleRegistry::standard();
        let mut seats = board(&["chef"]);
        seats[0].add_status(StatusEffect::from_role(StatusKind::Poisoned, RoleId::new("poisoner")));
        let mut session = SessionContext::new(SessionConfig::default().with_fabrication_chances(1.0, 0.5));
        assert_eq!(
            should_fabricate(&seats[0], &RoleId::new("chef"), &mut session, &registry),
            Some(FakeReason::Poisoned)
        );
    }

    #[test]
    fn test_drunk_every_night_first_time_then_rolls() {
        let registry = RoleRegistry::standard();
        let seats = vec![Seat::new(SeatId::new(0))
            .with_role(RoleId::new("drunk"))
            .with_displayed_role(RoleId::new("empath"))];
        let empath = RoleId::new("empath");
        let mut session = SessionContext::new(SessionConfig::default().with_fabrication_chances(0.95, 0.0));
        assert_eq!(should_fabricate(&seats[0], &empath, &mut session, &registry), Some(FakeReason::Drunk));
        assert!(session.drunk_first_fake.contains(&SeatId::new(0)));
        assert_eq!(should_fabricate(&seats[0], &empath, &mut session, &registry), None);
    }

    #[test]
    fn test_drunk_single_use_always_false() {
        let registry = RoleRegistry::standard();
        let seats = vec![Seat::new(SeatId::new(0))
            .with_role(RoleId::new("drunk"))
            .with_displayed_role(RoleId::new("washerwoman"))];
        let mut session = SessionContext::new(SessionConfig::default().with_fabrication_chances(0.95, 0.0));
        for _ in 0..3 {
            assert_eq!(
                should_fabricate(&seats[0], &RoleId::new("washerwoman"), &mut session, &registry),
                Some(FakeReason::Drunk)
            );
        }
    }

    #[test]
    fn test_vortox_verdict_always_flips() {
        let mut rng = GameRng::new(8);
        for _ in 0..20 {
            assert!(!fake_verdict(true, FakeReason::Vortox, &mut rng));
            assert!(fake_verdict(false, FakeReason::Vortox, &mut rng));
        }
    }

    #[test]
    fn test_fake_count_large() {
        let mut rng = GameRng::new(2);
        for _ in 0..20 {
            let shown = fake_count(5, 7, &mut rng);
            assert_ne!(shown, 5);
            assert!(shown <= 7);
        }
    }

    #[test]
    fn test_fake_pair_avoids_truth() {
        let registry = RoleRegistry::standard();
        let seats = board(&["washerwoman", "chef", "empath", "imp", "monk"]);
        let mut rng = GameRng::new(11);
        for _ in 0..10 {
            let (a, b, role) = fake_pair(
                &seats,
                SeatId::new(0),
                Some(SeatId::new(1)),
                RoleType::Townsfolk,
                &Script::TroubleBrewing,
                &registry,
                &mut rng,
            )
            .unwrap();
            assert_ne!(a, b);
            for id in [a, b] {
                assert!(id != SeatId::new(0) && id != SeatId::new(1));
            }
            assert!(!seats.in_play(role.as_str()));
            assert_eq!(registry.get(&role).map(|r| r.role_type), Some(RoleType::Townsfolk));
        }
    }

    #[test]
    fn test_fake_role_differs() {
        let registry = RoleRegistry::standard();
        let mut rng = GameRng::new(3);
        let imp = RoleId::new("imp");
        for _ in 0..10 {
            let shown = fake_role(Some(&imp), &Script::TroubleBrewing, &registry, &mut rng).unwrap();
            assert_ne!(shown, imp);
        }
    }
}
