//! Registration: how a seat appears to an observing ability.
//!
//! The answer depends on the observer, not only on the subject. A Spy can
//! look good to the Empath and evil to the Ogre in the same moment, and the
//! Fortune Teller's red herring looks like a Demon only to the Fortune
//! Teller. Results are cached per `(subject, observer)` until the session
//! starts a new decision point, so one reveal never contradicts itself.

use serde::{Deserialize, Serialize};

use crate::context::SessionContext;
use crate::core::{Alignment, DisguiseMode, GameRng, RoleId, RoleType, Seat};
use crate::roles::RoleRegistry;

use super::poison::ability_disabled;

/// How a subject registers to an observer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub alignment: Alignment,
    /// Apparent category; `None` for a seat with no role.
    pub role_type: Option<RoleType>,
    pub registers_as_demon: bool,
    pub registers_as_minion: bool,
    /// The character shown when the observer learns a character.
    pub apparent_role: Option<RoleId>,
}

impl RegistrationResult {
    #[must_use]
    pub fn is_evil(&self) -> bool {
        self.alignment.is_evil()
    }

    fn disguised(alignment: Alignment, role_type: RoleType, apparent_role: Option<RoleId>) -> Self {
        Self {
            alignment,
            role_type: Some(role_type),
            registers_as_demon: role_type == RoleType::Demon,
            registers_as_minion: role_type == RoleType::Minion,
            apparent_role,
        }
    }
}

/// How `subject` registers to a seat acting as `observer`.
///
/// `observer = None` asks for the plain truth: disguises only fool
/// abilities.
///
/// ## Example
///
/// ```
/// use clocktower_engine::context::SessionContext;
/// use clocktower_engine::core::{Alignment, DisguiseMode, RoleId, Script, Seat, SeatId, SessionConfig};
/// use clocktower_engine::info::registration;
/// use clocktower_engine::roles::RoleRegistry;
///
/// let registry = RoleRegistry::standard();
/// let config = SessionConfig::new(Script::TroubleBrewing).with_disguise(DisguiseMode::Forced, 1.0);
/// let mut session = SessionContext::new(config);
/// let seats = vec![Seat::new(SeatId::new(0)).with_role(RoleId::new("spy"))];
///
/// let empath = RoleId::new("empath");
/// let seen = registration(&seats, &seats[0], Some(&empath), &mut session, &registry);
/// assert_eq!(seen.alignment, Alignment::Good);
///
/// let truth = registration(&seats, &seats[0], None, &mut session, &registry);
/// assert_eq!(truth.alignment, Alignment::Evil);
/// ```
pub fn registration(
    seats: &[Seat],
    subject: &Seat,
    observer: Option<&RoleId>,
    session: &mut SessionContext,
    registry: &RoleRegistry,
) -> RegistrationResult {
    if let Some(cached) = session.cached_registration(subject.id, observer) {
        return cached.clone();
    }
    let result = compute(seats, subject, observer, session, registry);
    session.cache_registration(subject.id, observer, result.clone());
    result
}

/// Shorthand: does `subject` register as evil to `observer`.
pub fn registers_evil(
    seats: &[Seat],
    subject: &Seat,
    observer: Option<&RoleId>,
    session: &mut SessionContext,
    registry: &RoleRegistry,
) -> bool {
    registration(seats, subject, observer, session, registry).is_evil()
}

fn truth(subject: &Seat, registry: &RoleRegistry) -> RegistrationResult {
    let role_type = if subject.is_demon_successor {
        Some(RoleType::Demon)
    } else {
        registry.type_of(subject)
    };
    RegistrationResult {
        alignment: registry.alignment_of(subject),
        role_type,
        registers_as_demon: registry.is_demon(subject),
        registers_as_minion: role_type == Some(RoleType::Minion) || subject.has_role("legion"),
        apparent_role: subject.role.clone(),
    }
}

fn compute(
    seats: &[Seat],
    subject: &Seat,
    observer: Option<&RoleId>,
    session: &SessionContext,
    registry: &RoleRegistry,
) -> RegistrationResult {
    let mut result = truth(subject, registry);
    let Some(observer) = observer else {
        return result;
    };

    if observer.is("fortune_teller") && subject.is_red_herring {
        result.registers_as_demon = true;
        return result;
    }

    // A disguise is an ability: it fails while the disguised seat is impaired
    if ability_disabled(subject) {
        return result;
    }

    let mut rng = session.rng.for_context(&format!(
        "registration/{}/{}/{}",
        session.decision_epoch(),
        subject.id.0,
        observer
    ));
    let mode = session.config.disguise_mode;

    if subject.has_role("spy") {
        if observer.is("ogre") {
            return result;
        }
        let disguised = match mode {
            DisguiseMode::Off => false,
            DisguiseMode::Forced => true,
            DisguiseMode::Default => rng.gen_bool(session.config.disguise_probability),
        };
        tracing::trace!(seat = %subject.id, observer = %observer, disguised, "spy registration");
        if disguised {
            let role_type = if rng.gen_bool(0.5) {
                RoleType::Townsfolk
            } else {
                RoleType::Outsider
            };
            let apparent = disguise_role(seats, role_type, session, registry, &mut rng);
            result = RegistrationResult::disguised(Alignment::Good, role_type, apparent);
        }
    } else if subject.has_role("recluse") {
        let shown = match mode {
            DisguiseMode::Off => None,
            DisguiseMode::Forced => Some(if rng.gen_bool(0.5) {
                RoleType::Minion
            } else {
                RoleType::Demon
            }),
            DisguiseMode::Default => match rng.gen_index(3) {
                0 => Some(RoleType::Minion),
                1 => Some(RoleType::Demon),
                _ => None,
            },
        };
        tracing::trace!(seat = %subject.id, observer = %observer, ?shown, "recluse registration");
        if let Some(role_type) = shown {
            let apparent = disguise_role(seats, role_type, session, registry, &mut rng);
            result = RegistrationResult::disguised(Alignment::Evil, role_type, apparent);
        }
    }
    result
}

/// A character of the given type to show for a disguised seat: the in-play
/// one for evil types, a not-in-play script character otherwise.
fn disguise_role(
    seats: &[Seat],
    role_type: RoleType,
    session: &SessionContext,
    registry: &RoleRegistry,
    rng: &mut GameRng,
) -> Option<RoleId> {
    if matches!(role_type, RoleType::Minion | RoleType::Demon) {
        if let Some(real) = seats
            .iter()
            .filter(|s| registry.type_of(s) == Some(role_type))
            .find_map(|s| s.role.clone())
        {
            return Some(real);
        }
    }
    super::misinfo::not_in_play_role(seats, role_type, &session.config.script, registry, rng)
}
