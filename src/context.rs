//! Session-scoped state threaded through information and resolution calls.
//!
//! Nothing in the engine reads global state. Everything that outlives a
//! single action but is not part of a seat (the RNG, the day's nominations,
//! the Vortox flag, the registration cache) lives on `SessionContext`.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::core::{Board, GameRng, Phase, RoleId, RoleType, Seat, SeatId, SessionConfig};
use crate::info::RegistrationResult;

/// What happened during the current day.
///
/// Reset when a new day begins, so the night that follows still sees the
/// day before it (Undertaker, Godfather, Flowergirl, Town Crier).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLedger {
    /// Seat executed today, if the execution killed or was attempted.
    pub executed: Option<SeatId>,
    /// Whether an execution happened at all today (even one that failed).
    pub execution_happened: bool,
    /// Every death today, executions included.
    pub deaths: Vec<SeatId>,
    /// (nominator, nominee) pairs in order.
    pub nominations: Vec<(SeatId, SeatId)>,
    /// Seats that raised a hand on any vote today.
    pub voters: Vec<SeatId>,
}

impl DayLedger {
    pub fn record_nomination(&mut self, nominator: SeatId, nominee: SeatId) {
        self.nominations.push((nominator, nominee));
    }

    pub fn record_vote(&mut self, voter: SeatId) {
        if !self.voters.contains(&voter) {
            self.voters.push(voter);
        }
    }

    pub fn record_death(&mut self, seat: SeatId) {
        if !self.deaths.contains(&seat) {
            self.deaths.push(seat);
        }
    }
}

/// What happened during the current night.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightLedger {
    pub deaths: Vec<SeatId>,
    /// Seats the demon killed tonight.
    pub demon_kills: Vec<SeatId>,
    /// Seats whose ability failed to work tonight (Mathematician count).
    pub failed_abilities: Vec<SeatId>,
}

impl NightLedger {
    pub fn record_death(&mut self, seat: SeatId) {
        if !self.deaths.contains(&seat) {
            self.deaths.push(seat);
        }
    }

    pub fn record_failure(&mut self, seat: SeatId) {
        if !self.failed_abilities.contains(&seat) {
            self.failed_abilities.push(seat);
        }
    }
}

/// The session context.
///
/// ## Example
///
/// ```
/// use clocktower_engine::context::SessionContext;
/// use clocktower_engine::core::{Phase, SessionConfig};
///
/// let mut session = SessionContext::new(SessionConfig::default().with_seed(3));
/// assert_eq!(session.phase, Phase::Setup);
///
/// let epoch = session.decision_epoch();
/// session.begin_decision();
/// assert_eq!(session.decision_epoch(), epoch + 1);
/// ```
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub config: SessionConfig,
    pub rng: GameRng,
    pub phase: Phase,
    /// Nights started so far; the first night is night 1.
    pub night: u32,
    /// Days started so far.
    pub day_number: u32,
    pub day: DayLedger,
    pub tonight: NightLedger,
    /// A living Vortox makes every Townsfolk's information false.
    pub vortox_world: bool,
    /// Drunk seats that have already been given their first false reading.
    pub drunk_first_fake: FxHashSet<SeatId>,
    /// Character types each Balloonist has been shown so far.
    pub balloonist_seen: FxHashMap<SeatId, Vec<RoleType>>,
    /// A Klutz picked an evil player.
    pub klutz_chose_evil: bool,
    /// Day on which the Mastermind's extra day is played.
    pub mastermind_day: Option<u32>,
    registration_cache: FxHashMap<(SeatId, Option<RoleId>), RegistrationResult>,
    epoch: u64,
}

impl SessionContext {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            config,
            rng,
            phase: Phase::Setup,
            night: 0,
            day_number: 0,
            day: DayLedger::default(),
            tonight: NightLedger::default(),
            vortox_world: false,
            drunk_first_fake: FxHashSet::default(),
            balloonist_seen: FxHashMap::default(),
            klutz_chose_evil: false,
            mastermind_day: None,
            registration_cache: FxHashMap::default(),
            epoch: 0,
        }
    }

    #[must_use]
    pub fn is_first_night(&self) -> bool {
        self.phase.is_first_night()
    }

    /// Start a new decision point. Registration results computed before this
    /// call are forgotten.
    pub fn begin_decision(&mut self) {
        self.epoch += 1;
        self.registration_cache.clear();
    }

    #[must_use]
    pub fn decision_epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn cached_registration(
        &self,
        subject: SeatId,
        observer: Option<&RoleId>,
    ) -> Option<&RegistrationResult> {
        self.registration_cache.get(&(subject, observer.cloned()))
    }

    pub(crate) fn cache_registration(
        &mut self,
        subject: SeatId,
        observer: Option<&RoleId>,
        result: RegistrationResult,
    ) {
        self.registration_cache
            .insert((subject, observer.cloned()), result);
    }

    /// Recompute the Vortox flag from the board.
    pub fn refresh_world(&mut self, seats: &[Seat]) {
        self.vortox_world = self.config.vortox_forces_falsehood
            && seats.with_role("vortox").any(|s| s.is_alive());
    }

    /// Begin a new day: the day ledger starts empty.
    pub fn begin_day(&mut self) {
        self.day_number += 1;
        self.day = DayLedger::default();
        self.phase = Phase::Day;
    }

    /// Begin a new night: the night ledger starts empty.
    pub fn begin_night(&mut self) {
        self.night += 1;
        self.tonight = NightLedger::default();
        self.phase = if self.night == 1 {
            Phase::FirstNight
        } else {
            Phase::Night
        };
        self.begin_decision();
    }

    /// Record a death in the ledger for the current phase.
    pub fn record_death(&mut self, seat: SeatId) {
        if self.phase.is_night() {
            self.tonight.record_death(seat);
        } else {
            self.day.record_death(seat);
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_night_numbers() {
        let mut session = SessionContext::default();
        session.begin_night();
        assert_eq!(session.phase, Phase::FirstNight);
        session.begin_day();
        session.begin_night();
        assert_eq!(session.phase, Phase::Night);
        assert_eq!(session.night, 2);
    }

    #[test]
    fn test_day_ledger_resets_at_new_day() {
        let mut session = SessionContext::default();
        session.begin_day();
        session.day.execution_happened = true;
        session.day.record_nomination(SeatId::new(0), SeatId::new(1));
        session.begin_night();
        // The night still sees the day before it
        assert!(session.day.execution_happened);
        session.begin_day();
        assert_eq!(session.day, DayLedger::default());
    }

    #[test]
    fn test_record_death_by_phase() {
        let mut session = SessionContext::default();
        session.begin_night();
        session.record_death(SeatId::new(2));
        session.record_death(SeatId::new(2));
        assert_eq!(session.tonight.deaths, vec![SeatId::new(2)]);

        session.begin_day();
        session.record_death(SeatId::new(3));
        assert_eq!(session.day.deaths, vec![SeatId::new(3)]);
    }

    #[test]
    fn test_refresh_world() {
        let mut session = SessionContext::default();
        let mut seats = vec![Seat::new(SeatId::new(0)).with_role(RoleId::new("vortox"))];
        session.refresh_world(&seats);
        assert!(session.vortox_world);
        seats[0].is_dead = true;
        session.refresh_world(&seats);
        assert!(!session.vortox_world);
    }
}
