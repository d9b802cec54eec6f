//! Driving one night, turn by turn.
//!
//! [`NightSession`] owns the working board and the night queue. The
//! moderator walks it with `info` → `resolve_current` → `advance`,
//! answering any prompt in between, then `finish`es at dawn or `abort`s to
//! get the board back untouched.
//!
//! # Key Types
//!
//! - [`NightSession`] - Queue, working seats, prompt and latched verdict
//! - [`NightStatus`] - A snapshot for the presentation layer
//! - [`NightReport`] - What `finish` hands back

use serde::{Deserialize, Serialize};

use crate::context::SessionContext;
use crate::core::Seat;
use crate::error::{EngineError, EngineResult};
use crate::info::{night_info, NightInfo, RenderTable};
use crate::record::SessionLog;
use crate::resolution::{answer_prompt, dawn, night_start, resolve_action, ActionOutcome, PendingPrompt, PromptAnswer};
use crate::roles::{ActionChoice, RoleRegistry};
use crate::schedule::{build_queue, queue_item, NightQueue, NightQueueItem, OverrideTable};
use crate::victory::Verdict;

/// Where the night stands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightStatus {
    pub night: u32,
    pub cursor: usize,
    pub total: usize,
    pub current: Option<NightQueueItem>,
    pub prompt: Option<PendingPrompt>,
    pub verdict: Option<Verdict>,
    /// The current turn has been resolved.
    pub resolved: bool,
    /// Every turn has been taken.
    pub done: bool,
}

/// The board at dawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NightReport {
    pub seats: Vec<Seat>,
    pub log: SessionLog,
    pub verdict: Option<Verdict>,
}

/// One night in progress.
///
/// ## Example
///
/// ```
/// use clocktower_engine::context::SessionContext;
/// use clocktower_engine::core::{RoleId, Seat, SeatId};
/// use clocktower_engine::roles::{ActionChoice, RoleRegistry};
/// use clocktower_engine::session::NightSession;
///
/// let registry = RoleRegistry::standard();
/// let mut session = SessionContext::default();
/// session.begin_night();
/// session.begin_day();
/// let seats = vec![
///     Seat::new(SeatId::new(0)).with_role(RoleId::new("imp")),
///     Seat::new(SeatId::new(1)).with_role(RoleId::new("chef")),
///     Seat::new(SeatId::new(2)).with_role(RoleId::new("empath")),
///     Seat::new(SeatId::new(3)).with_role(RoleId::new("soldier")),
/// ];
///
/// let mut night = NightSession::start(&seats, &mut session, &registry).unwrap();
/// assert_eq!(night.current().map(|t| t.seat), Some(SeatId::new(0)));
///
/// night.resolve_current(&ActionChoice::seats(&[SeatId::new(1)]), &mut session, &registry).unwrap();
/// night.advance(&registry).unwrap();
/// let report = night.finish(&mut session, &registry).unwrap();
/// assert!(report.seats[1].is_dead);
/// ```
#[derive(Clone, Debug)]
pub struct NightSession {
    original: Vec<Seat>,
    seats: Vec<Seat>,
    queue: NightQueue,
    prompt: Option<PendingPrompt>,
    verdict: Option<Verdict>,
    log: SessionLog,
    night: u32,
    first_night: bool,
    /// The turn under the cursor has been resolved.
    resolved: bool,
}

impl NightSession {
    /// Begin the next night: night-start effects run, then the queue is
    /// built from the resulting board.
    pub fn start(seats: &[Seat], session: &mut SessionContext, registry: &RoleRegistry) -> EngineResult<Self> {
        let opening = night_start(seats, session, registry)?;
        let first_night = session.is_first_night();
        let mut night = Self {
            original: seats.to_vec(),
            seats: Vec::new(),
            queue: NightQueue::default(),
            prompt: None,
            verdict: None,
            log: SessionLog::new(),
            night: session.night,
            first_night,
            resolved: false,
        };
        night.absorb(opening, session, registry);

        night.queue = build_queue(&night.seats, registry, first_night);
        let start = night.queue.next_valid_index(0, &night.seats, registry).unwrap_or(night.queue.len());
        night.queue.seek(start);
        tracing::debug!(night = night.night, turns = night.queue.len(), "night session started");
        Ok(night)
    }

    /// The turn being resolved, or `None` once the queue is done.
    #[must_use]
    pub fn current(&self) -> Option<&NightQueueItem> {
        self.queue.current()
    }

    #[must_use]
    pub fn queue(&self) -> &NightQueue {
        &self.queue
    }

    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    #[must_use]
    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&PendingPrompt> {
        self.prompt.as_ref()
    }

    #[must_use]
    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// What to say and show for the current turn.
    pub fn info(
        &self,
        choice: &ActionChoice,
        session: &mut SessionContext,
        registry: &RoleRegistry,
        table: &RenderTable,
    ) -> EngineResult<NightInfo> {
        let turn = self.current().ok_or(EngineError::QueueExhausted)?;
        night_info(&self.seats, turn.seat, choice, session, registry, table)
    }

    /// Resolve the current turn with the moderator's choice.
    ///
    /// On error nothing changes and the turn can be retried. Once it has
    /// resolved, the turn cannot be resolved again until `advance`.
    pub fn resolve_current(
        &mut self,
        choice: &ActionChoice,
        session: &mut SessionContext,
        registry: &RoleRegistry,
    ) -> EngineResult<ActionOutcome> {
        self.ready()?;
        let seat = self.current().ok_or(EngineError::QueueExhausted)?.seat;
        if self.resolved {
            return Err(EngineError::TurnAlreadyResolved(seat));
        }
        let outcome = resolve_action(&self.seats, seat, choice, session, registry)?;
        self.resolved = true;
        self.absorb(outcome.clone(), session, registry);
        Ok(outcome)
    }

    /// Answer the outstanding prompt.
    pub fn answer(
        &mut self,
        answer: &PromptAnswer,
        session: &mut SessionContext,
        registry: &RoleRegistry,
    ) -> EngineResult<ActionOutcome> {
        let prompt = self.prompt.clone().ok_or(EngineError::NoPendingPrompt)?;
        let outcome = answer_prompt(&self.seats, &prompt, answer, session, registry)?;
        self.prompt = None;
        self.absorb(outcome.clone(), session, registry);
        Ok(outcome)
    }

    /// Move to the next seat that can still act.
    pub fn advance(&mut self, registry: &RoleRegistry) -> EngineResult<Option<&NightQueueItem>> {
        self.ready()?;
        let next = self
            .queue
            .next_valid_index(self.queue.cursor() + 1, &self.seats, registry)
            .unwrap_or(self.queue.len());
        self.queue.seek(next);
        self.resolved = false;
        Ok(self.queue.current())
    }

    #[must_use]
    pub fn status(&self) -> NightStatus {
        NightStatus {
            night: self.night,
            cursor: self.queue.cursor(),
            total: self.queue.len(),
            current: self.queue.current().cloned(),
            prompt: self.prompt.clone(),
            verdict: self.verdict.clone(),
            resolved: self.resolved,
            done: self.queue.current().is_none(),
        }
    }

    /// End the night: dawn effects run and the board is handed back.
    ///
    /// Turns still queued are skipped. A pending prompt must be answered
    /// first.
    pub fn finish(mut self, session: &mut SessionContext, registry: &RoleRegistry) -> EngineResult<NightReport> {
        if self.prompt.is_some() {
            return Err(EngineError::PromptOutstanding);
        }
        let skipped = self.queue.len().saturating_sub(self.queue.cursor());
        if skipped > 0 {
            tracing::debug!(skipped, "night finished early");
        }
        let morning = dawn(&self.seats, session, registry)?;
        self.absorb(morning, session, registry);
        Ok(NightReport {
            seats: self.seats,
            log: self.log,
            verdict: self.verdict,
        })
    }

    /// Throw the night away and return the board as it was at the start.
    #[must_use]
    pub fn abort(self) -> Vec<Seat> {
        tracing::debug!(night = self.night, "night aborted");
        self.original
    }

    fn ready(&self) -> EngineResult<()> {
        if self.verdict.is_some() {
            return Err(EngineError::GameOver);
        }
        if self.prompt.is_some() {
            return Err(EngineError::PromptOutstanding);
        }
        Ok(())
    }

    /// Take over an outcome's board, log, prompt, requeues and verdict.
    fn absorb(&mut self, outcome: ActionOutcome, session: &SessionContext, registry: &RoleRegistry) {
        self.seats = outcome.updated_seats;
        self.log.extend(session.phase, self.night, outcome.log);
        if let Some(prompt) = outcome.pending_prompt {
            self.prompt = Some(prompt);
        }

        let overrides = OverrideTable::standard();
        for id in outcome.requeue {
            let item = self
                .seats
                .iter()
                .find(|s| s.id == id)
                .and_then(|s| queue_item(s, registry, &overrides, self.first_night, true));
            if let Some(item) = item {
                if self.queue.insert_after_current(item) {
                    tracing::debug!(seat = %id, "requeued after current turn");
                }
            }
        }

        if self.verdict.is_none() {
            self.verdict = outcome.verdict;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RoleId, SeatId, StatusEffect, StatusKind};

    fn board(roles: &[&'static str]) -> Vec<Seat> {
        roles
            .iter()
            .enumerate()
            .map(|(i, r)| Seat::new(SeatId::new(i as u8)).with_role(RoleId::new(r)))
            .collect()
    }

    fn second_night() -> SessionContext {
        let mut session = SessionContext::default();
        session.begin_night();
        session.begin_day();
        session
    }

    #[test]
    fn test_abort_returns_original() {
        let registry = RoleRegistry::standard();
        let mut session = second_night();
        let seats = board(&["imp", "chef", "empath", "monk"]);
        let mut night = NightSession::start(&seats, &mut session, &registry).unwrap();
        while night.current().is_some_and(|t| !t.role.is("imp")) {
            night.advance(&registry).unwrap();
        }
        night
            .resolve_current(&ActionChoice::seats(&[SeatId::new(1)]), &mut session, &registry)
            .unwrap();
        assert!(night.seats()[1].is_dead);
        assert_eq!(night.abort(), seats);
    }

    #[test]
    fn test_prompt_blocks_advance() {
        let registry = RoleRegistry::standard();
        let mut session = second_night();
        let seats = board(&["imp", "mayor", "chef", "empath"]);
        let mut night = NightSession::start(&seats, &mut session, &registry).unwrap();
        assert!(night.current().is_some_and(|t| t.role.is("imp")));
        night
            .resolve_current(&ActionChoice::seats(&[SeatId::new(1)]), &mut session, &registry)
            .unwrap();
        assert!(night.prompt().is_some());
        assert_eq!(night.advance(&registry).unwrap_err(), EngineError::PromptOutstanding);

        night.answer(&PromptAnswer::Seat(SeatId::new(3)), &mut session, &registry).unwrap();
        assert!(night.prompt().is_none());
        assert!(night.seats()[3].is_dead);
        night.advance(&registry).unwrap();
    }

    #[test]
    fn test_answer_without_prompt() {
        let registry = RoleRegistry::standard();
        let mut session = second_night();
        let seats = board(&["imp", "chef", "empath"]);
        let mut night = NightSession::start(&seats, &mut session, &registry).unwrap();
        let err = night.answer(&PromptAnswer::Nobody, &mut session, &registry).unwrap_err();
        assert_eq!(err, EngineError::NoPendingPrompt);
    }

    #[test]
    fn test_ravenkeeper_wakes_after_death() {
        let registry = RoleRegistry::standard();
        let mut session = second_night();
        let seats = board(&["imp", "ravenkeeper", "chef", "empath", "monk"]);
        let mut night = NightSession::start(&seats, &mut session, &registry).unwrap();
        assert!(!night.queue().iter().any(|t| t.role.is("ravenkeeper")));
        while night.current().is_some_and(|t| !t.role.is("imp")) {
            night.advance(&registry).unwrap();
        }
        night
            .resolve_current(&ActionChoice::seats(&[SeatId::new(1)]), &mut session, &registry)
            .unwrap();
        let next = night.advance(&registry).unwrap().cloned();
        assert_eq!(next.map(|t| t.seat), Some(SeatId::new(1)));
    }

    #[test]
    fn test_turn_resolves_once() {
        let registry = RoleRegistry::standard();
        let mut session = second_night();
        let seats = board(&["imp", "chef", "empath", "monk", "soldier"]);
        let mut night = NightSession::start(&seats, &mut session, &registry).unwrap();
        while night.current().is_some_and(|t| !t.role.is("imp")) {
            night.advance(&registry).unwrap();
        }
        night
            .resolve_current(&ActionChoice::seats(&[SeatId::new(1)]), &mut session, &registry)
            .unwrap();
        assert!(night.status().resolved);
        let err = night
            .resolve_current(&ActionChoice::seats(&[SeatId::new(2)]), &mut session, &registry)
            .unwrap_err();
        assert_eq!(err, EngineError::TurnAlreadyResolved(SeatId::new(0)));
        assert_eq!(night.seats().iter().filter(|s| s.is_dead).count(), 1);
        assert!(!night.seats()[2].is_dead);

        night.advance(&registry).unwrap();
        assert!(!night.status().resolved);
    }

    #[test]
    fn test_pit_hag_skips_passed_slot() {
        let registry = RoleRegistry::standard();
        let mut session = second_night();
        let seats = board(&["pit_hag", "imp", "chef", "empath", "monk"]);
        let mut night = NightSession::start(&seats, &mut session, &registry).unwrap();
        assert!(night.current().is_some_and(|t| t.role.is("pit_hag")));

        let choice = ActionChoice::seats(&[SeatId::new(2)]).with_role(RoleId::new("sailor"));
        night.resolve_current(&choice, &mut session, &registry).unwrap();
        assert!(night.seats()[2].has_role("sailor"));
        assert!(!night.queue().iter().any(|t| t.seat == SeatId::new(2)));

        let orders: Vec<_> = night.queue().iter().map(|t| (t.order, t.seat)).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
    }

    #[test]
    fn test_pit_hag_queues_later_slot() {
        let registry = RoleRegistry::standard();
        let mut session = second_night();
        let seats = board(&["pit_hag", "imp", "chef", "empath", "monk"]);
        let mut night = NightSession::start(&seats, &mut session, &registry).unwrap();

        let choice = ActionChoice::seats(&[SeatId::new(2)]).with_role(RoleId::new("dreamer"));
        night.resolve_current(&choice, &mut session, &registry).unwrap();
        let dreamer = night.queue().iter().position(|t| t.seat == SeatId::new(2));
        let empath = night.queue().iter().position(|t| t.role.is("empath"));
        assert!(dreamer.is_some_and(|d| empath.is_some_and(|e| d > e)));
    }

    #[test]
    fn test_verdict_latches() {
        let registry = RoleRegistry::standard();
        let mut session = second_night();
        let seats = board(&["imp", "chef", "empath"]);
        let mut night = NightSession::start(&seats, &mut session, &registry).unwrap();
        night
            .resolve_current(&ActionChoice::seats(&[SeatId::new(1)]), &mut session, &registry)
            .unwrap();
        assert!(night.verdict().is_some());
        assert_eq!(night.advance(&registry).unwrap_err(), EngineError::GameOver);
        let report = night.finish(&mut session, &registry).unwrap();
        assert!(report.verdict.is_some());
    }

    #[test]
    fn test_finish_clears_night_effects() {
        let registry = RoleRegistry::standard();
        let mut session = second_night();
        let mut seats = board(&["imp", "chef", "empath", "monk", "soldier"]);
        seats[1].add_status(
            StatusEffect::from_role(StatusKind::Drunk, RoleId::new("sailor"))
                .lasting(crate::core::Duration::UntilDawn),
        );
        let night = NightSession::start(&seats, &mut session, &registry).unwrap();
        let report = night.finish(&mut session, &registry).unwrap();
        assert!(!report.seats[1].has_status(StatusKind::Drunk));
        assert!(report.log.lines().iter().any(|l| l.contains("Nobody died in the night.")));
    }
}
