//! What a resolution step returns, and the scratch board it works on.

use serde::{Deserialize, Serialize};

use crate::context::SessionContext;
use crate::core::{apply_deltas, LogEntry, Seat, SeatDelta, SeatId};
use crate::error::EngineResult;
use crate::victory::Verdict;

use super::prompt::PendingPrompt;

/// The result of resolving one action, execution or phase change.
///
/// `updated_seats` is the input board with `deltas` applied in order. The
/// caller's board is never touched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub deltas: Vec<SeatDelta>,
    pub updated_seats: Vec<Seat>,
    pub log: Vec<LogEntry>,
    pub pending_prompt: Option<PendingPrompt>,
    /// Seats that must act again right after the current queue position.
    pub requeue: Vec<SeatId>,
    pub verdict: Option<Verdict>,
}

impl ActionOutcome {
    /// Seats killed by this outcome.
    pub fn deaths(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.deltas.iter().filter(|d| d.kills()).map(|d| d.seat)
    }

    /// Whether the log contains a line with `needle`.
    #[must_use]
    pub fn logged(&self, needle: &str) -> bool {
        self.log.iter().any(|e| e.text.contains(needle))
    }
}

/// A working copy of the board. Every delta is applied as it is recorded
/// so later steps see earlier ones.
#[derive(Debug)]
pub(crate) struct Turn {
    pub seats: Vec<Seat>,
    pub deltas: Vec<SeatDelta>,
    pub log: Vec<LogEntry>,
    pub prompt: Option<PendingPrompt>,
    pub requeue: Vec<SeatId>,
}

impl Turn {
    pub fn new(seats: &[Seat]) -> Self {
        Self {
            seats: seats.to_vec(),
            deltas: Vec::new(),
            log: Vec::new(),
            prompt: None,
            requeue: Vec::new(),
        }
    }

    pub fn apply(&mut self, delta: SeatDelta) -> EngineResult<()> {
        if delta.changes.is_empty() {
            return Ok(());
        }
        apply_deltas(&mut self.seats, std::slice::from_ref(&delta))?;
        self.deltas.push(delta);
        Ok(())
    }

    pub fn apply_all(&mut self, deltas: impl IntoIterator<Item = SeatDelta>) -> EngineResult<()> {
        for delta in deltas {
            self.apply(delta)?;
        }
        Ok(())
    }

    pub fn note(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }

    pub fn warn(&mut self, text: impl std::fmt::Display) {
        tracing::warn!(%text, "resolution warning");
        self.log.push(LogEntry::warning(text));
    }

    /// Raise a prompt. Only one can be outstanding; a second is logged for
    /// the moderator to resolve by hand.
    pub fn ask(&mut self, prompt: PendingPrompt) {
        if self.prompt.is_some() {
            self.warn(format!("resolve by hand: {prompt}"));
        } else {
            self.prompt = Some(prompt);
        }
    }

    pub fn requeue(&mut self, seat: SeatId) {
        if !self.requeue.contains(&seat) {
            self.requeue.push(seat);
        }
    }

    pub fn finish(self, verdict: Option<Verdict>) -> ActionOutcome {
        ActionOutcome {
            deltas: self.deltas,
            updated_seats: self.seats,
            log: self.log,
            pending_prompt: self.prompt,
            requeue: self.requeue,
            verdict,
        }
    }
}

/// Run `step` against a copy of the session and keep the copy only if the
/// step succeeds. A failed step leaves the ledgers as they were.
pub(crate) fn staged<T>(
    session: &mut SessionContext,
    step: impl FnOnce(&mut SessionContext) -> EngineResult<T>,
) -> EngineResult<T> {
    let mut draft = session.clone();
    let out = step(&mut draft)?;
    *session = draft;
    Ok(out)
}
