//! Session log and archived game records.
//!
//! The engine never stores anything. It hands a [`GameRecord`] to whoever
//! keeps the archive, which may encode it with [`GameRecord::to_bytes`].

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Alignment, LogEntry, Phase, Seat, Visibility};
use crate::error::EngineResult;
use crate::victory::{Verdict, WinReason};

/// One line of the session log, stamped with when it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLogEntry {
    pub phase: Phase,
    pub night: u32,
    pub visibility: Visibility,
    pub text: String,
}

impl std::fmt::Display for SessionLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}] {}", self.phase.label(), self.night, self.text)
    }
}

/// Append-only log of a session.
///
/// Backed by a persistent vector, so cloning a snapshot of the log (for
/// undo or display) shares structure with the live one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLog {
    entries: Vector<SessionLogEntry>,
}

impl SessionLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, phase: Phase, night: u32, entry: LogEntry) {
        self.entries.push_back(SessionLogEntry {
            phase,
            night,
            visibility: entry.visibility,
            text: entry.text,
        });
    }

    pub fn extend(&mut self, phase: Phase, night: u32, entries: impl IntoIterator<Item = LogEntry>) {
        for entry in entries {
            self.push(phase, night, entry);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionLogEntry> {
        self.entries.iter()
    }

    /// Lines safe to read out at the table.
    pub fn public(&self) -> impl Iterator<Item = &SessionLogEntry> {
        self.entries.iter().filter(|e| e.visibility == Visibility::Public)
    }

    /// Every line as display text, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

/// A finished game, ready for the archive.
///
/// ## Example
///
/// ```
/// use clocktower_engine::core::{Alignment, Seat, SeatId};
/// use clocktower_engine::record::{GameRecord, SessionLog};
/// use clocktower_engine::victory::{Verdict, WinReason};
///
/// let mut record = GameRecord::new("game-1", "Trouble Brewing", 1_000);
/// let verdict = Verdict::new(Alignment::Good, WinReason::DemonDead, "the Demon is dead");
/// record.close(vec![Seat::new(SeatId::new(0))], SessionLog::new(), Some(&verdict), 4_600);
///
/// let bytes = record.to_bytes().unwrap();
/// let back = GameRecord::from_bytes(&bytes).unwrap();
/// assert_eq!(back.duration_secs, 3_600);
/// assert_eq!(back.winner, Some(Alignment::Good));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Opaque key chosen by the archive.
    pub id: String,
    pub script: String,
    /// Unix seconds.
    pub started_at: u64,
    pub ended_at: Option<u64>,
    pub duration_secs: u64,
    pub winner: Option<Alignment>,
    pub reason: Option<WinReason>,
    pub seats: Vec<Seat>,
    pub log: SessionLog,
}

impl GameRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, script: impl Into<String>, started_at: u64) -> Self {
        Self {
            id: id.into(),
            script: script.into(),
            started_at,
            ended_at: None,
            duration_secs: 0,
            winner: None,
            reason: None,
            seats: Vec::new(),
            log: SessionLog::new(),
        }
    }

    /// Close the record with the final board and log.
    pub fn close(&mut self, seats: Vec<Seat>, log: SessionLog, verdict: Option<&Verdict>, ended_at: u64) {
        self.seats = seats;
        self.log = log;
        self.winner = verdict.map(|v| v.winner);
        self.reason = verdict.map(|v| v.reason);
        self.ended_at = Some(ended_at);
        self.duration_secs = ended_at.saturating_sub(self.started_at);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn to_bytes(&self) -> EngineResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RoleId, SeatId};
    use crate::error::EngineError;

    #[test]
    fn test_log_keeps_order_and_visibility() {
        let mut log = SessionLog::new();
        log.push(Phase::FirstNight, 1, LogEntry::private("poisoner picks seat 3"));
        log.push(Phase::DawnReport, 1, LogEntry::public("Nobody died in the night."));
        assert_eq!(log.len(), 2);
        assert_eq!(log.public().count(), 1);
        assert!(log.lines()[1].ends_with("Nobody died in the night."));
    }

    #[test]
    fn test_log_snapshot_is_independent() {
        let mut log = SessionLog::new();
        log.push(Phase::Day, 1, LogEntry::public("Seat 2 is executed"));
        let snapshot = log.clone();
        log.push(Phase::Dusk, 1, LogEntry::private("dusk"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_record_roundtrip_keeps_seats() {
        let mut record = GameRecord::new("abc", "Bad Moon Rising", 10);
        let seats = vec![
            Seat::new(SeatId::new(0)).with_role(RoleId::new("zombuul")),
            Seat::new(SeatId::new(1)).with_role(RoleId::new("chef")).dead(),
        ];
        let mut log = SessionLog::new();
        log.push(Phase::Night, 2, LogEntry::public("Seat 2 died"));
        record.close(seats.clone(), log, None, 20);

        let back = GameRecord::from_bytes(&record.to_bytes().unwrap()).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.seats, seats);
        assert!(back.is_closed());
    }

    #[test]
    fn test_garbage_bytes_are_codec_error() {
        let err = GameRecord::from_bytes(&[0xff, 0x01]).unwrap_err();
        assert!(matches!(err, EngineError::Codec(_)));
    }
}
