//! # clocktower-engine
//!
//! A storyteller's rules engine for Blood on the Clocktower style social
//! deduction games.
//!
//! The engine is a library for a moderator-facing front end. It knows who
//! wakes when, what each character learns (and when that information must
//! be false), how deaths resolve, and when the game is over. It never
//! persists anything and never blocks: decisions that need a human are
//! returned as data.
//!
//! ## Design Principles
//!
//! 1. **Deltas, not mutation**: every resolution returns an
//!    [`ActionOutcome`] with explicit seat deltas and the board they
//!    produce. The caller's seats are never touched.
//!
//! 2. **Explicit session state**: the RNG, the Vortox flag and the day and
//!    night ledgers live on [`SessionContext`], threaded through every call.
//!
//! 3. **Data-driven characters**: roles are catalog entries with pure
//!    handler and render functions, looked up by id.
//!
//! ## Modules
//!
//! - `core`: Seats, role ids, statuses, capabilities, deltas, RNG, config
//! - `roles`: Character catalog, targeting rules and action handlers
//! - `schedule`: Night queue, global order overrides, jinxes, antagonism
//! - `info`: Poisoning, registration, misinformation and night renderers
//! - `resolution`: Action pipeline, death pipeline, executions, housekeeping
//! - `victory`: Win condition evaluation
//! - `session`: Turn-by-turn night driver
//! - `record`: Session log and archived game records

pub mod context;
pub mod core;
pub mod error;
pub mod info;
pub mod record;
pub mod resolution;
pub mod roles;
pub mod schedule;
pub mod session;
pub mod victory;

// Re-export commonly used types
pub use crate::context::{DayLedger, NightLedger, SessionContext};

pub use crate::core::{
    Alignment, Board, Capability, Duration, LogEntry, Phase, RoleId, RoleType, Script, Seat,
    SeatChange, SeatDelta, SeatId, SessionConfig, StatusEffect, StatusKind,
};

pub use crate::error::{EngineError, EngineResult};

pub use crate::info::{night_info, NightInfo, RenderTable};

pub use crate::record::{GameRecord, SessionLog};

pub use crate::resolution::{
    answer_prompt, execute, nominate, resolve_action, slayer_shot, ActionOutcome, PendingPrompt,
    PromptAnswer,
};

pub use crate::roles::{ActionChoice, ActionTag, RoleDefinition, RoleRegistry};

pub use crate::schedule::{build_queue, NightQueue, NightQueueItem};

pub use crate::session::{NightSession, NightStatus};

pub use crate::victory::{Checkpoint, Verdict, WinEvaluator, WinReason};
