//! Action resolution and the death pipeline.
//!
//! Every entry point takes the board by reference and returns an
//! [`ActionOutcome`]: the deltas it made, the board with them applied, the
//! log, and any prompt the moderator must answer. Nothing here mutates the
//! caller's seats.
//!
//! # Key Types
//!
//! - [`ActionOutcome`] - Deltas, updated seats, log, prompt, requeue, verdict
//! - [`PendingPrompt`] - A decision that pauses the night
//! - [`KillOutcome`] - How a single kill attempt ended
//!
//! # Entry points
//!
//! - [`resolve_action`] and [`answer_prompt`] during the night
//! - [`execute`], [`nominate`] and [`slayer_shot`] during the day
//! - [`setup`], [`night_start`], [`dawn`] and [`dusk`] between phases

pub mod day;
pub mod execution;
pub mod housekeeping;
pub mod kill;
mod outcome;
pub mod pipeline;
pub mod prompt;

pub use day::{nominate, slayer_shot};
pub use execution::execute;
pub use housekeeping::{dawn, dusk, night_start, setup};
pub use kill::KillOutcome;
pub use outcome::ActionOutcome;
pub use pipeline::{answer_prompt, resolve_action};
pub use prompt::{DeathChoiceKind, PendingPrompt, PromptAnswer};
