//! Information the moderator hands out at night.
//!
//! # Key Types
//!
//! - `RegistrationResult`: how a seat appears to one observing ability
//! - `FakeReason`: why an answer is false
//! - `NightInfo`: the spoken line and moderator guidance for one turn
//! - `RenderTable`: per-role render functions

pub mod misinfo;
pub mod night_info;
pub mod poison;
pub mod registration;
mod render;

pub use misinfo::{should_fabricate, FakeReason};
pub use night_info::{night_info, NightInfo, RenderCtx, RenderFn, RenderTable, Revelation};
pub use poison::{ability_disabled, impairment_summary, is_drunk, is_poisoned, poison_sources};
pub use registration::{registration, registers_evil, RegistrationResult};
