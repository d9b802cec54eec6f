//! Core types shared by every component: seats, roles ids, statuses,
//! capabilities, phases, deltas, the RNG and session configuration.
//!
//! Nothing here knows about individual characters beyond their ids.

pub mod board;
pub mod capability;
pub mod config;
pub mod delta;
pub mod log;
pub mod phase;
pub mod rng;
pub mod role;
pub mod seat;
pub mod status;

pub use board::Board;
pub use capability::{Capability, CapabilitySet};
pub use config::{DisguiseMode, Script, SessionConfig};
pub use delta::{apply_deltas, SeatChange, SeatDelta};
pub use log::{LogEntry, Visibility};
pub use phase::Phase;
pub use rng::{GameRng, GameRngState};
pub use role::{Alignment, RoleId, RoleType};
pub use seat::{Seat, SeatId};
pub use status::{Duration, StatusEffect, StatusKind, StatusOrigin};
