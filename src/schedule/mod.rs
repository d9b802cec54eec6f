//! Night scheduling: who wakes, in what order.
//!
//! ## Key Types
//!
//! - `NightQueue`: ordered turns for one night, with a cursor
//! - `OverrideTable`: the hand-authored global order
//! - `Jinx`: house rules for character pairs
//!
//! The queue merges each role's declared order with the override table,
//! drops seats that cannot act, and sorts by (order, seat).

pub mod antagonism;
pub mod jinx;
pub mod overrides;
pub mod queue;

pub use antagonism::{antagonism_enabled, antagonism_violation};
pub use jinx::{active_jinxes, apply_setup_jinxes, jinx_between, jinxes_for, Jinx, JINXES};
pub use overrides::OverrideTable;
pub use queue::{build_queue, build_queue_with, queue_item, NightQueue, NightQueueItem, NO_WAKE_ORDER};
