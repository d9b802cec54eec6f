//! Role registry: the declarative character catalog.
//!
//! ## Key Types
//!
//! - `RoleDefinition`: faction, ability text and night configs
//! - `NightAction`: order, targets, dialogue, handler
//! - `RoleRegistry`: id → definition lookup
//! - `HandlerContext` / `HandlerOutput`: what a handler reads and returns
//!
//! Handlers are plain `fn` pointers stored in the definition. The registry
//! never changes after it is built.

mod catalog;
pub mod definition;
pub mod effect;
pub mod handlers;
pub mod registry;
pub mod targeting;

pub use definition::{ActionTag, DialogueLines, InfoCadence, NightAction, NightOrder, RoleDefinition};
pub use effect::{ActionChoice, HandlerContext, HandlerOutput, KillCause, KillRequest};
pub use registry::RoleRegistry;
pub use targeting::{TargetCheck, TargetFilter, TargetSpec};
