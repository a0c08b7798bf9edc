//! `logix-agent` — agent and package value types, and the arenas that own them.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|---------------------------------------------------------|
//! | [`agent`]   | `Agent`, `AgentState`, `DecisionMode`                  |
//! | [`package`] | `Package`, `PackageStatus`                             |
//! | [`arena`]   | `AgentArena`, `PackageArena` (owning, index = id)       |
//! | [`builder`] | `AgentArenaBuilder`, `PackageArenaBuilder`             |
//! | [`error`]   | `AgentError`, `AgentResult`                            |
//!
//! Each entity is one record type with named fields, stored in one owning
//! arena indexed by its typed id — no per-field columns, no type-erased
//! component map.

pub mod agent;
pub mod arena;
pub mod builder;
pub mod error;
pub mod package;

#[cfg(test)]
mod tests;

pub use agent::{Agent, AgentState, DecisionMode};
pub use arena::{AgentArena, PackageArena};
pub use builder::{AgentArenaBuilder, PackageArenaBuilder};
pub use error::{AgentError, AgentResult};
pub use package::{Package, PackageStatus};
