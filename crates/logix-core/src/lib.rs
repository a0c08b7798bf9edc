//! `logix-core` — foundational types for the logistics simulation engine.
//!
//! This crate is a dependency of every other `logix-*` crate. It intentionally
//! has no `logix-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                  |
//! |-----------|--------------------------------------------|
//! | [`ids`]   | `AgentId`, `PackageId`                     |
//! | [`time`]  | `Tick`                                     |
//! | [`grid`]  | `Cell`, `GridDims`, `GridOps`               |
//! | [`error`] | `CoreError`, `CoreResult`                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.  |
//!           | Required by `logix-config`/`logix-output`.          |

pub mod error;
pub mod grid;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use grid::{Cell, GridDims, GridOps};
pub use ids::{AgentId, PackageId};
pub use time::Tick;
