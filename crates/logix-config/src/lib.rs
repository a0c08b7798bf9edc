//! `logix-config` — JSON world configuration loading and validation.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                |
//! |------------|-----------------------------------------------------------|
//! | [`loader`] | `WorldConfig`, `Settings`, `RobotDef`, `PackageDef`, `World`, `load_world`, `build_world` |
//! | [`error`]  | `ConfigError`, `ConfigResult<T>`                          |
//!
//! # Validation model
//!
//! [`load_world`] only parses JSON; [`build_world`] resolves it into grid
//! dimensions, an obstacle set, and agent/package arenas. Every problem
//! found along the way — an out-of-bounds coordinate, a malformed wall
//! rectangle, a robot or package spawned on a wall, a duplicate name — is
//! collected into one `Vec<ConfigError>` rather than aborting on the first
//! one, and `build_world` returns that whole list if it is non-empty. There
//! is no warn-and-skip path: a bad world configuration never produces a
//! partially built one.

pub mod error;
pub mod loader;

#[cfg(test)]
mod tests;

pub use error::{ConfigError, ConfigResult};
pub use loader::{build_world, load_world, PackageDef, RobotDef, Settings, World, WorldConfig};
