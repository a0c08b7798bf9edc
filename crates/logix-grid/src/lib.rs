//! `logix-grid` — the static grid, corridor/highway analysis, and the
//! time-space reservation table shared by the pathfinder and tick scheduler.
//!
//! # Crate layout
//!
//! | Module         | Contents                                             |
//! |----------------|--------------------------------------------------------|
//! | [`grid`]       | `Grid` (dimensions, obstacles, corridor score)        |
//! | [`corridor`]   | `CorridorMap` (main corridors, highway bonus, flow direction) |
//! | [`reservation`]| `ReservationTable`                                    |
//! | [`error`]      | `GridError`, `GridResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|-----------------------------------------------------------|
//! | `fx-hash`  | Backs `ReservationTable`'s maps with `rustc_hash::FxHashMap`. |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.        |

pub mod corridor;
pub mod error;
pub mod grid;
pub mod reservation;

#[cfg(test)]
mod tests;

pub use corridor::CorridorMap;
pub use error::{GridError, GridResult};
pub use grid::Grid;
pub use reservation::ReservationTable;
