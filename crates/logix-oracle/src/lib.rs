//! `logix-oracle` — the deadlock risk oracle trait consulted by the pathfinder.
//!
//! # Crate layout
//!
//! | Module    | Contents                                        |
//! |-----------|--------------------------------------------------|
//! | [`model`] | `DeadlockRiskOracle` trait, `DeadlockFeatures`, `OracleOutcome` |
//! | [`noop`]  | `NoopOracle` — always reports `Unavailable`      |
//! | [`error`] | `OracleError`, `OracleResult<T>`                |
//!
//! # Design notes
//!
//! The pathfinder only reaches for the oracle once an agent has been waiting
//! long enough to be worth asking about (`wait >= 5`, per the engine's cost
//! model) and folds the returned `p_deadlock` into that candidate move's
//! cost. There is no training, replanning, or message-passing surface here —
//! production wires in a trained model behind `DeadlockRiskOracle`, tests
//! inject a stub that returns fixed probabilities, and anything in between
//! (model not loaded, inference failed) just resolves to `Unavailable`.
pub mod error;
pub mod model;
pub mod noop;

#[cfg(test)]
mod tests;

pub use error::{OracleError, OracleResult};
pub use model::{DeadlockFeatures, DeadlockRiskOracle, OracleOutcome};
pub use noop::NoopOracle;
