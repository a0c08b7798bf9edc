//! `DeadlockRiskOracle` — the pluggable risk model consulted by the
//! pathfinder when a waiting agent starts looking expensive to route around.
//!
//! Production wires in a trained model; tests inject a stub that returns
//! fixed probabilities. Either way the trait is a single `predict` call over
//! a small feature tuple — there is no session, no replanning callback, no
//! message bus.

/// The features the pathfinder hands to the oracle for one candidate move:
/// where the agent is, where it would go next, and how long it has already
/// been waiting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeadlockFeatures {
    pub from_row: i32,
    pub from_col: i32,
    pub to_row: i32,
    pub to_col: i32,
    pub wait: u32,
}

/// The oracle's verdict for one [`DeadlockFeatures`] query.
///
/// A model that isn't loaded, or that raises internally, resolves to
/// `Unavailable` rather than propagating an error — callers treat that as
/// zero additional risk, matching how the original predictor swallowed
/// exceptions as a neutral prediction rather than a retryable failure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OracleOutcome {
    Unavailable,
    Predicted { p_normal: f64, p_deadlock: f64 },
}

impl OracleOutcome {
    /// The deadlock probability to use in a cost calculation, or `0.0` when
    /// the oracle had nothing to say.
    pub fn p_deadlock(self) -> f64 {
        match self {
            OracleOutcome::Unavailable => 0.0,
            OracleOutcome::Predicted { p_deadlock, .. } => p_deadlock,
        }
    }
}

/// A model that scores how likely a candidate move is to walk an agent into
/// a deadlock.
pub trait DeadlockRiskOracle {
    fn predict(&self, features: &DeadlockFeatures) -> OracleOutcome;
}

impl<T: DeadlockRiskOracle + ?Sized> DeadlockRiskOracle for Box<T> {
    fn predict(&self, features: &DeadlockFeatures) -> OracleOutcome {
        (**self).predict(features)
    }
}
