//! A no-op oracle — always reports that no prediction is available.

use crate::{DeadlockFeatures, DeadlockRiskOracle, OracleOutcome};

/// A [`DeadlockRiskOracle`] that never predicts.
///
/// Useful as the default when no trained model is configured, or in tests
/// that want the pathfinder's risk term to stay at zero.
pub struct NoopOracle;

impl DeadlockRiskOracle for NoopOracle {
    fn predict(&self, _features: &DeadlockFeatures) -> OracleOutcome {
        OracleOutcome::Unavailable
    }
}
