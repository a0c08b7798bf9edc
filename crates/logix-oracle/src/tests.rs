//! Unit tests for logix-oracle.

use crate::{DeadlockFeatures, DeadlockRiskOracle, NoopOracle, OracleOutcome};

fn features() -> DeadlockFeatures {
    DeadlockFeatures {
        from_row: 2,
        from_col: 3,
        to_row: 2,
        to_col: 4,
        wait: 6,
    }
}

#[cfg(test)]
mod noop_tests {
    use super::*;

    #[test]
    fn always_unavailable() {
        let outcome = NoopOracle.predict(&features());
        assert_eq!(outcome, OracleOutcome::Unavailable);
    }

    #[test]
    fn unavailable_has_zero_risk() {
        assert_eq!(OracleOutcome::Unavailable.p_deadlock(), 0.0);
    }
}

#[cfg(test)]
mod stub_oracle_tests {
    use super::*;

    /// A deterministic stand-in for a trained model, used the way tests
    /// inject one in place of the real thing.
    struct StubOracle {
        p_deadlock: f64,
    }

    impl DeadlockRiskOracle for StubOracle {
        fn predict(&self, _features: &DeadlockFeatures) -> OracleOutcome {
            OracleOutcome::Predicted {
                p_normal: 1.0 - self.p_deadlock,
                p_deadlock: self.p_deadlock,
            }
        }
    }

    #[test]
    fn predicted_outcome_exposes_p_deadlock() {
        let oracle = StubOracle { p_deadlock: 0.8 };
        let outcome = oracle.predict(&features());
        assert_eq!(outcome.p_deadlock(), 0.8);
    }

    #[test]
    fn object_safe_via_box() {
        let oracle: Box<dyn DeadlockRiskOracle> = Box::new(StubOracle { p_deadlock: 0.4 });
        assert_eq!(oracle.predict(&features()).p_deadlock(), 0.4);
    }
}
