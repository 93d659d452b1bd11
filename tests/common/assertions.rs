//! Custom test assertions
//!
//! Provides domain-specific assertions for router responses and decisions.

use model_router::{FailureKind, Response, RoutingDecision};

/// Assertions for Response
pub trait ResponseAssertions {
    /// Assert the trace ends with a success on `model`
    fn assert_served_by(&self, model: &str);

    /// Assert the failed attempts carry exactly these kinds, in order
    fn assert_failures(&self, kinds: &[FailureKind]);
}

impl ResponseAssertions for Response {
    fn assert_served_by(&self, model: &str) {
        assert_eq!(self.model_used, model, "unexpected serving model");
        let last = self.attempts.last().expect("trace must not be empty");
        assert!(last.is_success(), "trace must end with a success");
        assert_eq!(last.model_id, model);
    }

    fn assert_failures(&self, kinds: &[FailureKind]) {
        let failures: Vec<FailureKind> = self
            .attempts
            .iter()
            .filter_map(|attempt| attempt.error_kind)
            .collect();
        assert_eq!(failures, kinds);
    }
}

/// Assertions for RoutingDecision
pub trait DecisionAssertions {
    /// Assert the candidate order
    fn assert_order(&self, expected: &[&str]);

    /// Assert no model id appears twice
    fn assert_unique(&self);
}

impl DecisionAssertions for RoutingDecision {
    fn assert_order(&self, expected: &[&str]) {
        assert_eq!(self.model_ids(), expected);
    }

    fn assert_unique(&self) {
        let mut ids = self.model_ids();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total, "decision contains duplicate candidates");
    }
}

/// Assert two values are approximately equal (for floats)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        assert_approx_eq!($left, $right, 1e-9_f64)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {
        let left_val: f64 = $left as f64;
        let right_val: f64 = $right as f64;
        let diff = (left_val - right_val).abs();
        assert!(
            diff < $epsilon,
            "assertion failed: `(left ~ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` (epsilon: `{:?}`)",
            left_val,
            right_val,
            diff,
            $epsilon
        );
    };
}
