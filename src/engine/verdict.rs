use crate::assertion::AssertionResult;
use crate::constants;
use serde::{Deserialize, Serialize};

/// Decides whether a test case passed.
///
/// A case passes iff the observed status equals the expected one, the pass
/// rate of auto-discovered assertions reaches `auto_pass_rate` and the pass
/// rate of explicit assertions reaches `explicit_pass_rate`. An empty group
/// counts as fully passing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictPolicy {
    pub auto_pass_rate: f64,
    pub explicit_pass_rate: f64,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        Self {
            auto_pass_rate: constants::DEFAULT_AUTO_PASS_RATE,
            explicit_pass_rate: constants::DEFAULT_EXPLICIT_PASS_RATE,
        }
    }
}

impl VerdictPolicy {
    #[must_use]
    pub fn judge(&self, status: u16, expected_status: u16, assertions: &[AssertionResult]) -> bool {
        let (auto, explicit): (Vec<_>, Vec<_>) = assertions.iter().partition(|a| a.is_auto());
        status == expected_status
            && pass_rate(&auto) >= self.auto_pass_rate
            && pass_rate(&explicit) >= self.explicit_pass_rate
    }
}

#[allow(clippy::cast_precision_loss)]
fn pass_rate(group: &[&AssertionResult]) -> f64 {
    if group.is_empty() {
        return 1.0;
    }
    group.iter().filter(|a| a.passed).count() as f64 / group.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(auto: (usize, usize), explicit: (usize, usize)) -> Vec<AssertionResult> {
        let mut results = Vec::new();
        for i in 0..auto.1 {
            results.push(AssertionResult::auto("a", i < auto.0));
        }
        for i in 0..explicit.1 {
            results.push(AssertionResult::explicit("e", i < explicit.0));
        }
        results
    }

    #[test]
    fn test_status_mismatch_always_fails() {
        let policy = VerdictPolicy::default();
        assert!(!policy.judge(500, 200, &group((5, 5), (2, 2))));
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let policy = VerdictPolicy::default();
        assert!(policy.judge(200, 200, &group((4, 5), (1, 2))));
        assert!(!policy.judge(200, 200, &group((3, 5), (2, 2))));
        assert!(!policy.judge(200, 200, &group((5, 5), (1, 3))));
    }

    #[test]
    fn test_empty_groups_are_vacuously_passing() {
        let policy = VerdictPolicy::default();
        assert!(policy.judge(204, 204, &[]));
        assert!(policy.judge(200, 200, &group((3, 3), (0, 0))));
    }

    #[test]
    fn test_custom_policy() {
        let strict = VerdictPolicy {
            auto_pass_rate: 1.0,
            explicit_pass_rate: 1.0,
        };
        assert!(!strict.judge(200, 200, &group((4, 5), (2, 2))));
        assert!(strict.judge(200, 200, &group((5, 5), (2, 2))));
    }
}
