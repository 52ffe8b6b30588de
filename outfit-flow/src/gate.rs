//! Rating gate: the only branching rule in the workflow.

use serde::{Deserialize, Serialize};

/// Lowest rating that ends the loop with a success
pub const ACCEPT_RATING: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Generate another recommendation
    Retry,
    /// Compose the final result
    Finish,
}

/// Decide whether to try again or wrap up.
///
/// A rating of at least [`ACCEPT_RATING`] always finishes; otherwise the loop
/// finishes once the attempt budget is spent.
pub fn decide(rating: u8, attempts: u32, max_attempts: u32) -> Decision {
    if rating >= ACCEPT_RATING || attempts >= max_attempts {
        Decision::Finish
    } else {
        Decision::Retry
    }
}

/// Log lines describing a decision: the inputs, then the reason.
pub fn decision_log(rating: u8, attempts: u32, max_attempts: u32, decision: Decision) -> Vec<String> {
    let inputs = format!("Node: check_rating - Rating: {rating}, Attempts: {attempts}/{max_attempts}");
    let reason = match decision {
        Decision::Finish if rating >= ACCEPT_RATING => format!(
            "Decision: Rating is satisfactory ({rating} >= {ACCEPT_RATING}). Proceeding to generate result."
        ),
        Decision::Finish => format!(
            "Decision: Maximum attempts reached ({attempts}). Proceeding to generate result."
        ),
        Decision::Retry => format!(
            "Decision: Rating too low ({rating} < {ACCEPT_RATING}) and attempts < {max_attempts}. Trying again."
        ),
    };
    vec![inputs, reason]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scenarios() {
        assert_eq!(decide(8, 1, 5), Decision::Finish);
        assert_eq!(decide(5, 2, 5), Decision::Retry);
        assert_eq!(decide(4, 5, 5), Decision::Finish);
        assert_eq!(decide(7, 3, 5), Decision::Finish);
        assert_eq!(decide(6, 4, 5), Decision::Retry);
    }

    #[test]
    fn unrated_counts_as_low_rating() {
        assert_eq!(decide(0, 1, 5), Decision::Retry);
        assert_eq!(decide(0, 5, 5), Decision::Finish);
    }

    #[test]
    fn log_explains_each_branch() {
        let success = decision_log(8, 1, 5, Decision::Finish);
        assert_eq!(success[0], "Node: check_rating - Rating: 8, Attempts: 1/5");
        assert!(success[1].contains("satisfactory"));

        let exhausted = decision_log(4, 5, 5, Decision::Finish);
        assert!(exhausted[1].contains("Maximum attempts reached (5)"));

        let retry = decision_log(5, 2, 5, Decision::Retry);
        assert!(retry[1].contains("Trying again"));
    }

    proptest! {
        #[test]
        fn high_rating_always_finishes(rating in 7u8..=10, attempts in 0u32..100, max in 0u32..100) {
            prop_assert_eq!(decide(rating, attempts, max), Decision::Finish);
        }

        #[test]
        fn low_rating_under_budget_retries(rating in 0u8..7, max in 1u32..100, offset in 1u32..100) {
            let attempts = max.saturating_sub(offset.min(max));
            prop_assume!(attempts < max);
            prop_assert_eq!(decide(rating, attempts, max), Decision::Retry);
        }

        #[test]
        fn low_rating_over_budget_finishes(rating in 0u8..7, max in 0u32..100, extra in 0u32..100) {
            prop_assert_eq!(decide(rating, max + extra, max), Decision::Finish);
        }
    }
}
