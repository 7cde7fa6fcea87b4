//! ContinuationController - the termination policy engine.
//!
//! A pure, synchronous decision function over a category's history. The
//! checks run in a fixed priority and the first match wins, so a given
//! history always yields the same decision.

use crate::domain::models::{CategoryState, CompletionReason, TerminationPolicy};

/// Whether a category keeps iterating or stops, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationDecision {
    /// No termination condition met; run another iteration.
    Continue,
    /// A terminal condition fired.
    Stop(CompletionReason),
}

/// Evaluates the termination policy against a category's history.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuationController;

impl ContinuationController {
    /// Decide whether the category continues, in fixed priority order:
    ///
    /// 1. confidence at or above the applicable threshold,
    /// 2. the applicable iteration cap reached,
    /// 3. information gain below the minimum (only from
    ///    `min_iterations_before_gain_check` onward -- a category always gets
    ///    at least two iterations under the default policy before being
    ///    judged unproductive),
    /// 4. queries ran but produced nothing new,
    /// 5. otherwise continue.
    ///
    /// A state with no completed iterations always continues; the gate
    /// handles pre-iteration skips.
    pub fn evaluate(policy: &TerminationPolicy, state: &CategoryState) -> ContinuationDecision {
        let Some(last) = state.last_record() else {
            return ContinuationDecision::Continue;
        };

        if last.confidence_score >= policy.threshold_for(state.category) {
            return ContinuationDecision::Stop(CompletionReason::ConfidenceMet);
        }

        if state.current_iteration_number >= policy.max_iterations_for(state.category) {
            return ContinuationDecision::Stop(CompletionReason::MaxIterationsReached);
        }

        if last.info_gain_rate < policy.min_gain_threshold
            && state.current_iteration_number >= policy.min_iterations_before_gain_check
        {
            return ContinuationDecision::Stop(CompletionReason::DiminishingReturns);
        }

        if last.new_facts_this_iteration == 0 && last.queries_executed > 0 {
            return ContinuationDecision::Stop(CompletionReason::NoNewInformation);
        }

        ContinuationDecision::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CategoryState, InformationCategory};

    fn state_after(
        category: InformationCategory,
        iterations: &[(u32, u32, f64)], // (queries_executed, new_facts, confidence)
    ) -> CategoryState {
        let mut state = CategoryState::new(category);
        for &(executed, new_facts, confidence) in iterations {
            let mut record = state.start_iteration().unwrap();
            record.queries_generated = executed;
            record.queries_executed = executed;
            record.queries_successful = executed;
            record.facts_extracted = new_facts;
            record.new_facts_this_iteration = new_facts;
            record.confidence_score = confidence;
            state.complete_iteration(record).unwrap();
        }
        state
    }

    #[test]
    fn test_no_history_continues() {
        let policy = TerminationPolicy::default();
        let state = CategoryState::new(InformationCategory::Identity);
        assert_eq!(
            ContinuationController::evaluate(&policy, &state),
            ContinuationDecision::Continue
        );
    }

    #[test]
    fn test_confidence_met_wins_first() {
        let policy = TerminationPolicy::default();
        // Confidence at threshold AND at max iterations: rule 1 has priority.
        let state = state_after(
            InformationCategory::Criminal,
            &[(3, 2, 0.5), (3, 2, 0.7), (3, 2, 0.85)],
        );
        assert_eq!(
            ContinuationController::evaluate(&policy, &state),
            ContinuationDecision::Stop(CompletionReason::ConfidenceMet)
        );
    }

    #[test]
    fn test_foundation_threshold_applies() {
        let policy = TerminationPolicy::default();
        // 0.85 meets the standard threshold but not the foundation one.
        let state = state_after(InformationCategory::Identity, &[(3, 3, 0.85)]);
        assert_eq!(
            ContinuationController::evaluate(&policy, &state),
            ContinuationDecision::Continue
        );

        let state = state_after(InformationCategory::Identity, &[(3, 3, 0.90)]);
        assert_eq!(
            ContinuationController::evaluate(&policy, &state),
            ContinuationDecision::Stop(CompletionReason::ConfidenceMet)
        );
    }

    #[test]
    fn test_max_iterations_standard_vs_foundation() {
        let policy = TerminationPolicy::default();
        let three = [(3, 2, 0.5), (3, 2, 0.6), (3, 2, 0.65)];

        let standard = state_after(InformationCategory::Criminal, &three);
        assert_eq!(
            ContinuationController::evaluate(&policy, &standard),
            ContinuationDecision::Stop(CompletionReason::MaxIterationsReached)
        );

        // A foundation category still has an iteration left at three.
        let foundation = state_after(InformationCategory::Employment, &three);
        assert_eq!(
            ContinuationController::evaluate(&policy, &foundation),
            ContinuationDecision::Continue
        );
    }

    #[test]
    fn test_diminishing_returns_never_fires_on_iteration_one() {
        let policy = TerminationPolicy::default();
        // Zero gain on iteration 1: rule 3 must not fire. Rule 4 does not
        // apply either since no queries executed.
        let state = state_after(InformationCategory::Civil, &[(0, 0, 0.2)]);
        assert_eq!(
            ContinuationController::evaluate(&policy, &state),
            ContinuationDecision::Continue
        );
    }

    #[test]
    fn test_diminishing_returns_fires_on_iteration_two() {
        let policy = TerminationPolicy::default();
        let state = state_after(
            InformationCategory::Civil,
            &[(3, 2, 0.3), (4, 0, 0.3)],
        );
        assert_eq!(
            ContinuationController::evaluate(&policy, &state),
            ContinuationDecision::Stop(CompletionReason::DiminishingReturns)
        );
    }

    #[test]
    fn test_gain_check_start_is_tunable() {
        let policy = TerminationPolicy {
            min_iterations_before_gain_check: 3,
            ..TerminationPolicy::default()
        };
        let state = state_after(
            InformationCategory::Civil,
            &[(3, 2, 0.3), (4, 0, 0.3)],
        );
        // Zero new facts with queries executed: rule 4 fires instead.
        assert_eq!(
            ContinuationController::evaluate(&policy, &state),
            ContinuationDecision::Stop(CompletionReason::NoNewInformation)
        );
    }

    #[test]
    fn test_no_new_information_requires_executed_queries() {
        let policy = TerminationPolicy {
            min_gain_threshold: 0.0,
            ..TerminationPolicy::default()
        };
        // Zero facts but also zero queries: neither rule 3 (gain 0.0 is not
        // below a 0.0 threshold) nor rule 4 fires.
        let state = state_after(InformationCategory::Financial, &[(2, 1, 0.3), (0, 0, 0.3)]);
        assert_eq!(
            ContinuationController::evaluate(&policy, &state),
            ContinuationDecision::Continue
        );
    }

    #[test]
    fn test_productive_iteration_continues() {
        let policy = TerminationPolicy::default();
        let state = state_after(InformationCategory::Criminal, &[(3, 2, 0.40)]);
        assert_eq!(
            ContinuationController::evaluate(&policy, &state),
            ContinuationDecision::Continue
        );
    }
}
