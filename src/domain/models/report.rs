//! Run outcomes: per-category results, the aggregated investigation result,
//! and the derived summary.
//!
//! [`InvestigationSummary`] is a pure function of a set of category states.
//! It is recomputed on demand and never independently mutated, so repeated
//! computation over unchanged states yields identical values.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::InformationCategory;
use super::policy::CompletionReason;
use super::state::CategoryState;

/// Outcome of one category's cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCycleResult {
    /// The category that ran.
    pub category: InformationCategory,
    /// Iterations completed before the terminal transition.
    pub iterations_completed: u32,
    /// Total queries executed across all iterations.
    pub total_queries_executed: u64,
    /// Total facts extracted across all iterations.
    pub total_facts_extracted: u64,
    /// Confidence at completion.
    pub final_confidence: f64,
    /// The single terminal reason.
    pub completion_reason: CompletionReason,
    /// Whether the category terminated because a collaborator failed.
    pub is_error: bool,
    /// Captured collaborator failure message, when `is_error`.
    pub error_message: Option<String>,
}

impl TypeCycleResult {
    /// Derive the result from a terminal category state.
    ///
    /// A non-terminal state would indicate a runner bug; the reason falls
    /// back to `Error` rather than panicking.
    pub fn from_state(state: &CategoryState) -> Self {
        let completion_reason = state.completion_reason.unwrap_or(CompletionReason::Error);
        Self {
            category: state.category,
            iterations_completed: state.current_iteration_number,
            total_queries_executed: state.total_queries_executed,
            total_facts_extracted: state.total_facts_extracted,
            final_confidence: state.final_confidence,
            completion_reason,
            is_error: completion_reason == CompletionReason::Error,
            error_message: state.error_message.clone(),
        }
    }
}

/// Aggregated outcome of a multi-category run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationResult {
    /// Subject the run investigated.
    pub subject_id: Uuid,
    /// Per-category results, in the order the categories were requested.
    pub results: Vec<TypeCycleResult>,
    /// Categories that reached a normal completion.
    pub types_completed: u32,
    /// Categories that terminated with a collaborator error.
    pub types_failed: u32,
    /// Categories the eligibility gate rejected.
    pub types_skipped: u32,
    /// Categories interrupted by cancellation.
    pub types_stopped: u32,
    /// Whether any category terminated with an error.
    pub has_errors: bool,
    /// Whether the run was cancelled before all categories finished.
    pub cancelled: bool,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
}

impl InvestigationResult {
    /// Aggregate per-category results into a run result.
    pub fn aggregate(
        subject_id: Uuid,
        results: Vec<TypeCycleResult>,
        cancelled: bool,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut types_completed = 0;
        let mut types_failed = 0;
        let mut types_skipped = 0;
        let mut types_stopped = 0;
        for result in &results {
            match result.completion_reason {
                reason if reason.is_normal_completion() => types_completed += 1,
                CompletionReason::Error => types_failed += 1,
                CompletionReason::Skipped => types_skipped += 1,
                CompletionReason::UserStopped => types_stopped += 1,
                _ => {}
            }
        }
        Self {
            subject_id,
            has_errors: types_failed > 0,
            types_completed,
            types_failed,
            types_skipped,
            types_stopped,
            results,
            cancelled,
            started_at,
            completed_at: Utc::now(),
        }
    }

    /// Result for one category, if it was part of the run.
    pub fn for_category(&self, category: InformationCategory) -> Option<&TypeCycleResult> {
        self.results.iter().find(|r| r.category == category)
    }
}

/// Read-only aggregate over a set of category states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationSummary {
    /// Number of category states summarized.
    pub total_categories: usize,
    /// Categories that reached a normal completion.
    pub categories_completed: usize,
    /// Categories that terminated with an error.
    pub categories_failed: usize,
    /// Categories the gate rejected.
    pub categories_skipped: usize,
    /// Categories interrupted by cancellation.
    pub categories_stopped: usize,
    /// Total iterations across all categories.
    pub total_iterations: u64,
    /// Total queries executed across all categories.
    pub total_queries_executed: u64,
    /// Total facts extracted across all categories.
    pub total_facts_extracted: u64,
    /// Histogram of terminal reasons.
    pub completion_reasons: HashMap<CompletionReason, usize>,
    /// Mean final confidence over normally-completed categories with a
    /// non-zero confidence; `None` when there are none.
    pub average_final_confidence: Option<f64>,
    /// The single lowest final confidence among categories that ran at least
    /// one iteration, with its category.
    pub lowest_confidence: Option<(InformationCategory, f64)>,
    /// Earliest cycle start among the states.
    pub started_at: Option<DateTime<Utc>>,
    /// Latest terminal transition among the states.
    pub completed_at: Option<DateTime<Utc>>,
}

impl InvestigationSummary {
    /// Recompute the summary from the given states. Pure; no side effects.
    pub fn from_states(states: &[CategoryState]) -> Self {
        let mut completion_reasons: HashMap<CompletionReason, usize> = HashMap::new();
        let mut categories_completed = 0;
        let mut categories_failed = 0;
        let mut categories_skipped = 0;
        let mut categories_stopped = 0;
        let mut total_iterations = 0;
        let mut total_queries_executed = 0;
        let mut total_facts_extracted = 0;
        let mut confidence_sum = 0.0;
        let mut confidence_count = 0u32;
        let mut lowest_confidence: Option<(InformationCategory, f64)> = None;
        let mut started_at: Option<DateTime<Utc>> = None;
        let mut completed_at: Option<DateTime<Utc>> = None;

        for state in states {
            total_iterations += u64::from(state.current_iteration_number);
            total_queries_executed += state.total_queries_executed;
            total_facts_extracted += state.total_facts_extracted;

            if let Some(reason) = state.completion_reason {
                *completion_reasons.entry(reason).or_insert(0) += 1;
                match reason {
                    r if r.is_normal_completion() => {
                        categories_completed += 1;
                        if state.final_confidence > 0.0 {
                            confidence_sum += state.final_confidence;
                            confidence_count += 1;
                        }
                    }
                    CompletionReason::Error => categories_failed += 1,
                    CompletionReason::Skipped => categories_skipped += 1,
                    CompletionReason::UserStopped => categories_stopped += 1,
                    _ => {}
                }
            }

            if state.current_iteration_number > 0 {
                let is_lower = lowest_confidence
                    .map_or(true, |(_, lowest)| state.final_confidence < lowest);
                if is_lower {
                    lowest_confidence = Some((state.category, state.final_confidence));
                }
            }

            if started_at.map_or(true, |earliest| state.started_at < earliest) {
                started_at = Some(state.started_at);
            }
            if let Some(done) = state.completed_at {
                if completed_at.map_or(true, |latest| done > latest) {
                    completed_at = Some(done);
                }
            }
        }

        let average_final_confidence = if confidence_count > 0 {
            Some(confidence_sum / f64::from(confidence_count))
        } else {
            None
        };

        Self {
            total_categories: states.len(),
            categories_completed,
            categories_failed,
            categories_skipped,
            categories_stopped,
            total_iterations,
            total_queries_executed,
            total_facts_extracted,
            completion_reasons,
            average_final_confidence,
            lowest_confidence,
            started_at,
            completed_at,
        }
    }
}
