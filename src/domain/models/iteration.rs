//! Per-iteration metrics for one Search-Assess-Refine pass.
//!
//! An [`IterationRecord`] is immutable once appended to a category's history.
//! The derived metrics (`confidence_delta`, `info_gain_rate`) are computed by
//! [`CategoryState::complete_iteration`](super::state::CategoryState::complete_iteration)
//! at append time, against the prior record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::category::InformationCategory;

/// Phase of the per-category investigation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    /// Generating queries for the next iteration.
    Planning,
    /// Executing queries via the searcher.
    Searching,
    /// Extracting facts and re-scoring confidence.
    Assessing,
    /// Producing a refinement directive for the next plan.
    Refining,
    /// Evaluating the termination policy.
    Deciding,
    /// The category has reached a terminal state.
    Complete,
}

impl std::fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Planning => "planning",
            Self::Searching => "searching",
            Self::Assessing => "assessing",
            Self::Refining => "refining",
            Self::Deciding => "deciding",
            Self::Complete => "complete",
        };
        write!(f, "{name}")
    }
}

/// Metrics for one iteration of one category.
///
/// Query counters are monotone within an iteration:
/// `queries_successful <= queries_executed <= queries_generated`.
/// Confidence is not required to increase -- refinement may surface
/// contradicting evidence that lowers it, and `confidence_delta` carries the
/// true signed change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based iteration number, monotone per category.
    pub iteration_number: u32,
    /// Category this iteration belongs to.
    pub category: InformationCategory,
    /// Phase the iteration last reported.
    pub phase: CyclePhase,
    /// Queries the planner proposed, before dedup and capping.
    pub queries_generated: u32,
    /// Queries the searcher actually ran.
    pub queries_executed: u32,
    /// Queries that ran without an individual failure.
    pub queries_successful: u32,
    /// Successful results that carried new information.
    pub results_found: u32,
    /// Facts the assessor extracted this iteration.
    pub facts_extracted: u32,
    /// Extracted facts not already known to the category.
    pub new_facts_this_iteration: u32,
    /// Confidence after assessment, clamped to `[0, 1]`.
    pub confidence_score: f64,
    /// Signed change versus the previous iteration's score; `0.0` on iteration 1.
    pub confidence_delta: f64,
    /// `new_facts_this_iteration / queries_executed`, `0.0` when no queries ran.
    pub info_gain_rate: f64,
    /// Gaps the assessor identified, in order.
    pub gaps_identified: Vec<String>,
    /// Count of previously open gaps no longer identified.
    pub gaps_addressed: u32,
    /// When the iteration started.
    pub started_at: DateTime<Utc>,
    /// When the iteration ended; `None` while in flight.
    pub ended_at: Option<DateTime<Utc>>,
}

impl IterationRecord {
    /// Create a fresh record for the given iteration number.
    pub fn new(category: InformationCategory, iteration_number: u32) -> Self {
        Self {
            iteration_number,
            category,
            phase: CyclePhase::Planning,
            queries_generated: 0,
            queries_executed: 0,
            queries_successful: 0,
            results_found: 0,
            facts_extracted: 0,
            new_facts_this_iteration: 0,
            confidence_score: 0.0,
            confidence_delta: 0.0,
            info_gain_rate: 0.0,
            gaps_identified: Vec::new(),
            gaps_addressed: 0,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Information gain rate for the given counters.
    ///
    /// Exactly `new_facts / queries_executed`, and `0.0` when no queries ran.
    pub fn gain_rate(new_facts: u32, queries_executed: u32) -> f64 {
        if queries_executed == 0 {
            0.0
        } else {
            f64::from(new_facts) / f64::from(queries_executed)
        }
    }

    /// Wall-clock duration, if the iteration has ended.
    pub fn duration(&self) -> Option<Duration> {
        self.ended_at.map(|ended| ended - self.started_at)
    }

    /// Whether the query counters respect their ordering invariant.
    pub fn counters_consistent(&self) -> bool {
        self.queries_executed <= self.queries_generated
            && self.queries_successful <= self.queries_executed
    }
}
