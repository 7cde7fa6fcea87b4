//! Termination policy and completion reasons.
//!
//! The policy fixes, at construction time, which confidence threshold and
//! iteration cap apply to a category based on its foundation classification.
//! The applicable pair never changes mid-run.

use serde::{Deserialize, Serialize};

use super::category::InformationCategory;

/// The single terminal reason recorded for a category.
///
/// Set exactly once by `CategoryState::mark_complete` and immutable
/// thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// Confidence reached the applicable threshold.
    ConfidenceMet,
    /// The applicable iteration cap was reached.
    MaxIterationsReached,
    /// Information gain fell below the minimum gain threshold.
    DiminishingReturns,
    /// Queries ran but produced no new facts.
    NoNewInformation,
    /// A run-level cancellation interrupted the category.
    UserStopped,
    /// The eligibility gate rejected the category before any iteration.
    Skipped,
    /// A collaborator failed during the cycle.
    Error,
}

impl CompletionReason {
    /// Whether the category ran to a normal, non-interrupted completion.
    pub fn is_normal_completion(self) -> bool {
        matches!(
            self,
            Self::ConfidenceMet
                | Self::MaxIterationsReached
                | Self::DiminishingReturns
                | Self::NoNewInformation
        )
    }
}

impl std::fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ConfidenceMet => "confidence_met",
            Self::MaxIterationsReached => "max_iterations_reached",
            Self::DiminishingReturns => "diminishing_returns",
            Self::NoNewInformation => "no_new_information",
            Self::UserStopped => "user_stopped",
            Self::Skipped => "skipped",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// Numeric termination heuristics for the investigation cycle.
///
/// Foundation categories (see [`InformationCategory::is_foundation`]) use
/// the `foundation_*` pair; all other categories use the standard pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminationPolicy {
    /// Confidence at which a standard category terminates as `ConfidenceMet`.
    pub confidence_threshold: f64,
    /// Confidence at which a foundation category terminates as `ConfidenceMet`.
    pub foundation_confidence_threshold: f64,
    /// Iteration cap for standard categories.
    pub max_iterations: u32,
    /// Iteration cap for foundation categories.
    pub foundation_max_iterations: u32,
    /// Information gain rate below which a category is judged unproductive.
    pub min_gain_threshold: f64,
    /// Earliest iteration at which the gain check may fire.
    ///
    /// A category always gets at least this many iterations before being
    /// judged unproductive; the default of 2 means diminishing returns never
    /// fires on iteration 1, even at zero gain.
    pub min_iterations_before_gain_check: u32,
    /// Query budget per iteration for network-degree categories.
    pub max_entities_per_network_degree: u32,
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.85,
            foundation_confidence_threshold: 0.90,
            max_iterations: 3,
            foundation_max_iterations: 4,
            min_gain_threshold: 0.1,
            min_iterations_before_gain_check: 2,
            max_entities_per_network_degree: 25,
        }
    }
}

impl TerminationPolicy {
    /// The confidence threshold applicable to `category`.
    pub fn threshold_for(&self, category: InformationCategory) -> f64 {
        if category.is_foundation() {
            self.foundation_confidence_threshold
        } else {
            self.confidence_threshold
        }
    }

    /// The iteration cap applicable to `category`.
    pub fn max_iterations_for(&self, category: InformationCategory) -> u32 {
        if category.is_foundation() {
            self.foundation_max_iterations
        } else {
            self.max_iterations
        }
    }
}
