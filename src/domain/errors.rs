//! Domain errors for the investigation engine.
//!
//! A gate denial is deliberately not an error: it is an expected outcome
//! surfaced as a `Skipped` completion. Collaborator failures are caught at
//! the cycle boundary and recorded as a terminal `Error` completion;
//! `InvalidState` signals a bug in the orchestration itself and always
//! propagates.

use thiserror::Error;

use crate::domain::models::InformationCategory;

/// The collaborator role that raised a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorRole {
    /// Query generation.
    Planner,
    /// Query execution.
    Searcher,
    /// Fact extraction and confidence scoring.
    Assessor,
    /// Refinement directive production.
    Refiner,
    /// Eligibility gating.
    EligibilityGate,
}

impl std::fmt::Display for CollaboratorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Planner => "planner",
            Self::Searcher => "searcher",
            Self::Assessor => "assessor",
            Self::Refiner => "refiner",
            Self::EligibilityGate => "eligibility_gate",
        };
        write!(f, "{name}")
    }
}

/// Engine-level errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A collaborator raised during an iteration. Caught at the cycle
    /// boundary and converted to a terminal `Error` completion; never
    /// propagated out of the runner.
    #[error("{role} failed: {message}")]
    Collaborator {
        /// Which collaborator failed.
        role: CollaboratorRole,
        /// Captured failure message.
        message: String,
    },

    /// Programmer error in the state machine (double completion, out-of-order
    /// iteration append). Must propagate; never convert to a terminal state.
    #[error("invalid state for {category}: {reason}")]
    InvalidState {
        /// Category whose state machine was misused.
        category: InformationCategory,
        /// What went wrong.
        reason: String,
    },

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl EngineError {
    /// Shorthand for a collaborator failure.
    pub fn collaborator(role: CollaboratorRole, message: impl Into<String>) -> Self {
        Self::Collaborator {
            role,
            message: message.into(),
        }
    }

    /// Shorthand for a state-machine misuse.
    pub fn invalid_state(category: InformationCategory, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            category,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;
