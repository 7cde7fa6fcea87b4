//! Ephemeral progress events.
//!
//! Progress events are fire-and-forget notifications of phase transitions.
//! They are never persisted, and observers receive them by reference without
//! gaining any access to orchestrator state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::InformationCategory;
use super::iteration::CyclePhase;

/// Kind of progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressEventType {
    /// A category's cycle has begun.
    CategoryStarted,
    /// A category moved to a new phase.
    PhaseChanged,
    /// A category finished an iteration.
    IterationCompleted,
    /// A category reached a terminal state.
    CategoryCompleted,
    /// The whole investigation finished.
    InvestigationCompleted,
}

impl std::fmt::Display for ProgressEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CategoryStarted => "category_started",
            Self::PhaseChanged => "phase_changed",
            Self::IterationCompleted => "iteration_completed",
            Self::CategoryCompleted => "category_completed",
            Self::InvestigationCompleted => "investigation_completed",
        };
        write!(f, "{name}")
    }
}

/// A single phase-transition notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// What happened.
    pub event_type: ProgressEventType,
    /// Category concerned; `None` for run-level events.
    pub category: Option<InformationCategory>,
    /// Phase at the time of the event, when applicable.
    pub phase: Option<CyclePhase>,
    /// Iteration number at the time of the event; `0` before iteration 1.
    pub iteration: u32,
    /// Human-readable description.
    pub message: String,
    /// Rough overall completion estimate in `[0, 100]`.
    pub estimated_percent_complete: f64,
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    /// Build an event stamped now.
    pub fn new(
        event_type: ProgressEventType,
        category: Option<InformationCategory>,
        phase: Option<CyclePhase>,
        iteration: u32,
        message: impl Into<String>,
        estimated_percent_complete: f64,
    ) -> Self {
        Self {
            event_type,
            category,
            phase,
            iteration,
            message: message.into(),
            estimated_percent_complete: estimated_percent_complete.clamp(0.0, 100.0),
            timestamp: Utc::now(),
        }
    }
}
