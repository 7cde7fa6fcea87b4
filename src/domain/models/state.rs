//! The per-category state machine.
//!
//! A [`CategoryState`] is created when its cycle begins and mutated only by
//! its own cycle runner (single writer; nothing is shared across categories).
//! The iteration history is append-only, and the terminal transition happens
//! exactly once: a second `mark_complete` is a programmer error and fails
//! loudly instead of silently overwriting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{EngineError, EngineResult};

use super::category::InformationCategory;
use super::iteration::{CyclePhase, IterationRecord};
use super::policy::CompletionReason;

/// Ordered iteration history plus completion status for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryState {
    /// The category this state tracks.
    pub category: InformationCategory,
    /// Current phase of the cycle.
    pub phase: CyclePhase,
    /// Append-only, ordered iteration history.
    pub history: Vec<IterationRecord>,
    /// Number of completed iterations.
    pub current_iteration_number: u32,
    /// Whether the category has reached a terminal state.
    pub is_complete: bool,
    /// The terminal reason; set exactly once.
    pub completion_reason: Option<CompletionReason>,
    /// Confidence recorded at completion.
    pub final_confidence: f64,
    /// Captured message when the terminal reason is `Error`.
    pub error_message: Option<String>,
    /// Running total of facts extracted across the history.
    pub total_facts_extracted: u64,
    /// Running total of queries generated across the history.
    pub total_queries_generated: u64,
    /// Running total of queries executed across the history.
    pub total_queries_executed: u64,
    /// Running total of queries that succeeded across the history.
    pub total_queries_successful: u64,
    /// When the cycle began.
    pub started_at: DateTime<Utc>,
    /// When the terminal transition happened.
    pub completed_at: Option<DateTime<Utc>>,
}

impl CategoryState {
    /// Create the state for a cycle that begins now.
    pub fn new(category: InformationCategory) -> Self {
        Self {
            category,
            phase: CyclePhase::Planning,
            history: Vec::new(),
            current_iteration_number: 0,
            is_complete: false,
            completion_reason: None,
            final_confidence: 0.0,
            error_message: None,
            total_facts_extracted: 0,
            total_queries_generated: 0,
            total_queries_executed: 0,
            total_queries_successful: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Begin the next iteration, returning a fresh record numbered
    /// `current_iteration_number + 1`.
    pub fn start_iteration(&mut self) -> EngineResult<IterationRecord> {
        if self.is_complete {
            return Err(EngineError::invalid_state(
                self.category,
                "start_iteration called on a terminal state",
            ));
        }
        self.phase = CyclePhase::Planning;
        Ok(IterationRecord::new(
            self.category,
            self.current_iteration_number + 1,
        ))
    }

    /// Append a finished iteration to the history.
    ///
    /// Computes `confidence_delta` against the prior record (`0.0` when there
    /// is none), recomputes `info_gain_rate` from the final counters, stamps
    /// the end time, and updates the running totals. Appending out of order
    /// or onto a terminal state is a programmer error.
    pub fn complete_iteration(&mut self, mut record: IterationRecord) -> EngineResult<()> {
        if self.is_complete {
            return Err(EngineError::invalid_state(
                self.category,
                "complete_iteration called on a terminal state",
            ));
        }
        if record.iteration_number != self.current_iteration_number + 1 {
            return Err(EngineError::invalid_state(
                self.category,
                format!(
                    "complete_iteration out of order: got iteration {}, expected {}",
                    record.iteration_number,
                    self.current_iteration_number + 1
                ),
            ));
        }
        if !record.counters_consistent() {
            return Err(EngineError::invalid_state(
                self.category,
                format!(
                    "query counters inconsistent: generated={} executed={} successful={}",
                    record.queries_generated, record.queries_executed, record.queries_successful
                ),
            ));
        }

        record.confidence_delta = self
            .history
            .last()
            .map_or(0.0, |prev| record.confidence_score - prev.confidence_score);
        record.info_gain_rate = IterationRecord::gain_rate(
            record.new_facts_this_iteration,
            record.queries_executed,
        );
        if record.ended_at.is_none() {
            record.ended_at = Some(Utc::now());
        }

        self.total_facts_extracted += u64::from(record.facts_extracted);
        self.total_queries_generated += u64::from(record.queries_generated);
        self.total_queries_executed += u64::from(record.queries_executed);
        self.total_queries_successful += u64::from(record.queries_successful);
        self.current_iteration_number = record.iteration_number;
        self.phase = CyclePhase::Deciding;
        self.history.push(record);
        Ok(())
    }

    /// Transition to the terminal state.
    ///
    /// Calling this on an already-terminal state is a programmer error and
    /// fails loudly; the original reason is never overwritten.
    pub fn mark_complete(
        &mut self,
        reason: CompletionReason,
        confidence: f64,
    ) -> EngineResult<()> {
        if self.is_complete {
            return Err(EngineError::invalid_state(
                self.category,
                format!(
                    "mark_complete({reason}) called but state is already terminal ({})",
                    self.completion_reason
                        .map_or_else(|| "unset".to_string(), |r| r.to_string())
                ),
            ));
        }
        self.is_complete = true;
        self.completion_reason = Some(reason);
        self.final_confidence = confidence;
        self.phase = CyclePhase::Complete;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// The most recently completed iteration, if any.
    pub fn last_record(&self) -> Option<&IterationRecord> {
        self.history.last()
    }

    /// Confidence after the most recent iteration; `0.0` before the first.
    pub fn current_confidence(&self) -> f64 {
        self.history.last().map_or(0.0, |r| r.confidence_score)
    }
}
