//! CategoryCycleRunner - drives one category through the
//! Plan-Search-Assess-Refine-Decide loop until terminal.
//!
//! The runner is the single writer of its [`CategoryState`]. Collaborator
//! failures are caught here and converted to a terminal `Error` completion
//! with the message captured; they never propagate out. State-machine misuse
//! (`EngineError::InvalidState`) does propagate, since it signals a bug in
//! the orchestration itself.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::domain::errors::{CollaboratorRole, EngineError, EngineResult};
use crate::domain::models::{
    CategoryKnowledge, CategoryState, CompletionReason, CyclePhase, InformationCategory,
    ProgressEvent, ProgressEventType, RefinementDirective, SearchQuery, SubjectContext,
    TerminationPolicy,
};
use crate::domain::ports::{Assessor, EligibilityGate, Planner, Refiner, Searcher};

use super::continuation::{ContinuationController, ContinuationDecision};
use super::observers::ObserverRegistry;

/// Position of this category within the run, for percent estimation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProgressScope {
    /// Zero-based index of the category in the requested order.
    pub index: usize,
    /// Total categories in the run.
    pub total: usize,
}

impl Default for ProgressScope {
    fn default() -> Self {
        Self { index: 0, total: 1 }
    }
}

/// How a cycle ended short of a normal decision.
enum CycleFailure {
    /// A collaborator raised; recorded as a terminal `Error` completion.
    Collaborator {
        role: CollaboratorRole,
        message: String,
    },
    /// State-machine misuse; propagates.
    Invalid(EngineError),
}

impl CycleFailure {
    fn collaborator(role: CollaboratorRole, err: &EngineError) -> Self {
        Self::Collaborator {
            role,
            message: err.to_string(),
        }
    }
}

/// Drives one category's state machine to a terminal state.
pub struct CategoryCycleRunner {
    planner: Arc<dyn Planner>,
    searcher: Arc<dyn Searcher>,
    assessor: Arc<dyn Assessor>,
    refiner: Arc<dyn Refiner>,
    gate: Arc<dyn EligibilityGate>,
    policy: TerminationPolicy,
    max_queries_per_iteration: usize,
    observers: ObserverRegistry,
    cancel: watch::Receiver<bool>,
    scope: ProgressScope,
}

impl CategoryCycleRunner {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        planner: Arc<dyn Planner>,
        searcher: Arc<dyn Searcher>,
        assessor: Arc<dyn Assessor>,
        refiner: Arc<dyn Refiner>,
        gate: Arc<dyn EligibilityGate>,
        policy: TerminationPolicy,
        max_queries_per_iteration: usize,
        observers: ObserverRegistry,
        cancel: watch::Receiver<bool>,
        scope: ProgressScope,
    ) -> Self {
        Self {
            planner,
            searcher,
            assessor,
            refiner,
            gate,
            policy,
            max_queries_per_iteration,
            observers,
            cancel,
            scope,
        }
    }

    /// Run the category to a terminal state.
    ///
    /// Always returns the terminal state unless the state machine itself was
    /// misused, which is the only error this method surfaces.
    pub async fn run(
        &self,
        subject: &SubjectContext,
        category: InformationCategory,
    ) -> EngineResult<CategoryState> {
        let mut state = CategoryState::new(category);
        info!(category = %category, subject = %subject.id, "category cycle starting");
        self.emit(
            ProgressEventType::CategoryStarted,
            &state,
            format!("investigating {category}"),
        );

        match self.gate.is_permitted(category, subject).await {
            Ok(true) => {}
            Ok(false) => {
                info!(category = %category, "eligibility gate rejected category");
                state.mark_complete(CompletionReason::Skipped, 0.0)?;
                self.emit(
                    ProgressEventType::CategoryCompleted,
                    &state,
                    format!("{category} skipped: not permitted"),
                );
                return Ok(state);
            }
            Err(err) => {
                warn!(category = %category, error = %err, "eligibility gate failed");
                state.error_message = Some(err.to_string());
                state.mark_complete(CompletionReason::Error, 0.0)?;
                self.emit(
                    ProgressEventType::CategoryCompleted,
                    &state,
                    format!("{category} errored during gate check"),
                );
                return Ok(state);
            }
        }

        let cycle = self
            .run_cycle(subject, category, &mut state)
            .instrument(info_span!("category_cycle", category = %category));
        match cycle.await {
            Ok(()) => {}
            Err(CycleFailure::Collaborator { role, message }) => {
                warn!(
                    category = %category,
                    role = %role,
                    error = %message,
                    "collaborator failed; completing category as error"
                );
                let confidence = state.current_confidence();
                state.error_message = Some(message);
                state.mark_complete(CompletionReason::Error, confidence)?;
            }
            Err(CycleFailure::Invalid(err)) => return Err(err),
        }

        info!(
            category = %category,
            reason = %state.completion_reason.map_or_else(|| "unset".to_string(), |r| r.to_string()),
            iterations = state.current_iteration_number,
            confidence = state.final_confidence,
            "category cycle finished"
        );
        self.emit(
            ProgressEventType::CategoryCompleted,
            &state,
            format!(
                "{category} complete after {} iteration(s)",
                state.current_iteration_number
            ),
        );
        Ok(state)
    }

    /// The Plan-Search-Assess-Refine-Decide loop.
    async fn run_cycle(
        &self,
        subject: &SubjectContext,
        category: InformationCategory,
        state: &mut CategoryState,
    ) -> Result<(), CycleFailure> {
        let mut knowledge = CategoryKnowledge::new();
        let mut directive: Option<RefinementDirective> = None;

        loop {
            // Cancellation lands between iterations: the current iteration
            // always finishes, so no partial facts are orphaned.
            if *self.cancel.borrow() {
                info!(category = %category, "cancellation observed; stopping category");
                let confidence = state.current_confidence();
                state
                    .mark_complete(CompletionReason::UserStopped, confidence)
                    .map_err(CycleFailure::Invalid)?;
                return Ok(());
            }

            let mut record = state.start_iteration().map_err(CycleFailure::Invalid)?;
            let iteration = record.iteration_number;
            debug!(category = %category, iteration, "iteration starting");

            // PLANNING
            self.phase(state, record.iteration_number, CyclePhase::Planning);
            let proposed = self
                .planner
                .generate(
                    subject,
                    category,
                    &knowledge,
                    iteration,
                    &knowledge.open_gaps,
                    directive,
                )
                .map_err(|e| CycleFailure::collaborator(CollaboratorRole::Planner, &e))?;

            record.queries_generated = u32::try_from(proposed.len()).unwrap_or(u32::MAX);

            // Guard the planner contract: drop repeats, enforce the cap.
            let mut queries = Vec::with_capacity(proposed.len());
            for query in proposed {
                if queries.len() >= self.max_queries_per_iteration {
                    break;
                }
                if !knowledge.has_executed(&query.text)
                    && !queries.iter().any(|q: &SearchQuery| q.text == query.text)
                {
                    queries.push(query);
                }
            }

            // SEARCHING
            record.phase = CyclePhase::Searching;
            self.phase(state, iteration, CyclePhase::Searching);
            let results = self
                .searcher
                .execute(&queries)
                .await
                .map_err(|e| CycleFailure::collaborator(CollaboratorRole::Searcher, &e))?;
            // One result per query is part of the searcher contract; a
            // mismatched batch is the searcher's failure, not a state bug.
            if results.len() != queries.len() {
                return Err(CycleFailure::Collaborator {
                    role: CollaboratorRole::Searcher,
                    message: format!(
                        "searcher returned {} results for {} queries",
                        results.len(),
                        queries.len()
                    ),
                });
            }
            record.queries_executed = u32::try_from(results.len()).unwrap_or(u32::MAX);
            record.queries_successful =
                u32::try_from(results.iter().filter(|r| r.success).count()).unwrap_or(u32::MAX);
            record.results_found =
                u32::try_from(
                    results
                        .iter()
                        .filter(|r| r.success && r.has_new_information)
                        .count(),
                )
                .unwrap_or(u32::MAX);
            for result in &results {
                knowledge.record_executed(&result.query.text);
            }

            // ASSESSING
            record.phase = CyclePhase::Assessing;
            self.phase(state, iteration, CyclePhase::Assessing);
            let assessment = self
                .assessor
                .assess(category, &knowledge, &results)
                .await
                .map_err(|e| CycleFailure::collaborator(CollaboratorRole::Assessor, &e))?;

            let confidence = assessment.updated_confidence.clamp(0.0, 1.0);
            record.facts_extracted =
                u32::try_from(assessment.facts.len()).unwrap_or(u32::MAX);
            record.new_facts_this_iteration = assessment.new_facts_count;
            record.confidence_score = confidence;
            record.gaps_addressed = u32::try_from(
                knowledge
                    .open_gaps
                    .iter()
                    .filter(|gap| !assessment.gaps_identified.contains(gap))
                    .count(),
            )
            .unwrap_or(u32::MAX);
            record.gaps_identified = assessment.gaps_identified.clone();

            for fact in assessment.facts {
                if !knowledge.knows(&fact.statement) {
                    knowledge.facts.push(fact);
                }
            }
            knowledge.confidence = confidence;
            knowledge.open_gaps = assessment.gaps_identified;

            // REFINING
            record.phase = CyclePhase::Refining;
            self.phase(state, iteration, CyclePhase::Refining);
            directive = Some(
                self.refiner
                    .refine(category, &knowledge.open_gaps, iteration)
                    .map_err(|e| CycleFailure::collaborator(CollaboratorRole::Refiner, &e))?,
            );

            // DECIDING
            record.phase = CyclePhase::Deciding;
            state
                .complete_iteration(record)
                .map_err(CycleFailure::Invalid)?;
            self.emit(
                ProgressEventType::IterationCompleted,
                state,
                format!("{category} iteration {iteration} complete"),
            );

            match ContinuationController::evaluate(&self.policy, state) {
                ContinuationDecision::Continue => {}
                ContinuationDecision::Stop(reason) => {
                    let confidence = state.current_confidence();
                    state
                        .mark_complete(reason, confidence)
                        .map_err(CycleFailure::Invalid)?;
                    return Ok(());
                }
            }
        }
    }

    /// Record a phase transition and notify observers.
    fn phase(&self, state: &mut CategoryState, iteration: u32, phase: CyclePhase) {
        state.phase = phase;
        self.emit_raw(
            ProgressEventType::PhaseChanged,
            state,
            iteration,
            format!("{} entering {phase}", state.category),
        );
    }

    fn emit(&self, event_type: ProgressEventType, state: &CategoryState, message: String) {
        self.emit_raw(event_type, state, state.current_iteration_number, message);
    }

    fn emit_raw(
        &self,
        event_type: ProgressEventType,
        state: &CategoryState,
        iteration: u32,
        message: String,
    ) {
        let event = ProgressEvent::new(
            event_type,
            Some(state.category),
            Some(state.phase),
            iteration,
            message,
            self.estimated_percent(state),
        );
        self.observers.emit(&event);
    }

    /// Rough overall completion estimate across the run's categories.
    fn estimated_percent(&self, state: &CategoryState) -> f64 {
        let cap = self.policy.max_iterations_for(state.category).max(1);
        let fraction = if state.is_complete {
            1.0
        } else {
            f64::from(state.current_iteration_number.min(cap)) / f64::from(cap)
        };
        let total = self.scope.total.max(1);
        #[allow(clippy::cast_precision_loss)]
        let overall = (self.scope.index as f64 + fraction) / total as f64;
        overall * 100.0
    }
}
