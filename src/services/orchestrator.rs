//! InvestigationOrchestrator - schedules category cycles for one subject.
//!
//! Categories run sequentially by default. With `max_concurrency > 1` they
//! run on a `JoinSet` bounded by a semaphore; each cycle runner owns its
//! category state exclusively and results are joined before aggregation, so
//! no state is shared between in-flight categories.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::{
    CategoryState, CompletionReason, InformationCategory, InvestigationResult,
    InvestigationSummary, ProgressEvent, ProgressEventType, SubjectContext, TerminationPolicy,
    TypeCycleResult,
};
use crate::domain::ports::{Assessor, EligibilityGate, Planner, Refiner, Searcher};

use super::cycle_runner::{CategoryCycleRunner, ProgressScope};
use super::observers::{ObserverId, ObserverRegistry};

/// Run-level knobs for the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestigationConfig {
    /// Maximum category cycles in flight at once. `1` means sequential.
    pub max_concurrency: usize,
    /// Whether a category's error completion lets the rest of the run
    /// proceed. When `false`, an error stops scheduling further categories.
    pub continue_on_category_error: bool,
    /// Whether progress observers are invoked at all.
    pub emit_progress_events: bool,
    /// Hard cap on queries per iteration, after dedup.
    pub max_queries_per_iteration: usize,
}

impl Default for InvestigationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 1,
            continue_on_category_error: true,
            emit_progress_events: true,
            max_queries_per_iteration: 5,
        }
    }
}

/// Cloneable handle that cancels the in-flight run.
///
/// Each running category finishes its current iteration and completes as
/// `UserStopped`; completed categories keep their results.
#[derive(Clone)]
pub struct CancellationHandle {
    stop_tx: Arc<watch::Sender<bool>>,
    user_cancelled: Arc<AtomicBool>,
}

impl CancellationHandle {
    /// Request cancellation.
    pub fn cancel(&self) {
        self.user_cancelled.store(true, Ordering::SeqCst);
        let _ = self.stop_tx.send(true);
        info!("investigation cancellation requested");
    }
}

/// Schedules per-category cycles and aggregates their outcomes.
pub struct InvestigationOrchestrator {
    planner: Arc<dyn Planner>,
    searcher: Arc<dyn Searcher>,
    assessor: Arc<dyn Assessor>,
    refiner: Arc<dyn Refiner>,
    gate: Arc<dyn EligibilityGate>,
    policy: TerminationPolicy,
    config: InvestigationConfig,
    observers: ObserverRegistry,
    stop_tx: Arc<watch::Sender<bool>>,
    user_cancelled: Arc<AtomicBool>,
    states: Arc<RwLock<Vec<CategoryState>>>,
}

impl InvestigationOrchestrator {
    /// Wire an orchestrator from its collaborators and configuration.
    pub fn new(
        planner: Arc<dyn Planner>,
        searcher: Arc<dyn Searcher>,
        assessor: Arc<dyn Assessor>,
        refiner: Arc<dyn Refiner>,
        gate: Arc<dyn EligibilityGate>,
        policy: TerminationPolicy,
        config: InvestigationConfig,
    ) -> Self {
        let (stop_tx, _stop_rx) = watch::channel(false);
        let observers = ObserverRegistry::new(config.emit_progress_events);
        Self {
            planner,
            searcher,
            assessor,
            refiner,
            gate,
            policy,
            config,
            observers,
            stop_tx: Arc::new(stop_tx),
            user_cancelled: Arc::new(AtomicBool::new(false)),
            states: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register a progress observer, returning its removal handle.
    pub fn add_progress_observer(
        &self,
        callback: impl Fn(&ProgressEvent) + Send + Sync + 'static,
    ) -> ObserverId {
        self.observers.add(callback)
    }

    /// Unregister a progress observer. Returns whether it was registered.
    pub fn remove_progress_observer(&self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Cloneable cancellation handle for the in-flight run.
    pub fn cancellation_handle(&self) -> CancellationHandle {
        CancellationHandle {
            stop_tx: Arc::clone(&self.stop_tx),
            user_cancelled: Arc::clone(&self.user_cancelled),
        }
    }

    /// Request cancellation of the in-flight run.
    ///
    /// Each running category finishes its current iteration and completes as
    /// `UserStopped`; no partial iteration is recorded.
    pub fn cancel(&self) {
        self.cancellation_handle().cancel();
    }

    /// Run the given categories to terminal states and aggregate the outcome.
    ///
    /// Returns `Ok` even when individual categories fail: their terminal
    /// `Error` completions are part of the result. The only `Err` out of here
    /// is state-machine misuse, which indicates a bug.
    pub async fn run_investigation(
        &self,
        subject: &SubjectContext,
        categories: &[InformationCategory],
    ) -> EngineResult<InvestigationResult> {
        let started_at = chrono::Utc::now();
        self.user_cancelled.store(false, Ordering::SeqCst);
        let _ = self.stop_tx.send(false);
        info!(
            subject = %subject.id,
            categories = categories.len(),
            max_concurrency = self.config.max_concurrency,
            "investigation starting"
        );

        let states = if self.config.max_concurrency > 1 {
            self.run_concurrent(subject, categories).await?
        } else {
            self.run_sequential(subject, categories).await?
        };

        let results: Vec<TypeCycleResult> =
            states.iter().map(TypeCycleResult::from_state).collect();
        {
            let mut retained = self.states.write().await;
            *retained = states;
        }

        let cancelled = self.user_cancelled.load(Ordering::SeqCst);
        let result = InvestigationResult::aggregate(subject.id, results, cancelled, started_at);
        info!(
            subject = %subject.id,
            completed = result.types_completed,
            failed = result.types_failed,
            skipped = result.types_skipped,
            stopped = result.types_stopped,
            cancelled = result.cancelled,
            "investigation finished"
        );
        self.observers.emit(&ProgressEvent::new(
            ProgressEventType::InvestigationCompleted,
            None,
            None,
            0,
            format!(
                "investigation of {} finished: {} of {} categories completed",
                subject.display_name,
                result.types_completed,
                result.results.len()
            ),
            100.0,
        ));
        Ok(result)
    }

    /// Run one category outside a full run, retaining its state for
    /// summaries. Replaces any earlier state for the same category.
    ///
    /// A cancellation belongs to the run it interrupted, so the stop signal
    /// is cleared here just as at the start of a full run.
    pub async fn run_single_category(
        &self,
        subject: &SubjectContext,
        category: InformationCategory,
    ) -> EngineResult<TypeCycleResult> {
        self.user_cancelled.store(false, Ordering::SeqCst);
        let _ = self.stop_tx.send(false);
        let runner = self.runner_for(ProgressScope::default());
        let state = runner.run(subject, category).await?;
        let result = TypeCycleResult::from_state(&state);

        let mut retained = self.states.write().await;
        if let Some(existing) = retained.iter_mut().find(|s| s.category == category) {
            *existing = state;
        } else {
            retained.push(state);
        }
        Ok(result)
    }

    /// Summary over every category state retained so far.
    pub async fn summary(&self) -> InvestigationSummary {
        let retained = self.states.read().await;
        InvestigationSummary::from_states(&retained)
    }

    async fn run_sequential(
        &self,
        subject: &SubjectContext,
        categories: &[InformationCategory],
    ) -> EngineResult<Vec<CategoryState>> {
        let total = categories.len();
        let mut states = Vec::with_capacity(total);
        for (index, category) in categories.iter().copied().enumerate() {
            let runner = self.runner_for(ProgressScope { index, total });
            let state = runner.run(subject, category).await?;
            let errored = state.completion_reason == Some(CompletionReason::Error);
            states.push(state);
            if errored && !self.config.continue_on_category_error {
                warn!(
                    category = %category,
                    "category errored; stopping scheduling of remaining categories"
                );
                break;
            }
        }
        Ok(states)
    }

    async fn run_concurrent(
        &self,
        subject: &SubjectContext,
        categories: &[InformationCategory],
    ) -> EngineResult<Vec<CategoryState>> {
        let total = categories.len();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut join_set = JoinSet::new();

        for (index, category) in categories.iter().copied().enumerate() {
            let runner = self.runner_for(ProgressScope { index, total });
            let subject = subject.clone();
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => runner.run(&subject, category).await,
                    Err(_) => Err(EngineError::invalid_state(
                        category,
                        "scheduler semaphore closed before the category ran",
                    )),
                };
                (index, outcome)
            });
        }

        // Join everything, then aggregate: a single writer assembles the
        // ordered results, so nothing is lost to interleaving.
        let mut slots: Vec<Option<CategoryState>> = (0..total).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, Ok(state))) => {
                    if state.completion_reason == Some(CompletionReason::Error)
                        && !self.config.continue_on_category_error
                    {
                        // In-flight categories observe the stop signal and
                        // finish as UserStopped; the run is not cancelled.
                        warn!(
                            category = %state.category,
                            "category errored; signalling in-flight categories to stop"
                        );
                        let _ = self.stop_tx.send(true);
                    }
                    slots[index] = Some(state);
                }
                Ok((_, Err(err))) => return Err(err),
                Err(join_err) => {
                    warn!(error = %join_err, "category task aborted; omitting from results");
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    fn runner_for(&self, scope: ProgressScope) -> CategoryCycleRunner {
        CategoryCycleRunner::new(
            Arc::clone(&self.planner),
            Arc::clone(&self.searcher),
            Arc::clone(&self.assessor),
            Arc::clone(&self.refiner),
            Arc::clone(&self.gate),
            self.policy.clone(),
            self.config.max_queries_per_iteration,
            self.observers.clone(),
            self.stop_tx.subscribe(),
            scope,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = InvestigationConfig::default();
        assert_eq!(config.max_concurrency, 1);
        assert!(config.continue_on_category_error);
        assert!(config.emit_progress_events);
        assert_eq!(config.max_queries_per_iteration, 5);
    }

    #[test]
    fn test_config_partial_yaml_fills_defaults() {
        let config: InvestigationConfig =
            serde_yaml::from_str("max_concurrency: 4").unwrap();
        assert_eq!(config.max_concurrency, 4);
        assert!(config.continue_on_category_error);
        assert_eq!(config.max_queries_per_iteration, 5);
    }
}
