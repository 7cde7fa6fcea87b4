//! Sarengine - Confidence-Driven Investigation Engine
//!
//! Sarengine runs bounded Search-Assess-Refine cycles per information
//! category for a subject under investigation. Each category iterates
//! Plan -> Search -> Assess -> Refine -> Decide until a termination policy
//! stops it: confidence met, iteration cap reached, diminishing returns, or
//! no new information.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Category state machines, termination
//!   policy, knowledge accumulators, and the collaborator ports
//! - **Service Layer** (`services`): The cycle runner, continuation
//!   controller, progress observers, and the run-level orchestrator
//! - **Adapters** (`adapters`): Baseline collaborator strategies
//! - **Infrastructure Layer** (`infrastructure`): Configuration loading and
//!   logging setup
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sarengine::{
//!     CoverageAssessor, GapDrivenRefiner, InformationCategory, InvestigationConfig,
//!     InvestigationOrchestrator, KeywordPlanner, NullSearcher, PermitAllGate,
//!     SubjectContext, TerminationPolicy,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = InvestigationOrchestrator::new(
//!         Arc::new(KeywordPlanner::default()),
//!         Arc::new(NullSearcher::new()),
//!         Arc::new(CoverageAssessor::default()),
//!         Arc::new(GapDrivenRefiner::new()),
//!         Arc::new(PermitAllGate::new()),
//!         TerminationPolicy::default(),
//!         InvestigationConfig::default(),
//!     );
//!     let subject = SubjectContext::new("Jane Roe");
//!     let result = orchestrator
//!         .run_investigation(&subject, &InformationCategory::ALL)
//!         .await?;
//!     println!("{} categories completed", result.types_completed);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::strategies::{CoverageAssessor, GapDrivenRefiner, KeywordPlanner};
pub use domain::errors::{CollaboratorRole, EngineError, EngineResult};
pub use domain::models::{
    CategoryKnowledge, CategoryState, CompletionReason, CyclePhase, Fact, InformationCategory,
    InvestigationResult, InvestigationSummary, IterationRecord, ProgressEvent, ProgressEventType,
    QueryResult, RefinementDirective, SearchQuery, SubjectContext, TerminationPolicy,
    TypeCycleResult,
};
pub use domain::ports::{
    Assessment, Assessor, EligibilityGate, NullSearcher, PermitAllGate, Planner, Refiner, Searcher,
};
pub use infrastructure::{init_logging, ConfigError, ConfigLoader, EngineConfig, LogConfig, LogFormat};
pub use services::{
    CancellationHandle, ContinuationController, ContinuationDecision, InvestigationConfig,
    InvestigationOrchestrator, ObserverId,
};
