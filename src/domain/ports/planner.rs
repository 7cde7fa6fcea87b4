//! Planner port - query generation for one iteration.

use crate::domain::errors::EngineResult;
use crate::domain::models::{
    CategoryKnowledge, InformationCategory, RefinementDirective, SearchQuery, SubjectContext,
};

/// Trait for query-generation strategies.
///
/// Implementations may be non-deterministic (an LLM-backed planner, for
/// example). The contract binds exactly two invariants:
///
/// - never return more queries than the configured per-iteration cap, and
/// - never re-propose a query already executed for this category this run
///   (`knowledge.has_executed`).
///
/// The refinement directive from the previous iteration is advisory; a
/// planner may ignore it. Planners are synchronous and never suspend.
pub trait Planner: Send + Sync {
    /// Generate an ordered, possibly empty, batch of queries.
    fn generate(
        &self,
        subject: &SubjectContext,
        category: InformationCategory,
        knowledge: &CategoryKnowledge,
        iteration: u32,
        gaps: &[String],
        directive: Option<RefinementDirective>,
    ) -> EngineResult<Vec<SearchQuery>>;
}
