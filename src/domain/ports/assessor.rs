//! Assessor port - fact extraction and confidence scoring.

use async_trait::async_trait;

use crate::domain::errors::EngineResult;
use crate::domain::models::{CategoryKnowledge, Fact, InformationCategory, QueryResult};

/// What an assessment produced.
#[derive(Debug, Clone, Default)]
pub struct Assessment {
    /// Facts extracted from the new results, in order.
    pub facts: Vec<Fact>,
    /// How many of those facts were not already known to the category.
    pub new_facts_count: u32,
    /// Confidence after this assessment. The runner clamps it to `[0, 1]`.
    pub updated_confidence: f64,
    /// Gaps still open, in order.
    pub gaps_identified: Vec<String>,
}

/// Trait for assessment strategies.
///
/// The assessor is the only component permitted to change a category's
/// confidence, in either direction: refinement can surface contradicting
/// evidence that lowers it. Assessment is a suspension point (it may be
/// I/O- or LLM-bound).
#[async_trait]
pub trait Assessor: Send + Sync {
    /// Assess the new results against what is already known.
    async fn assess(
        &self,
        category: InformationCategory,
        knowledge: &CategoryKnowledge,
        new_results: &[QueryResult],
    ) -> EngineResult<Assessment>;
}
