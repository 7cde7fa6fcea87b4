//! Searcher port - query execution, consumed only through this interface.
//!
//! The surrounding system binds a real searcher to whatever provider pool,
//! cache, rate limiter, and circuit breaker it uses; none of that is visible
//! here. Internal fan-out across queries is opaque to the engine.

use async_trait::async_trait;

use crate::domain::errors::EngineResult;
use crate::domain::models::{QueryResult, SearchQuery};

/// Trait for query execution backends.
///
/// Returns one result per executed query. An individual query failure is
/// reported in its [`QueryResult`] and never aborts the iteration; an `Err`
/// from this method means the searcher itself failed.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Execute a batch of queries.
    async fn execute(&self, queries: &[SearchQuery]) -> EngineResult<Vec<QueryResult>>;
}

/// A searcher that deterministically finds nothing.
///
/// The explicit default collaborator when no real searcher is wired: every
/// query succeeds with zero new information, so a run still produces a
/// complete, well-formed result.
#[derive(Debug, Clone, Default)]
pub struct NullSearcher;

impl NullSearcher {
    /// Create a null searcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Searcher for NullSearcher {
    async fn execute(&self, queries: &[SearchQuery]) -> EngineResult<Vec<QueryResult>> {
        Ok(queries
            .iter()
            .map(|query| QueryResult::empty(query.clone()))
            .collect())
    }
}
