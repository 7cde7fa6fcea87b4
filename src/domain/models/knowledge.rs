//! Subject context, per-category knowledge, and the query/result value types
//! exchanged with the searcher.
//!
//! Knowledge is threaded explicitly per category through each
//! Plan-Search-Assess-Refine call. There is no process-wide knowledge
//! singleton; each category cycle owns its own accumulator.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::InformationCategory;

/// The subject under investigation.
///
/// Opaque to the engine beyond feeding query generation; consent and identity
/// resolution live with the surrounding system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectContext {
    /// Stable subject identifier.
    pub id: Uuid,
    /// Primary display name used in queries.
    pub display_name: String,
    /// Jurisdictions relevant to the subject.
    pub jurisdictions: Vec<String>,
    /// Known aliases, used when pivoting.
    pub aliases: Vec<String>,
    /// Free-form notes on the consent scope the run operates under.
    pub consent_notes: Option<String>,
}

impl SubjectContext {
    /// Create a subject with a fresh id and no jurisdictions or aliases.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            jurisdictions: Vec::new(),
            aliases: Vec::new(),
            consent_notes: None,
        }
    }
}

/// A single extracted fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// The fact statement.
    pub statement: String,
    /// Text of the query that surfaced it.
    pub source_query: String,
    /// When the fact was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl Fact {
    /// Create a fact recorded now.
    pub fn new(statement: impl Into<String>, source_query: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            source_query: source_query.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Accumulated knowledge for one category within one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryKnowledge {
    /// Facts accumulated so far, in extraction order.
    pub facts: Vec<Fact>,
    /// Normalized text of every query already executed this run.
    pub executed_queries: HashSet<String>,
    /// Confidence after the most recent assessment.
    pub confidence: f64,
    /// Gaps still open after the most recent assessment.
    pub open_gaps: Vec<String>,
}

impl CategoryKnowledge {
    /// Empty knowledge at the start of a cycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize query text for duplicate detection.
    fn normalize(text: &str) -> String {
        text.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Whether a query with this text has already been executed.
    pub fn has_executed(&self, text: &str) -> bool {
        self.executed_queries.contains(&Self::normalize(text))
    }

    /// Record that a query was executed.
    pub fn record_executed(&mut self, text: &str) {
        self.executed_queries.insert(Self::normalize(text));
    }

    /// Whether a fact with this statement is already known.
    pub fn knows(&self, statement: &str) -> bool {
        self.facts.iter().any(|f| f.statement == statement)
    }
}

/// One query proposed by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query text handed to the searcher.
    pub text: String,
    /// Category the query serves.
    pub category: InformationCategory,
    /// Iteration the query was generated in.
    pub iteration: u32,
}

impl SearchQuery {
    /// Create a query for the given category and iteration.
    pub fn new(
        text: impl Into<String>,
        category: InformationCategory,
        iteration: u32,
    ) -> Self {
        Self {
            text: text.into(),
            category,
            iteration,
        }
    }
}

/// Per-query outcome reported by the searcher.
///
/// An individual failure lowers `queries_successful` for the iteration but
/// never aborts the iteration as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// The query that was executed.
    pub query: SearchQuery,
    /// Whether the query ran without failure.
    pub success: bool,
    /// Whether the result carried information not seen before.
    pub has_new_information: bool,
    /// Raw result snippets for the assessor.
    pub snippets: Vec<String>,
    /// Failure message when `success` is false.
    pub error: Option<String>,
}

impl QueryResult {
    /// A successful result carrying the given snippets.
    pub fn found(query: SearchQuery, snippets: Vec<String>) -> Self {
        Self {
            query,
            success: true,
            has_new_information: !snippets.is_empty(),
            snippets,
            error: None,
        }
    }

    /// A successful result that surfaced nothing new.
    pub fn empty(query: SearchQuery) -> Self {
        Self {
            query,
            success: true,
            has_new_information: false,
            snippets: Vec::new(),
            error: None,
        }
    }

    /// A failed query.
    pub fn failed(query: SearchQuery, error: impl Into<String>) -> Self {
        Self {
            query,
            success: false,
            has_new_information: false,
            snippets: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Advisory directive from the refiner to the next planner call.
///
/// The planner may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementDirective {
    /// Constrain queries to the subject's jurisdictions.
    NarrowByJurisdiction,
    /// Widen query vocabulary with synonyms.
    BroadenSynonyms,
    /// Re-run the angle under a known alias.
    PivotToAlias,
    /// Extend the timeframe under investigation.
    DeepenTimeframe,
    /// Keep the current approach.
    NoChange,
}

impl std::fmt::Display for RefinementDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NarrowByJurisdiction => "narrow_by_jurisdiction",
            Self::BroadenSynonyms => "broaden_synonyms",
            Self::PivotToAlias => "pivot_to_alias",
            Self::DeepenTimeframe => "deepen_timeframe",
            Self::NoChange => "no_change",
        };
        write!(f, "{name}")
    }
}
