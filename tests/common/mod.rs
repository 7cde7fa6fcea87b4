//! Shared scripted collaborators for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use sarengine::{
    Assessment, Assessor, CategoryKnowledge, CollaboratorRole, EligibilityGate, EngineError,
    EngineResult, Fact, InformationCategory, Planner, QueryResult, Refiner, RefinementDirective,
    SearchQuery, Searcher, SubjectContext,
};

/// Planner proposing a fixed number of fresh queries each iteration.
pub struct CountingPlanner {
    pub queries_per_iteration: usize,
    pub calls: AtomicUsize,
}

impl CountingPlanner {
    pub fn new(queries_per_iteration: usize) -> Self {
        Self {
            queries_per_iteration,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Planner for CountingPlanner {
    fn generate(
        &self,
        subject: &SubjectContext,
        category: InformationCategory,
        knowledge: &CategoryKnowledge,
        iteration: u32,
        _gaps: &[String],
        _directive: Option<RefinementDirective>,
    ) -> EngineResult<Vec<SearchQuery>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let queries = (0..self.queries_per_iteration)
            .map(|n| {
                SearchQuery::new(
                    format!("{} {category} i{iteration} q{n}", subject.display_name),
                    category,
                    iteration,
                )
            })
            .filter(|q| !knowledge.has_executed(&q.text))
            .collect();
        Ok(queries)
    }
}

/// Searcher answering every query with one unique snippet.
pub struct SnippetSearcher {
    pub calls: AtomicUsize,
}

impl SnippetSearcher {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Searcher for SnippetSearcher {
    async fn execute(&self, queries: &[SearchQuery]) -> EngineResult<Vec<QueryResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(queries
            .iter()
            .map(|query| QueryResult::found(query.clone(), vec![format!("found: {}", query.text)]))
            .collect())
    }
}

/// Searcher failing outright for one category, succeeding for the rest.
pub struct FailingSearcher {
    pub fail_for: InformationCategory,
    inner: SnippetSearcher,
}

impl FailingSearcher {
    pub fn new(fail_for: InformationCategory) -> Self {
        Self {
            fail_for,
            inner: SnippetSearcher::new(),
        }
    }
}

#[async_trait]
impl Searcher for FailingSearcher {
    async fn execute(&self, queries: &[SearchQuery]) -> EngineResult<Vec<QueryResult>> {
        if queries.iter().any(|q| q.category == self.fail_for) {
            return Err(EngineError::collaborator(
                CollaboratorRole::Searcher,
                "provider pool exhausted",
            ));
        }
        self.inner.execute(queries).await
    }
}

/// Searcher breaching the one-result-per-query contract for one category.
pub struct OverreportingSearcher {
    pub misbehave_for: InformationCategory,
    inner: SnippetSearcher,
}

impl OverreportingSearcher {
    pub fn new(misbehave_for: InformationCategory) -> Self {
        Self {
            misbehave_for,
            inner: SnippetSearcher::new(),
        }
    }
}

#[async_trait]
impl Searcher for OverreportingSearcher {
    async fn execute(&self, queries: &[SearchQuery]) -> EngineResult<Vec<QueryResult>> {
        let mut results = self.inner.execute(queries).await?;
        if queries.iter().any(|q| q.category == self.misbehave_for) {
            let extra: Vec<QueryResult> = results.clone();
            results.extend(extra);
        }
        Ok(results)
    }
}

/// Assessor replaying a confidence and new-fact schedule per category.
///
/// Iteration `n` of a category uses entry `n - 1` of each schedule; the last
/// entry repeats once a schedule runs out. Every generated fact is unique, so
/// `new_facts_count` is exact.
pub struct ScriptedAssessor {
    confidences: Vec<f64>,
    new_facts: Vec<u32>,
    iteration_by_category: Mutex<HashMap<InformationCategory, u32>>,
    pub calls: AtomicUsize,
}

impl ScriptedAssessor {
    pub fn new(confidences: Vec<f64>, new_facts: Vec<u32>) -> Self {
        assert!(!confidences.is_empty() && !new_facts.is_empty());
        Self {
            confidences,
            new_facts,
            iteration_by_category: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_iteration(&self, category: InformationCategory) -> u32 {
        let mut iterations = self
            .iteration_by_category
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let entry = iterations.entry(category).or_insert(0);
        *entry += 1;
        *entry
    }
}

#[async_trait]
impl Assessor for ScriptedAssessor {
    async fn assess(
        &self,
        category: InformationCategory,
        _knowledge: &CategoryKnowledge,
        _new_results: &[QueryResult],
    ) -> EngineResult<Assessment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let iteration = self.next_iteration(category);
        let index = (iteration as usize - 1).min(self.confidences.len() - 1);
        let facts_index = (iteration as usize - 1).min(self.new_facts.len() - 1);
        let count = self.new_facts[facts_index];

        let facts = (0..count)
            .map(|n| {
                Fact::new(
                    format!("{category} fact i{iteration} n{n}"),
                    format!("query i{iteration}"),
                )
            })
            .collect();
        Ok(Assessment {
            facts,
            new_facts_count: count,
            updated_confidence: self.confidences[index],
            gaps_identified: Vec::new(),
        })
    }
}

/// Refiner that always answers `NoChange`.
pub struct StaticRefiner;

impl Refiner for StaticRefiner {
    fn refine(
        &self,
        _category: InformationCategory,
        _gaps: &[String],
        _iteration: u32,
    ) -> EngineResult<RefinementDirective> {
        Ok(RefinementDirective::NoChange)
    }
}

/// Gate denying a fixed set of categories, counting every consultation.
pub struct DenyingGate {
    denied: HashSet<InformationCategory>,
    pub calls: AtomicUsize,
}

impl DenyingGate {
    pub fn new(denied: impl IntoIterator<Item = InformationCategory>) -> Self {
        Self {
            denied: denied.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EligibilityGate for DenyingGate {
    async fn is_permitted(
        &self,
        category: InformationCategory,
        _subject: &SubjectContext,
    ) -> EngineResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(!self.denied.contains(&category))
    }
}

/// Gate that fails when consulted.
pub struct BrokenGate;

#[async_trait]
impl EligibilityGate for BrokenGate {
    async fn is_permitted(
        &self,
        _category: InformationCategory,
        _subject: &SubjectContext,
    ) -> EngineResult<bool> {
        Err(EngineError::collaborator(
            CollaboratorRole::EligibilityGate,
            "rule engine unreachable",
        ))
    }
}

