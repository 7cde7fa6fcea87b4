//! Keyword-template baseline strategies.
//!
//! These are the default collaborators wired when no smarter implementations
//! are provided: a keyword-template planner, a coverage-counting assessor,
//! and a gap-keyword refiner. They are deterministic and dependency-free,
//! which also makes them the workhorses of the engine's own tests.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::EngineResult;
use crate::domain::models::{
    CategoryKnowledge, Fact, InformationCategory, QueryResult, RefinementDirective, SearchQuery,
    SubjectContext,
};
use crate::domain::ports::{Assessment, Assessor, Planner, Refiner};

/// Search angles per category, combined with the subject's name.
fn angles(category: InformationCategory) -> &'static [&'static str] {
    match category {
        InformationCategory::Identity => &["date of birth", "identity records", "known aliases"],
        InformationCategory::Employment => &["employer", "employment history", "job title"],
        InformationCategory::Education => &["education", "degree", "alumni"],
        InformationCategory::Criminal => &["criminal records", "arrest", "court case"],
        InformationCategory::Civil => &["civil lawsuit", "litigation", "judgment"],
        InformationCategory::Financial => &["bankruptcy", "liens", "financial disclosure"],
        InformationCategory::Licenses => &["professional license", "certification"],
        InformationCategory::Regulatory => &["regulatory action", "enforcement"],
        InformationCategory::Sanctions => &["sanctions list", "watchlist"],
        InformationCategory::AdverseMedia => &["news", "investigation", "allegations"],
        InformationCategory::DigitalFootprint => &["social media", "online profile"],
        InformationCategory::NetworkDegree2 => &["business partner", "associate"],
        InformationCategory::NetworkDegree3 => &["extended network", "indirect associate"],
    }
}

/// Planner that fills keyword templates with the subject's name.
///
/// Open gaps are queried first, then the category's standard angles. A
/// refinement directive rewrites the template: jurisdictions narrow it,
/// aliases replace the display name, broadening appends synonyms, deepening
/// extends the timeframe.
#[derive(Debug, Clone)]
pub struct KeywordPlanner {
    max_queries_per_iteration: usize,
    max_entities_per_network_degree: usize,
}

impl KeywordPlanner {
    /// Create a planner with the given per-iteration caps.
    pub fn new(max_queries_per_iteration: usize, max_entities_per_network_degree: usize) -> Self {
        Self {
            max_queries_per_iteration,
            max_entities_per_network_degree,
        }
    }

    fn cap_for(&self, category: InformationCategory) -> usize {
        if category.network_degree().is_some() {
            self.max_queries_per_iteration
                .min(self.max_entities_per_network_degree)
        } else {
            self.max_queries_per_iteration
        }
    }

    fn subject_term(subject: &SubjectContext, directive: Option<RefinementDirective>) -> String {
        if directive == Some(RefinementDirective::PivotToAlias) {
            if let Some(alias) = subject.aliases.first() {
                return alias.clone();
            }
        }
        subject.display_name.clone()
    }

    fn decorate(text: String, subject: &SubjectContext, directive: Option<RefinementDirective>) -> String {
        match directive {
            Some(RefinementDirective::NarrowByJurisdiction) => {
                match subject.jurisdictions.first() {
                    Some(jurisdiction) => format!("{text} {jurisdiction}"),
                    None => text,
                }
            }
            Some(RefinementDirective::BroadenSynonyms) => format!("{text} OR related terms"),
            Some(RefinementDirective::DeepenTimeframe) => format!("{text} historical archive"),
            _ => text,
        }
    }
}

impl Default for KeywordPlanner {
    fn default() -> Self {
        Self::new(5, 25)
    }
}

impl Planner for KeywordPlanner {
    fn generate(
        &self,
        subject: &SubjectContext,
        category: InformationCategory,
        knowledge: &CategoryKnowledge,
        iteration: u32,
        gaps: &[String],
        directive: Option<RefinementDirective>,
    ) -> EngineResult<Vec<SearchQuery>> {
        let cap = self.cap_for(category);
        let term = Self::subject_term(subject, directive);
        let mut queries: Vec<SearchQuery> = Vec::with_capacity(cap);

        let candidates = gaps
            .iter()
            .map(|gap| format!("{term} {gap}"))
            .chain(angles(category).iter().map(|angle| format!("{term} {angle}")));

        for text in candidates {
            if queries.len() >= cap {
                break;
            }
            let text = Self::decorate(text, subject, directive);
            if knowledge.has_executed(&text) || queries.iter().any(|q| q.text == text) {
                continue;
            }
            queries.push(SearchQuery::new(text, category, iteration));
        }

        debug!(
            category = %category,
            iteration,
            proposed = queries.len(),
            "planner generated queries"
        );
        Ok(queries)
    }
}

/// Assessor that scores confidence by fact coverage.
///
/// Every snippet in a successful result becomes a fact; confidence grows by
/// a fixed increment per fact not already known and is clamped to `[0, 1]`.
/// A previously open gap stays open unless some new fact mentions it.
#[derive(Debug, Clone)]
pub struct CoverageAssessor {
    confidence_per_new_fact: f64,
}

impl CoverageAssessor {
    /// Create an assessor with the given per-fact confidence increment.
    pub fn new(confidence_per_new_fact: f64) -> Self {
        Self {
            confidence_per_new_fact,
        }
    }
}

impl Default for CoverageAssessor {
    fn default() -> Self {
        Self::new(0.15)
    }
}

#[async_trait]
impl Assessor for CoverageAssessor {
    async fn assess(
        &self,
        category: InformationCategory,
        knowledge: &CategoryKnowledge,
        new_results: &[QueryResult],
    ) -> EngineResult<Assessment> {
        let mut facts = Vec::new();
        let mut new_facts_count = 0u32;
        for result in new_results.iter().filter(|r| r.success) {
            for snippet in &result.snippets {
                if !knowledge.knows(snippet)
                    && !facts.iter().any(|f: &Fact| f.statement == *snippet)
                {
                    new_facts_count += 1;
                }
                facts.push(Fact::new(snippet.clone(), result.query.text.clone()));
            }
        }

        let updated_confidence = (knowledge.confidence
            + self.confidence_per_new_fact * f64::from(new_facts_count))
        .clamp(0.0, 1.0);

        let gaps_identified = knowledge
            .open_gaps
            .iter()
            .filter(|gap| {
                let gap_lower = gap.to_lowercase();
                !facts
                    .iter()
                    .any(|f| f.statement.to_lowercase().contains(&gap_lower))
            })
            .cloned()
            .collect();

        debug!(
            category = %category,
            new_facts = new_facts_count,
            confidence = updated_confidence,
            "assessment complete"
        );
        Ok(Assessment {
            facts,
            new_facts_count,
            updated_confidence,
            gaps_identified,
        })
    }
}

/// Refiner that picks a directive from gap keywords.
#[derive(Debug, Clone, Copy, Default)]
pub struct GapDrivenRefiner;

impl GapDrivenRefiner {
    /// Create the refiner.
    pub fn new() -> Self {
        Self
    }
}

impl Refiner for GapDrivenRefiner {
    fn refine(
        &self,
        _category: InformationCategory,
        gaps: &[String],
        iteration: u32,
    ) -> EngineResult<RefinementDirective> {
        if gaps.is_empty() {
            return Ok(RefinementDirective::NoChange);
        }
        let mentions = |needle: &str| {
            gaps.iter()
                .any(|gap| gap.to_lowercase().contains(needle))
        };
        let directive = if mentions("jurisdiction") || mentions("state") || mentions("county") {
            RefinementDirective::NarrowByJurisdiction
        } else if mentions("alias") || mentions("maiden") || mentions("former name") {
            RefinementDirective::PivotToAlias
        } else if mentions("history") || mentions("prior") || mentions("earlier") {
            RefinementDirective::DeepenTimeframe
        } else if iteration >= 2 {
            // Gaps persisting past the first pass suggest the vocabulary is
            // too narrow.
            RefinementDirective::BroadenSynonyms
        } else {
            RefinementDirective::NoChange
        };
        Ok(directive)
    }
}
