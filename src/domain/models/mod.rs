//! Domain models for the investigation engine.

pub mod category;
pub mod iteration;
pub mod knowledge;
pub mod policy;
pub mod progress;
pub mod report;
pub mod state;

pub use category::InformationCategory;
pub use iteration::{CyclePhase, IterationRecord};
pub use knowledge::{
    CategoryKnowledge, Fact, QueryResult, RefinementDirective, SearchQuery, SubjectContext,
};
pub use policy::{CompletionReason, TerminationPolicy};
pub use progress::{ProgressEvent, ProgressEventType};
pub use report::{InvestigationResult, InvestigationSummary, TypeCycleResult};
pub use state::CategoryState;
