//! Ports: the interfaces the engine consumes.

pub mod assessor;
pub mod eligibility;
pub mod planner;
pub mod refiner;
pub mod searcher;

pub use assessor::{Assessment, Assessor};
pub use eligibility::{EligibilityGate, PermitAllGate};
pub use planner::Planner;
pub use refiner::Refiner;
pub use searcher::{NullSearcher, Searcher};
