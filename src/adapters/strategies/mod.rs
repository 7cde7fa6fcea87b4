//! Baseline collaborator strategies.

pub mod heuristic;

pub use heuristic::{CoverageAssessor, GapDrivenRefiner, KeywordPlanner};
