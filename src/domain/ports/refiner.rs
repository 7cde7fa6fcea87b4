//! Refiner port - produces the advisory directive for the next plan.

use crate::domain::errors::EngineResult;
use crate::domain::models::{InformationCategory, RefinementDirective};

/// Trait for refinement strategies.
///
/// A refiner is a pure function of its inputs: it never mutates state, and
/// the planner is free to ignore its directive. Refiners are synchronous and
/// never suspend.
pub trait Refiner: Send + Sync {
    /// Choose a refinement directive given the open gaps.
    fn refine(
        &self,
        category: InformationCategory,
        gaps: &[String],
        iteration: u32,
    ) -> EngineResult<RefinementDirective>;
}
