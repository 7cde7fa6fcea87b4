//! Engine services: the per-category cycle runner, the continuation
//! controller, progress observers, and the run-level orchestrator.

pub mod continuation;
pub mod cycle_runner;
pub mod observers;
pub mod orchestrator;

pub use continuation::{ContinuationController, ContinuationDecision};
pub use cycle_runner::CategoryCycleRunner;
pub use observers::{ObserverId, ObserverRegistry, ProgressCallback};
pub use orchestrator::{CancellationHandle, InvestigationConfig, InvestigationOrchestrator};
