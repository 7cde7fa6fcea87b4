//! Eligibility gate port - legal permission check, consulted as a gate.
//!
//! The rule engine that decides whether a category is legally permitted for
//! a subject lives outside the engine. A negative answer is an expected
//! outcome, not an error: the category completes as `Skipped` without any
//! collaborator ever being invoked.

use async_trait::async_trait;

use crate::domain::errors::EngineResult;
use crate::domain::models::{InformationCategory, SubjectContext};

/// Trait for eligibility gating.
#[async_trait]
pub trait EligibilityGate: Send + Sync {
    /// Whether investigating `category` is permitted for this subject.
    async fn is_permitted(
        &self,
        category: InformationCategory,
        subject: &SubjectContext,
    ) -> EngineResult<bool>;
}

/// A gate that permits every category.
///
/// The default when no real gate is wired.
#[derive(Debug, Clone, Default)]
pub struct PermitAllGate;

impl PermitAllGate {
    /// Create a permit-all gate.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EligibilityGate for PermitAllGate {
    async fn is_permitted(
        &self,
        _category: InformationCategory,
        _subject: &SubjectContext,
    ) -> EngineResult<bool> {
        Ok(true)
    }
}
