//! Error types.

use thiserror::Error;

use crate::validate::ValidationReport;

/// Errors raised while assembling a family tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A person with this id is already registered.
    #[error("duplicate person_id: {0}")]
    DuplicateId(String),

    /// No person with this id is registered.
    #[error("unknown person_id: {0}")]
    UnknownPerson(String),
}

/// Errors raised by the layout pipeline.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Validation found structural errors; no layout stage was run.
    #[error("family tree failed validation with {} error(s)", .0.errors.len())]
    InvalidTree(ValidationReport),

    /// The `children` graph has a cycle among people the root cannot reach.
    #[error("family tree has a children cycle outside the root's reach")]
    DetachedCycle,
}
