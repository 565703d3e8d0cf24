use std::fmt;

use supplier_domain::{DomainError, SupplierId};
use thiserror::Error;

use crate::form::FormField;

/// Failures reported across the gateway boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Supplier not found: {0}")]
    NotFound(SupplierId),
    #[error("Temporary failure: {0}")]
    TransientIo(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CoreError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::TransientIo(_))
    }
}

/// Field-level validation failure shown next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: FormField,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Rejected transitions of a submission flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("an operation is already in progress")]
    Busy,
    #[error("the application has already been submitted")]
    Finished,
    #[error("no record is being edited")]
    NotEditing,
    #[error("{}", join_issues(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
