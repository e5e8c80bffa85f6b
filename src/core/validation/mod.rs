//! Input validation
//!
//! Request payloads are checked field by field before they reach storage.
//! Every violation is collected so the caller sees all problems at once.

pub mod extractor;
pub mod validators;

pub use extractor::JsonBody;

use crate::core::error::{FieldValidationError, ValidationError};

/// Implemented by inputs that can check their own fields
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Accumulates field violations
#[derive(Debug, Default)]
pub struct Violations {
    errors: Vec<FieldValidationError>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a validator for `field`
    pub fn check(&mut self, field: impl Into<String>, result: Result<(), String>) {
        if let Err(message) = result {
            self.errors.push(FieldValidationError::new(field, message));
        }
    }

    /// Record an unconditional violation
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldValidationError::new(field, message));
    }

    /// Fold the outcome of a nested [`Validate`] into this collection
    pub fn merge(&mut self, result: Result<(), ValidationError>) {
        match result {
            Ok(()) => {}
            Err(ValidationError::FieldErrors(errors)) => self.errors.extend(errors),
            Err(ValidationError::FieldError { field, message }) => self.push(field, message),
            Err(other) => self.push("body", other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(self.errors))
        }
    }
}
