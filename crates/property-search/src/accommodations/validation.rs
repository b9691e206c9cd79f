use std::fmt;

use serde::Serialize;

use super::domain::Accommodation;

/// A single rejected field of an accommodation submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Malformed accommodation input. Always carries at least one field error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("accommodation submission is invalid: {}", join_errors(.errors))]
pub struct AccommodationValidationError {
    errors: Vec<FieldError>,
}

impl AccommodationValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Flattened messages suitable for form-style error lists.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check the shape of a submission, collecting every failing field rather than the first.
pub fn validate_accommodation(
    accommodation: &Accommodation,
) -> Result<(), AccommodationValidationError> {
    let mut errors = Vec::new();

    if accommodation.title.trim().is_empty() {
        errors.push(FieldError::new("title", "must not be empty"));
    }
    if accommodation.description.trim().is_empty() {
        errors.push(FieldError::new("description", "must not be empty"));
    }
    if accommodation.price < 0 {
        errors.push(FieldError::new(
            "price",
            format!("must be greater than or equal to 0 (found {})", accommodation.price),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AccommodationValidationError { errors })
    }
}
