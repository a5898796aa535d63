//! Validation error types for Evently models
//!
//! This module defines the errors raised by the event pipeline, kept
//! separate from the general application errors so the pipeline stays free
//! of HTTP and storage concerns.

use std::fmt;
use thiserror::Error;

/// A single field rule violation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The kind of validation error
    pub kind: ValidationErrorKind,
    /// The field that failed validation
    pub field: String,
    /// Human-readable message naming the field and rule
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(
        kind: ValidationErrorKind,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Which rule a field broke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Field is required but missing or blank
    #[error("Required field is missing")]
    RequiredField,

    /// Field value is too long
    #[error("Value exceeds maximum length of {max}")]
    TooLong { max: u64 },

    /// Value outside its enumerated set
    #[error("Value is not one of the allowed options")]
    InvalidEnum,

    /// Sequence field without any entries
    #[error("At least one entry is required")]
    EmptyList,

    /// Sequence entry that is blank after normalization
    #[error("Entries cannot be empty")]
    EmptyEntry,
}

/// Collection of validation errors
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation error to the collection
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Look up the error recorded for a field, if any
    pub fn field(&self, name: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == name)
    }

    /// Convert to a Result
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "No validation errors");
        }
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }
}

/// Failure of the validation and normalization pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// Missing field, length exceeded, bad enum value or empty sequence
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Date string could not be parsed as a calendar date
    #[error("Invalid date format")]
    InvalidDate,

    /// Time string does not match `HH:MM` or `HH:MM AM/PM`
    #[error("Invalid time format. Use HH:MM or HH:MM AM/PM")]
    InvalidTimeFormat,

    /// Time string matched but hour or minute is out of range
    #[error("Invalid time values")]
    InvalidTimeValues,
}

impl From<ValidationErrors> for EventError {
    fn from(errors: ValidationErrors) -> Self {
        EventError::Validation(errors)
    }
}

impl From<ValidationError> for EventError {
    fn from(error: ValidationError) -> Self {
        EventError::Validation(error.into())
    }
}

/// Result type alias for pipeline operations
pub type EventResult<T> = Result<T, EventError>;

/// Convert pipeline errors to application errors
impl From<EventError> for crate::error::Error {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(errors) => crate::error::Error::validation(errors.to_string()),
            EventError::InvalidDate => crate::error::Error::InvalidDate,
            EventError::InvalidTimeFormat => crate::error::Error::InvalidTimeFormat,
            EventError::InvalidTimeValues => crate::error::Error::InvalidTimeValues,
        }
    }
}
