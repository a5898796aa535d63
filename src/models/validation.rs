//! Field validation for Evently models
//!
//! The constraints themselves are declared with `validator` attributes on
//! [`EventDraft`]. This module supplies the custom rule functions those
//! attributes call and translates the raw rule codes back into the
//! per-field messages clients see.

use validator::{Validate, ValidationError};

use super::error::{ValidationError as ModelValidationError, ValidationErrorKind, ValidationErrors};
use super::event::{EventDraft, EventMode};

/// Rule code for a blank required field
const CODE_REQUIRED: &str = "required";
/// Rule code emitted by `length(..)`
const CODE_LENGTH: &str = "length";
/// Rule code for a mode outside the enumerated set
const CODE_MODE: &str = "mode";

/// Messages attached to one field's constraints
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Field name as submitted
    pub field: &'static str,
    /// Message when the field is missing or blank
    pub required: &'static str,
    /// Maximum length in characters and its message, for bounded text
    pub max_length: Option<(u64, &'static str)>,
    /// Message for an out-of-set value, for enumerated fields
    pub invalid: Option<&'static str>,
    /// Whether the field is a sequence
    pub is_list: bool,
}

impl FieldRule {
    const fn text(field: &'static str, required: &'static str) -> Self {
        Self {
            field,
            required,
            max_length: None,
            invalid: None,
            is_list: false,
        }
    }

    const fn bounded(field: &'static str, required: &'static str, max: u64, msg: &'static str) -> Self {
        Self {
            field,
            required,
            max_length: Some((max, msg)),
            invalid: None,
            is_list: false,
        }
    }

    const fn list(field: &'static str, required: &'static str) -> Self {
        Self {
            field,
            required,
            max_length: None,
            invalid: None,
            is_list: true,
        }
    }

    /// Translate a `validator` rule code into our error for this field
    fn error_for(&self, code: &str) -> ModelValidationError {
        match (code, self.max_length, self.invalid) {
            (CODE_LENGTH, _, _) if self.is_list => {
                ModelValidationError::new(ValidationErrorKind::EmptyList, self.field, self.required)
            },
            (CODE_LENGTH, Some((max, message)), _) => ModelValidationError::new(
                ValidationErrorKind::TooLong { max },
                self.field,
                message,
            ),
            (CODE_MODE, _, Some(message)) => {
                ModelValidationError::new(ValidationErrorKind::InvalidEnum, self.field, message)
            },
            _ => ModelValidationError::new(
                ValidationErrorKind::RequiredField,
                self.field,
                self.required,
            ),
        }
    }
}

/// Per-field messages, in the order errors are reported
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule::bounded(
        "title",
        "Please provide a title for the event",
        100,
        "Title cannot be more than 100 characters",
    ),
    FieldRule::bounded(
        "description",
        "Please provide a description for the event",
        1000,
        "Description cannot be more than 1000 characters",
    ),
    FieldRule::bounded(
        "overview",
        "Please provide an overview for the event",
        500,
        "Overview cannot be more than 500 characters",
    ),
    FieldRule::text("image", "Please provide an image URL for the event"),
    FieldRule::text("venue", "Please provide a venue for the event"),
    FieldRule::text("location", "Please provide a location for the event"),
    FieldRule::text("date", "Please provide a date for the event"),
    FieldRule::text("time", "Please provide a time for the event"),
    FieldRule {
        field: "mode",
        required: "Please provide a mode for the event",
        max_length: None,
        invalid: Some(INVALID_MODE_MESSAGE),
        is_list: false,
    },
    FieldRule::text("audience", "Please provide an audience for the event"),
    FieldRule::list("agenda", "Agenda must have at least one item"),
    FieldRule::text("organizer", "Please provide an organizer for the event"),
    FieldRule::list("tags", "There must be at least one tag"),
];

/// Message for a mode outside the enumerated set
pub const INVALID_MODE_MESSAGE: &str = "Mode must be either online, offline, or hybrid";

/// Message for a tag that is blank after normalization
pub const EMPTY_TAG_MESSAGE: &str = "Tags cannot be empty";

/// Required-field check for the validator crate
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(CODE_REQUIRED))
    } else {
        Ok(())
    }
}

/// Mode check for the validator crate
///
/// Blank reports as missing; anything else must be one of the lowercase
/// mode names exactly.
pub fn validate_mode(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    value
        .parse::<EventMode>()
        .map(|_| ())
        .map_err(|_| ValidationError::new(CODE_MODE))
}

/// Run the constraint table against a draft
///
/// Every failing field is reported once, using the first rule it broke.
pub fn validate_draft(draft: &EventDraft) -> Result<(), ValidationErrors> {
    let Err(raw) = draft.validate() else {
        return Ok(());
    };

    let field_errors = raw.field_errors();
    let mut errors = ValidationErrors::new();
    for rule in FIELD_RULES {
        if let Some(first) = field_errors.get(rule.field).and_then(|errs| errs.first()) {
            errors.add(rule.error_for(&first.code));
        }
    }
    errors.into_result(())
}

/// Re-check normalized tags, which may have trimmed down to nothing
pub fn validate_normalized_tags(tags: &[String]) -> Result<(), ModelValidationError> {
    if tags.iter().any(|tag| tag.is_empty()) {
        return Err(ModelValidationError::new(
            ValidationErrorKind::EmptyEntry,
            "tags",
            EMPTY_TAG_MESSAGE,
        ));
    }
    Ok(())
}
