//! Event validation and normalization pipeline
//!
//! A save runs in a fixed order: field validation, slug derivation, tag
//! normalization, date normalization, time normalization. Slug, date and
//! time are only recomputed when the record is new or the submitted value
//! differs from the stored one; tags are normalized on every save.

use super::error::{EventResult, ValidationError, ValidationErrorKind};
use super::event::{EventDraft, EventMode, EventRecord, NewEvent, RawEvent};
use super::normalize::{derive_slug, normalize_date, normalize_tags, normalize_time};
use super::validation::{validate_draft, validate_normalized_tags, INVALID_MODE_MESSAGE};

/// Stored values a save is compared against
///
/// `None` means the record has never been persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Persisted<'a> {
    record: Option<&'a EventRecord>,
}

impl<'a> Persisted<'a> {
    /// A record that has never been stored
    pub fn new_record() -> Self {
        Self { record: None }
    }

    /// An existing stored record
    pub fn existing(record: &'a EventRecord) -> Self {
        Self {
            record: Some(record),
        }
    }

    pub fn is_new(&self) -> bool {
        self.record.is_none()
    }

    /// True when the record is new or `field` of it differs from `value`
    fn changed(&self, value: &str, field: impl Fn(&EventRecord) -> &str) -> bool {
        self.record.map_or(true, |record| field(record) != value)
    }
}

/// Validate and normalize a submission for a brand new record
pub fn prepare_create(raw: RawEvent) -> EventResult<NewEvent> {
    run(EventDraft::from(raw), Persisted::new_record())
}

/// Validate and normalize changes to a stored record
///
/// Fields absent from `changes` keep their stored values. The result is the
/// full replacement for the stored record.
pub fn prepare_update(stored: &EventRecord, changes: RawEvent) -> EventResult<NewEvent> {
    run(
        EventDraft::from(changes.merged_over(stored)),
        Persisted::existing(stored),
    )
}

/// Run the pipeline on a trimmed draft
pub fn run(draft: EventDraft, persisted: Persisted<'_>) -> EventResult<NewEvent> {
    validate_draft(&draft)?;

    let mode: EventMode = draft.mode.parse().map_err(|_| {
        ValidationError::new(ValidationErrorKind::InvalidEnum, "mode", INVALID_MODE_MESSAGE)
    })?;

    let slug = match persisted.record {
        Some(record) if record.title == draft.title => record.slug.clone(),
        _ => derive_slug(&draft.title),
    };

    let tags = normalize_tags(&draft.tags);
    validate_normalized_tags(&tags)?;

    let date = if persisted.changed(&draft.date, |r| r.date.as_str()) {
        normalize_date(&draft.date)?
    } else {
        draft.date
    };

    let time = if persisted.changed(&draft.time, |r| r.time.as_str()) {
        normalize_time(&draft.time)?
    } else {
        draft.time
    };

    tracing::debug!(slug = %slug, date = %date, time = %time, new = persisted.is_new(), "Event normalized");

    Ok(NewEvent {
        title: draft.title,
        slug,
        description: draft.description,
        overview: draft.overview,
        image: draft.image,
        venue: draft.venue,
        location: draft.location,
        date,
        time,
        mode,
        audience: draft.audience,
        agenda: draft.agenda,
        organizer: draft.organizer,
        tags,
    })
}
