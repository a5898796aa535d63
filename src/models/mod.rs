//! Data models for Evently
//!
//! This module contains the event structures and the validation and
//! normalization pipeline every create or update passes through before
//! reaching storage.

pub mod error;
pub mod event;
pub mod normalize;
pub mod pipeline;
pub mod validation;

// Re-export commonly used types
pub use error::{EventError, EventResult, ValidationError, ValidationErrorKind, ValidationErrors};
pub use event::{EventDraft, EventMode, EventRecord, NewEvent, RawEvent};
pub use normalize::{derive_slug, normalize_date, normalize_tags, normalize_time};
pub use pipeline::{prepare_create, prepare_update};
