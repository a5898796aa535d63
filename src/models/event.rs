//! Event data models for Evently
//!
//! This module defines the event structures that flow through the service:
//! the raw submitted fields, the trimmed draft that gets validated, the
//! normalized event handed to storage and the persisted record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::validation::{validate_mode, validate_required};

/// Delivery format of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    /// Attended remotely
    Online,
    /// Attended in person
    Offline,
    /// Both
    Hybrid,
}

impl EventMode {
    /// All accepted values, in their stored spelling
    pub const ALL: [EventMode; 3] = [EventMode::Online, EventMode::Offline, EventMode::Hybrid];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EventMode::Online => "online",
            EventMode::Offline => "offline",
            EventMode::Hybrid => "hybrid",
        }
    }
}

/// Parse a mode, matching the lowercase spelling exactly
impl FromStr for EventMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(EventMode::Online),
            "offline" => Ok(EventMode::Offline),
            "hybrid" => Ok(EventMode::Hybrid),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for EventMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the event modes
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown event mode: {0}")]
pub struct UnknownMode(pub String);

/// Fields as submitted by a client
///
/// Every field is optional here: presence is decided by the validator, not
/// by decoding. List fields accept either a JSON array or a single string,
/// which may itself hold a JSON array.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub tags: Option<Vec<String>>,
}

impl RawEvent {
    /// Build from decoded form fields
    ///
    /// Scalar fields keep the last value of a repeated key. List fields
    /// collect every value; `tags[]` is accepted as an alias of `tags`.
    /// Unknown keys are ignored.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = RawEvent::default();
        let mut agenda: Vec<String> = Vec::new();
        let mut tags: Vec<String> = Vec::new();

        for (key, value) in fields {
            let value = value.into();
            match key.as_ref().trim_end_matches("[]") {
                "title" => raw.title = Some(value),
                "description" => raw.description = Some(value),
                "overview" => raw.overview = Some(value),
                "image" => raw.image = Some(value),
                "venue" => raw.venue = Some(value),
                "location" => raw.location = Some(value),
                "date" => raw.date = Some(value),
                "time" => raw.time = Some(value),
                "mode" => raw.mode = Some(value),
                "audience" => raw.audience = Some(value),
                "organizer" => raw.organizer = Some(value),
                "agenda" => agenda.push(value),
                "tags" => tags.push(value),
                _ => {},
            }
        }

        raw.agenda = collect_list(agenda);
        raw.tags = collect_list(tags);
        raw
    }

    /// Fill every field left unset from a stored record
    pub fn merged_over(self, stored: &EventRecord) -> RawEvent {
        RawEvent {
            title: self.title.or_else(|| Some(stored.title.clone())),
            description: self.description.or_else(|| Some(stored.description.clone())),
            overview: self.overview.or_else(|| Some(stored.overview.clone())),
            image: self.image.or_else(|| Some(stored.image.clone())),
            venue: self.venue.or_else(|| Some(stored.venue.clone())),
            location: self.location.or_else(|| Some(stored.location.clone())),
            date: self.date.or_else(|| Some(stored.date.clone())),
            time: self.time.or_else(|| Some(stored.time.clone())),
            mode: self.mode.or_else(|| Some(stored.mode.as_str().to_string())),
            audience: self.audience.or_else(|| Some(stored.audience.clone())),
            agenda: self.agenda.or_else(|| Some(stored.agenda.clone())),
            organizer: self.organizer.or_else(|| Some(stored.organizer.clone())),
            tags: self.tags.or_else(|| Some(stored.tags.clone())),
        }
    }
}

/// Turn the values collected for one list key into the list itself
fn collect_list(values: Vec<String>) -> Option<Vec<String>> {
    match values.len() {
        0 => None,
        1 => values.into_iter().next().map(expand_list_value),
        _ => Some(values),
    }
}

/// Expand a single submitted list value
///
/// A value holding a JSON array of strings is unpacked; anything else is
/// a one-element list.
pub fn expand_list_value(value: String) -> Vec<String> {
    if value.trim_start().starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(&value) {
            return items;
        }
    }
    vec![value]
}

fn deserialize_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrString {
        List(Vec<String>),
        Single(String),
    }

    Ok(match Option::<ListOrString>::deserialize(deserializer)? {
        Some(ListOrString::List(items)) => Some(items),
        Some(ListOrString::Single(value)) => Some(expand_list_value(value)),
        None => None,
    })
}

/// Candidate event after trimming, before validation
///
/// The `validate` attributes are the field constraint table; the messages
/// that go with each rule live in [`super::validation::FIELD_RULES`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct EventDraft {
    #[validate(custom(function = "validate_required"), length(max = 100))]
    pub title: String,

    #[validate(custom(function = "validate_required"), length(max = 1000))]
    pub description: String,

    #[validate(custom(function = "validate_required"), length(max = 500))]
    pub overview: String,

    #[validate(custom(function = "validate_required"))]
    pub image: String,

    #[validate(custom(function = "validate_required"))]
    pub venue: String,

    #[validate(custom(function = "validate_required"))]
    pub location: String,

    #[validate(custom(function = "validate_required"))]
    pub date: String,

    #[validate(custom(function = "validate_required"))]
    pub time: String,

    #[validate(custom(function = "validate_mode"))]
    pub mode: String,

    #[validate(custom(function = "validate_required"))]
    pub audience: String,

    #[validate(length(min = 1))]
    pub agenda: Vec<String>,

    #[validate(custom(function = "validate_required"))]
    pub organizer: String,

    #[validate(length(min = 1))]
    pub tags: Vec<String>,
}

impl From<RawEvent> for EventDraft {
    /// Trim the text fields the schema declares as trimmed
    ///
    /// `date`, `time` and `mode` are kept verbatim: the date and time
    /// normalizers trim on their own and `mode` must match exactly.
    fn from(raw: RawEvent) -> Self {
        fn trimmed(value: Option<String>) -> String {
            value.map(|v| v.trim().to_string()).unwrap_or_default()
        }

        EventDraft {
            title: trimmed(raw.title),
            description: trimmed(raw.description),
            overview: trimmed(raw.overview),
            image: trimmed(raw.image),
            venue: trimmed(raw.venue),
            location: trimmed(raw.location),
            date: raw.date.unwrap_or_default(),
            time: raw.time.unwrap_or_default(),
            mode: raw.mode.unwrap_or_default(),
            audience: trimmed(raw.audience),
            agenda: raw.agenda.unwrap_or_default(),
            organizer: trimmed(raw.organizer),
            tags: raw.tags.unwrap_or_default(),
        }
    }
}

/// Normalized event ready for storage
///
/// Produced only by the pipeline; `slug`, `date`, `time` and `tags` are in
/// their canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// Persisted event record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRecord {
    /// Materialize a record from a normalized event and storage metadata
    pub fn from_new(
        id: Uuid,
        event: NewEvent,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        EventRecord {
            id,
            title: event.title,
            slug: event.slug,
            description: event.description,
            overview: event.overview,
            image: event.image,
            venue: event.venue,
            location: event.location,
            date: event.date,
            time: event.time,
            mode: event.mode,
            audience: event.audience,
            agenda: event.agenda,
            organizer: event.organizer,
            tags: event.tags,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mode_from_str() {
        assert_eq!("online".parse::<EventMode>().unwrap(), EventMode::Online);
        assert_eq!("offline".parse::<EventMode>().unwrap(), EventMode::Offline);
        assert_eq!("hybrid".parse::<EventMode>().unwrap(), EventMode::Hybrid);

        // Exact lowercase match only
        assert!("Online".parse::<EventMode>().is_err());
        assert!("virtual".parse::<EventMode>().is_err());
        assert!("".parse::<EventMode>().is_err());
    }

    #[test]
    fn test_event_mode_display() {
        for mode in EventMode::ALL {
            assert_eq!(mode.to_string().parse::<EventMode>().unwrap(), mode);
        }
        assert_eq!(serde_json::to_string(&EventMode::Hybrid).unwrap(), "\"hybrid\"");
    }

    #[test]
    fn test_from_fields_scalars_and_lists() {
        let raw = RawEvent::from_fields(vec![
            ("title", "First"),
            ("title", "Second"),
            ("tags", "rust"),
            ("tags[]", "web"),
            ("agenda", "Keynote"),
            ("unknown", "ignored"),
        ]);

        assert_eq!(raw.title.as_deref(), Some("Second"));
        assert_eq!(raw.tags, Some(vec!["rust".to_string(), "web".to_string()]));
        assert_eq!(raw.agenda, Some(vec!["Keynote".to_string()]));
        assert!(raw.mode.is_none());
    }

    #[test]
    fn test_from_fields_json_array_value() {
        let raw = RawEvent::from_fields(vec![("agenda", r#"["Intro", "Workshop"]"#)]);
        assert_eq!(
            raw.agenda,
            Some(vec!["Intro".to_string(), "Workshop".to_string()])
        );
        assert!(raw.tags.is_none());
    }

    #[test]
    fn test_expand_list_value_not_json() {
        assert_eq!(expand_list_value("[broken".to_string()), vec!["[broken".to_string()]);
        assert_eq!(expand_list_value("a,b".to_string()), vec!["a,b".to_string()]);
    }

    #[test]
    fn test_raw_event_json_lists() {
        let raw: RawEvent = serde_json::from_value(serde_json::json!({
            "title": "Meetup",
            "agenda": ["Talks", "Drinks"],
            "tags": "[\"AI\"]"
        }))
        .unwrap();

        assert_eq!(raw.agenda.unwrap().len(), 2);
        assert_eq!(raw.tags, Some(vec!["AI".to_string()]));
    }

    #[test]
    fn test_draft_trims_text_fields() {
        let raw = RawEvent {
            title: Some("  Rust Meetup  ".to_string()),
            time: Some(" 10:00 ".to_string()),
            ..Default::default()
        };
        let draft = EventDraft::from(raw);
        assert_eq!(draft.title, "Rust Meetup");
        assert_eq!(draft.time, " 10:00 ");
        assert!(draft.tags.is_empty());
    }
}
