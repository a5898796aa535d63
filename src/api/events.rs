//! Event endpoints
//!
//! Every write runs the submission through the model pipeline before it
//! reaches the repository, so stored events are always validated and
//! normalized.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::{extract::EventSubmission, server::AppState};
use crate::db::EventRepository;
use crate::error::{Error, Result};
use crate::models::{
    normalize_date, prepare_create, prepare_update, validation::INVALID_MODE_MESSAGE, EventMode,
    EventRecord,
};

/// Body returned by create, fetch and update
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub message: &'static str,
    pub event: EventRecord,
}

/// Body returned by the listing endpoint
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<EventRecord>,
    pub limit: i64,
    pub offset: i64,
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub date: Option<String>,
    pub mode: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// `POST /api/events`
pub async fn create_event<R>(
    State(state): State<AppState<R>>,
    EventSubmission(raw): EventSubmission,
) -> Result<(StatusCode, Json<EventResponse>)>
where
    R: EventRepository + 'static,
{
    let event = prepare_create(raw)?;
    let record = state.repo.insert(event).await?;

    tracing::info!(id = %record.id, slug = %record.slug, "Event created");

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            message: "Event created successfully",
            event: record,
        }),
    ))
}

/// `GET /api/events/{slug}`
pub async fn get_event<R>(
    State(state): State<AppState<R>>,
    Path(slug): Path<String>,
) -> Result<Json<EventResponse>>
where
    R: EventRepository + 'static,
{
    let record = find_existing(&state, &slug).await?;

    Ok(Json(EventResponse {
        message: "Event fetched successfully",
        event: record,
    }))
}

/// `GET /api/events`
///
/// With both `date` and `mode` the composite lookup is used; with neither,
/// the newest events are returned. One without the other is rejected.
pub async fn list_events<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<ListParams>,
) -> Result<Json<EventListResponse>>
where
    R: EventRepository + 'static,
{
    let limit = i64::from(state.api.page_size(params.limit));
    let offset = i64::from(params.offset.unwrap_or(0));

    let events = match (params.date, params.mode) {
        (Some(date), Some(mode)) => {
            let date = normalize_date(&date)?;
            let mode: EventMode = mode
                .parse()
                .map_err(|_| Error::validation(INVALID_MODE_MESSAGE))?;
            state.repo.find_by_date_and_mode(&date, mode, limit, offset).await?
        },
        (None, None) => state.repo.list_recent(limit, offset).await?,
        _ => {
            return Err(Error::bad_request(
                "Both date and mode are required to filter events",
            ))
        },
    };

    Ok(Json(EventListResponse {
        events,
        limit,
        offset,
    }))
}

/// `PATCH /api/events/{slug}`
///
/// Submitted fields replace the stored ones; the rest are kept. The merged
/// event goes through the pipeline again, recomputing only what changed.
pub async fn update_event<R>(
    State(state): State<AppState<R>>,
    Path(slug): Path<String>,
    EventSubmission(changes): EventSubmission,
) -> Result<Json<EventResponse>>
where
    R: EventRepository + 'static,
{
    let stored = find_existing(&state, &slug).await?;
    let event = prepare_update(&stored, changes)?;
    let record = state.repo.update(stored.id, event).await?;

    tracing::info!(id = %record.id, slug = %record.slug, previous_slug = %slug, "Event updated");

    Ok(Json(EventResponse {
        message: "Event updated successfully",
        event: record,
    }))
}

async fn find_existing<R>(state: &AppState<R>, slug: &str) -> Result<EventRecord>
where
    R: EventRepository + 'static,
{
    state
        .repo
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Event with slug '{}'", slug)))
}
