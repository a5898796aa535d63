//! Request body extraction for event submissions
//!
//! Clients may post an event as a multipart form, a url-encoded form or a
//! JSON object. All three decode into the same [`RawEvent`].

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};

use crate::error::Error;
use crate::models::RawEvent;

/// Message returned for any body that cannot be decoded
pub const BODY_PARSE_ERROR: &str = "Invalid JSON format or form data parsing error";

/// Submitted event fields, decoded according to the request content type
#[derive(Debug)]
pub struct EventSubmission(pub RawEvent);

fn body_error(err: impl std::fmt::Display) -> Error {
    tracing::debug!(error = %err, "Failed to decode event submission");
    Error::bad_request(BODY_PARSE_ERROR)
}

impl<S> FromRequest<S> for EventSubmission
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let raw = if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state).await.map_err(body_error)?;
            let mut fields = Vec::new();

            while let Some(field) = multipart.next_field().await.map_err(body_error)? {
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                // Uploaded files are not stored; only text parts carry event fields
                if field.file_name().is_some() {
                    tracing::debug!(field = %name, "Skipping file part");
                    continue;
                }
                fields.push((name, field.text().await.map_err(body_error)?));
            }

            RawEvent::from_fields(fields)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(body_error)?;
            RawEvent::from_fields(fields)
        } else {
            let Json(raw) = Json::<RawEvent>::from_request(req, state)
                .await
                .map_err(body_error)?;
            raw
        };

        Ok(EventSubmission(raw))
    }
}
