//! Handlers for short URL management.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::TimeDelta;
use validator::Validate;

use crate::api::dto::create_url::{CreateUrlRequest, CreateUrlResponse};
use crate::api::dto::list::{ListQuery, ListUrlsResponse};
use crate::api::dto::url::UrlResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "custom_code": "my-link",  // optional
///   "ttl": 3600                // optional, seconds
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "short_code": "aZ3kP9q",
///   "short_url": "http://localhost:3000/aZ3kP9q",
///   "original_url": "https://example.com/some/long/path",
///   "created_at": "2025-01-01T00:00:00Z",
///   "expires_at": "2025-01-01T01:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 `invalid_request` for malformed JSON or a negative `ttl`
/// - 400 `invalid_url` / `invalid_short_code`
/// - 409 `already_exists` if the custom code is taken
pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), AppError> {
    let Json(payload) = payload.map_err(|e| AppError::invalid_request(e.body_text()))?;
    payload.validate()?;

    let ttl = match payload.ttl {
        Some(seconds) if seconds > 0 => Some(
            TimeDelta::try_seconds(seconds)
                .ok_or_else(|| AppError::invalid_request("ttl is out of range"))?,
        ),
        _ => None,
    };

    let url = state
        .url_service
        .create_short_url(payload.url, payload.custom_code, ttl)
        .await?;

    let short_url = state.url_service.short_url_for(&url.short_code);

    Ok((
        StatusCode::CREATED,
        Json(CreateUrlResponse::new(url, short_url)),
    ))
}

/// Lists short URLs, newest first.
///
/// # Endpoint
///
/// `GET /api/urls?limit=20&offset=0`
///
/// `limit` defaults to 20 and is capped at 100; `offset` below zero becomes 0.
/// Values that are not integers count as absent. The response echoes the
/// effective values. `total` is the full table count.
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListUrlsResponse>, AppError> {
    let page = query.page();

    let (urls, total) = state.url_service.list(page).await?;

    let urls = urls
        .into_iter()
        .map(|url| {
            let short_url = state.url_service.short_url_for(&url.short_code);
            UrlResponse::new(url, short_url)
        })
        .collect();

    Ok(Json(ListUrlsResponse {
        urls,
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Returns the full record for a code without touching its counters.
///
/// # Endpoint
///
/// `GET /api/urls/{code}`
///
/// Expired records that have not been swept yet are still returned.
pub async fn get_url_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<UrlResponse>, AppError> {
    let url = state.url_service.get_metadata(&code).await?;
    let short_url = state.url_service.short_url_for(&url.short_code);

    Ok(Json(UrlResponse::new(url, short_url)))
}

/// Deletes a short URL.
///
/// # Endpoint
///
/// `DELETE /api/urls/{code}`
///
/// Returns `204 No Content`, or 404 if nothing was deleted.
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    state.url_service.delete(&code).await?;

    Ok(StatusCode::NO_CONTENT)
}
