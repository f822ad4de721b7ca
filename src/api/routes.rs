//! API route configuration.

use crate::api::handlers::{
    create_url_handler, delete_url_handler, get_url_handler, list_urls_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Short URL management routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /urls`         - Create a short URL
/// - `GET    /urls`         - List short URLs (paginated)
/// - `GET    /urls/{code}`  - Metadata for one short URL
/// - `DELETE /urls/{code}`  - Delete a short URL
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler).post(create_url_handler))
        .route("/urls/{code}", get(get_url_handler).delete(delete_url_handler))
}
