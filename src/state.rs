//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::UrlService;
use crate::infrastructure::persistence::PgUrlRepository;

/// Application state cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService<PgUrlRepository>>,
}

impl AppState {
    pub fn new(url_service: Arc<UrlService<PgUrlRepository>>) -> Self {
        Self { url_service }
    }
}
