//! Full short URL record as returned by the metadata and list endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ShortUrl;

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub id: i64,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub access_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
}

impl UrlResponse {
    pub fn new(url: ShortUrl, short_url: String) -> Self {
        Self {
            id: url.id,
            short_code: url.short_code,
            short_url,
            original_url: url.original_url,
            created_at: url.created_at,
            expires_at: url.expires_at,
            access_count: url.access_count,
            last_accessed: url.last_accessed,
        }
    }
}
