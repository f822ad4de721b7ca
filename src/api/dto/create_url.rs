//! DTOs for the create endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;

/// Request to shorten a single URL.
///
/// URL and custom code syntax are checked by the engine so that each failure
/// maps to its own error token.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    pub url: String,

    /// Caller-chosen code. An empty string is treated as absent.
    #[serde(default)]
    pub custom_code: Option<String>,

    /// Lifetime in seconds. `0` means no explicit TTL.
    #[serde(default)]
    #[validate(range(min = 0, message = "ttl must not be negative"))]
    pub ttl: Option<i64>,
}

/// Response for a newly created short URL.
#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub id: i64,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateUrlResponse {
    pub fn new(url: ShortUrl, short_url: String) -> Self {
        Self {
            id: url.id,
            short_code: url.short_code,
            short_url,
            original_url: url.original_url,
            created_at: url.created_at,
            expires_at: url.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_ttl_rejected() {
        let request: CreateUrlRequest =
            serde_json::from_str(r#"{"url":"https://example.com","ttl":-5}"#).unwrap();

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let request: CreateUrlRequest =
            serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();

        assert!(request.validate().is_ok());
        assert!(request.custom_code.is_none());
        assert!(request.ttl.is_none());
    }

    #[test]
    fn test_missing_url_fails_to_parse() {
        let result = serde_json::from_str::<CreateUrlRequest>(r#"{"ttl":60}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_response_omits_missing_expiry() {
        let response = CreateUrlResponse {
            id: 1,
            short_code: "abc1234".to_string(),
            short_url: "http://localhost:3000/abc1234".to_string(),
            original_url: "https://example.com".to_string(),
            created_at: Utc::now(),
            expires_at: None,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("expires_at").is_none());
        assert_eq!(json["short_code"], "abc1234");
    }
}
