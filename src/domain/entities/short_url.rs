//! ShortUrl entity representing one shortened URL mapping.

use chrono::{DateTime, Utc};

/// A persisted short URL with its access statistics.
///
/// `short_code`, `original_url` and `created_at` never change after creation.
/// Only access tracking mutates a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub access_count: i64,
    pub last_accessed: Option<DateTime<Utc>>,
}

impl ShortUrl {
    /// Returns true if the record has an expiry strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    /// Returns true if the record has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Applies one successful access to the in-memory record.
    pub fn register_access(&mut self, at: DateTime<Utc>) {
        self.access_count += 1;
        self.last_accessed = Some(at);
    }
}

/// Input data for creating a new short URL.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(expires_at: Option<DateTime<Utc>>) -> ShortUrl {
        ShortUrl {
            id: 1,
            short_code: "abc1234".to_string(),
            original_url: "https://example.com".to_string(),
            created_at: Utc::now(),
            expires_at,
            access_count: 0,
            last_accessed: None,
        }
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let url = sample(None);
        assert!(!url.is_expired());
        assert!(!url.is_expired_at(Utc::now() + Duration::days(36_500)));
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let url = sample(Some(Utc::now() - Duration::seconds(1)));
        assert!(url.is_expired());
    }

    #[test]
    fn test_future_expiry_is_active() {
        let url = sample(Some(Utc::now() + Duration::hours(1)));
        assert!(!url.is_expired());
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let at = Utc::now();
        let url = sample(Some(at));

        assert!(!url.is_expired_at(at));
        assert!(url.is_expired_at(at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_register_access() {
        let mut url = sample(None);
        let first = Utc::now();
        url.register_access(first);

        assert_eq!(url.access_count, 1);
        assert_eq!(url.last_accessed, Some(first));

        let second = first + Duration::seconds(5);
        url.register_access(second);

        assert_eq!(url.access_count, 2);
        assert_eq!(url.last_accessed, Some(second));
    }
}
