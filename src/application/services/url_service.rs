//! Short URL creation, resolution and lifecycle service.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::pagination::Page;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, validate_custom_code};
use crate::utils::url_validator::validate_url;

/// Attempts made by the generate-probe loop before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Upper bound for a health probe round trip.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Static settings consumed by [`UrlService`].
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Public base used to build `short_url` values.
    pub base_url: String,
    /// Applied when a request carries no positive TTL. `None` means never expire.
    pub default_ttl: Option<TimeDelta>,
}

/// Shortening engine.
///
/// Generates or validates codes, resolves collisions, computes expiry and
/// maintains access statistics. Correctness against duplicate codes rests on
/// the store's uniqueness constraint; the pre-insert probe only makes failed
/// inserts rarer.
pub struct UrlService<R: UrlRepository> {
    repository: Arc<R>,
    generator: CodeGenerator,
    settings: ShortenerSettings,
}

impl<R: UrlRepository> UrlService<R> {
    pub fn new(repository: Arc<R>, generator: CodeGenerator, settings: ShortenerSettings) -> Self {
        Self {
            repository,
            generator,
            settings,
        }
    }

    /// Creates a short URL.
    ///
    /// # Arguments
    ///
    /// - `original_url` - absolute http/https URL, stored as given
    /// - `custom_code` - optional caller-chosen code (an empty string counts as absent)
    /// - `ttl` - optional lifetime; non-positive values fall back to the default TTL
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] / [`AppError::InvalidShortCode`] on bad input
    /// - [`AppError::AlreadyExists`] if the code is taken at insert time
    /// - [`AppError::GenerationExhausted`] if every generated candidate collided
    pub async fn create_short_url(
        &self,
        original_url: String,
        custom_code: Option<String>,
        ttl: Option<TimeDelta>,
    ) -> Result<ShortUrl, AppError> {
        validate_url(&original_url)?;

        let short_code = match custom_code.filter(|c| !c.is_empty()) {
            Some(custom) => {
                validate_custom_code(&custom)?;
                custom
            }
            None => self.generate_unique_code().await?,
        };

        let created_at = Utc::now();
        let expires_at = self.compute_expiry(created_at, ttl)?;

        let url = self
            .repository
            .create(NewShortUrl {
                short_code,
                original_url,
                created_at,
                expires_at,
            })
            .await?;

        tracing::info!(
            id = url.id,
            short_code = %url.short_code,
            original_url = %url.original_url,
            expires_at = ?url.expires_at,
            "short url created"
        );

        Ok(url)
    }

    /// Resolves a code for redirection and records the access.
    ///
    /// Expired records are reported as [`AppError::Expired`] and left in place
    /// for the sweeper. Access tracking is best-effort: a failed counter update
    /// is logged and the resolved record is still returned.
    pub async fn resolve(&self, code: &str) -> Result<ShortUrl, AppError> {
        let mut url = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))?;

        let now = Utc::now();
        if url.is_expired_at(now) {
            tracing::warn!(short_code = %code, "attempted to access expired url");
            return Err(AppError::expired(code));
        }

        url.register_access(now);

        match self.repository.record_access(url.id, now).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(short_code = %code, "url removed before access could be recorded");
            }
            Err(e) => {
                tracing::error!(error = %e, short_code = %code, "failed to update access count");
            }
        }

        Ok(url)
    }

    /// Returns a record without touching its statistics, even if expired.
    pub async fn get_metadata(&self, code: &str) -> Result<ShortUrl, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))
    }

    /// Deletes a record by code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if nothing was deleted.
    pub async fn delete(&self, code: &str) -> Result<(), AppError> {
        if !self.repository.delete_by_code(code).await? {
            return Err(AppError::not_found(code));
        }

        tracing::info!(short_code = %code, "url deleted");
        Ok(())
    }

    /// Lists records newest first, together with the full table count.
    pub async fn list(&self, page: Page) -> Result<(Vec<ShortUrl>, i64), AppError> {
        let urls = self.repository.list(page.limit, page.offset).await?;
        let total = self.repository.count().await?;

        Ok((urls, total))
    }

    /// Removes every record whose expiry is strictly in the past.
    pub async fn cleanup_expired(&self) -> Result<u64, AppError> {
        self.repository.delete_expired(Utc::now()).await
    }

    /// Builds the public short URL for a code.
    pub fn short_url_for(&self, code: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), code)
    }

    /// Checks store connectivity within [`HEALTH_CHECK_TIMEOUT`].
    pub async fn check_store(&self) -> Result<(), AppError> {
        match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, self.repository.ping()).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Unavailable),
        }
    }

    fn compute_expiry(
        &self,
        created_at: DateTime<Utc>,
        ttl: Option<TimeDelta>,
    ) -> Result<Option<DateTime<Utc>>, AppError> {
        let ttl = ttl
            .filter(|t| *t > TimeDelta::zero())
            .or(self.settings.default_ttl);

        match ttl {
            Some(ttl) => created_at
                .checked_add_signed(ttl)
                .map(Some)
                .ok_or_else(|| AppError::invalid_request("ttl is out of range")),
            None => Ok(None),
        }
    }

    /// Generates a code not currently present in the store.
    ///
    /// The probe is not race-free: a concurrent insert can still claim the
    /// code, in which case the insert reports [`AppError::AlreadyExists`].
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = self.generator.generate()?;

            if !self.repository.code_exists(&code).await? {
                return Ok(code);
            }

            tracing::debug!(code = %code, attempt, "short code collision, retrying");
        }

        Err(AppError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }
}
