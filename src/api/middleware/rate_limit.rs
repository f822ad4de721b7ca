//! Rate limiting middleware using token bucket algorithm.

use anyhow::Context;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Creates a per-IP rate limiter for the management API.
///
/// # Limits
///
/// - **Rate**: `per_second` tokens replenished per second, at most 1000
///   (one token per millisecond); higher values are clamped
/// - **Burst**: up to `burst` requests at once
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the server must be started with connect info.
///
/// # Errors
///
/// Returns an error if either value is zero.
pub fn layer(
    per_second: u64,
    burst: u32,
) -> anyhow::Result<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>>
{
    let replenish_ms = (1000 / per_second.max(1)).max(1);

    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(replenish_ms)
        .burst_size(burst)
        .finish()
        .context("Invalid rate limit configuration")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_burst_rejected() {
        assert!(layer(10, 0).is_err());
    }

    #[test]
    fn test_valid_configuration() {
        assert!(layer(10, 100).is_ok());
        assert!(layer(5000, 1).is_ok());
    }
}
