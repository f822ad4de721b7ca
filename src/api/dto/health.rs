//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response.
///
/// Store errors are logged by the handler and never included here.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`.
    pub status: &'static str,
    /// `connected` or `disconnected`.
    pub database: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            database: "connected",
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            status: "unhealthy",
            database: "disconnected",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
