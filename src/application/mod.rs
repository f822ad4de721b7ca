//! Application layer: the shortening engine and its background sweeper.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers. The cleanup worker drives periodic bulk expiration.
//!
//! - [`services::url_service::UrlService`] - Code generation, collision handling,
//!   expiry and access tracking
//! - [`cleanup_worker`] - Interval-driven sweep of expired records

pub mod cleanup_worker;
pub mod services;
