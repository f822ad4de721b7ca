//! Business services consumed by HTTP handlers and the operator CLI.
//!
//! - [`UrlService`] - Short URL creation, resolution, listing and cleanup

pub mod url_service;

pub use url_service::{ShortenerSettings, UrlService};
