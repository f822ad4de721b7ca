//! PostgreSQL persistence.
//!
//! - [`PgUrlRepository`] - Short URL storage, lookup, access counting and sweeps
//! - [`pool`] - Connection pool construction with startup retries

pub mod pg_url_repository;
pub mod pool;

pub use pg_url_repository::PgUrlRepository;
pub use pool::connect_pool;
