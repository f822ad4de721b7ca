//! Core domain entities.
//!
//! Entities are plain data structures. Creation input lives in a separate
//! struct ([`NewShortUrl`]) because `id` is assigned by the store.

pub mod short_url;

pub use short_url::{NewShortUrl, ShortUrl};
