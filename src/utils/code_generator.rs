//! Short code generation and validation.
//!
//! Generated codes are drawn uniformly from a 62-symbol alphanumeric alphabet
//! using an injected [`RandomSource`]. Custom codes supplied by callers are
//! checked against the wider `[A-Za-z0-9_-]` charset.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::AppError;

/// Output alphabet for generated codes.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Largest multiple of 62 representable in a byte. Bytes at or above it are
/// redrawn so `byte % 62` stays uniform.
const REJECTION_THRESHOLD: u8 = 248;

/// Bounds for caller-supplied custom codes.
pub const CUSTOM_CODE_MIN_LEN: usize = 3;
pub const CUSTOM_CODE_MAX_LEN: usize = 20;

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("custom code pattern is valid"));

/// Failure of the underlying random source.
#[derive(Debug, thiserror::Error)]
pub enum CodeGenError {
    #[error("secure random source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Capability that fills buffers with unpredictable bytes.
pub trait RandomSource: Send + Sync {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CodeGenError>;
}

/// Operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CodeGenError> {
        getrandom::fill(dest).map_err(|e| CodeGenError::SourceUnavailable(e.to_string()))
    }
}

/// Produces fixed-length alphanumeric codes.
#[derive(Clone)]
pub struct CodeGenerator {
    length: usize,
    source: Arc<dyn RandomSource>,
}

impl CodeGenerator {
    pub fn new(length: usize, source: Arc<dyn RandomSource>) -> Self {
        Self { length, source }
    }

    /// Generator backed by [`OsRandom`].
    pub fn with_os_random(length: usize) -> Self {
        Self::new(length, Arc::new(OsRandom))
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generates one candidate code of exactly `self.length` symbols.
    ///
    /// # Errors
    ///
    /// Returns [`CodeGenError`] if the random source fails.
    pub fn generate(&self) -> Result<String, CodeGenError> {
        let mut code = String::with_capacity(self.length);
        let mut buffer = vec![0u8; self.length];

        while code.len() < self.length {
            self.source.fill_bytes(&mut buffer)?;

            for &byte in &buffer {
                if byte >= REJECTION_THRESHOLD {
                    continue;
                }
                code.push(ALPHABET[usize::from(byte) % ALPHABET.len()] as char);
                if code.len() == self.length {
                    break;
                }
            }
        }

        Ok(code)
    }
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Allowed characters: ASCII letters, digits, `_` and `-`
///
/// # Errors
///
/// Returns [`AppError::InvalidShortCode`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !(CUSTOM_CODE_MIN_LEN..=CUSTOM_CODE_MAX_LEN).contains(&code.len()) {
        return Err(AppError::InvalidShortCode);
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::InvalidShortCode);
    }

    Ok(())
}
