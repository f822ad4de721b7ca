//! Utility functions for code generation and input validation.
//!
//! - [`code_generator`] - Short code generation and custom code validation
//! - [`url_validator`] - Target URL validation

pub mod code_generator;
pub mod url_validator;
