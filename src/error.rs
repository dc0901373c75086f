//! # Error Types
//!
//! This module defines error types used throughout the matchgen library.
//!
//! Only [`MatchgenError::TemplateUnavailable`] aborts a composition. Everything
//! that goes wrong with a single element is reported as a
//! [`SkipReason`](crate::render::SkipReason) instead.

use thiserror::Error;

/// Main error type for matchgen operations
#[derive(Debug, Error)]
pub enum MatchgenError {
    /// The base template could not be fetched or decoded
    #[error("Template unavailable: {0}")]
    TemplateUnavailable(String),

    /// Remote or local asset fetch failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Font asset could not be parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Element record is missing a field or carries an invalid value
    #[error("Invalid element: {0}")]
    InvalidElement(String),

    /// Engine configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Final canvas could not be serialized
    #[error("Encode error: {0}")]
    Encode(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MatchgenError {
    /// True for the one error that means "no output at all".
    pub fn is_fatal(&self) -> bool {
        matches!(self, MatchgenError::TemplateUnavailable(_))
    }
}
