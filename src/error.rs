//! # Error Types
//!
//! This module defines error types used throughout the gafete library.

use thiserror::Error;

/// Main error type for gafete operations
#[derive(Debug, Error)]
pub enum GafeteError {
    /// Remote or cache persistence errors
    #[error("Store error: {0}")]
    Store(String),

    /// Template failed validation or could not be decoded
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Lookup by id found nothing
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Every event keeps at least one template
    #[error("Cannot delete the last template of event {0}")]
    LastTemplate(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
