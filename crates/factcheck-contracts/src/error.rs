//! Error types for the factcheck pipeline.
//!
//! All fallible operations return `FactcheckResult<T>`. The orchestrator
//! never lets one of these escape `verify`; each is folded into one of the
//! two fallback results, with the `Display` text becoming the `analysis`.

use thiserror::Error;

/// The unified error type for the factcheck crates.
#[derive(Debug, Error)]
pub enum FactcheckError {
    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// The inference endpoint answered with a non-success status other than 503.
    #[error("inference endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (timeout, DNS, connection reset).
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// Every attempt was answered with 503 while the model was loading.
    #[error("model still loading after {attempts} attempts")]
    ModelLoading { attempts: u32 },

    /// The endpoint answered 2xx but the body was not JSON.
    #[error("invalid inference response: {reason}")]
    InvalidResponse { reason: String },

    /// The web-search collaborator failed.
    #[error("search failed: {reason}")]
    Search { reason: String },

    /// The model reply parsed as JSON but lacks one or more required keys.
    #[error("Missing required fields in response: {reason}")]
    MissingFields { reason: String },

    /// Local file or stream I/O failed.
    #[error("i/o error: {reason}")]
    Io { reason: String },
}

/// Convenience alias used throughout the factcheck crates.
pub type FactcheckResult<T> = Result<T, FactcheckError>;
