//! Error types for KeuanganKu

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for KeuanganKu operations
pub type Result<T> = std::result::Result<T, KeuanganError>;

#[derive(Error, Debug)]
pub enum KeuanganError {

    // =============================
    // Domain Errors
    // =============================

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email atau kata sandi tidak valid.")]
    InvalidCredentials,

    #[error("Not authenticated: please log in first")]
    Unauthenticated,

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("There are no entries to export")]
    NothingToExport,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl KeuanganError {
    /// HTTP status surfaced to API callers
    pub fn status_code(&self) -> StatusCode {
        match self {
            KeuanganError::Validation(_) | KeuanganError::NothingToExport => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            KeuanganError::InvalidCredentials | KeuanganError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            KeuanganError::EntryNotFound(_) => StatusCode::NOT_FOUND,
            KeuanganError::LlmError(_)
            | KeuanganError::MalformedOutput(_)
            | KeuanganError::HttpError(_) => StatusCode::BAD_GATEWAY,
            KeuanganError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
            KeuanganError::Storage(_)
            | KeuanganError::SerializationError(_)
            | KeuanganError::CsvError(_)
            | KeuanganError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            KeuanganError::Validation("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            KeuanganError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            KeuanganError::EntryNotFound("9".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            KeuanganError::MalformedOutput("missing field".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
