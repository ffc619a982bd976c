//! services/api/src/error.rs
//!
//! Defines the primary error type for the API service, plus the mapping from
//! core errors to HTTP responses.

use crate::config::ConfigError;
use axum::http::StatusCode;
use idea_ranker_core::{PortError, SubmitError};

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The error shape returned by handlers.
pub type HandlerError = (StatusCode, String);

/// Maps a failed submission to a status code and a message fit for the user.
pub fn submit_error_response(err: SubmitError) -> HandlerError {
    match err {
        SubmitError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        SubmitError::NotSignedIn => (StatusCode::UNAUTHORIZED, err.to_string()),
        SubmitError::Persistence(_) => (
            StatusCode::BAD_GATEWAY,
            "The idea could not be saved. Please try again.".to_string(),
        ),
    }
}

/// Maps a failed identity provider call.
pub fn port_error_response(err: &PortError) -> HandlerError {
    match err {
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, err.to_string()),
        PortError::Unexpected(_) => (
            StatusCode::BAD_GATEWAY,
            "The identity provider is unavailable".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idea_ranker_core::ValidationError;

    #[test]
    fn test_validation_errors_are_unprocessable() {
        let (status, message) =
            submit_error_response(SubmitError::Validation(ValidationError::NothingEntered));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(message, "You haven't written anything yet.");

        let (status, message) =
            submit_error_response(ValidationError::MissingRequiredFields.into());
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(message, "Idea name and short description are required.");
    }

    #[test]
    fn test_persistence_error_hides_details() {
        let (status, message) = submit_error_response(SubmitError::Persistence(
            PortError::Unexpected("connection reset".to_string()),
        ));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!message.contains("connection reset"));
    }

    #[test]
    fn test_port_error_mapping() {
        let (status, _) = port_error_response(&PortError::Unauthorized);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = port_error_response(&PortError::Unexpected("x".to_string()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
