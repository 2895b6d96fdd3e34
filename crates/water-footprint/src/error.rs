//! # Water Footprint Error Handling
//!
//! A single error type for the service. Artifact errors are the only class
//! the prediction core lets escape; everything the HTTP layer rejects maps to
//! a 4xx response through the axum `IntoResponse` impl below.

use thiserror::Error;

/// The main error type for the water footprint service.
#[derive(Error, Debug)]
pub enum WaterError {
    /// Configuration-related errors (invalid env values, missing fields, etc.)
    #[error("configuration error: {0}")]
    Config(String),

    /// Database errors (connection failures, query errors, migrations)
    #[error("database error: {0}")]
    Database(String),

    /// IO errors (artifact files, listener sockets)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Model or metadata artifacts missing, corrupt, or inconsistent
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Resource not found errors
    #[error("{resource_type} not found: {resource_id}")]
    NotFound {
        resource_type: String,
        resource_id: String,
    },

    /// Invalid input validation errors
    #[error("invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Token signing/verification errors
    #[error("authentication error: {0}")]
    Auth(String),

    /// Internal consistency failures
    #[error("internal error: {0}")]
    Internal(String),
}

/// Type alias for Results using WaterError
pub type Result<T> = std::result::Result<T, WaterError>;

impl From<serde_json::Error> for WaterError {
    fn from(err: serde_json::Error) -> Self {
        WaterError::Serialization(err.to_string())
    }
}

impl From<sqlx::Error> for WaterError {
    fn from(err: sqlx::Error) -> Self {
        WaterError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for WaterError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        WaterError::Database(format!("migration failed: {err}"))
    }
}

impl From<axum::extract::rejection::JsonRejection> for WaterError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        WaterError::Serialization(rejection.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for WaterError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        WaterError::Serialization(rejection.body_text())
    }
}

impl From<axum::extract::rejection::PathRejection> for WaterError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        WaterError::invalid_input("path", rejection.body_text())
    }
}

impl axum::response::IntoResponse for WaterError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::Json;

        let (status, error_type) = match &self {
            WaterError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            WaterError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
            WaterError::Serialization(_) => (StatusCode::BAD_REQUEST, "serialization_error"),
            WaterError::Auth(_) => (StatusCode::UNAUTHORIZED, "auth_error"),
            WaterError::Config(_)
            | WaterError::Database(_)
            | WaterError::Io(_)
            | WaterError::Artifact(_)
            | WaterError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(serde_json::json!({
            "error": error_type,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl WaterError {
    /// Determines if this error is a client error (4xx-equivalent).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WaterError::InvalidInput { .. }
                | WaterError::NotFound { .. }
                | WaterError::Auth(_)
                | WaterError::Serialization(_)
        )
    }

    /// Creates a not found error
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        WaterError::NotFound {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    /// Creates an invalid input error
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        WaterError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        WaterError::Config(msg.into())
    }

    /// Creates an artifact error
    #[must_use]
    pub fn artifact(msg: impl Into<String>) -> Self {
        WaterError::Artifact(msg.into())
    }

    /// Creates an authentication error
    #[must_use]
    pub fn auth(msg: impl Into<String>) -> Self {
        WaterError::Auth(msg.into())
    }

    /// Creates an internal error
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        WaterError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<WaterError>();
        assert_sync::<WaterError>();
    }

    #[test]
    fn test_invalid_input_message() {
        let err = WaterError::invalid_input("family_size", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid input for field 'family_size': must be at least 1"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_artifact_is_not_client_error() {
        let err = WaterError::artifact("model.json missing");
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("model.json"));
    }

    #[test]
    fn test_status_mapping() {
        let resp = WaterError::not_found("reading", "42").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = WaterError::invalid_input("limit", "too large").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = WaterError::internal("boom").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rejected_query_maps_to_serialization() {
        use axum::extract::Query;
        use std::collections::HashMap;

        let uri: axum::http::Uri = "/readings?limit=abc".parse().unwrap();
        let rejection = Query::<HashMap<String, i64>>::try_from_uri(&uri).unwrap_err();
        let err: WaterError = rejection.into();

        assert!(matches!(err, WaterError::Serialization(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_serde_json_conversion() {
        let err: WaterError = serde_json::from_str::<Vec<String>>("{").unwrap_err().into();
        assert!(matches!(err, WaterError::Serialization(_)));
    }
}
