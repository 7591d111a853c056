//! Error types and handling for Dashplane

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Result type alias for Dashplane operations
pub type Result<T> = std::result::Result<T, DashError>;

/// Main error type for Dashplane
#[derive(Error, Debug)]
pub enum DashError {
    /// Configuration errors (fatal at startup)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The requested plugin instance is not registered
    #[error("could not find instance name")]
    InstanceNotFound { name: String },

    /// Malformed request parameters
    #[error("{message}")]
    BadRequest { message: String },

    /// A backend call made by an instance failed
    #[error("could not {operation}: {message}")]
    Backend {
        instance: String,
        operation: String,
        message: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DashError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown instance error
    pub fn instance_not_found<S: Into<String>>(name: S) -> Self {
        Self::InstanceNotFound { name: name.into() }
    }

    /// Create a bad request error
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a backend error for the given instance and operation
    pub fn backend<I, O, M>(instance: I, operation: O, message: M) -> Self
    where
        I: Into<String>,
        O: Into<String>,
        M: std::fmt::Display,
    {
        Self::Backend {
            instance: instance.into(),
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Whether the error was caused by the caller rather than by the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DashError::InstanceNotFound { .. } | DashError::BadRequest { .. }
        )
    }

    /// The error message without its category prefix
    pub fn detail(&self) -> String {
        match self {
            DashError::Config { message } | DashError::BadRequest { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DashError::Config { .. } => "config",
            DashError::InstanceNotFound { .. } => "instance_not_found",
            DashError::BadRequest { .. } => "bad_request",
            DashError::Backend { .. } => "backend",
            DashError::Io(_) => "io",
            DashError::Serde(_) => "serialization",
            DashError::Yaml(_) => "yaml",
            DashError::Http(_) => "http",
            DashError::Internal(_) => "internal",
        }
    }
}

impl ResponseError for DashError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}
