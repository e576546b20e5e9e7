use crate::constants;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Specification format error: {reason}")]
    SpecFormat { reason: String },
    #[error("Specification schema error: {reason}")]
    SpecSchema { reason: String },
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

/// JSON representation of an error for structured output
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonError {
    pub error_type: String,
    pub message: String,
    pub context: Option<String>,
}

impl Error {
    #[must_use]
    pub fn spec_format(reason: impl Into<String>) -> Self {
        Self::SpecFormat {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn spec_schema(reason: impl Into<String>) -> Self {
        Self::SpecSchema {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    /// True when the error was caused by malformed caller input rather than by the system.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::SpecFormat { .. } | Self::SpecSchema { .. } | Self::InvalidRequest { .. }
        )
    }

    /// Add context to an error for better user messaging
    #[must_use]
    pub fn with_context(self, context: &str) -> Self {
        match self {
            Self::Network(e) => Self::Config(format!("{context}: {e}")),
            Self::Io(e) => Self::Config(format!("{context}: {e}")),
            _ => self,
        }
    }

    /// Convert error to JSON representation for structured output
    #[must_use]
    pub fn to_json(&self) -> JsonError {
        let (error_type, context) = match self {
            Self::Io(io_err) => {
                let context = match io_err.kind() {
                    std::io::ErrorKind::NotFound => Some(constants::ERR_FILE_NOT_FOUND),
                    std::io::ErrorKind::PermissionDenied => Some(constants::ERR_PERMISSION),
                    _ => None,
                };
                ("FileSystem", context)
            }
            Self::Network(req_err) => {
                let context = if req_err.is_connect() {
                    Some(constants::ERR_CONNECTION)
                } else if req_err.is_timeout() {
                    Some(constants::ERR_TIMEOUT)
                } else {
                    None
                };
                ("Network", context)
            }
            Self::Yaml(_) => ("YAMLParsing", Some(constants::ERR_YAML_SYNTAX)),
            Self::Json(_) => ("JSONParsing", Some(constants::ERR_JSON_SYNTAX)),
            Self::Toml(_) => ("TOMLParsing", Some(constants::ERR_TOML_SYNTAX)),
            Self::SpecFormat { .. } => ("SpecFormat", Some(constants::ERR_SPEC_FORMAT)),
            Self::SpecSchema { .. } => ("SpecSchema", Some(constants::ERR_SPEC_SCHEMA)),
            Self::InvalidRequest { .. } => ("InvalidRequest", None),
            Self::NotFound { .. } => ("NotFound", Some(constants::ERR_UNKNOWN_ID)),
            Self::Config(_) => ("Configuration", None),
        };

        JsonError {
            error_type: error_type.to_string(),
            message: self.to_string(),
            context: context.map(str::to_string),
        }
    }
}

impl Error {
    /// HTTP status used when the error is returned by the server
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else if matches!(self, Self::NotFound { .. }) {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(target: "apiprobe::server", error = %self, "Request failed");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
