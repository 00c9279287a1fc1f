use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the Wikitude Cloud Manager API.
#[derive(Error, Debug)]
pub enum ManagerError {
    /// The service rejected the request without a structured JSON error body.
    ///
    /// `status` is the HTTP status code and `message` the raw response body.
    #[error("({status}): {message}")]
    Api { status: u16, message: String },

    /// The service rejected the request with a `{code, reason, message}` body.
    #[error("{reason} ({code}): {message}")]
    Service {
        code: i64,
        reason: String,
        message: String,
    },

    /// A payload, status document or error body could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {message}")]
    InvalidEndpoint {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// A request builder was given invalid or incomplete input.
    #[error("Invalid request: {0}")]
    Builder(String),

    /// A path template placeholder had no value.
    #[error("Missing path parameter: {0}")]
    MissingPathParameter(&'static str),

    /// An asynchronous operation was accepted without a `Location` header.
    #[error("Location header missing from asynchronous response to {path}")]
    MissingLocation { path: String },

    /// The response carried no JSON document where one was expected.
    #[error("Expected a JSON body in the response to {path}")]
    MissingBody { path: String },

    /// A job did not report `COMPLETED` within the configured poll timeout.
    #[error("Job at {location} did not complete within {timeout:?}")]
    PollTimeout { location: String, timeout: Duration },

    /// Polling was cancelled through its cancellation token.
    #[error("Polling of job at {location} was cancelled")]
    Cancelled { location: String },
}

/// Coarse classification of a [`ManagerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Generic API error (status code and raw body).
    Api,
    /// Structured service error carrying a `reason`.
    Service,
    /// Malformed or unserializable JSON.
    Serialization,
    /// Transport-level failure.
    Transport,
    /// Client misconfiguration or misuse.
    Configuration,
    /// Job polling stopped before reaching a terminal status.
    Polling,
}

impl ManagerError {
    /// Create an invalid endpoint error with a source.
    pub fn invalid_endpoint_with_source(message: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create an invalid endpoint error without a source.
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source: None,
        }
    }

    /// Returns the kind tag for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { .. } => ErrorKind::Api,
            Self::Service { .. } => ErrorKind::Service,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Request(_) => ErrorKind::Transport,
            Self::InvalidEndpoint { .. }
            | Self::MissingConfig(_)
            | Self::Builder(_)
            | Self::MissingPathParameter(_)
            | Self::MissingLocation { .. }
            | Self::MissingBody { .. } => ErrorKind::Configuration,
            Self::PollTimeout { .. } | Self::Cancelled { .. } => ErrorKind::Polling,
        }
    }

    /// The error code reported for API and service errors.
    ///
    /// For [`ManagerError::Api`] this is the HTTP status, for
    /// [`ManagerError::Service`] the `code` field of the error document.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Api { status, .. } => Some(i64::from(*status)),
            Self::Service { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The machine-readable reason of a service error.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Service { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Result type alias for Cloud Manager operations.
pub type ManagerResult<T> = std::result::Result<T, ManagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_display_matches_reason_code_message() {
        let err = ManagerError::Service {
            code: 404,
            reason: "NotFound".into(),
            message: "no such collection".into(),
        };
        assert_eq!(err.to_string(), "NotFound (404): no such collection");
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.code(), Some(404));
        assert_eq!(err.reason(), Some("NotFound"));
    }

    #[test]
    fn api_error_exposes_status_as_code() {
        let err = ManagerError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "(500): boom");
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.code(), Some(500));
        assert!(err.reason().is_none());
    }

    #[test]
    fn polling_errors_have_no_code() {
        let err = ManagerError::PollTimeout {
            location: "/jobs/1".into(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(err.kind(), ErrorKind::Polling);
        assert!(err.code().is_none());
    }

    #[test]
    fn invalid_endpoint_keeps_source() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err = ManagerError::invalid_endpoint_with_source("bad", parse_err);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
