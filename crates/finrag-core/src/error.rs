//! Error types for the finrag client.

use thiserror::Error;

/// A shared error type for every finrag crate.
///
/// Remote failures are classified here so the session controller can decide
/// whether to surface them in the conversation or only log them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinragError {
    /// The request never produced a response (connection refused, DNS, TLS...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The backend answered with a non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The backend reported a logical failure (`success: false`)
    #[error("{0}")]
    Backend(String),

    /// A field the client relies on was absent from the response
    #[error("Response is missing the `{0}` field")]
    MissingField(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// A caller handed the client a value it cannot accept
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FinragError {
    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Check if the request failed before any response was received
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Text suitable for showing to the user after a failed upload.
    ///
    /// Backend and HTTP failures carry the backend's own wording; everything
    /// else falls back to the error's display form.
    pub fn user_detail(&self) -> String {
        match self {
            Self::Backend(message) => message.clone(),
            Self::Http { message, .. } if !message.trim().is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for FinragError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for FinragError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for FinragError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A type alias for `Result<T, FinragError>`.
pub type Result<T> = std::result::Result<T, FinragError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_detail_prefers_backend_text() {
        let err = FinragError::backend("Only PDF files supported");
        assert_eq!(err.user_detail(), "Only PDF files supported");

        let err = FinragError::Http {
            status: 400,
            message: "Only PDF files supported".to_string(),
        };
        assert_eq!(err.user_detail(), "Only PDF files supported");
    }

    #[test]
    fn test_user_detail_falls_back_to_display() {
        let err = FinragError::Http {
            status: 502,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_detail(), "HTTP 502:   ");

        let err = FinragError::Timeout { seconds: 60 };
        assert_eq!(err.user_detail(), "Request timed out after 60s");
    }

    #[test]
    fn test_network_classification() {
        assert!(FinragError::transport("connection refused").is_network());
        assert!(FinragError::Timeout { seconds: 1 }.is_network());
        assert!(!FinragError::MissingField("answer").is_network());
    }

    #[test]
    fn test_serde_json_error_becomes_decode() {
        let err: FinragError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, FinragError::Decode(_)));
    }
}
