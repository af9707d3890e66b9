//! Error types for mydrive.

use thiserror::Error;

/// Common error type for mydrive.
#[derive(Error, Debug)]
pub enum DriveError {
    /// Network or transport failure (connect, timeout, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered 401. The session has already been torn down
    /// by the time the caller sees this.
    #[error("session expired{}", detail(.0))]
    SessionExpired(Option<String>),

    /// Server-reported error with a non-success status.
    #[error("server error ({status}){}", detail(.message))]
    Api {
        /// HTTP status code.
        status: u16,
        /// `message` field of the response body, if any.
        message: Option<String>,
    },

    /// Client-side validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Persisted client storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl DriveError {
    /// Message supplied by the server, if this error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            DriveError::Api { message, .. } | DriveError::SessionExpired(message) => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// Whether this error tore down the session.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, DriveError::SessionExpired(_))
    }
}

impl From<reqwest::Error> for DriveError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DriveError::Decode(e.to_string())
        } else {
            DriveError::Transport(e.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for DriveError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for {}", field))
                })
            })
            .next()
            .unwrap_or_else(|| "invalid input".to_string());
        DriveError::Validation(message)
    }
}

/// Result type alias for mydrive operations.
pub type Result<T> = std::result::Result<T, DriveError>;
