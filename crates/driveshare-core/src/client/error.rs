//! Request outcomes and the client error taxonomy.
//!
//! The backend's verbs signal failure asymmetrically and callers depend on
//! the exact shapes: GET never fails on a bad status (it degrades to a null
//! body), while the write verbs hand back a non-2xx outcome as a plain value.
//! Only transport-level problems (and undecodable bodies) use the failure
//! channel. The types here make that split explicit instead of mixing
//! error-shaped values into the data path.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categories of client errors for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientErrorKind {
    /// Connection timeout or request timeout
    Timeout,
    /// Connection could not be established (refused, DNS, TLS)
    Connect,
    /// Malformed request or other transport-level failure
    Transport,
    /// Failed to decode a response body (invalid JSON, unexpected shape)
    Parse,
    /// Client-side validation rejected the input before any network call
    Validation,
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientErrorKind::Timeout => write!(f, "timeout"),
            ClientErrorKind::Connect => write!(f, "connect"),
            ClientErrorKind::Transport => write!(f, "transport"),
            ClientErrorKind::Parse => write!(f, "parse"),
            ClientErrorKind::Validation => write!(f, "validation"),
        }
    }
}

/// Structured client error with kind and details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientError {
    /// Error category
    pub kind: ClientErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., the offending body)
    pub details: Option<String>,
}

impl ClientError {
    /// Creates a new client error.
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Timeout, message)
    }

    /// Creates a connection error.
    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Connect, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Parse, message)
    }

    /// Creates a validation error. No request is made when one is returned.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Validation, message)
    }

    /// Attaches detail text to the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClientError {}

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Non-2xx outcome of a write call, carried as a value rather than a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRejection {
    /// HTTP status code
    pub status: u16,
    /// Raw response body, if the server sent one
    pub body: Option<String>,
}

impl HttpRejection {
    pub fn new(status: u16, body: String) -> Self {
        let body = if body.is_empty() { None } else { Some(body) };
        Self { status, body }
    }
}

impl fmt::Display for HttpRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)
    }
}

impl std::error::Error for HttpRejection {}

/// Response of a GET call: the status is always present, the parsed body only
/// on a successful status.
#[derive(Debug, Clone, PartialEq)]
pub struct GetResponse<T = Value> {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body; `None` on any non-2xx status
    pub data: Option<T>,
}

impl<T> GetResponse<T> {
    /// Whether the underlying status was 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outcome of a write call (POST/PUT/DELETE).
///
/// A non-2xx status is `HttpError`, not a failure: the error-shaped value
/// travels through the success channel and callers opt in to treating it as
/// fatal (see [`WriteOutcome::into_result`]).
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome<T = Value> {
    /// 2xx with the parsed body, exactly as the server sent it
    Success(T),
    /// Non-2xx status with the raw body
    HttpError(HttpRejection),
}

impl<T> WriteOutcome<T> {
    /// Whether the call got a 2xx response.
    pub fn is_success(&self) -> bool {
        matches!(self, WriteOutcome::Success(_))
    }

    /// Converts the HTTP-error-as-value shape back into a `Result` for
    /// callers that do want the rejection on the failure channel.
    ///
    /// # Errors
    /// Returns the rejection when the outcome is `HttpError`.
    pub fn into_result(self) -> Result<T, HttpRejection> {
        match self {
            WriteOutcome::Success(value) => Ok(value),
            WriteOutcome::HttpError(rejection) => Err(rejection),
        }
    }

    /// Borrowing accessor for the success value.
    pub fn success(&self) -> Option<&T> {
        match self {
            WriteOutcome::Success(value) => Some(value),
            WriteOutcome::HttpError(_) => None,
        }
    }
}
