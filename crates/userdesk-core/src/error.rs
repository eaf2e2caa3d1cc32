//! Error types for userdesk.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, input validation and storage errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for userdesk operations.
///
/// Callers that need the coarse failure class (for example to pick a
/// notification text) should use [`Error::kind`].
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (no response from the server).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Client-side authentication errors.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The server answered with a non-success status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors (bad URL, bad identifier).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Durable session storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Coarse failure classes, one per notification category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received.
    Network,
    /// The server answered 401.
    Unauthorized,
    /// Re-authentication failed; the session has been cleared.
    SessionExpired,
    /// The server answered 403.
    Forbidden,
    /// A 4xx carrying a server message.
    Validation,
    /// Any other 4xx (or unexpected non-success status).
    Client,
    /// A 5xx.
    Server,
    /// A stored or issued credential could not be decoded.
    MalformedCredential,
    /// Caller-supplied input was rejected before any request was made.
    InvalidInput,
    /// The session could not be read from or written to durable storage.
    Storage,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) => ErrorKind::Network,
            Error::Auth(AuthError::MalformedCredential { .. }) => ErrorKind::MalformedCredential,
            Error::Auth(AuthError::SessionExpired { .. }) => ErrorKind::SessionExpired,
            Error::Auth(AuthError::NoSession) => ErrorKind::Unauthorized,
            Error::Api(api) => api.kind(),
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Returns true if the server rejected the request with 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api(api) if api.kind() == ErrorKind::Unauthorized)
    }

    /// The server-provided message, if this error carries one.
    ///
    /// For [`AuthError::SessionExpired`] this is the message of the failed
    /// refresh call.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Api(api) => api.message.as_deref(),
            Error::Auth(AuthError::SessionExpired { cause: Some(cause) }) => cause.server_message(),
            _ => None,
        }
    }

    /// Text for a user-visible notification: the server message when there
    /// is one, otherwise `fallback`.
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.server_message().unwrap_or(fallback)
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// The HTTP client could not be constructed.
    #[error("client setup failed: {message}")]
    Setup { message: String },

    /// A success response whose body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors raised on the client side.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential is not a decodable token.
    #[error("malformed credential: {reason}")]
    MalformedCredential { reason: String },

    /// The credential was rejected and could not be refreshed.
    #[error("session expired")]
    SessionExpired {
        /// The error returned by the refresh attempt, if one was made.
        #[source]
        cause: Option<Box<Error>>,
    },

    /// The operation needs an authenticated session and there is none.
    #[error("no active session")]
    NoSession,
}

/// A non-success response from the API.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Message from the server's `{"message": ...}` body, if present.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Classify the status code.
    pub fn kind(&self) -> ErrorKind {
        match self.status {
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            400..=499 if self.message.is_some() => ErrorKind::Validation,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Client,
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid user identifier.
    #[error("invalid user id '{value}': {reason}")]
    UserId { value: String, reason: String },

    /// Invalid role name.
    #[error("invalid role '{value}': expected 'user' or 'admin'")]
    Role { value: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Durable session storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The stored session could not be parsed or serialized.
    #[error("corrupt session data: {message}")]
    Format { message: String },
}
