//! Error types for the Nekoweb integration.
//!
//! All public API surfaces in this crate return `NekowebResult<T>`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Convenience alias.
pub type NekowebResult<T> = Result<T, NekowebError>;

/// Shown whenever an authenticated call is attempted without a token.
pub const MISSING_TOKEN_MESSAGE: &str =
    "Authorization token is not set. Please configure it in the settings.";

/// Error codes for Nekoweb operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NekowebErrorCode {
    /// No token configured; detected locally, never sent.
    MissingCredential,
    /// Token rejected (HTTP 401 / 403).
    AuthFailed,
    /// Resource not found (HTTP 404).
    NotFound,
    /// Rate-limited (HTTP 429).
    RateLimited,
    /// Any other 4xx.
    InvalidRequest,
    /// 5xx from the server.
    ServerError,
    /// DNS, connect, timeout.
    NetworkError,
    /// Response body was not what we expected.
    SerializationError,
    /// Local file could not be opened, read or written.
    IoError,
    /// Catch-all.
    InternalError,
}

impl fmt::Display for NekowebErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Structured error returned by every public function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NekowebError {
    pub code: NekowebErrorCode,
    pub message: String,
    pub status: Option<u16>,
}

impl fmt::Display for NekowebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        Ok(())
    }
}

impl std::error::Error for NekowebError {}

impl NekowebError {
    pub fn new(code: NekowebErrorCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            status: None,
        }
    }

    pub fn missing_credential() -> Self {
        Self::new(NekowebErrorCode::MissingCredential, MISSING_TOKEN_MESSAGE)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(NekowebErrorCode::NetworkError, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(NekowebErrorCode::IoError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(NekowebErrorCode::InternalError, msg)
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::new(NekowebErrorCode::SerializationError, msg)
    }

    pub fn is_missing_credential(&self) -> bool {
        self.code == NekowebErrorCode::MissingCredential
    }

    /// Single-line text for a user notification.
    pub fn user_message(&self) -> String {
        format!("Error: {}", self.message)
    }

    /// Build an error from a non-success API response.
    pub fn from_api_response(status: u16, body: &str) -> Self {
        let code = match status {
            401 | 403 => NekowebErrorCode::AuthFailed,
            404 => NekowebErrorCode::NotFound,
            429 => NekowebErrorCode::RateLimited,
            _ if status >= 500 => NekowebErrorCode::ServerError,
            _ => NekowebErrorCode::InvalidRequest,
        };

        let message = Self::parse_error_body(body)
            .unwrap_or_else(|| format!("Nekoweb API error (HTTP {})", status));

        Self {
            code,
            message,
            status: Some(status),
        }
    }

    /// Pull a message out of `{"error": ".."}` or `{"message": ".."}`,
    /// or use a short plain-text body as-is.
    fn parse_error_body(body: &str) -> Option<String> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(v) => v["error"]
                .as_str()
                .or_else(|| v["message"].as_str())
                .map(String::from),
            Err(_) if body.len() <= 200 && !body.starts_with('<') => Some(body.to_string()),
            Err(_) => None,
        }
    }
}

impl From<reqwest::Error> for NekowebError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            Self::serialization(format!("Failed to decode response: {}", err))
        } else if let Some(status) = err.status() {
            Self::from_api_response(status.as_u16(), "")
        } else {
            Self::network(format!("HTTP error: {}", err))
        }
    }
}

impl From<serde_json::Error> for NekowebError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for NekowebError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<url::ParseError> for NekowebError {
    fn from(err: url::ParseError) -> Self {
        Self::new(
            NekowebErrorCode::InvalidRequest,
            format!("URL parse error: {}", err),
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════
