//! Error types for adapter operations.

use std::fmt;

use thiserror::Error;

use calbridge_core::Provider;

/// The category of an adapter error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterErrorCode {
    /// Credentials invalid or expired (401).
    AuthenticationFailed,
    /// Principal lacks permission (403).
    AuthorizationFailed,
    /// Connection failed, timeout, DNS resolution, etc.
    NetworkError,
    /// Rate limit exceeded (429).
    RateLimited,
    /// Provider-side error (5xx).
    ServerError,
    /// Parse error or unexpected response shape.
    InvalidResponse,
    /// Calendar or event not found (404/410).
    NotFound,
    /// The provider rejected the request (400).
    BadRequest,
}

impl AdapterErrorCode {
    /// Returns true if this error is transient and the operation may be
    /// retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::ServerError
        )
    }

    /// Returns a stable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
        }
    }
}

impl fmt::Display for AdapterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from a provider adapter.
///
/// Carries the provider tag and the failing operation name so the facade can
/// report failures with full context before swallowing them.
#[derive(Debug, Error)]
pub struct AdapterError {
    code: AdapterErrorCode,
    message: String,
    provider: Option<Provider>,
    operation: Option<&'static str>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AdapterError {
    /// Creates a new adapter error with the given code and message.
    pub fn new(code: AdapterErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            operation: None,
            source: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::AuthenticationFailed, message)
    }

    /// Creates an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::AuthorizationFailed, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::NetworkError, message)
    }

    /// Creates a rate limit error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::RateLimited, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::ServerError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::InvalidResponse, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::NotFound, message)
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::BadRequest, message)
    }

    /// Tags this error with the provider and failing operation.
    pub fn with_context(mut self, provider: Provider, operation: &'static str) -> Self {
        self.provider = Some(provider);
        self.operation = Some(operation);
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> AdapterErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the provider tag, if set.
    pub fn provider(&self) -> Option<Provider> {
        self.provider
    }

    /// Returns the failing operation name, if set.
    pub fn operation(&self) -> Option<&'static str> {
        self.operation
    }

    /// Returns true if this error is transient and may be retried.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.provider, self.operation) {
            (Some(provider), Some(operation)) => write!(f, "[{provider}/{operation}] ")?,
            (Some(provider), None) => write!(f, "[{provider}] ")?,
            _ => {}
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_retryability() {
        assert!(AdapterErrorCode::NetworkError.is_retryable());
        assert!(AdapterErrorCode::RateLimited.is_retryable());
        assert!(AdapterErrorCode::ServerError.is_retryable());
        assert!(!AdapterErrorCode::AuthenticationFailed.is_retryable());
        assert!(!AdapterErrorCode::NotFound.is_retryable());
        assert!(!AdapterErrorCode::BadRequest.is_retryable());
    }

    #[test]
    fn error_creation() {
        let err = AdapterError::authentication("token expired");
        assert_eq!(err.code(), AdapterErrorCode::AuthenticationFailed);
        assert_eq!(err.message(), "token expired");
        assert!(err.provider().is_none());
        assert!(!err.is_retryable());
    }

    #[test]
    fn error_context() {
        let err = AdapterError::not_found("event gone")
            .with_context(Provider::Google, crate::op::DELETE_EVENT);
        assert_eq!(err.provider(), Some(Provider::Google));
        assert_eq!(err.operation(), Some("delete_event"));
    }

    #[test]
    fn display_includes_context() {
        let err = AdapterError::rate_limited("too many requests")
            .with_context(Provider::Outlook, crate::op::GET_FREE_BUSY);
        let rendered = err.to_string();
        assert!(rendered.contains("[outlook/get_free_busy]"));
        assert!(rendered.contains("rate_limited"));
        assert!(rendered.contains("too many requests"));
    }

    #[test]
    fn error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("connection reset");
        let err = AdapterError::network("request failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
