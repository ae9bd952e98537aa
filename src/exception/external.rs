//! Errors raised by the security layer and the request extraction layer.
//!
//! None of these are domain errors. The translator wraps each one into the
//! equivalent [`DomainError`](crate::exception::DomainError) before shaping a
//! response.

use crate::exception::Cause;
use std::error::Error;
use std::sync::Arc;

/// The caller is authenticated but may not perform the operation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AccessDeniedError {
    pub message: String,
    #[source]
    pub source: Option<Cause>,
}

impl AccessDeniedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E: Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Arc::new(source));
        self
    }
}

/// The presented access token is malformed, expired or revoked.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct InvalidTokenError {
    pub message: String,
    #[source]
    pub source: Option<Cause>,
}

impl InvalidTokenError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E: Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Arc::new(source));
        self
    }
}

/// A credential grant (password, refresh token, auth code) was refused.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct InvalidGrantError {
    pub message: String,
    #[source]
    pub source: Option<Cause>,
}

impl InvalidGrantError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E: Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Arc::new(source));
        self
    }
}

/// A request argument could not be converted to the type the handler expects.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ArgumentTypeMismatch {
    pub parameter: Option<String>,
    pub message: String,
    #[source]
    pub source: Option<Cause>,
}

impl ArgumentTypeMismatch {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            parameter: None,
            message: message.into(),
            source: None,
        }
    }

    /// Describe a value that failed to convert.
    pub fn conversion(parameter: &str, value: &str, required_type: &str) -> Self {
        Self::new(format!(
            "Failed to convert value '{value}' of parameter '{parameter}' to required type '{required_type}'"
        ))
        .with_parameter(parameter)
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    pub fn with_source<E: Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Arc::new(source));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_message_names_parameter() {
        let err = ArgumentTypeMismatch::conversion("page", "abc", "i32");
        assert_eq!(err.parameter.as_deref(), Some("page"));
        assert_eq!(
            err.to_string(),
            "Failed to convert value 'abc' of parameter 'page' to required type 'i32'"
        );
    }

    #[test]
    fn test_source_is_exposed() {
        let err = InvalidGrantError::new("Bad credentials")
            .with_source(std::io::Error::other("ldap bind refused"));
        assert_eq!(err.source().unwrap().to_string(), "ldap bind refused");
    }
}
