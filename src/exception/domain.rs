use crate::exception::{
    AccessDeniedError, ArgumentTypeMismatch, Cause, ErrorKind, InvalidGrantError,
    InvalidTokenError,
};
use std::error::Error;
use std::sync::Arc;

/// Stable application codes carried by the built-in domain errors.
pub mod codes {
    pub const BAD_REQUEST: &str = "GB0001";
    pub const AUTHENTICATION: &str = "GB0002";
    pub const ACCESS_DENIED: &str = "GB0003";
    pub const INVALID_TOKEN: &str = "GB0004";
    pub const RESOURCE_NOT_FOUND: &str = "GB0005";
    pub const UNSUPPORTED_MEDIA_TYPE: &str = "GB0006";
}

/// Discriminant used to look up a domain error's declared status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainKind {
    BadRequest,
    Authentication,
    AccessDenied,
    InvalidToken,
    ResourceNotFound,
    UnsupportedMediaType,
    UnknownServer,
    /// Application-defined kind; declare its status in the registry.
    Custom(String),
}

/// An application error carrying a stable code and a client-facing message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct DomainError {
    pub kind: DomainKind,
    pub code: Option<String>,
    pub message: String,
    #[source]
    pub cause: Option<Cause>,
}

impl DomainError {
    pub fn new(kind: DomainKind, code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.map(str::to_string),
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn with_shared_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn error_kind(&self) -> ErrorKind {
        ErrorKind::Domain(self.kind.clone())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            DomainKind::ResourceNotFound,
            Some(codes::RESOURCE_NOT_FOUND),
            message,
        )
    }

    /// Wrap a security-layer access rejection.
    pub fn access_denied(err: AccessDeniedError) -> Self {
        Self::new(
            DomainKind::AccessDenied,
            Some(codes::ACCESS_DENIED),
            err.message.clone(),
        )
        .with_cause(err)
    }

    /// Wrap a rejected bearer token.
    pub fn invalid_token(err: InvalidTokenError) -> Self {
        Self::new(
            DomainKind::InvalidToken,
            Some(codes::INVALID_TOKEN),
            err.message.clone(),
        )
        .with_cause(err)
    }

    /// Wrap a failed credential grant.
    pub fn authentication(err: InvalidGrantError) -> Self {
        Self::new(
            DomainKind::Authentication,
            Some(codes::AUTHENTICATION),
            err.message.clone(),
        )
        .with_cause(err)
    }

    /// Wrap a request argument that could not be converted.
    pub fn bad_request(err: ArgumentTypeMismatch) -> Self {
        Self::new(
            DomainKind::BadRequest,
            Some(codes::BAD_REQUEST),
            err.message.clone(),
        )
        .with_cause(err)
    }

    /// Wrap a request body sent with a content type the extractor refuses.
    pub fn unsupported_media_type<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::new(
            DomainKind::UnsupportedMediaType,
            Some(codes::UNSUPPORTED_MEDIA_TYPE),
            message,
        )
        .with_cause(cause)
    }

    /// Wrap anything the translator has no specific rule for. The result has
    /// no code.
    pub fn unknown_server(cause: Cause) -> Self {
        Self::new(DomainKind::UnknownServer, None, cause.to_string()).with_shared_cause(cause)
    }
}
