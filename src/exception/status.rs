//! Declared HTTP statuses per error kind.

use crate::exception::{DomainKind, PrepKind};
use axum::http::StatusCode;
use std::collections::HashMap;

/// Registry key: the discriminant of a domain or pipeline error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Domain(DomainKind),
    Prep(PrepKind),
}

impl From<DomainKind> for ErrorKind {
    fn from(kind: DomainKind) -> Self {
        ErrorKind::Domain(kind)
    }
}

impl From<PrepKind> for ErrorKind {
    fn from(kind: PrepKind) -> Self {
        ErrorKind::Prep(kind)
    }
}

/// Exact-match mapping from error kind to declared status.
///
/// A kind with no entry has no declared status: the translator answers 500
/// with the default message. Built once at startup and read-only afterwards.
///
/// # Example
/// ```
/// use faultline::exception::{DomainKind, StatusRegistry};
/// use axum::http::StatusCode;
///
/// let registry = StatusRegistry::builder()
///     .with_defaults()
///     .declare(DomainKind::Custom("quota".into()), StatusCode::TOO_MANY_REQUESTS)
///     .build();
///
/// assert_eq!(
///     registry.lookup(&DomainKind::Custom("quota".into()).into()),
///     Some(StatusCode::TOO_MANY_REQUESTS)
/// );
/// assert_eq!(registry.lookup(&DomainKind::UnknownServer.into()), None);
/// ```
#[derive(Debug, Clone)]
pub struct StatusRegistry {
    statuses: HashMap<ErrorKind, StatusCode>,
}

impl StatusRegistry {
    pub fn builder() -> StatusRegistryBuilder {
        StatusRegistryBuilder::new()
    }

    /// A registry with no declarations: every error answers 500.
    pub fn empty() -> Self {
        Self {
            statuses: HashMap::new(),
        }
    }

    pub fn lookup(&self, kind: &ErrorKind) -> Option<StatusCode> {
        self.statuses.get(kind).copied()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::builder().with_defaults().build()
    }
}

/// Builder for [`StatusRegistry`]
pub struct StatusRegistryBuilder {
    statuses: HashMap<ErrorKind, StatusCode>,
}

impl StatusRegistryBuilder {
    pub fn new() -> Self {
        Self {
            statuses: HashMap::new(),
        }
    }

    /// Declare the statuses of the built-in kinds.
    pub fn with_defaults(self) -> Self {
        self.declare(DomainKind::BadRequest, StatusCode::BAD_REQUEST)
            .declare(DomainKind::Authentication, StatusCode::UNAUTHORIZED)
            .declare(DomainKind::InvalidToken, StatusCode::UNAUTHORIZED)
            .declare(DomainKind::AccessDenied, StatusCode::FORBIDDEN)
            .declare(DomainKind::ResourceNotFound, StatusCode::NOT_FOUND)
            .declare(DomainKind::UnsupportedMediaType, StatusCode::UNSUPPORTED_MEDIA_TYPE)
            .declare(PrepKind::Configuration, StatusCode::BAD_REQUEST)
            .declare(PrepKind::Transform, StatusCode::BAD_REQUEST)
    }

    /// Declare (or override) the status of `kind`.
    pub fn declare(mut self, kind: impl Into<ErrorKind>, status: StatusCode) -> Self {
        self.statuses.insert(kind.into(), status);
        self
    }

    /// Remove a declaration so the kind falls back to 500.
    pub fn undeclare(mut self, kind: impl Into<ErrorKind>) -> Self {
        self.statuses.remove(&kind.into());
        self
    }

    pub fn build(self) -> StatusRegistry {
        StatusRegistry {
            statuses: self.statuses,
        }
    }
}

impl Default for StatusRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = StatusRegistry::default();
        assert_eq!(
            registry.lookup(&DomainKind::AccessDenied.into()),
            Some(StatusCode::FORBIDDEN)
        );
        assert_eq!(
            registry.lookup(&PrepKind::Configuration.into()),
            Some(StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            registry.lookup(&DomainKind::UnsupportedMediaType.into()),
            Some(StatusCode::UNSUPPORTED_MEDIA_TYPE)
        );
        assert_eq!(registry.lookup(&DomainKind::UnknownServer.into()), None);
        assert_eq!(registry.lookup(&PrepKind::Datasource.into()), None);
    }

    #[test]
    fn test_override_and_undeclare() {
        let registry = StatusRegistry::builder()
            .with_defaults()
            .declare(DomainKind::BadRequest, StatusCode::UNPROCESSABLE_ENTITY)
            .undeclare(DomainKind::ResourceNotFound)
            .build();
        assert_eq!(
            registry.lookup(&DomainKind::BadRequest.into()),
            Some(StatusCode::UNPROCESSABLE_ENTITY)
        );
        assert_eq!(registry.lookup(&DomainKind::ResourceNotFound.into()), None);
    }

    #[test]
    fn test_custom_kinds_match_exactly() {
        let registry = StatusRegistry::builder()
            .declare(DomainKind::Custom("quota".into()), StatusCode::TOO_MANY_REQUESTS)
            .build();
        assert_eq!(
            registry.lookup(&DomainKind::Custom("quota".into()).into()),
            Some(StatusCode::TOO_MANY_REQUESTS)
        );
        assert_eq!(registry.lookup(&DomainKind::Custom("Quota".into()).into()), None);
        assert!(StatusRegistry::empty().is_empty());
    }
}
