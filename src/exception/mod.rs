//! Error taxonomy and translation into HTTP responses.
//!
//! Everything that can go wrong while serving a request is funnelled into a
//! [`RaisedError`], and an [`ExceptionFilter`] turns it into exactly one
//! [`Translation`]. The default filter is [`http::ErrorTranslator`].

use crate::common::Translation;
use crate::context::RequestContext;
use crate::guard::GuardError;
use crate::pipe::PipeError;
use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use std::error::Error;
use std::io;
use std::sync::Arc;

pub mod domain;
pub mod external;
pub mod http;
pub mod layer;
pub mod prep;
pub mod status;

pub use domain::{DomainError, DomainKind, codes};
pub use external::{AccessDeniedError, ArgumentTypeMismatch, InvalidGrantError, InvalidTokenError};
pub use prep::{PrepError, PrepKind};
pub use status::{ErrorKind, StatusRegistry, StatusRegistryBuilder};

/// Shared, type-erased error kept as the cause of a wrapping error.
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// Message shown to clients whenever an error has no declared status.
pub const DEFAULT_GLOBAL_MESSAGE: &str =
    "An unexpected error occurred. Please contact your administrator.";

/// The ExceptionFilter trait
///
/// Filters handle errors thrown during request processing.
/// They must always produce a translation and never fail themselves.
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Catch an opaque error and translate it
    fn catch(&self, error: Box<dyn Error + Send + Sync>, ctx: &RequestContext) -> Translation;
}

/// Any error that crossed the translator boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RaisedError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Prep(#[from] PrepError),

    #[error(transparent)]
    AccessDenied(#[from] AccessDeniedError),

    #[error(transparent)]
    InvalidToken(#[from] InvalidTokenError),

    #[error(transparent)]
    InvalidGrant(#[from] InvalidGrantError),

    #[error(transparent)]
    ArgumentTypeMismatch(#[from] ArgumentTypeMismatch),

    #[error(transparent)]
    Io(Arc<io::Error>),

    #[error(transparent)]
    Unknown(Cause),
}

impl RaisedError {
    pub fn unknown<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::Unknown(Arc::new(error))
    }

    /// Recover the concrete error kind from a boxed error.
    ///
    /// Types the translator does not recognise become [`RaisedError::Unknown`].
    pub fn from_boxed(error: Box<dyn Error + Send + Sync>) -> Self {
        let error = match error.downcast::<RaisedError>() {
            Ok(raised) => return *raised,
            Err(other) => other,
        };
        let error = match error.downcast::<DomainError>() {
            Ok(e) => return Self::Domain(*e),
            Err(other) => other,
        };
        let error = match error.downcast::<PrepError>() {
            Ok(e) => return Self::Prep(*e),
            Err(other) => other,
        };
        let error = match error.downcast::<AccessDeniedError>() {
            Ok(e) => return Self::AccessDenied(*e),
            Err(other) => other,
        };
        let error = match error.downcast::<InvalidTokenError>() {
            Ok(e) => return Self::InvalidToken(*e),
            Err(other) => other,
        };
        let error = match error.downcast::<InvalidGrantError>() {
            Ok(e) => return Self::InvalidGrant(*e),
            Err(other) => other,
        };
        let error = match error.downcast::<ArgumentTypeMismatch>() {
            Ok(e) => return Self::ArgumentTypeMismatch(*e),
            Err(other) => other,
        };
        let error = match error.downcast::<io::Error>() {
            Ok(e) => return Self::Io(Arc::new(*e)),
            Err(other) => other,
        };
        let error = match error.downcast::<GuardError>() {
            Ok(e) => return Self::from(*e),
            Err(other) => other,
        };
        let error = match error.downcast::<PipeError>() {
            Ok(e) => return Self::from(*e),
            Err(other) => other,
        };
        let error = match error.downcast::<PathRejection>() {
            Ok(e) => return Self::from(*e),
            Err(other) => other,
        };
        let error = match error.downcast::<QueryRejection>() {
            Ok(e) => return Self::from(*e),
            Err(other) => other,
        };
        let error = match error.downcast::<JsonRejection>() {
            Ok(e) => return Self::from(*e),
            Err(other) => other,
        };
        match error.downcast::<FormRejection>() {
            Ok(e) => Self::from(*e),
            Err(other) => Self::Unknown(Arc::from(other)),
        }
    }
}

impl From<io::Error> for RaisedError {
    fn from(err: io::Error) -> Self {
        RaisedError::Io(Arc::new(err))
    }
}

impl From<anyhow::Error> for RaisedError {
    fn from(err: anyhow::Error) -> Self {
        let boxed: Box<dyn Error + Send + Sync> = err.into();
        RaisedError::Unknown(Arc::from(boxed))
    }
}

impl From<GuardError> for RaisedError {
    fn from(err: GuardError) -> Self {
        let message = match &err {
            GuardError::Forbidden(message) | GuardError::Unauthorized(message) => message.clone(),
        };
        if matches!(err, GuardError::Forbidden(_)) {
            AccessDeniedError::new(message).with_source(err).into()
        } else {
            InvalidTokenError::new(message).with_source(err).into()
        }
    }
}

impl From<PipeError> for RaisedError {
    fn from(err: PipeError) -> Self {
        if matches!(err, PipeError::Internal(_)) {
            return RaisedError::unknown(err);
        }
        let message = match &err {
            PipeError::Validation(message)
            | PipeError::Transformation(message)
            | PipeError::Internal(message) => message.clone(),
        };
        ArgumentTypeMismatch::new(message).with_source(err).into()
    }
}

impl From<PathRejection> for RaisedError {
    fn from(rejection: PathRejection) -> Self {
        ArgumentTypeMismatch::new(rejection.body_text())
            .with_parameter("path")
            .with_source(rejection)
            .into()
    }
}

impl From<QueryRejection> for RaisedError {
    fn from(rejection: QueryRejection) -> Self {
        ArgumentTypeMismatch::new(rejection.body_text())
            .with_parameter("query")
            .with_source(rejection)
            .into()
    }
}

/// Body rejections: a refused content type answers 415, an unreadable body
/// is a bad argument like any other.
impl From<JsonRejection> for RaisedError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
            return DomainError::unsupported_media_type(message, rejection).into();
        }
        ArgumentTypeMismatch::new(message)
            .with_parameter("body")
            .with_source(rejection)
            .into()
    }
}

impl From<FormRejection> for RaisedError {
    fn from(rejection: FormRejection) -> Self {
        let message = rejection.body_text();
        if matches!(rejection, FormRejection::InvalidFormContentType(_)) {
            return DomainError::unsupported_media_type(message, rejection).into();
        }
        ArgumentTypeMismatch::new(message)
            .with_parameter("body")
            .with_source(rejection)
            .into()
    }
}

/// Message of the innermost error in `error`'s source chain.
pub fn root_cause_message(error: &(dyn Error + 'static)) -> String {
    let mut root = error;
    while let Some(source) = root.source() {
        root = source;
    }
    root.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer(#[source] io::Error);

    #[test]
    fn test_root_cause_message_walks_chain() {
        let err = Outer(io::Error::other("disk on fire"));
        assert_eq!(root_cause_message(&err), "disk on fire");
    }

    #[test]
    fn test_root_cause_of_leaf_is_itself() {
        let err = DomainError::new(DomainKind::BadRequest, Some("E100"), "Invalid input");
        assert_eq!(root_cause_message(&err), "Invalid input");
    }

    #[test]
    fn test_from_boxed_recovers_known_types() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(io::Error::other("x"));
        assert!(matches!(RaisedError::from_boxed(boxed), RaisedError::Io(_)));

        let boxed: Box<dyn Error + Send + Sync> =
            Box::new(GuardError::Forbidden("admins only".into()));
        assert!(matches!(
            RaisedError::from_boxed(boxed),
            RaisedError::AccessDenied(_)
        ));

        let boxed: Box<dyn Error + Send + Sync> =
            Box::new(GuardError::Unauthorized("token expired".into()));
        assert!(matches!(
            RaisedError::from_boxed(boxed),
            RaisedError::InvalidToken(_)
        ));

        let boxed: Box<dyn Error + Send + Sync> =
            Box::new(RaisedError::from(PrepError::new(PrepKind::Transform, "msg.dp.alert.bad.rule")));
        assert!(matches!(RaisedError::from_boxed(boxed), RaisedError::Prep(_)));
    }

    #[test]
    fn test_from_boxed_falls_back_to_unknown() {
        let boxed: Box<dyn Error + Send + Sync> = "plain string error".into();
        match RaisedError::from_boxed(boxed) {
            RaisedError::Unknown(cause) => assert_eq!(cause.to_string(), "plain string error"),
            other => panic!("expected unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_pipe_errors_become_type_mismatch() {
        let raised = RaisedError::from(PipeError::Validation("Invalid integer: 'abc'".into()));
        assert!(matches!(raised, RaisedError::ArgumentTypeMismatch(_)));

        let raised = RaisedError::from(PipeError::Internal("pipe crashed".into()));
        assert!(matches!(raised, RaisedError::Unknown(_)));
    }

    #[test]
    fn test_body_rejections_split_on_content_type() {
        use axum::extract::rejection::MissingJsonContentType;

        let raised = RaisedError::from(JsonRejection::from(MissingJsonContentType::default()));
        match raised {
            RaisedError::Domain(err) => {
                assert_eq!(err.kind, DomainKind::UnsupportedMediaType);
                assert_eq!(err.code.as_deref(), Some(codes::UNSUPPORTED_MEDIA_TYPE));
            }
            other => panic!("expected domain error, got {other:?}"),
        }

        let boxed: Box<dyn Error + Send + Sync> =
            Box::new(JsonRejection::from(MissingJsonContentType::default()));
        assert!(matches!(RaisedError::from_boxed(boxed), RaisedError::Domain(_)));
    }

    #[test]
    fn test_anyhow_keeps_message() {
        let raised = RaisedError::from(anyhow::anyhow!("NullPointer at line 12"));
        assert_eq!(root_cause_message(&raised), "NullPointer at line 12");
    }
}
