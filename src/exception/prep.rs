use crate::exception::{Cause, ErrorKind};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Discriminant for data-preparation pipeline errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrepKind {
    Configuration,
    Datasource,
    Snapshot,
    Transform,
    Internal,
}

/// An error raised by the data-preparation pipeline.
///
/// Unlike [`DomainError`](crate::exception::DomainError) it carries a
/// localization key and an optional detail instead of a display message.
#[derive(Debug, Clone)]
pub struct PrepError {
    pub kind: PrepKind,
    pub code: Option<String>,
    pub message_key: String,
    pub message_detail: Option<String>,
    pub cause: Option<Cause>,
}

impl PrepError {
    pub fn new(kind: PrepKind, message_key: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message_key: message_key.into(),
            message_detail: None,
            cause: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.message_detail = Some(detail.into());
        self
    }

    pub fn with_cause<E: Error + Send + Sync + 'static>(mut self, cause: E) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// `"<key>: <detail>"`, or just the key when there is no detail.
    pub fn message(&self) -> String {
        match &self.message_detail {
            Some(detail) => format!("{}: {}", self.message_key, detail),
            None => self.message_key.clone(),
        }
    }

    pub fn error_kind(&self) -> ErrorKind {
        ErrorKind::Prep(self.kind)
    }
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl Error for PrepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}
