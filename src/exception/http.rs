use crate::common::{ErrorResponse, Translation};
use crate::config::TranslatorConfig;
use crate::context::RequestContext;
use crate::exception::{
    AccessDeniedError, ArgumentTypeMismatch, Cause, DEFAULT_GLOBAL_MESSAGE, DomainError,
    ExceptionFilter, InvalidGrantError, InvalidTokenError, PrepError, RaisedError,
    StatusRegistry, root_cause_message,
};
use crate::query::{NoopQueryCanceller, QueryCanceller, spawn_cancel};
use axum::http::StatusCode;
use std::error::Error;
use std::fmt::Write as _;
use std::io;
use std::sync::Arc;

const BROKEN_PIPE: &str = "broken pipe";

/// Translates errors raised during request handling into responses.
///
/// Every translation that produces a body is logged exactly once as
/// `[API:<uri>] <code> <message>: <details>`. A client disconnect produces
/// [`Translation::Suppressed`] and cancels the request's in-flight query.
///
/// # Example
/// ```
/// use faultline::context::RequestContext;
/// use faultline::exception::{DomainError, DomainKind, RaisedError};
/// use faultline::exception::http::ErrorTranslator;
/// use axum::http::StatusCode;
///
/// let translator = ErrorTranslator::default();
/// let ctx = RequestContext::new("/api/workbooks");
/// let err = RaisedError::from(DomainError::new(DomainKind::BadRequest, Some("E100"), "Invalid input"));
///
/// let translation = translator.translate(&err, &ctx);
/// assert_eq!(translation.status(), Some(StatusCode::BAD_REQUEST));
/// assert_eq!(translation.body().unwrap().details, "Invalid input");
/// ```
pub struct ErrorTranslator {
    canceller: Arc<dyn QueryCanceller>,
    registry: StatusRegistry,
    config: TranslatorConfig,
}

impl ErrorTranslator {
    pub fn new(canceller: Arc<dyn QueryCanceller>) -> Self {
        Self {
            canceller,
            registry: StatusRegistry::default(),
            config: TranslatorConfig::default(),
        }
    }

    pub fn with_registry(mut self, registry: StatusRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_config(mut self, config: TranslatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &StatusRegistry {
        &self.registry
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Classify `error` and dispatch it to the matching handler.
    pub fn translate(&self, error: &RaisedError, ctx: &RequestContext) -> Translation {
        match error {
            RaisedError::Domain(e) => self.handle_domain(e, ctx),
            RaisedError::Prep(e) => self.handle_prep(e, ctx),
            RaisedError::AccessDenied(e) => self.handle_access_denied(e.clone(), ctx),
            RaisedError::InvalidToken(e) => self.handle_invalid_token(e.clone(), ctx),
            RaisedError::InvalidGrant(e) => self.handle_invalid_grant(e.clone(), ctx),
            RaisedError::ArgumentTypeMismatch(e) => self.handle_type_mismatch(e.clone(), ctx),
            RaisedError::Io(e) => self.handle_io(Arc::clone(e), ctx),
            RaisedError::Unknown(cause) => self.handle_all(Arc::clone(cause), ctx),
        }
    }

    /// I/O failures. A broken pipe means the client went away: cancel its
    /// query and write nothing. Anything else is an unknown server error.
    pub fn handle_io(&self, error: Arc<io::Error>, ctx: &RequestContext) -> Translation {
        let root = root_cause_message(&*error);
        if !root.to_lowercase().contains(BROKEN_PIPE) {
            return self.handle_all(error, ctx);
        }

        tracing::debug!("Client disconnected from {}: {}", ctx.uri, root);
        if let Some(query_id) = ctx.active_query_id() {
            if let Err(e) = spawn_cancel(Arc::clone(&self.canceller), query_id.to_string()) {
                tracing::warn!("Could not cancel query {} for {}: {}", query_id, ctx.uri, e);
            }
        }
        Translation::Suppressed
    }

    pub fn handle_domain(&self, error: &DomainError, ctx: &RequestContext) -> Translation {
        let details = root_cause_message(error);
        let (status, body) = match self.registry.lookup(&error.error_kind()) {
            Some(status) => (
                status,
                ErrorResponse::new(error.code.clone(), error.message.clone(), details),
            ),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(error.code.clone(), DEFAULT_GLOBAL_MESSAGE, details),
            ),
        };

        log_response(ctx, &body);
        if self.config.print_stack_trace {
            log_trace(ctx, error);
        }

        Translation::Respond { status, body }
    }

    pub fn handle_prep(&self, error: &PrepError, ctx: &RequestContext) -> Translation {
        let (status, body) = match self.registry.lookup(&error.error_kind()) {
            Some(status) => (
                status,
                ErrorResponse::new(
                    error.code.clone(),
                    error.message_key.clone(),
                    error.message_detail.clone().unwrap_or_default(),
                ),
            ),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(error.code.clone(), DEFAULT_GLOBAL_MESSAGE, error.message()),
            ),
        };

        log_response(ctx, &body);
        Translation::Respond { status, body }
    }

    pub fn handle_access_denied(
        &self,
        error: AccessDeniedError,
        ctx: &RequestContext,
    ) -> Translation {
        self.handle_domain(&DomainError::access_denied(error), ctx)
    }

    pub fn handle_invalid_token(
        &self,
        error: InvalidTokenError,
        ctx: &RequestContext,
    ) -> Translation {
        self.handle_domain(&DomainError::invalid_token(error), ctx)
    }

    pub fn handle_invalid_grant(
        &self,
        error: InvalidGrantError,
        ctx: &RequestContext,
    ) -> Translation {
        self.handle_domain(&DomainError::authentication(error), ctx)
    }

    pub fn handle_type_mismatch(
        &self,
        error: ArgumentTypeMismatch,
        ctx: &RequestContext,
    ) -> Translation {
        self.handle_domain(&DomainError::bad_request(error), ctx)
    }

    /// Catch-all: 500, no code, default message, original message in details.
    pub fn handle_all(&self, cause: Cause, ctx: &RequestContext) -> Translation {
        self.handle_domain(&DomainError::unknown_server(cause), ctx)
    }
}

impl Default for ErrorTranslator {
    fn default() -> Self {
        Self::new(Arc::new(NoopQueryCanceller))
    }
}

impl ExceptionFilter for ErrorTranslator {
    fn catch(&self, error: Box<dyn Error + Send + Sync>, ctx: &RequestContext) -> Translation {
        self.translate(&RaisedError::from_boxed(error), ctx)
    }
}

fn log_response(ctx: &RequestContext, body: &ErrorResponse) {
    tracing::error!(
        "[API:{}] {} {}: {}",
        ctx.uri,
        body.code_or_empty(),
        body.message,
        body.details
    );
}

fn log_trace(ctx: &RequestContext, error: &(dyn Error + 'static)) {
    let mut trace = format!("{:?}", error);
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(trace, "\n  caused by: {}", cause);
        source = cause.source();
    }
    tracing::error!("Trace for {}: {}", ctx.uri, trace);
}
