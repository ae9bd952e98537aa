//! # Faultline
//!
//! Centralized error-to-response translation for axum services.
//!
//! Every error raised while handling a request, whether a domain error,
//! a data-preparation pipeline error, a security or extraction failure,
//! or something nobody anticipated, is turned into exactly one uniform
//! [`ErrorResponse`] with a status code, and logged once on the way out.
//! A client that hangs up mid-response gets nothing written back and its
//! in-flight query is cancelled.
//!
//! ## Features
//!
//! - **Explicit status registry**: error kinds map to HTTP statuses, undeclared kinds answer 500
//! - **Adapters**: security and extraction errors are wrapped into domain errors
//! - **Disconnect handling**: broken pipes suppress the response and cancel the running query
//! - **Tower integration**: [`ExceptionLayer`] translates handler and middleware errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use faultline::prelude::*;
//! use faultline::exception::DomainError;
//!
//! async fn find_workbook(
//!     query: CurrentQuery,
//!     Path(id): Path<u32>,
//! ) -> std::result::Result<String, RaisedError> {
//!     query.set(format!("workbook-{id}"));
//!     Err(DomainError::not_found(format!("Workbook {id} not found")).into())
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ConfigService::new();
//!     let translator = ErrorTranslator::new(Arc::new(NoopQueryCanceller))
//!         .with_config(TranslatorConfig::from_config(&config));
//!
//!     let app: Router = Router::new()
//!         .route("/workbooks/{id}", axum::routing::get(find_workbook))
//!         .layer(ExceptionLayer::new(Arc::new(translator)));
//!
//!     // Serve your app...
//! }
//! ```

pub mod common;
pub mod config;
pub mod context;
pub mod error;
pub mod exception;
pub mod guard;
pub mod pipe;
pub mod query;

#[cfg(test)]
mod test_support;

// Re-export core types
pub use common::{ErrorResponse, Translation};
pub use context::{CurrentQuery, RequestContext};
pub use error::{FaultlineError, Result};
pub use exception::http::ErrorTranslator;
pub use exception::layer::ExceptionLayer;
pub use exception::{DEFAULT_GLOBAL_MESSAGE, RaisedError};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use faultline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::{ErrorResponse, Translation};
    pub use crate::config::{ConfigService, TranslatorConfig};
    pub use crate::context::{CurrentQuery, RequestContext};
    pub use crate::error::{FaultlineError, Result};
    pub use crate::exception::http::ErrorTranslator;
    pub use crate::exception::layer::ExceptionLayer;
    pub use crate::exception::{
        DEFAULT_GLOBAL_MESSAGE, ErrorKind, ExceptionFilter, RaisedError, StatusRegistry,
    };
    pub use crate::guard::layer::GuardLayer;
    pub use crate::guard::{Guard, GuardError, GuardResult};
    pub use crate::pipe::builtins::*;
    pub use crate::pipe::{Pipe, PipeError, PipeResult};
    pub use crate::query::{NoopQueryCanceller, QueryCanceller};
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
