use crate::common::{ErrorResponse, Translation};
use crate::context::{CurrentQuery, RequestContext};
use crate::exception::http::ErrorTranslator;
use crate::exception::{DEFAULT_GLOBAL_MESSAGE, ExceptionFilter, RaisedError};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};

/// Marker carried in a response's extensions by a handler that returned a
/// [`RaisedError`].
#[derive(Clone)]
struct CaughtError(RaisedError);

impl IntoResponse for RaisedError {
    /// Without an [`ExceptionLayer`] this is a bare 500 with the default
    /// message. With one, the layer replaces it with the real translation.
    fn into_response(self) -> Response {
        let mut response = Translation::Respond {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse::new(None, DEFAULT_GLOBAL_MESSAGE, ""),
        }
        .into_response();
        response.extensions_mut().insert(CaughtError(self));
        response
    }
}

/// Tower Layer that translates every error escaping the wrapped service.
///
/// Handles both handlers returning `Err(RaisedError)` and inner services
/// failing with an error of their own, so the resulting service never fails
/// and can be installed with `Router::layer`.
///
/// # Example
/// ```rust,no_run
/// use faultline::exception::layer::ExceptionLayer;
/// use faultline::exception::http::ErrorTranslator;
/// use axum::{Router, routing::get};
/// use std::sync::Arc;
///
/// let app: Router = Router::new()
///     .route("/health", get(|| async { "ok" }))
///     .layer(ExceptionLayer::new(Arc::new(ErrorTranslator::default())));
/// ```
#[derive(Clone)]
pub struct ExceptionLayer {
    translator: Arc<ErrorTranslator>,
}

impl ExceptionLayer {
    pub fn new(translator: Arc<ErrorTranslator>) -> Self {
        Self { translator }
    }
}

impl<S> Layer<S> for ExceptionLayer {
    type Service = ExceptionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionMiddleware {
            inner,
            translator: self.translator.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ExceptionMiddleware<S> {
    inner: S,
    translator: Arc<ErrorTranslator>,
}

impl<S> Service<Request<Body>> for ExceptionMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness is awaited per call so its errors get translated too.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let translator = self.translator.clone();
        let mut inner = self.inner.clone();

        // A slot installed further out may already hold the query id.
        let query = match request.extensions().get::<CurrentQuery>() {
            Some(existing) => existing.clone(),
            None => {
                let fresh = CurrentQuery::new();
                request.extensions_mut().insert(fresh.clone());
                fresh
            }
        };
        let mut ctx = RequestContext::from_request(&request);

        Box::pin(async move {
            let outcome = match ServiceExt::<Request<Body>>::ready(&mut inner).await {
                Ok(service) => service.call(request).await,
                Err(e) => Err(e),
            };

            // The handler may have recorded its query while running.
            ctx.query_id = query.get();

            let translation = match outcome {
                Ok(mut response) => match response.extensions_mut().remove::<CaughtError>() {
                    Some(CaughtError(raised)) => translator.translate(&raised, &ctx),
                    None => return Ok(response),
                },
                Err(e) => translator.catch(e.into(), &ctx),
            };

            Ok(translation.into_response())
        })
    }
}
