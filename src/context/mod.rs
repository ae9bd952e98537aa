//! Per-request context handed to the translator.
//!
//! The in-flight query id is not kept in a global. The exception layer puts a
//! [`CurrentQuery`] slot into every request's extensions unless one is already
//! there. Request code records the id it starts, and the layer snapshots it
//! into a [`RequestContext`] when an error has to be translated.

use axum::{
    extract::FromRequestParts,
    extract::OriginalUri,
    http::{Request, StatusCode as HttpStatusCode, request::Parts},
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Read-only view of the request as seen by the translator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub uri: String,
    pub query_id: Option<String>,
}

impl RequestContext {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            query_id: None,
        }
    }

    pub fn with_query_id(mut self, query_id: impl Into<String>) -> Self {
        self.query_id = Some(query_id.into());
        self
    }

    /// Build from a request, reading its [`CurrentQuery`] slot if present.
    ///
    /// The path is the one the client asked for: nested routers strip their
    /// prefix from `uri()`, so [`OriginalUri`] wins when the router set it.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let path = match request.extensions().get::<OriginalUri>() {
            Some(OriginalUri(original)) => original.path(),
            None => request.uri().path(),
        };
        Self {
            uri: path.to_string(),
            query_id: request
                .extensions()
                .get::<CurrentQuery>()
                .and_then(CurrentQuery::get),
        }
    }

    /// The query id, if one is set and non-empty.
    pub fn active_query_id(&self) -> Option<&str> {
        self.query_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Request-scoped slot holding the id of the query the handler is running.
///
/// Clones share the same slot, so the copy taken by a handler and the copy
/// kept by the exception layer see the same value.
#[derive(Debug, Clone, Default)]
pub struct CurrentQuery {
    slot: Arc<RwLock<Option<String>>>,
}

impl CurrentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, query_id: impl Into<String>) {
        *self.slot.write() = Some(query_id.into());
    }

    pub fn clear(&self) {
        *self.slot.write() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.slot.read().clone()
    }
}

impl<S> FromRequestParts<S> for CurrentQuery
where
    S: Send + Sync,
{
    type Rejection = (HttpStatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentQuery>().cloned().ok_or_else(|| {
            (
                HttpStatusCode::INTERNAL_SERVER_ERROR,
                "CurrentQuery is unavailable: ExceptionLayer is not installed".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_clones_share_slot() {
        let query = CurrentQuery::new();
        let handle = query.clone();
        handle.set("q-1");
        assert_eq!(query.get().as_deref(), Some("q-1"));
        query.clear();
        assert_eq!(handle.get(), None);
    }

    #[test]
    fn test_from_request_reads_path_and_slot() {
        let query = CurrentQuery::new();
        let mut request = Request::builder()
            .uri("/api/datasources/7?projection=full")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(query.clone());
        query.set("q-42");

        let ctx = RequestContext::from_request(&request);
        assert_eq!(ctx.uri, "/api/datasources/7");
        assert_eq!(ctx.active_query_id(), Some("q-42"));
    }

    #[test]
    fn test_from_request_prefers_original_uri() {
        let mut request = Request::builder()
            .uri("/users")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(OriginalUri("/api/users?page=2".parse().unwrap()));

        let ctx = RequestContext::from_request(&request);
        assert_eq!(ctx.uri, "/api/users");
    }

    #[test]
    fn test_empty_query_id_is_not_active() {
        let ctx = RequestContext::new("/x").with_query_id("");
        assert_eq!(ctx.active_query_id(), None);
    }
}
