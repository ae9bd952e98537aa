use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Uniform error payload written back to clients.
///
/// `code` is the stable application code and serializes as `null` when the
/// error has none. `details` carries the root-cause message and may be
/// diagnostic.
///
/// # Example
/// ```
/// use faultline::common::ErrorResponse;
///
/// let body = ErrorResponse::new(Some("E100".into()), "Invalid input", "Invalid input");
/// let json = serde_json::to_string(&body).unwrap();
/// assert_eq!(json, r#"{"code":"E100","message":"Invalid input","details":"Invalid input"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: Option<String>,
    pub message: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn new(
        code: Option<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: details.into(),
        }
    }

    /// The code as it appears in log lines: empty when absent.
    pub fn code_or_empty(&self) -> &str {
        self.code.as_deref().unwrap_or("")
    }
}

/// Outcome of translating one raised error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Write `body` back with `status` and no extra headers.
    Respond {
        status: StatusCode,
        body: ErrorResponse,
    },
    /// The client is gone; nothing must be written.
    Suppressed,
}

impl Translation {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Translation::Respond { status, .. } => Some(*status),
            Translation::Suppressed => None,
        }
    }

    pub fn body(&self) -> Option<&ErrorResponse> {
        match self {
            Translation::Respond { body, .. } => Some(body),
            Translation::Suppressed => None,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Translation::Suppressed)
    }
}

impl IntoResponse for Translation {
    fn into_response(self) -> Response {
        match self {
            Translation::Respond { status, body } => (status, Json(body)).into_response(),
            // The transport is already closed, so the status only matters to
            // whatever sits between us and the socket.
            Translation::Suppressed => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_missing_code_serializes_as_null() {
        let body = ErrorResponse::new(None, "boom", "root");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["code"], serde_json::Value::Null);
        assert_eq!(body.code_or_empty(), "");
    }

    #[tokio::test]
    async fn test_respond_writes_status_and_json() {
        let translation = Translation::Respond {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse::new(Some("E100".into()), "Invalid input", "Invalid input"),
        };
        let response = translation.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code.as_deref(), Some("E100"));
    }

    #[tokio::test]
    async fn test_suppressed_writes_no_body() {
        let response = Translation::Suppressed.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }
}
