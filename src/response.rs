use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::{Value, json};

/// Transport-level response produced by a pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// JSON body
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn no_content() -> Self {
        Self::new(204, Value::Null)
    }

    /// Error body in the shape every error response uses
    pub fn error(status: u16, error_type: &str, error_message: &str, meta: Value) -> Self {
        Self::new(
            status,
            json!({
                "error_type": error_type,
                "error_message": error_message,
                "meta": meta,
            }),
        )
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.body.is_null() {
            status.into_response()
        } else {
            (status, Json(self.body)).into_response()
        }
    }
}
