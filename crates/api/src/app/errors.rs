use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

/// Body shape shared by every non-2xx response.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "message": message.into(),
        })),
    )
        .into_response()
}
