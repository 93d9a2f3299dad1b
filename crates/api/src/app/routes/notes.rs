use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new().route("/:id", get(get_note))
}

/// Find a note by id.
pub async fn get_note(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    // Ids parse as unsigned and must fit the store's signed keys; anything
    // else is a client error, not a miss.
    let id = match id.parse::<u64>().ok().and_then(|v| i64::try_from(v).ok()) {
        Some(id) => id,
        None => return errors::json_error(StatusCode::BAD_REQUEST, "invalid id"),
    };

    match services.lookup.find(id).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "notes not found"),
        Err(err) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}
