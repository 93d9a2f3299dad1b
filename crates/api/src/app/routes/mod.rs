pub mod notes;
pub mod system;

use axum::Router;

pub fn router() -> Router {
    Router::new().nest("/v1/notes", notes::router())
}
