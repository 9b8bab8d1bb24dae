//! API endpoints.

mod opengraph;

use axum::Router;

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new().nest("/opengraph", opengraph::router())
}
