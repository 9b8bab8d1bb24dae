//! Application state.

use opengraph_core::PreviewService;

/// State shared by all endpoints.
#[derive(Clone)]
pub struct AppState {
    /// Preview production, caching included.
    pub preview_service: PreviewService,
}
