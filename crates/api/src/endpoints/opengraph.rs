//! Open Graph endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use opengraph_common::AppResult;
use opengraph_core::{ParseQuery, PreviewPayload};

use crate::state::AppState;

/// Parse a page into preview metadata.
async fn parse(
    State(state): State<AppState>,
    Query(query): Query<ParseQuery>,
) -> AppResult<Json<PreviewPayload>> {
    let payload = state.preview_service.preview(query).await?;
    Ok(Json(payload))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/parse", get(parse))
}
