//! HTTP API layer for opengraph-rs.
//!
//! Exposes the preview endpoint:
//!
//! - `GET /opengraph/parse` parses a page into preview metadata
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod state;

pub use endpoints::router;
pub use state::AppState;
