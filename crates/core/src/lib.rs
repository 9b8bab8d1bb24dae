//! Core preview logic for opengraph-rs.
//!
//! Fetches pages, extracts their Open Graph metadata (with a plain meta tag
//! fallback), enriches Bitchute pages with playable video data, and caches
//! the results.

pub mod services;

pub use services::*;
