//! Preview services.

pub mod bitchute;
pub mod cache;
pub mod fetcher;
pub mod meta_tags;
pub mod opengraph;
pub mod preview;

pub use bitchute::{BitchuteEnricher, EnrichedMetadata, VideoRef};
pub use cache::PreviewCache;
pub use fetcher::PageFetcher;
pub use meta_tags::extract_meta_tags;
pub use opengraph::{
    MetadataMap, REQUIRED_PROPERTIES, extract_opengraph, missing_required_properties,
};
pub use preview::{ParseQuery, PreviewPayload, PreviewService};
