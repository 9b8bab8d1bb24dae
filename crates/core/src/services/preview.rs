//! Preview orchestration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use opengraph_common::{AppError, AppResult, Config, FetchConfig};

use super::bitchute::{BitchuteEnricher, EnrichedMetadata};
use super::cache::PreviewCache;
use super::fetcher::PageFetcher;
use super::meta_tags::extract_meta_tags;
use super::opengraph::{MetadataMap, extract_opengraph, missing_required_properties};

/// Query parameters accepted by the parse endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseQuery {
    /// Page URL to preview.
    pub url: String,
    /// Overrides the configured `User-Agent` for the page fetch.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// When set, pages missing required Open Graph properties are logged.
    #[serde(default = "default_true")]
    pub validate: bool,
    /// Overrides the configured whole-request timeout.
    #[serde(default)]
    pub timeout_in_milliseconds: Option<u64>,
    /// Enables video enrichment for Bitchute pages.
    #[serde(default)]
    pub bitchute: bool,
}

const fn default_true() -> bool {
    true
}

/// Response payload of the parse endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PreviewPayload {
    /// Flat metadata map, served when enrichment is off.
    Plain(MetadataMap),
    /// Metadata with video data, served when enrichment is on.
    Enriched(Box<EnrichedMetadata>),
}

/// Produces link previews.
#[derive(Clone)]
pub struct PreviewService {
    fetcher: PageFetcher,
    enricher: BitchuteEnricher,
    cache: PreviewCache,
    fetch_defaults: FetchConfig,
}

impl PreviewService {
    /// Create a preview service from application configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            fetcher: PageFetcher::new(),
            enricher: BitchuteEnricher::new(config.bitchute.clone()),
            cache: PreviewCache::new(Duration::from_secs(config.cache.ttl_secs)),
            fetch_defaults: config.fetch.clone(),
        }
    }

    /// Create a cache key from request parameters.
    ///
    /// Plain and enriched payloads for the same page are cached separately.
    fn cache_key(url: &str, bitchute: bool) -> String {
        if bitchute {
            format!("preview:bitchute:{url}")
        } else {
            format!("preview:{url}")
        }
    }

    /// Produce the preview payload for a request.
    ///
    /// Served from cache when possible; a fresh result is cached before it
    /// is returned.
    pub async fn preview(&self, query: ParseQuery) -> AppResult<PreviewPayload> {
        let cache_key = Self::cache_key(&query.url, query.bitchute);

        if let Some(cached) = self.cache.get(&cache_key).await {
            tracing::debug!(url = %query.url, "Serving preview from cache");
            return Ok(cached);
        }

        let url = Url::parse(&query.url).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

        let user_agent = query
            .user_agent
            .as_deref()
            .unwrap_or(&self.fetch_defaults.user_agent);
        let timeout = Duration::from_millis(
            query
                .timeout_in_milliseconds
                .unwrap_or(self.fetch_defaults.timeout_ms),
        );

        let html = self.fetcher.fetch(&url, user_agent, timeout).await?;

        let mut metadata = extract_opengraph(&html);
        if metadata.is_empty() {
            tracing::debug!(url = %url, "No Open Graph markup, falling back to meta tags");
            metadata = extract_meta_tags(&html);
        }

        if query.validate {
            let missing = missing_required_properties(&metadata);
            if !missing.is_empty() {
                tracing::debug!(url = %url, ?missing, "Page lacks required Open Graph properties");
            }
        }

        let payload = if query.bitchute {
            let enriched = self.enricher.enrich(&url, &html, metadata).await?;
            PreviewPayload::Enriched(Box::new(enriched))
        } else {
            PreviewPayload::Plain(metadata)
        };

        self.cache.insert(cache_key, payload.clone()).await;

        Ok(payload)
    }
}
