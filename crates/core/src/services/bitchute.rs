//! Video enrichment for Bitchute pages.
//!
//! A Bitchute page is scanned for playable video data in three steps: a
//! magnet link anchor, an inline `<video><source>` element, and finally
//! the media API keyed by the video id from the page URL or its canonical
//! link. A page where all three come up empty still previews fine; the
//! result then carries metadata only.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use opengraph_common::{AppError, AppResult, BitchuteConfig};

use super::opengraph::MetadataMap;

#[allow(clippy::unwrap_used)] // the CSS literal is valid
static MAGNET_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[title="Magnet Link"]"#).unwrap());

#[allow(clippy::unwrap_used)] // the CSS literal is valid
static VIDEO_SOURCE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("video > source").unwrap());

#[allow(clippy::unwrap_used)] // the CSS literal is valid
static CANONICAL_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel="canonical"]"#).unwrap());

/// Playable video reference assembled during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRef {
    /// Exact topic parameter of the magnet link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xt: Option<String>,
    /// Display name parameter of the magnet link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dn: Option<String>,
    /// Tracker parameter of the magnet link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tr: Option<String>,
    /// Video source URL. For a magnet link this is its `as` parameter.
    #[serde(rename = "as")]
    pub source: String,
    /// Exact source parameter of the magnet link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xs: Option<String>,
    /// Video title, taken from `og:title`.
    pub title: String,
    /// Preview image URL, taken from `og:image`.
    pub preview: String,
}

/// Metadata payload extended with video data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedMetadata {
    /// Metadata extracted from the page.
    pub og: MetadataMap,
    /// Playable video reference, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoRef>,
    /// Raw magnet link, when the page carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnet: Option<String>,
}

/// What a scan of the page markup turned up.
struct PageScan {
    magnet: Option<String>,
    inline_source: Option<String>,
    canonical_id: Option<String>,
}

/// Collect the video hints from the page in one pass.
fn scan_page(html: &str) -> PageScan {
    let document = Html::parse_document(html);

    let magnet = document
        .select(&MAGNET_ANCHOR)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .filter(|href| href.starts_with("magnet"))
        .map(ToString::to_string);

    let inline_source = document
        .select(&VIDEO_SOURCE)
        .next()
        .and_then(|source| source.value().attr("src"))
        .map(ToString::to_string);

    let canonical_id = document
        .select(&CANONICAL_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| Url::parse(href).ok())
        .and_then(|url| video_id_from_url(&url));

    PageScan {
        magnet,
        inline_source,
        canonical_id,
    }
}

/// Extract the video id from a `/video/<id>` path.
fn video_id_from_url(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    if segments.next() != Some("video") {
        return None;
    }
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
}

/// Split the parameters of a magnet link.
///
/// The last occurrence of a repeated name wins, and a parameter without a
/// value maps to an empty string.
fn magnet_parameters(link: &str) -> HashMap<&str, &str> {
    let query = link.find('?').map_or(link, |at| &link[at + 1..]);
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (name, value),
            None => (pair, ""),
        })
        .collect()
}

fn og_value(metadata: &MetadataMap, key: &str) -> String {
    metadata.get(key).cloned().unwrap_or_default()
}

/// Build a video reference from a magnet link.
///
/// All magnet parameter keys are reported, empty when the link lacks them.
fn magnet_video(link: &str, metadata: &MetadataMap) -> VideoRef {
    let parameters = magnet_parameters(link);
    let parameter = |name: &str| (*parameters.get(name).unwrap_or(&"")).to_string();

    VideoRef {
        xt: Some(parameter("xt")),
        dn: Some(parameter("dn")),
        tr: Some(parameter("tr")),
        source: parameter("as"),
        xs: Some(parameter("xs")),
        title: og_value(metadata, "og:title"),
        preview: og_value(metadata, "og:image"),
    }
}

/// Build a video reference around a direct source URL.
fn direct_video(source: String, metadata: &MetadataMap) -> VideoRef {
    VideoRef {
        xt: None,
        dn: None,
        tr: None,
        source,
        xs: None,
        title: og_value(metadata, "og:title"),
        preview: og_value(metadata, "og:image"),
    }
}

/// Enriches previews of Bitchute pages with playable video data.
#[derive(Clone)]
pub struct BitchuteEnricher {
    config: BitchuteConfig,
    http_client: reqwest::Client,
}

impl BitchuteEnricher {
    /// Create a new enricher.
    #[must_use]
    pub fn new(config: BitchuteConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Attach video data for `url` to the extracted metadata.
    pub async fn enrich(
        &self,
        url: &Url,
        html: &str,
        metadata: MetadataMap,
    ) -> AppResult<EnrichedMetadata> {
        let scan = scan_page(html);

        if let Some(magnet) = scan.magnet {
            tracing::debug!(url = %url, "Video data taken from magnet link");
            let video = magnet_video(&magnet, &metadata);
            return Ok(EnrichedMetadata {
                og: metadata,
                video: Some(video),
                magnet: Some(magnet),
            });
        }

        if let Some(source) = scan.inline_source {
            tracing::debug!(url = %url, "Video data taken from inline source element");
            let video = direct_video(source, &metadata);
            return Ok(EnrichedMetadata {
                og: metadata,
                video: Some(video),
                magnet: None,
            });
        }

        let Some(video_id) = video_id_from_url(url).or(scan.canonical_id) else {
            tracing::debug!(url = %url, "No video id found, serving metadata only");
            return Ok(EnrichedMetadata {
                og: metadata,
                video: None,
                magnet: None,
            });
        };

        let video = self
            .fetch_media_url(&video_id)
            .await?
            .map(|media_url| direct_video(media_url, &metadata));

        Ok(EnrichedMetadata {
            og: metadata,
            video,
            magnet: None,
        })
    }

    /// Query the media API for the direct video URL.
    ///
    /// A non-success status yields `None` rather than an error; the preview
    /// is then served without video data.
    async fn fetch_media_url(&self, video_id: &str) -> AppResult<Option<String>> {
        let body = serde_json::json!({ "video_id": video_id });

        let response = self
            .http_client
            .post(&self.config.media_api_url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/json; charset=utf-8",
            )
            .body(body.to_string())
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Media API request failed: {e}")))?;

        if !response.status().is_success() {
            tracing::debug!(video_id, status = %response.status(), "Media API declined the video id");
            return Ok(None);
        }

        #[derive(Deserialize)]
        struct MediaResponse {
            media_url: Option<String>,
        }

        let media: MediaResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse media API response: {e}"))
        })?;

        Ok(media.media_url)
    }
}
