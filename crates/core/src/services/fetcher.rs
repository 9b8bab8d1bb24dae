//! Page fetching.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use url::Url;

use opengraph_common::{AppError, AppResult};

/// HTTP client for retrieving pages to preview.
#[derive(Clone)]
pub struct PageFetcher {
    http_client: reqwest::Client,
}

impl PageFetcher {
    /// Create a new fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    /// Fetch a page body as text.
    ///
    /// The response status is not checked; an error page still gets parsed
    /// for whatever tags it carries. The timeout covers the whole request,
    /// redirects and body included.
    pub async fn fetch(&self, url: &Url, user_agent: &str, timeout: Duration) -> AppResult<String> {
        let response = self
            .http_client
            .get(url.clone())
            .header(USER_AGENT, user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("Request to {url} failed: {e}")))?;

        tracing::debug!(url = %url, status = %response.status(), "Fetched page");

        response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("Reading body from {url} failed: {e}")))
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_body_without_checking_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("<html><head><title>Not here</title></head></html>")
            .create_async()
            .await;

        let fetcher = PageFetcher::new();
        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let body = fetcher
            .fetch(&url, "bastyon", Duration::from_secs(5))
            .await
            .unwrap();

        assert!(body.contains("Not here"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_sends_the_requested_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("user-agent", "custom-agent/1.0")
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await;

        let fetcher = PageFetcher::new();
        let url = Url::parse(&format!("{}/page", server.url())).unwrap();
        fetcher
            .fetch(&url, "custom-agent/1.0", Duration::from_secs(5))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_reports_connection_failures() {
        let fetcher = PageFetcher::new();
        // Reserved TEST-NET-1 address, nothing listens there.
        let url = Url::parse("http://192.0.2.1:9/").unwrap();
        let err = fetcher
            .fetch(&url, "bastyon", Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Fetch(_)));
    }
}
