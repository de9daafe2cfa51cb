//! Async page fetcher wrapping reqwest.
//!
//! One bounded GET per analysis run with a fixed browser-like
//! user-agent. Redirects are left to the client defaults; retries are
//! deliberately absent — a dead page means there is nothing to
//! classify, so the run aborts with a typed error.

use crate::error::AnalysisError;
use std::time::Duration;

/// Default fetch budget for the single page GET.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36";

/// HTTP client for retrieving the target page.
#[derive(Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new(FETCH_TIMEOUT)
    }
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// GET the page body as text.
    ///
    /// Connection and timeout failures map to
    /// [`AnalysisError::Network`]; any non-2xx status maps to
    /// [`AnalysisError::Http`].
    pub async fn fetch(&self, url: &str) -> Result<String, AnalysisError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| AnalysisError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        tracing::debug!(url, status = status.as_u16(), "fetched page");

        response
            .text()
            .await
            .map_err(|source| AnalysisError::Network {
                url: url.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_sends_browser_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::default();
        let body = fetcher.fetch(&server.uri()).await.unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::default();
        match fetcher.fetch(&server.uri()).await {
            Err(AnalysisError::Http { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Port 9 (discard) is almost certainly closed.
        let fetcher = PageFetcher::new(Duration::from_millis(500));
        match fetcher.fetch("http://127.0.0.1:9/").await {
            Err(AnalysisError::Network { .. }) => {}
            other => panic!("expected Network error, got {other:?}"),
        }
    }
}
