//! HTTP page fetching.
//!
//! The crawler depends only on the [`Fetcher`] trait, so tests can swap the
//! network for canned markup. [`HttpFetcher`] is the real implementation: a
//! `reqwest` client sending browser-like headers with a fixed per-request
//! timeout. Failed requests are not retried here; the crawler moves on to
//! the next page or article instead.

use crate::config::Settings;
use crate::error::{CrawlError, Result};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Something that can turn a URL into page markup.
pub trait Fetcher {
    /// Fetch `url` and return the response body as text.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the configured default headers and timeout.
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &settings.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| CrawlError::Config(format!("invalid header name `{name}`: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| CrawlError::Config(format!("invalid value for header `{}`: {e}", name.as_str())))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "Non-success response");
            return Err(CrawlError::Fetch(format!("HTTP {status} for {url}")));
        }

        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with(route: &str, response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_builds_with_default_settings() {
        assert!(HttpFetcher::new(&Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_invalid_header_name() {
        let settings = Settings {
            headers: BTreeMap::from([("Bad Header".to_string(), "x".to_string())]),
            ..Settings::default()
        };
        assert!(matches!(HttpFetcher::new(&settings), Err(CrawlError::Config(_))));
    }

    #[test]
    fn test_rejects_invalid_header_value() {
        let settings = Settings {
            headers: BTreeMap::from([("X-Test".to_string(), "line\nbreak".to_string())]),
            ..Settings::default()
        };
        assert!(matches!(HttpFetcher::new(&settings), Err(CrawlError::Config(_))));
    }

    #[tokio::test]
    async fn test_returns_body_on_success() {
        let server = server_with("/berita", ResponseTemplate::new(200).set_body_string("<p>Banjir</p>")).await;
        let fetcher = HttpFetcher::new(&Settings::default()).unwrap();

        let body = fetcher.fetch(&format!("{}/berita", server.uri())).await.unwrap();
        assert_eq!(body, "<p>Banjir</p>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = server_with("/berita", ResponseTemplate::new(503)).await;
        let fetcher = HttpFetcher::new(&Settings::default()).unwrap();

        let err = fetcher.fetch(&format!("{}/berita", server.uri())).await.unwrap_err();
        match err {
            CrawlError::Fetch(msg) => assert!(msg.contains("503"), "{msg}"),
            other => panic!("expected a fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sends_configured_user_agent() {
        let user_agent = "berita-crawler-test/1.0";
        let mut settings = Settings::default();
        settings.headers.insert("User-Agent".to_string(), user_agent.to_string());
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ua"))
            .and(header("User-Agent", user_agent))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&settings).unwrap();
        let body = fetcher.fetch(&format!("{}/ua", server.uri())).await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = server_with(
            "/lambat",
            ResponseTemplate::new(200).set_delay(Duration::from_secs(3)),
        )
        .await;
        let settings = Settings {
            request_timeout_secs: 1,
            ..Settings::default()
        };
        let fetcher = HttpFetcher::new(&settings).unwrap();

        let err = fetcher.fetch(&format!("{}/lambat", server.uri())).await.unwrap_err();
        assert!(matches!(err, CrawlError::Http(ref e) if e.is_timeout()), "{err:?}");
    }
}
