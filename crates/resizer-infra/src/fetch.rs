//! Source image download.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid source url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("error fetching {url}: {message}")]
    Request { url: String, message: String },

    #[error("error fetching {url}: unexpected status {status}")]
    Status { url: String, status: u16 },

    #[error("error reading body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Source fetch capability
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Download the whole body at `url`.
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

/// Accept only absolute http(s) URLs.
pub fn parse_source_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {}", scheme),
        }),
    }
}

/// `reqwest` implementation of [`SourceFetcher`].
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let parsed = parse_source_url(url)?;
        let start = std::time::Instant::now();

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!(
            url = %url,
            size_bytes = body.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Source image fetched"
        );

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    async fn serve() -> String {
        let app = Router::new()
            .route("/image.png", get(|| async { &b"png-bytes"[..] }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_parse_source_url() {
        assert!(parse_source_url("https://example.com/a.jpg").is_ok());
        assert!(parse_source_url("http://127.0.0.1:8080/a.jpg").is_ok());
        assert!(matches!(
            parse_source_url("ftp://example.com/a.jpg"),
            Err(FetchError::InvalidUrl { .. })
        ));
        assert!(parse_source_url("not a url").is_err());
        assert!(parse_source_url("").is_err());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let base = serve().await;
        let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(5)).unwrap();

        let body = fetcher.fetch(&format!("{}/image.png", base)).await.unwrap();
        assert_eq!(body, Bytes::from_static(b"png-bytes"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let base = serve().await;
        let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch(&format!("{}/missing", base)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }
}
