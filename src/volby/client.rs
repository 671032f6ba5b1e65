// src/volby/client.rs
use crate::utils::error::FetchError;
use crate::volby::models::parse_url;
use reqwest::header;
use scraper::Html;
use std::time::Duration;

const USER_AGENT: &str = concat!("volby-scraper/", env!("CARGO_PKG_VERSION"));
/// Pause before every request. The site serves static pages but dislikes bursts.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 100;

/// Anything that can hand back the HTML of a page by URL.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Downloads the raw page body.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Downloads and parses the page.
    async fn fetch(&self, url: &str) -> Result<Html, FetchError> {
        let body = self.fetch_text(url).await?;
        Ok(Html::parse_document(&body))
    }
}

/// HTTP client for the election results site.
pub struct VolbyClient {
    http: reqwest::Client,
    request_delay: Duration,
}

impl VolbyClient {
    pub fn new(request_delay: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http, request_delay })
    }
}

impl PageSource for VolbyClient {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let url = parse_url(url)?;
        tracing::debug!("Downloading page: {}", url);

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let response = self.http.get(url.clone())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::PageNotFound(url.to_string()));
            }
            return Err(FetchError::Http { status, url: url.to_string() });
        }

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    struct StaticPage(&'static str);

    impl PageSource for StaticPage {
        async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_fetch_parses_body() {
        let source = StaticPage("<table><tr><td headers=\"sa2\">12</td></tr></table>");
        let doc = tokio_test::block_on(source.fetch("https://example.org/")).unwrap();
        let selector = scraper::Selector::parse("td").unwrap();
        let text: String = doc.select(&selector).next().unwrap().text().collect();
        assert_eq!(text, "12");
    }

    #[tokio::test]
    async fn test_client_rejects_invalid_url_before_sending() {
        let client = VolbyClient::new(Duration::ZERO).unwrap();
        let err = client.fetch_text("no scheme here").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    /// Answers `/missing` with 404 and every other path with 500.
    async fn serve_errors(listener: TcpListener) {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let status = if request.starts_with(b"GET /missing") {
                "404 Not Found"
            } else {
                "500 Internal Server Error"
            };
            let response = format!("HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n", status);
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    }

    #[tokio::test]
    async fn test_client_maps_error_statuses() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_errors(listener));

        let client = VolbyClient {
            http: reqwest::Client::builder().no_proxy().build().unwrap(),
            request_delay: Duration::ZERO,
        };

        let err = client.fetch_text(&format!("http://{}/missing", addr)).await.unwrap_err();
        match err {
            FetchError::PageNotFound(url) => assert!(url.ends_with("/missing")),
            other => panic!("unexpected error: {other}"),
        }

        let err = client.fetch_text(&format!("http://{}/broken", addr)).await.unwrap_err();
        match err {
            FetchError::Http { status, url } => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert!(url.ends_with("/broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
