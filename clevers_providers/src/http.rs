use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use clevers_core::{HttpResponse, Transport, TransportError};
use reqwest::Client;
use tracing::{debug, info};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// `reqwest`-backed transport.
///
/// Non-2xx responses are returned as-is so the caller can map the status.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        info!("Creating HttpTransport (timeout={}s)", timeout.as_secs());
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("clevers/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::new(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| {
                TransportError::new(format!("failed to read body: {}", e.without_url()))
            })?;

        debug!("Received {} bytes with status {status}", body.len());
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn returns_status_and_full_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/getreply")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("input".into(), "hello there".into()),
                Matcher::UrlEncoded("cs".into(), "abc".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"output":"hi","cs":"def"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/getreply?input=hello%20there&cs=abc", server.url());
        let response = transport.get(&url).await.unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
        assert_eq!(response.body, r#"{"output":"hi","cs":"def"}"#);
    }

    #[tokio::test]
    async fn error_status_is_not_a_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/getreply")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .get(&format!("{}/getreply", server.url()))
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() {
        let transport = HttpTransport::with_timeout(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) is not expected to be listening on loopback.
        let result = transport.get("http://127.0.0.1:9/getreply").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn transport_error_does_not_echo_request_url() {
        let key = "CC1234567890abcdefghijklmno";
        let transport = HttpTransport::with_timeout(Duration::from_secs(2)).unwrap();
        let url = format!("http://127.0.0.1:9/getreply?key={key}&wrapper=clevers&input=hi");

        let err = transport.get(&url).await.unwrap_err();

        assert!(!err.to_string().contains(key));
        assert!(!err.to_string().contains("input=hi"));
    }
}
