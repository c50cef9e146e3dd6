//! # SSL Labs API Client
//!
//! This module provides a client for the SSL Labs `analyze` API.
//!
//! ```no_run
//! # use anyhow::Result;
//! use ssllabs::{SslLabsClient, client::{AnalyzeParams, Assessor}};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = SslLabsClient::init()
//!         .base("https://api.ssllabs.com/api/v2/analyze")?
//!         .build()?;
//!
//!     let host = client.analyze(&AnalyzeParams::new("example.com")).await?;
//!     println!("{}", host.status);
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use log::{debug, error};
use url::Url;

pub mod analyze;

pub use analyze::{AssessmentStatus, Endpoint, Host};

use crate::{SSLLABS_API_URL, SSLLABS_VERSION, SslLabsError};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Query parameters of an `analyze` call
///
/// Keys are unique; setting a key again replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeParams {
    params: BTreeMap<&'static str, String>,
}

impl AnalyzeParams {
    /// Parameters for `host` with `all=done`
    pub fn new(host: impl Into<String>) -> Self {
        let mut params = Self::default();
        params.set("host", host);
        params.set("all", "done");
        params
    }

    /// Set a parameter
    pub fn set(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.params.insert(key, value.into());
        self
    }

    /// Remove a parameter
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// Get a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Iterate over the parameters
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Something that can run a single `analyze` call
#[async_trait::async_trait]
pub trait Assessor {
    /// Issue one `analyze` call and decode the response
    async fn analyze(&self, params: &AnalyzeParams) -> Result<Host, SslLabsError>;
}

/// SSL Labs REST Client
#[derive(Debug, Clone)]
pub struct SslLabsClient {
    /// Analyze endpoint URL
    url: Url,
    /// Web Client
    client: reqwest::Client,
    /// Per-request timeout
    timeout: Duration,
}

impl SslLabsClient {
    /// Initialize a new SSL Labs Client Builder
    pub fn init() -> SslLabsClientBuilder {
        SslLabsClientBuilder::new()
    }

    /// Get the URL of the client
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the full request URL for a set of parameters
    pub(crate) fn request_url(&self, params: &AnalyzeParams) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().extend_pairs(params.iter());
        url
    }

    /// Client GET Request
    pub async fn get(&self, params: &AnalyzeParams) -> Result<reqwest::Response, reqwest::Error> {
        let url = self.request_url(params);
        debug!("GET {}", url);
        self.client.get(url).send().await?.error_for_status()
    }
}

#[async_trait::async_trait]
impl Assessor for SslLabsClient {
    async fn analyze(&self, params: &AnalyzeParams) -> Result<Host, SslLabsError> {
        let response = match self.get(params).await {
            Ok(response) => response,
            Err(err) => {
                if err.is_timeout() {
                    error!("Timeout Error: {}", err);
                } else if err.is_connect() {
                    error!("Error Connecting: {}", err);
                } else if err.is_status() {
                    error!("HTTP Error: {}", err);
                } else {
                    error!("Request failed: {}", err);
                }
                return Err(SslLabsError::from(err));
            }
        };

        let body = response.bytes().await.map_err(|err| {
            error!("Request failed: {}", err);
            SslLabsError::from(err)
        })?;

        let host: Host = serde_json::from_slice(&body).map_err(|err| {
            error!("Invalid response body: {}", err);
            SslLabsError::from(err)
        })?;
        debug!(
            "Assessment of '{}' is {} ({} endpoints)",
            host.host,
            host.status,
            host.endpoints.len()
        );
        Ok(host)
    }
}

/// SSL Labs Client Builder
#[derive(Debug, Default)]
pub struct SslLabsClientBuilder {
    url: Option<Url>,
    timeout: Option<Duration>,
}

impl SslLabsClientBuilder {
    /// Create a new SSL Labs Client Builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the analyze endpoint URL
    pub fn base(mut self, url: impl Into<String>) -> Result<Self, SslLabsError> {
        self.url = Some(Url::parse(&url.into())?);
        Ok(self)
    }

    /// Set the analyze endpoint URL from a parsed URL
    pub fn url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Set the per-request timeout (connect + response)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the SSL Labs Client
    pub fn build(self) -> Result<SslLabsClient, SslLabsError> {
        let url = match self.url {
            Some(url) => url,
            None => Url::parse(SSLLABS_API_URL)?,
        };
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let client = reqwest::Client::builder()
            .user_agent(format!("check-ssllabs/{}", SSLLABS_VERSION))
            .timeout(timeout)
            .build()?;

        debug!("Setting up SSL Labs Client for {}", url);
        Ok(SslLabsClient {
            url,
            client,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response, returning the request line received
    async fn serve_once(status: &'static str, body: &'static str) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buffer = vec![0u8; 4096];
            let read = socket.read(&mut buffer).await.unwrap();
            let request = String::from_utf8_lossy(&buffer[..read]).to_string();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            request.lines().next().unwrap_or_default().to_string()
        });

        let url = Url::parse(&format!("http://{}/api/v2/analyze", addr)).unwrap();
        (url, handle)
    }

    #[test]
    fn test_params() {
        let mut params = AnalyzeParams::new("example.com");
        params.set("startNew", "on").set("publish", "on");
        assert_eq!(params.get("host"), Some("example.com"));
        assert_eq!(params.get("all"), Some("done"));
        assert_eq!(params.get("startNew"), Some("on"));

        params.set("startNew", "off");
        assert_eq!(params.get("startNew"), Some("off"));
        assert_eq!(params.iter().count(), 4);

        assert_eq!(params.remove("startNew"), Some("off".to_string()));
        assert_eq!(params.get("startNew"), None);
    }

    #[test]
    fn test_builder() {
        let client = SslLabsClient::init().build().unwrap();
        assert_eq!(client.url().as_str(), SSLLABS_API_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);

        let client = SslLabsClient::init()
            .base("http://localhost:8080/analyze")
            .unwrap()
            .timeout(Duration::from_secs(1))
            .build()
            .unwrap();
        assert_eq!(client.url().as_str(), "http://localhost:8080/analyze");
        assert_eq!(client.timeout(), Duration::from_secs(1));

        assert!(SslLabsClient::init().base("not a url").is_err());
    }

    #[test]
    fn test_request_url() {
        let client = SslLabsClient::init().build().unwrap();
        let mut params = AnalyzeParams::new("example.com");
        params.set("fromCache", "on").set("startNew", "off");

        let url = client.request_url(&params);
        assert_eq!(
            url.as_str(),
            "https://api.ssllabs.com/api/v2/analyze?all=done&fromCache=on&host=example.com&startNew=off"
        );
    }

    #[tokio::test]
    async fn test_analyze() -> anyhow::Result<()> {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"host": "example.com", "status": "IN_PROGRESS", "endpoints": [{"ipAddress": "192.0.2.1", "progress": 42}]}"#,
        )
        .await;
        let client = SslLabsClient::init().url(url).build()?;

        let mut params = AnalyzeParams::new("example.com");
        params.set("publish", "on");
        let host = client.analyze(&params).await?;

        assert_eq!(host.status, AssessmentStatus::InProgress);
        assert_eq!(host.endpoints[0].progress, Some(42));

        let request = server.await?;
        assert_eq!(
            request,
            "GET /api/v2/analyze?all=done&host=example.com&publish=on HTTP/1.1"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_http_error() -> anyhow::Result<()> {
        let (url, server) = serve_once("529 Overloaded", r#"{"errors": []}"#).await;
        let client = SslLabsClient::init().url(url).build()?;

        let result = client.analyze(&AnalyzeParams::new("example.com")).await;
        match result {
            Err(SslLabsError::ReqwestError(err)) => assert!(err.is_status()),
            other => panic!("unexpected result: {:?}", other),
        }
        server.await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_body() -> anyhow::Result<()> {
        let (url, server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let client = SslLabsClient::init().url(url).build()?;

        let result = client.analyze(&AnalyzeParams::new("example.com")).await;
        assert!(matches!(result, Err(SslLabsError::JsonError(_))));
        server.await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_timeout() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        // Accept the connection and never answer
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let client = SslLabsClient::init()
            .base(format!("http://{}/analyze", addr))?
            .timeout(Duration::from_millis(200))
            .build()?;

        let result = client.analyze(&AnalyzeParams::new("example.com")).await;
        match result {
            Err(SslLabsError::ReqwestError(err)) => assert!(err.is_timeout()),
            other => panic!("unexpected result: {:?}", other),
        }
        server.abort();
        Ok(())
    }

    #[tokio::test]
    async fn test_connection_refused() -> anyhow::Result<()> {
        // Bind then drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0").await?.local_addr()?;
        let client = SslLabsClient::init()
            .base(format!("http://{}/analyze", addr))?
            .build()?;

        let result = client.analyze(&AnalyzeParams::new("example.com")).await;
        assert!(matches!(result, Err(SslLabsError::ReqwestError(_))));
        Ok(())
    }
}
