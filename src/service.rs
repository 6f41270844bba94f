//! HTTP transport.
//!
//! [`BoxService`] is the seam between managers and the network. The
//! reqwest-backed [`HttpService`] is the production implementation; tests
//! substitute their own.

use async_trait::async_trait;

use crate::config::BoxConfig;
use crate::error::Result;
use crate::request::{BoxRequest, RequestMethod};

/// Raw response: status code plus body text, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxResponse {
    pub status: u16,
    pub body: String,
}

impl BoxResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes a fully-formed request.
#[async_trait]
pub trait BoxService: Send + Sync {
    /// Send `request` and return the raw response. Non-2xx statuses are
    /// returned as responses, not errors; only transport failures error.
    async fn execute(&self, request: &BoxRequest) -> Result<BoxResponse>;
}

/// reqwest-backed transport with the configured timeout and user agent.
#[derive(Debug, Clone)]
pub struct HttpService {
    client: reqwest::Client,
}

impl HttpService {
    pub fn new(config: &BoxConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one with a custom proxy.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BoxService for HttpService {
    async fn execute(&self, request: &BoxRequest) -> Result<BoxResponse> {
        let method = match request.method {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.uri());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(BoxResponse { status, body })
    }
}
