//! Outbound connectivity check against a public IP-echo service.

use async_trait::async_trait;
use serde::Deserialize;

use crate::{Error, Result};

/// Echo service used when none is configured.
pub const DEFAULT_ECHO_URL: &str = "https://api.ipify.org?format=json";

/// Reports the public IP address this process egresses from.
#[async_trait]
pub trait IpEcho: Send + Sync {
    /// Ask the echo service for the caller-visible IP.
    async fn public_ip(&self) -> Result<String>;
}

/// `{"ip": "..."}` as returned by ipify-style services.
#[derive(Debug, Deserialize)]
struct EchoResponse {
    ip: String,
}

/// [`IpEcho`] over HTTP. Transport defaults apply; no retries.
#[derive(Debug, Clone)]
pub struct HttpIpEcho {
    client: reqwest::Client,
    url: String,
}

impl HttpIpEcho {
    /// Query `url` with a fresh client.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Query `url` with an existing client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The configured endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl IpEcho for HttpIpEcho {
    async fn public_ip(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::upstream_with_source("echo request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream(format!("echo service returned HTTP {status}")));
        }

        let body: EchoResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream_with_source("echo response was not valid JSON", e))?;

        let ip = body.ip.trim();
        if ip.is_empty() {
            return Err(Error::upstream("echo response carried an empty ip"));
        }
        Ok(ip.to_string())
    }
}
