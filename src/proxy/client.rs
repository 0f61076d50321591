use crate::{config::Config, Error, Result};
use reqwest::{Client, Response};
use std::{collections::HashMap, time::Duration};

/// HTTP client for playlist downloads and stream relaying.
///
/// Downloads are bounded by a total timeout. Relayed streams may run
/// indefinitely, so their client only bounds connecting and each read.
#[derive(Clone)]
pub struct ProxyClient {
    client: Client,
    relay: Client,
    user_agent: String,
}

impl ProxyClient {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let relay = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create relay client: {}", e)))?;

        Ok(Self {
            client,
            relay,
            user_agent: user_agent.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.fetch_timeout, config.user_agent.clone())
    }

    /// Use `client` for both downloads and relaying.
    pub fn with_client(client: Client, user_agent: impl Into<String>) -> Self {
        Self {
            relay: client.clone(),
            client,
            user_agent: user_agent.into(),
        }
    }

    /// Fallback User-Agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Headers for an outbound request: the given ones plus the fallback
    /// User-Agent when none is present. Empty values are dropped.
    pub fn request_headers(
        &self,
        headers: Option<&HashMap<String, String>>,
    ) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = headers
            .into_iter()
            .flatten()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if !out
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case("user-agent"))
        {
            out.push(("User-Agent".to_string(), self.user_agent.clone()));
        }

        out
    }

    /// Send a GET and return the response once its status is a success.
    pub async fn send(
        &self,
        url: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> Result<Response> {
        self.get(&self.client, url, headers).await
    }

    /// Like [`send`](Self::send), but the body may take any amount of time
    /// as long as data keeps arriving.
    pub async fn relay(
        &self,
        url: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> Result<Response> {
        self.get(&self.relay, url, headers).await
    }

    async fn get(
        &self,
        client: &Client,
        url: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> Result<Response> {
        let mut request = client.get(url);

        for (key, value) in self.request_headers(headers) {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::FetchFailed {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        Ok(response)
    }

    /// Fetch a document as text.
    pub async fn fetch_text(
        &self,
        url: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> Result<String> {
        let response = self.send(url, headers).await?;
        Ok(response.text().await?)
    }
}
