//! Where the remote config comes from
//!
//! The page fetches its settings exactly once. Callers treat any error as
//! "no config" and fall back to defaults; nothing here retries.

use std::time::Duration;

use crate::{ConfigError, RemoteConfig};

/// Path of the config endpoint relative to the server root
pub const CONFIG_ENDPOINT: &str = "Seasonals/Config";

/// Something that can produce the server-side settings object
#[allow(async_fn_in_trait)]
pub trait ConfigSource {
    /// Fetch and parse the config once
    async fn fetch(&self) -> Result<RemoteConfig, ConfigError>;
}

/// Fetches the config from a running server over HTTP
#[derive(Debug, Clone)]
pub struct HttpConfigSource {
    client: reqwest::Client,
    url: String,
}

impl HttpConfigSource {
    /// Create a source for the server at `base_url` (e.g. `http://localhost:8096`)
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let url = format!("{}/{}", base_url.trim_end_matches('/'), CONFIG_ENDPOINT);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| ConfigError::Fetch { url: url.clone(), source })?;
        Ok(Self { client, url })
    }

    /// The full endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ConfigSource for HttpConfigSource {
    async fn fetch(&self) -> Result<RemoteConfig, ConfigError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| ConfigError::Fetch { url: self.url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::Status { url: self.url.clone(), status: status.as_u16() });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ConfigError::Fetch { url: self.url.clone(), source })?;

        let config = RemoteConfig::from_json(&body)?;
        log::info!("Seasonals config loaded from {}", self.url);
        Ok(config)
    }
}

/// A fixed JSON payload, used offline and in tests
///
/// An empty payload behaves like an unreachable endpoint.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource {
    payload: Option<String>,
}

impl StaticConfigSource {
    /// Serve the given JSON text
    pub fn new(json: impl Into<String>) -> Self {
        Self { payload: Some(json.into()) }
    }

    /// Behave as if the endpoint does not exist
    pub fn unavailable() -> Self {
        Self { payload: None }
    }
}

impl ConfigSource for StaticConfigSource {
    async fn fetch(&self) -> Result<RemoteConfig, ConfigError> {
        match &self.payload {
            Some(json) => RemoteConfig::from_json(json),
            None => Err(ConfigError::Status { url: CONFIG_ENDPOINT.to_string(), status: 404 }),
        }
    }
}
