use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::CredentialError;
use crate::registry::PublicRegistry;

/// Fetches an organization's published registry from its service endpoint.
#[async_trait]
pub trait RegistryFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PublicRegistry, CredentialError>;
}

/// Plain HTTP GET of a registry JSON document.
///
/// Network failures and non-2xx responses are errors.
pub struct HttpRegistryFetcher {
    client: reqwest::Client,
}

impl HttpRegistryFetcher {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpRegistryFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryFetcher for HttpRegistryFetcher {
    async fn fetch(&self, url: &str) -> Result<PublicRegistry, CredentialError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CredentialError::RegistryFetch(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CredentialError::RegistryFetch(format!("HTTP {}", status)));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| CredentialError::RegistryFetch(e.to_string()))?;
        let registry = PublicRegistry::from_json(&body)?;
        tracing::debug!(url, credentials = registry.len(), "registry fetched");
        Ok(registry)
    }
}

/// Serves registries from memory, keyed by URL.
#[derive(Default)]
pub struct StaticRegistryFetcher {
    registries: DashMap<String, PublicRegistry>,
}

impl StaticRegistryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `registry` at `url`, replacing whatever was there.
    pub fn publish(&self, url: &str, registry: PublicRegistry) {
        self.registries.insert(url.to_string(), registry);
    }
}

#[async_trait]
impl RegistryFetcher for StaticRegistryFetcher {
    async fn fetch(&self, url: &str) -> Result<PublicRegistry, CredentialError> {
        self.registries
            .get(url)
            .map(|r| r.clone())
            .ok_or_else(|| CredentialError::RegistryFetch(format!("nothing published at {}", url)))
    }
}
