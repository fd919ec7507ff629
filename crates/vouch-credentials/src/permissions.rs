use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;

use crate::error::CredentialError;

/// Maps a credential type to the permission type its issuer must hold.
///
/// An unmapped type means the credential taxonomy was never provisioned,
/// which is distinct from an issuer lacking the permission.
#[async_trait]
pub trait PermissionResolver: Send + Sync {
    async fn required_permission(&self, credential_type: &str) -> Result<String, CredentialError>;
}

/// Type map held in memory, typically seeded from configuration.
#[derive(Default)]
pub struct StaticPermissionMap {
    mappings: DashMap<String, String>,
}

impl StaticPermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = Self::new();
        for (credential_type, permission) in pairs {
            map.register(credential_type, permission);
        }
        map
    }

    /// Register (or replace) the permission required to issue `credential_type`.
    pub fn register(&self, credential_type: impl Into<String>, permission: impl Into<String>) {
        self.mappings
            .insert(credential_type.into(), permission.into());
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[async_trait]
impl PermissionResolver for StaticPermissionMap {
    async fn required_permission(&self, credential_type: &str) -> Result<String, CredentialError> {
        self.mappings
            .get(credential_type)
            .map(|p| p.clone())
            .ok_or_else(|| CredentialError::PermissionNotMapped(credential_type.to_string()))
    }
}

#[derive(Deserialize)]
struct PermissionResponse {
    permission: String,
}

/// Looks type mappings up on a ledger gateway at `GET {base_url}/types/{type}`,
/// which answers `{"permission": "<tag>"}`.
pub struct HttpPermissionResolver {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPermissionResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// `{base_url}/types/{credential_type}` with the tag percent-encoded as one path segment.
    fn type_url(&self, credential_type: &str) -> Result<reqwest::Url, CredentialError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            CredentialError::PermissionLookup(format!("invalid gateway url {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                CredentialError::PermissionLookup(format!(
                    "gateway url {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("types")
            .push(credential_type);
        Ok(url)
    }
}

#[async_trait]
impl PermissionResolver for HttpPermissionResolver {
    async fn required_permission(&self, credential_type: &str) -> Result<String, CredentialError> {
        let url = self.type_url(credential_type)?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CredentialError::PermissionLookup(format!("{}: {}", url, e)))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CredentialError::PermissionNotMapped(
                credential_type.to_string(),
            ));
        }
        if !resp.status().is_success() {
            return Err(CredentialError::PermissionLookup(format!(
                "{} returned HTTP {}",
                url,
                resp.status()
            )));
        }

        let body: PermissionResponse = resp
            .json()
            .await
            .map_err(|e| CredentialError::PermissionLookup(format!("{}: {}", url, e)))?;
        Ok(body.permission)
    }
}
