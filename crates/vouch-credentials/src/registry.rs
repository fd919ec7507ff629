use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use vouch_identity::SignedVc;

use crate::error::CredentialError;

/// An organization's public registry: every credential it has received,
/// keyed by subject DID.
///
/// Lists are append-only and keep insertion order. The store does not
/// deduplicate. Keys are ordered so saved files are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicRegistry {
    entries: BTreeMap<String, Vec<SignedVc>>,
}

impl PublicRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from disk. A missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no registry on disk, starting empty");
            return Ok(Self::new());
        }
        let contents = std::fs::read(path)?;
        Self::from_json(&contents)
    }

    /// Parse a registry from its JSON form.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CredentialError> {
        serde_json::from_slice(bytes).map_err(|e| CredentialError::RegistryFormat(e.to_string()))
    }

    /// Write the registry to disk, creating parent directories as needed.
    ///
    /// The file is written beside the target and renamed into place so a
    /// reader never observes a half-written registry.
    pub fn save(&self, path: &Path) -> Result<(), CredentialError> {
        let contents = serde_json::to_vec_pretty(self)
            .map_err(|e| CredentialError::RegistryFormat(e.to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, path)?;
        tracing::debug!(path = %path.display(), credentials = self.len(), "registry saved");
        Ok(())
    }

    /// Append a credential under its subject DID.
    pub fn add(&mut self, credential: SignedVc) {
        let subject = credential.subject().to_string();
        tracing::debug!(subject = %subject, issuer = %credential.issuer(), "registry entry added");
        self.entries.entry(subject).or_default().push(credential);
    }

    /// All credentials received by `did`, oldest first.
    pub fn get(&self, did: &str) -> &[SignedVc] {
        self.entries.get(did).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First credential received by `did` whose `type` contains `tag`.
    pub fn find_by_type(&self, did: &str, tag: &str) -> Option<&SignedVc> {
        self.get(did).iter().find(|vc| vc.has_type(tag))
    }

    /// Subject DIDs with at least one entry.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Total number of credentials across all subjects.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
