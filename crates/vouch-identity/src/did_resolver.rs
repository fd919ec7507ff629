use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;

use crate::document::DidDocument;
use crate::error::IdentityError;

/// Trait for resolving DIDs to their documents.
#[async_trait]
pub trait DidResolver: Send + Sync {
    /// Resolve a DID URI to its DID Document.
    async fn resolve(&self, did: &str) -> Result<DidDocument, IdentityError>;
}

/// Resolves DIDs from documents held in memory.
#[derive(Default)]
pub struct InMemoryDidResolver {
    documents: DashMap<String, DidDocument>,
}

impl InMemoryDidResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a resolver pre-populated with `documents`.
    pub fn from_documents(documents: impl IntoIterator<Item = DidDocument>) -> Self {
        let resolver = Self::new();
        for doc in documents {
            resolver.documents.insert(doc.id.clone(), doc);
        }
        resolver
    }

    /// Load a JSON array of DID Documents from disk.
    pub fn load_json(path: &Path) -> Result<Self, IdentityError> {
        let contents = std::fs::read_to_string(path)?;
        let documents: Vec<DidDocument> = serde_json::from_str(&contents)
            .map_err(|e| IdentityError::Serialization(e.to_string()))?;
        for doc in &documents {
            doc.validate()?;
        }
        tracing::info!(path = %path.display(), count = documents.len(), "loaded DID documents");
        Ok(Self::from_documents(documents))
    }

    /// Insert or replace a document.
    pub fn insert(&self, document: DidDocument) -> Result<(), IdentityError> {
        document.validate()?;
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    /// Number of documents held.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DidResolver for InMemoryDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, IdentityError> {
        self.documents
            .get(did)
            .map(|doc| doc.clone())
            .ok_or_else(|| IdentityError::DidNotFound(did.to_string()))
    }
}

/// Resolves DIDs through a ledger gateway at `GET {base_url}/did/{did}`.
///
/// A `404` is reported as [`IdentityError::DidNotFound`]; any other failure
/// as [`IdentityError::DidResolution`].
pub struct HttpDidResolver {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDidResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// `{base_url}/did/{did}` with the DID percent-encoded as one path segment.
    fn document_url(&self, did: &str) -> Result<reqwest::Url, IdentityError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            IdentityError::DidResolution(format!("invalid gateway url {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                IdentityError::DidResolution(format!(
                    "gateway url {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("did")
            .push(did);
        Ok(url)
    }
}

#[async_trait]
impl DidResolver for HttpDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, IdentityError> {
        let url = self.document_url(did)?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| IdentityError::DidResolution(format!("{}: {}", url, e)))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(IdentityError::DidNotFound(did.to_string()));
        }
        if !resp.status().is_success() {
            return Err(IdentityError::DidResolution(format!(
                "{} returned HTTP {}",
                url,
                resp.status()
            )));
        }

        resp.json::<DidDocument>()
            .await
            .map_err(|e| IdentityError::DidResolution(format!("{}: invalid document: {}", url, e)))
    }
}

/// Composite resolver that tries multiple resolvers in order.
///
/// Returns the first successful resolution, or the last error.
pub struct CompositeDidResolver {
    resolvers: Vec<Box<dyn DidResolver>>,
}

impl CompositeDidResolver {
    /// Create a new composite resolver with no backends.
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Add a resolver to the chain.
    pub fn add_resolver(&mut self, resolver: Box<dyn DidResolver>) {
        self.resolvers.push(resolver);
    }

    /// Number of registered resolvers.
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }
}

impl Default for CompositeDidResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DidResolver for CompositeDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, IdentityError> {
        let mut last_error = IdentityError::DidResolution("no resolvers configured".into());

        for resolver in &self.resolvers {
            match resolver.resolve(did).await {
                Ok(doc) => return Ok(doc),
                Err(e) => {
                    tracing::debug!(did = did, error = %e, "resolver failed, trying next");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
