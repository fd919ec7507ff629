use std::future::Future;
use std::sync::Arc;

use vouch_core::{ChainLimits, VERIFIABLE_CREDENTIAL_TYPE};
use vouch_identity::{DidResolver, SignedVc};

use crate::error::{ChainError, CredentialError};
use crate::fetcher::RegistryFetcher;
use crate::permissions::PermissionResolver;
use crate::roots::RootPolicy;
use crate::verifier::signature_matches;

/// Verdict of a trust-chain walk.
///
/// Every negative verdict carries the DID of the level where the chain broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Every hop verified and the walk reached a root issuer.
    Valid,
    /// The credential at this level is not a `VerifiableCredential`; holds its subject.
    InvalidType(String),
    /// The proof at this level does not match its issuer's key; holds the subject.
    InvalidSignature(String),
    /// The issuer at this level holds no credential authorizing it; holds the issuer.
    MissingPermission(String),
    /// Nothing was submitted.
    MissingInput,
}

impl ChainOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ChainOutcome::Valid)
    }

    /// DID where the chain broke.
    pub fn did(&self) -> Option<&str> {
        match self {
            ChainOutcome::InvalidType(did)
            | ChainOutcome::InvalidSignature(did)
            | ChainOutcome::MissingPermission(did) => Some(did),
            ChainOutcome::Valid | ChainOutcome::MissingInput => None,
        }
    }

    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            ChainOutcome::Valid => "valid",
            ChainOutcome::InvalidType(_) => "invalid_type",
            ChainOutcome::InvalidSignature(_) => "invalid_signature",
            ChainOutcome::MissingPermission(_) => "missing_permission",
            ChainOutcome::MissingInput => "missing_input",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ChainOutcome::Valid => "trust chain is valid".to_string(),
            ChainOutcome::InvalidType(did) => {
                format!("credential for {} is not a VerifiableCredential", did)
            }
            ChainOutcome::InvalidSignature(did) => {
                format!("credential for {} has an invalid signature", did)
            }
            ChainOutcome::MissingPermission(did) => {
                format!("issuer {} lacks permission to issue this credential", did)
            }
            ChainOutcome::MissingInput => "no credential supplied".to_string(),
        }
    }
}

impl std::fmt::Display for ChainOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Outcome of a walk plus the path it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReport {
    pub outcome: ChainOutcome,
    /// Issuer DIDs visited, leaf issuer first.
    pub hops: Vec<String>,
    /// Number of authorizing credentials followed.
    pub depth: usize,
}

impl ChainReport {
    fn finish(outcome: ChainOutcome, hops: Vec<String>, depth: usize) -> Self {
        Self {
            outcome,
            hops,
            depth,
        }
    }
}

/// Walks from a submitted credential up through its issuers' public
/// registries until it reaches a root or breaks.
///
/// Hops are sequential. Each external call is bounded by the hop timeout and
/// the whole walk by the chain timeout; on any fatal error the walk stops and
/// no partial verdict is produced.
pub struct TrustChainValidator {
    resolver: Arc<dyn DidResolver>,
    permissions: Arc<dyn PermissionResolver>,
    roots: Arc<dyn RootPolicy>,
    fetcher: Arc<dyn RegistryFetcher>,
    limits: ChainLimits,
}

impl TrustChainValidator {
    pub fn new(
        resolver: Arc<dyn DidResolver>,
        permissions: Arc<dyn PermissionResolver>,
        roots: Arc<dyn RootPolicy>,
        fetcher: Arc<dyn RegistryFetcher>,
        limits: ChainLimits,
    ) -> Self {
        Self {
            resolver,
            permissions,
            roots,
            fetcher,
            limits,
        }
    }

    pub fn limits(&self) -> &ChainLimits {
        &self.limits
    }

    /// Verify the trust chain of `credential`.
    pub async fn verify_trustchain(
        &self,
        credential: Option<&SignedVc>,
    ) -> Result<ChainOutcome, ChainError> {
        self.walk(credential).await.map(|report| report.outcome)
    }

    /// Verify the trust chain of `credential`, reporting the hops taken.
    pub async fn walk(&self, credential: Option<&SignedVc>) -> Result<ChainReport, ChainError> {
        let Some(credential) = credential else {
            return Ok(ChainReport::finish(ChainOutcome::MissingInput, Vec::new(), 0));
        };

        let report = tokio::time::timeout(self.limits.chain_timeout(), self.ascend(credential))
            .await
            .map_err(|_| ChainError::ChainTimeout {
                timeout_ms: self.limits.chain_timeout_ms,
            })??;

        tracing::info!(
            subject = credential.subject(),
            outcome = report.outcome.kind(),
            depth = report.depth,
            hops = ?report.hops,
            "trust chain verified"
        );
        Ok(report)
    }

    async fn ascend(&self, leaf: &SignedVc) -> Result<ChainReport, ChainError> {
        let mut current = leaf.clone();
        let mut hops = Vec::new();
        let mut depth = 0usize;

        loop {
            let subject = current.subject().to_string();
            if !current.unsigned().is_verifiable_credential() {
                return Ok(ChainReport::finish(
                    ChainOutcome::InvalidType(subject),
                    hops,
                    depth,
                ));
            }

            let issuer = current.issuer().to_string();
            hops.push(issuer.clone());
            tracing::debug!(issuer = %issuer, subject = %subject, depth, "checking hop");

            let document = self
                .bounded("DID resolution", &issuer, self.resolver.resolve(&issuer))
                .await?
                .map_err(|source| ChainError::Resolution {
                    did: issuer.clone(),
                    source,
                })?;

            if !signature_matches(&current, &document) {
                return Ok(ChainReport::finish(
                    ChainOutcome::InvalidSignature(subject),
                    hops,
                    depth,
                ));
            }

            if self.roots.is_root(&issuer) {
                return Ok(ChainReport::finish(ChainOutcome::Valid, hops, depth));
            }

            if depth >= self.limits.max_depth {
                tracing::warn!(issuer = %issuer, max_depth = self.limits.max_depth, "trust chain too deep");
                return Err(ChainError::DepthExceeded {
                    max_depth: self.limits.max_depth,
                    did: issuer,
                });
            }

            // A bare `["VerifiableCredential"]` is looked up under that tag.
            let credential_type = current
                .unsigned()
                .domain_type()
                .unwrap_or(VERIFIABLE_CREDENTIAL_TYPE)
                .to_string();
            let required = self
                .bounded(
                    "permission lookup",
                    &issuer,
                    self.permissions.required_permission(&credential_type),
                )
                .await?
                .map_err(|e| match e {
                    CredentialError::PermissionNotMapped(t) => ChainError::PermissionNotMapped(t),
                    other => ChainError::PermissionLookup {
                        credential_type: credential_type.clone(),
                        reason: other.to_string(),
                    },
                })?;

            let Some(endpoint) = document.registry_endpoint() else {
                tracing::debug!(issuer = %issuer, "issuer publishes no registry");
                return Ok(ChainReport::finish(
                    ChainOutcome::MissingPermission(issuer),
                    hops,
                    depth,
                ));
            };

            let registry = self
                .bounded("registry fetch", &issuer, self.fetcher.fetch(endpoint))
                .await?
                .map_err(|e| ChainError::RegistryFetch {
                    did: issuer.clone(),
                    url: endpoint.to_string(),
                    reason: e.to_string(),
                })?;

            match registry.find_by_type(&issuer, &required) {
                Some(authorization) => {
                    tracing::debug!(
                        issuer = %issuer,
                        permission = %required,
                        granted_by = authorization.issuer(),
                        "authorization found"
                    );
                    current = authorization.clone();
                    depth += 1;
                }
                None => {
                    return Ok(ChainReport::finish(
                        ChainOutcome::MissingPermission(issuer),
                        hops,
                        depth,
                    ));
                }
            }
        }
    }

    /// Run one external call under the hop timeout.
    async fn bounded<T, F>(&self, operation: &'static str, did: &str, call: F) -> Result<T, ChainError>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.limits.hop_timeout(), call)
            .await
            .map_err(|_| {
                tracing::warn!(did, operation, "hop timed out");
                ChainError::HopTimeout {
                    operation,
                    did: did.to_string(),
                    timeout_ms: self.limits.hop_timeout_ms,
                }
            })
    }
}
