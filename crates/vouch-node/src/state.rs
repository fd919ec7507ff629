//! Shared state handed to every API handler.

use std::sync::Arc;

use vouch_credentials::{
    CredentialVerifier, HttpPermissionResolver, HttpRegistryFetcher, PermissionResolver,
    PublicRegistry, RegistryFetcher, RootPolicy, StaticPermissionMap, StaticRoots,
    TrustChainValidator,
};
use vouch_identity::{CompositeDidResolver, DidResolver, HttpDidResolver, InMemoryDidResolver};

use crate::config::VouchConfig;

/// Verification services plus this organization's registry.
pub struct NodeState {
    pub validator: TrustChainValidator,
    pub verifier: CredentialVerifier,
    pub registry: PublicRegistry,
}

impl NodeState {
    pub fn new(
        validator: TrustChainValidator,
        verifier: CredentialVerifier,
        registry: PublicRegistry,
    ) -> Self {
        Self {
            validator,
            verifier,
            registry,
        }
    }

    /// Build state from configuration.
    ///
    /// Local DID Documents are consulted before the ledger gateway. A
    /// configured type-permission table takes precedence over gateway lookups.
    pub fn from_config(config: &VouchConfig) -> anyhow::Result<Self> {
        let mut composite = CompositeDidResolver::new();
        if let Some(path) = &config.ledger.documents_path {
            composite.add_resolver(Box::new(InMemoryDidResolver::load_json(path)?));
        }
        if let Some(url) = &config.ledger.gateway_url {
            composite.add_resolver(Box::new(HttpDidResolver::new(url.as_str())));
        }
        if composite.resolver_count() == 0 {
            tracing::warn!("no DID source configured; every issuer will be unresolvable");
        }
        let resolver: Arc<dyn DidResolver> = Arc::new(composite);

        let permissions: Arc<dyn PermissionResolver> =
            match (&config.ledger.gateway_url, config.ledger.type_permissions.is_empty()) {
                (Some(url), true) => {
                    tracing::info!(gateway = %url, "type permissions resolved via ledger gateway");
                    Arc::new(HttpPermissionResolver::new(url.as_str()))
                }
                _ => {
                    tracing::info!(
                        mappings = config.ledger.type_permissions.len(),
                        "type permissions loaded from config"
                    );
                    Arc::new(StaticPermissionMap::from_pairs(
                        config.ledger.type_permissions.clone(),
                    ))
                }
            };

        let roots: Arc<dyn RootPolicy> =
            Arc::new(StaticRoots::new(config.trust.root_dids.iter().cloned()));
        let fetcher: Arc<dyn RegistryFetcher> = Arc::new(HttpRegistryFetcher::new());

        let registry = PublicRegistry::load(&config.registry.path)?;
        tracing::info!(
            path = %config.registry.path.display(),
            credentials = registry.len(),
            "public registry loaded"
        );

        Ok(Self::new(
            TrustChainValidator::new(resolver.clone(), permissions, roots, fetcher, config.chain),
            CredentialVerifier::new(resolver),
            registry,
        ))
    }
}
