use vouch_identity::IdentityError;

/// Credential system errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("issuance failed: {0}")]
    IssuanceFailed(String),

    #[error("credential has no issuer")]
    MissingIssuer,

    #[error("issuer {0} has no public key")]
    KeylessIssuer(String),

    #[error("no permission type registered for credential type {0}")]
    PermissionNotMapped(String),

    #[error("permission lookup failed: {0}")]
    PermissionLookup(String),

    #[error("registry fetch failed: {0}")]
    RegistryFetch(String),

    #[error("registry format error: {0}")]
    RegistryFormat(String),

    #[error("registry io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] vouch_crypto::CryptoError),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),
}

/// Failures that end a trust-chain walk without a verdict.
///
/// A chain with an unresolvable link gets no partial credibility: these are
/// reported to the caller as errors, never folded into a negative outcome.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("cannot resolve issuer {did}: {source}")]
    Resolution {
        did: String,
        #[source]
        source: IdentityError,
    },

    #[error("no permission type registered for credential type {0}")]
    PermissionNotMapped(String),

    #[error("permission lookup for credential type {credential_type} failed: {reason}")]
    PermissionLookup {
        credential_type: String,
        reason: String,
    },

    #[error("cannot fetch registry of {did} from {url}: {reason}")]
    RegistryFetch {
        did: String,
        url: String,
        reason: String,
    },

    #[error("trust chain exceeds maximum depth {max_depth} at issuer {did}")]
    DepthExceeded { max_depth: usize, did: String },

    #[error("{operation} for {did} timed out after {timeout_ms} ms")]
    HopTimeout {
        operation: &'static str,
        did: String,
        timeout_ms: u64,
    },

    #[error("trust chain verification timed out after {timeout_ms} ms")]
    ChainTimeout { timeout_ms: u64 },
}

impl ChainError {
    /// The DID at which the walk broke, if the error is tied to one.
    pub fn did(&self) -> Option<&str> {
        match self {
            ChainError::Resolution { did, .. }
            | ChainError::RegistryFetch { did, .. }
            | ChainError::DepthExceeded { did, .. }
            | ChainError::HopTimeout { did, .. } => Some(did),
            ChainError::PermissionNotMapped(_)
            | ChainError::PermissionLookup { .. }
            | ChainError::ChainTimeout { .. } => None,
        }
    }
}
