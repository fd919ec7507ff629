/// Identity-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("DID not found: {0}")]
    DidNotFound(String),

    #[error("invalid DID format: {0}")]
    InvalidDid(String),

    #[error("DID resolution failed: {0}")]
    DidResolution(String),

    #[error("credential issuance failed: {0}")]
    CredentialIssuance(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] vouch_crypto::CryptoError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
