//! Vouch Credentials — public registries, type authorization, issuer,
//! single-hop verifier, and the trust-chain validator.

pub mod error;
pub mod fetcher;
pub mod issuer;
pub mod permissions;
pub mod registry;
pub mod roots;
pub mod trust_chain;
pub mod verifier;

pub use error::{ChainError, CredentialError};
pub use fetcher::{HttpRegistryFetcher, RegistryFetcher, StaticRegistryFetcher};
pub use issuer::CredentialIssuer;
pub use permissions::{HttpPermissionResolver, PermissionResolver, StaticPermissionMap};
pub use registry::PublicRegistry;
pub use roots::{RootPolicy, StaticRoots};
pub use trust_chain::{ChainOutcome, ChainReport, TrustChainValidator};
pub use verifier::{CredentialVerifier, SignatureCheck};
