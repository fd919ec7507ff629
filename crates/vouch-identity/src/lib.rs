//! Vouch Identity Layer
//!
//! Record shapes and lookups for the decentralised identity side of Vouch:
//! - DID Documents (W3C-compatible, PEM verification keys, registry service endpoint)
//! - Unsigned and signed Verifiable Credentials with ECDSA proofs
//! - DID resolution (in-memory, ledger gateway over HTTP, composite)

pub mod credentials;
pub mod did_resolver;
pub mod document;
pub mod error;

pub use credentials::{CredentialSubject, Proof, SignedVc, UnsignedVc};
pub use did_resolver::{CompositeDidResolver, DidResolver, HttpDidResolver, InMemoryDidResolver};
pub use document::{DidDocument, Service, VerificationMethod, REGISTRY_SERVICE_TYPE};
pub use error::IdentityError;
