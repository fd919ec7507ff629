//! Vouch Crypto — the canonical signature codec.
//!
//! Credential bodies are serialized with the JSON Canonicalization Scheme
//! (RFC 8785), hashed with SHA-256 and signed with ECDSA over either NIST
//! P-256 or secp256k1. The curve is fixed by the key; public keys travel as
//! SPKI PEM inside DID Documents and signatures as base64-encoded DER.

pub mod canonical;
pub mod error;
pub mod keys;
pub mod signing;

pub use canonical::canonicalize;
pub use error::CryptoError;
pub use keys::{Curve, KeyPair, PublicKey};
pub use signing::{digest, sign_payload, try_verify_payload, verify_payload};
