//! Vouch Core — constants, limits, and errors shared by every layer of the
//! Vouch trust-chain verifier.

pub mod config;
pub mod error;
pub mod types;

pub use config::ChainLimits;
pub use error::CoreError;
pub use types::{is_did, VERIFIABLE_CREDENTIAL_TYPE};
