use serde_json::Value;

use vouch_crypto::KeyPair;
use vouch_identity::{SignedVc, UnsignedVc};

use crate::error::CredentialError;

/// Issues verifiable credentials signed by the issuer's keypair.
pub struct CredentialIssuer {
    /// DID of the issuer.
    did: String,
    /// Issuer's signing keypair.
    keypair: KeyPair,
}

impl CredentialIssuer {
    /// Create a new credential issuer.
    pub fn new(did: impl Into<String>, keypair: KeyPair) -> Self {
        Self {
            did: did.into(),
            keypair,
        }
    }

    /// Get the issuer's DID.
    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    /// Issue a credential about `subject_did`.
    ///
    /// `claims` must be a JSON object (or `null` for none); its fields sit
    /// beside the subject `id` in `credentialSubject`.
    pub fn issue(
        &self,
        subject_did: &str,
        credential_type: Vec<String>,
        claims: Value,
    ) -> Result<SignedVc, CredentialError> {
        let claims = match claims {
            Value::Object(map) => map,
            Value::Null => Default::default(),
            other => {
                return Err(CredentialError::IssuanceFailed(format!(
                    "claims must be a JSON object, got {}",
                    other
                )))
            }
        };
        if claims.contains_key("id") {
            return Err(CredentialError::IssuanceFailed(
                "claims must not override the subject id".into(),
            ));
        }

        let unsigned = UnsignedVc::new(self.did.clone(), subject_did, credential_type, claims);
        let signed = SignedVc::sign(unsigned, &self.keypair)
            .map_err(|e| CredentialError::IssuanceFailed(e.to_string()))?;

        tracing::info!(
            issuer = %self.did,
            subject = subject_did,
            credential_type = signed.unsigned().domain_type().unwrap_or_default(),
            proof_type = %signed.proof.proof_type,
            "credential issued"
        );

        Ok(signed)
    }
}
