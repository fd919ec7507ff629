use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vouch_core::VERIFIABLE_CREDENTIAL_TYPE;
use vouch_crypto::{sign_payload, try_verify_payload, verify_payload, CryptoError, KeyPair};

use crate::error::IdentityError;

/// The subject of a credential: a fixed `id` plus opaque claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubject {
    /// DID of the subject.
    #[serde(default)]
    pub id: String,
    /// Domain-specific claims, flattened next to `id` on the wire.
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl CredentialSubject {
    pub fn new(id: impl Into<String>, claims: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            claims,
        }
    }
}

/// The signed payload of a credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedVc {
    /// Ordered type tags; must contain `"VerifiableCredential"`.
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
    /// DID of the issuer.
    #[serde(default)]
    pub issuer: String,
    /// Opaque issuance timestamp.
    #[serde(default)]
    pub issuance_date: String,
    /// Subject of the claim.
    pub credential_subject: CredentialSubject,
}

impl UnsignedVc {
    /// Create a credential body stamped with the current time.
    ///
    /// `"VerifiableCredential"` is prepended unless already present.
    pub fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        credential_type: Vec<String>,
        claims: Map<String, Value>,
    ) -> Self {
        let mut types = Vec::with_capacity(credential_type.len() + 1);
        if !credential_type
            .iter()
            .any(|t| t == VERIFIABLE_CREDENTIAL_TYPE)
        {
            types.push(VERIFIABLE_CREDENTIAL_TYPE.to_string());
        }
        types.extend(credential_type);

        Self {
            types,
            issuer: issuer.into(),
            issuance_date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            credential_subject: CredentialSubject::new(subject, claims),
        }
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    pub fn is_verifiable_credential(&self) -> bool {
        self.has_type(VERIFIABLE_CREDENTIAL_TYPE)
    }

    /// The most specific type tag: the last entry of `type` other than
    /// `"VerifiableCredential"`, wherever that tag sits in the list.
    pub fn domain_type(&self) -> Option<&str> {
        self.types
            .iter()
            .rev()
            .find(|t| *t != VERIFIABLE_CREDENTIAL_TYPE)
            .map(String::as_str)
    }

    pub fn subject(&self) -> &str {
        &self.credential_subject.id
    }
}

/// Proof attached to a signed credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Proof type (e.g., "EcdsaSecp256r1Signature2019").
    #[serde(rename = "type")]
    pub proof_type: String,
    /// When the proof was created.
    pub created: String,
    /// Why the proof was made; always "assertionMethod" for issued credentials.
    pub proof_purpose: String,
    /// DID URL of the signing key (e.g., "did:vouch:uni#keys-1").
    pub verification_method: String,
    /// Base64 signature over the canonical unsigned credential.
    pub signature_value: String,
}

/// A credential together with its proof.
///
/// On the wire the credential fields sit next to `proof`; the proof is never
/// part of the signed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedVc {
    #[serde(flatten)]
    pub credential: UnsignedVc,
    #[serde(default)]
    pub proof: Proof,
}

impl SignedVc {
    /// Sign `credential` with the issuer's keypair.
    pub fn sign(credential: UnsignedVc, keypair: &KeyPair) -> Result<Self, IdentityError> {
        if credential.issuer.is_empty() {
            return Err(IdentityError::CredentialIssuance(
                "credential has no issuer".into(),
            ));
        }
        let signature_value = sign_payload(&credential, keypair)?;
        let proof = Proof {
            proof_type: keypair.curve().proof_type().to_string(),
            created: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            proof_purpose: "assertionMethod".to_string(),
            verification_method: format!("{}#keys-1", credential.issuer),
            signature_value,
        };
        Ok(Self { credential, proof })
    }

    /// The signed payload.
    pub fn unsigned(&self) -> &UnsignedVc {
        &self.credential
    }

    pub fn issuer(&self) -> &str {
        &self.credential.issuer
    }

    pub fn subject(&self) -> &str {
        self.credential.subject()
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.credential.has_type(tag)
    }

    /// Check the proof against an SPKI PEM public key.
    pub fn verify_with_pem(&self, public_key_pem: &str) -> bool {
        verify_payload(&self.credential, &self.proof.signature_value, public_key_pem)
    }

    /// Like [`SignedVc::verify_with_pem`] but reports the failure reason.
    pub fn try_verify_with_pem(&self, public_key_pem: &str) -> Result<(), CryptoError> {
        try_verify_payload(&self.credential, &self.proof.signature_value, public_key_pem)
    }
}
