use serde::{Deserialize, Serialize};
use vouch_core::is_did;
use vouch_crypto::KeyPair;

use crate::error::IdentityError;

/// Service type under which an organization publishes its public registry.
pub const REGISTRY_SERVICE_TYPE: &str = "PublicRegistry";

/// A verification method within a DID Document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Verification method identifier (e.g., "did:vouch:abc#keys-1").
    pub id: String,
    /// Type of the verification method (e.g., "EcdsaSecp256r1VerificationKey2019").
    #[serde(rename = "type")]
    pub method_type: String,
    /// The DID that controls this verification method.
    pub controller: String,
    /// SPKI PEM public key. A method without one cannot verify anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_pem: Option<String>,
}

/// A service endpoint in a DID Document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service identifier (e.g., "did:vouch:abc#registry").
    pub id: String,
    /// Service type (e.g., "PublicRegistry").
    #[serde(rename = "type")]
    pub service_type: String,
    /// Service endpoint URL.
    pub service_endpoint: String,
}

/// W3C-compatible DID Document.
///
/// Built in one go by [`DidDocument::new`] and the consuming `with_*`
/// methods; the validator only ever reads documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    /// The DID subject.
    pub id: String,
    /// DIDs authorized to manage this document.
    #[serde(default)]
    pub controllers: Vec<String>,
    /// Verification methods (public keys) associated with this DID.
    #[serde(default)]
    pub verification_method: Vec<VerificationMethod>,
    /// Verification method ids usable for authentication.
    #[serde(default)]
    pub authentication: Vec<String>,
    /// Verification method ids usable for issuing credentials.
    #[serde(default)]
    pub assertion_method: Vec<String>,
    /// Service endpoints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<Service>,
}

impl DidDocument {
    /// Create a DID Document with a single verification method `#keys-1`,
    /// usable for both authentication and assertion, controlled by itself.
    pub fn new(id: String, method_type: &str, public_key_pem: String) -> Self {
        let key_id = format!("{}#keys-1", id);
        let vm = VerificationMethod {
            id: key_id.clone(),
            method_type: method_type.to_string(),
            controller: id.clone(),
            public_key_pem: Some(public_key_pem),
        };
        Self {
            controllers: vec![id.clone()],
            verification_method: vec![vm],
            authentication: vec![key_id.clone()],
            assertion_method: vec![key_id],
            service: Vec::new(),
            id,
        }
    }

    /// Create a DID Document for the public half of `keypair`.
    pub fn for_keypair(id: String, keypair: &KeyPair) -> Result<Self, IdentityError> {
        let pem = keypair.public_key_pem()?;
        Ok(Self::new(
            id,
            keypair.curve().verification_method_type(),
            pem,
        ))
    }

    /// Add a service endpoint.
    pub fn with_service(mut self, service_type: &str, endpoint: &str) -> Self {
        let idx = self.service.len() + 1;
        self.service.push(Service {
            id: format!("{}#service-{}", self.id, idx),
            service_type: service_type.to_string(),
            service_endpoint: endpoint.to_string(),
        });
        self
    }

    /// Publish the organization's public registry at `endpoint`.
    pub fn with_registry(self, endpoint: &str) -> Self {
        self.with_service(REGISTRY_SERVICE_TYPE, endpoint)
    }

    /// Add an additional controller.
    pub fn with_controller(mut self, did: &str) -> Self {
        if !self.controllers.iter().any(|c| c == did) {
            self.controllers.push(did.to_string());
        }
        self
    }

    /// PEM of the primary (first) verification method, if it has one.
    pub fn primary_public_key_pem(&self) -> Option<&str> {
        self.verification_method
            .first()
            .and_then(|vm| vm.public_key_pem.as_deref())
            .filter(|pem| !pem.trim().is_empty())
    }

    /// Whether the document can never pass a signature check.
    pub fn is_keyless(&self) -> bool {
        self.primary_public_key_pem().is_none()
    }

    /// URL of the organization's public registry.
    ///
    /// Prefers a service typed [`REGISTRY_SERVICE_TYPE`] and falls back to
    /// the first service entry.
    pub fn registry_endpoint(&self) -> Option<&str> {
        self.service
            .iter()
            .find(|s| s.service_type == REGISTRY_SERVICE_TYPE)
            .or_else(|| self.service.first())
            .map(|s| s.service_endpoint.as_str())
    }

    /// Structural checks applied before a document is accepted into a resolver.
    pub fn validate(&self) -> Result<(), IdentityError> {
        if !is_did(&self.id) {
            return Err(IdentityError::InvalidDid(self.id.clone()));
        }
        if let Some(bad) = self.controllers.iter().find(|c| !is_did(c)) {
            return Err(IdentityError::InvalidDid(bad.clone()));
        }
        Ok(())
    }
}
