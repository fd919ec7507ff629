use p256::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// Elliptic curves supported for credential signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    /// NIST P-256 (secp256r1).
    P256,
    /// secp256k1.
    Secp256k1,
}

impl Curve {
    /// Linked-data proof type for signatures on this curve.
    pub fn proof_type(&self) -> &'static str {
        match self {
            Curve::P256 => "EcdsaSecp256r1Signature2019",
            Curve::Secp256k1 => "EcdsaSecp256k1Signature2019",
        }
    }

    /// Verification method type for keys on this curve.
    pub fn verification_method_type(&self) -> &'static str {
        match self {
            Curve::P256 => "EcdsaSecp256r1VerificationKey2019",
            Curve::Secp256k1 => "EcdsaSecp256k1VerificationKey2019",
        }
    }
}

#[derive(Clone)]
enum SigningKey {
    P256(p256::ecdsa::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
}

/// ECDSA key pair for signing credentials.
///
/// The underlying signing keys zeroize their scalar on drop.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair using OS-provided entropy.
    pub fn generate(curve: Curve) -> Self {
        let signing_key = match curve {
            Curve::P256 => SigningKey::P256(p256::ecdsa::SigningKey::random(&mut OsRng)),
            Curve::Secp256k1 => {
                SigningKey::Secp256k1(k256::ecdsa::SigningKey::random(&mut OsRng))
            }
        };
        Self { signing_key }
    }

    /// Load a PKCS#8 PEM private key. The curve is taken from the key itself.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, CryptoError> {
        if let Ok(key) = p256::ecdsa::SigningKey::from_pkcs8_pem(pem) {
            return Ok(Self {
                signing_key: SigningKey::P256(key),
            });
        }
        k256::ecdsa::SigningKey::from_pkcs8_pem(pem)
            .map(|key| Self {
                signing_key: SigningKey::Secp256k1(key),
            })
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))
    }

    /// Export the private key as PKCS#8 PEM.
    pub fn to_pkcs8_pem(&self) -> Result<String, CryptoError> {
        let pem = match &self.signing_key {
            SigningKey::P256(key) => key.to_pkcs8_pem(LineEnding::LF),
            SigningKey::Secp256k1(key) => key.to_pkcs8_pem(LineEnding::LF),
        }
        .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
        Ok((*pem).clone())
    }

    pub fn curve(&self) -> Curve {
        match self.signing_key {
            SigningKey::P256(_) => Curve::P256,
            SigningKey::Secp256k1(_) => Curve::Secp256k1,
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        match &self.signing_key {
            SigningKey::P256(key) => PublicKey::P256(key.verifying_key().clone()),
            SigningKey::Secp256k1(key) => PublicKey::Secp256k1(key.verifying_key().clone()),
        }
    }

    /// SPKI PEM of the public key, as published in a DID Document.
    pub fn public_key_pem(&self) -> Result<String, CryptoError> {
        self.public_key().to_pem()
    }

    pub(crate) fn p256(&self) -> Option<&p256::ecdsa::SigningKey> {
        match &self.signing_key {
            SigningKey::P256(key) => Some(key),
            SigningKey::Secp256k1(_) => None,
        }
    }

    pub(crate) fn secp256k1(&self) -> Option<&k256::ecdsa::SigningKey> {
        match &self.signing_key {
            SigningKey::Secp256k1(key) => Some(key),
            SigningKey::P256(_) => None,
        }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("curve", &self.curve())
            .finish_non_exhaustive()
    }
}

/// ECDSA public key for verification operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    P256(p256::ecdsa::VerifyingKey),
    Secp256k1(k256::ecdsa::VerifyingKey),
}

impl PublicKey {
    /// Parse an SPKI PEM public key, detecting the curve from its OID.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        if let Ok(key) = p256::ecdsa::VerifyingKey::from_public_key_pem(pem) {
            return Ok(PublicKey::P256(key));
        }
        k256::ecdsa::VerifyingKey::from_public_key_pem(pem)
            .map(PublicKey::Secp256k1)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    /// Encode as SPKI PEM.
    pub fn to_pem(&self) -> Result<String, CryptoError> {
        match self {
            PublicKey::P256(key) => key.to_public_key_pem(LineEnding::LF),
            PublicKey::Secp256k1(key) => key.to_public_key_pem(LineEnding::LF),
        }
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    pub fn curve(&self) -> Curve {
        match self {
            PublicKey::P256(_) => Curve::P256,
            PublicKey::Secp256k1(_) => Curve::Secp256k1,
        }
    }
}
