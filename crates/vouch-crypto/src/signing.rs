use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical::canonicalize;
use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};

/// SHA-256 digest of arbitrary bytes.
pub fn digest(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Sign the canonical form of `payload`, returning a base64 DER signature.
pub fn sign_payload<T: Serialize + ?Sized>(
    payload: &T,
    keypair: &KeyPair,
) -> Result<String, CryptoError> {
    let bytes = canonicalize(payload)?;
    sign_bytes(&bytes, keypair)
}

/// Verify a base64 signature over the canonical form of `payload`.
///
/// Malformed keys or signatures are a failed verification, never a panic.
pub fn verify_payload<T: Serialize + ?Sized>(
    payload: &T,
    signature_b64: &str,
    public_key_pem: &str,
) -> bool {
    match try_verify_payload(payload, signature_b64, public_key_pem) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "signature rejected");
            false
        }
    }
}

/// Like [`verify_payload`] but reports why verification failed.
pub fn try_verify_payload<T: Serialize + ?Sized>(
    payload: &T,
    signature_b64: &str,
    public_key_pem: &str,
) -> Result<(), CryptoError> {
    let public_key = PublicKey::from_pem(public_key_pem)?;
    let bytes = canonicalize(payload)?;
    verify_bytes(&bytes, signature_b64, &public_key)
}

pub(crate) fn sign_bytes(message: &[u8], keypair: &KeyPair) -> Result<String, CryptoError> {
    let prehash = digest(message);
    let der = if let Some(key) = keypair.p256() {
        let sig: p256::ecdsa::Signature = key
            .sign_prehash(&prehash)
            .map_err(|e| CryptoError::SigningError(e.to_string()))?;
        sig.to_der().as_bytes().to_vec()
    } else if let Some(key) = keypair.secp256k1() {
        let sig: k256::ecdsa::Signature = key
            .sign_prehash(&prehash)
            .map_err(|e| CryptoError::SigningError(e.to_string()))?;
        sig.to_der().as_bytes().to_vec()
    } else {
        return Err(CryptoError::SigningError("unsupported key".into()));
    };
    Ok(BASE64.encode(der))
}

pub(crate) fn verify_bytes(
    message: &[u8],
    signature_b64: &str,
    public_key: &PublicKey,
) -> Result<(), CryptoError> {
    let raw = BASE64
        .decode(signature_b64.trim())
        .map_err(|e| CryptoError::InvalidSignature(format!("invalid base64: {}", e)))?;
    let prehash = digest(message);

    match public_key {
        PublicKey::P256(key) => {
            let sig = p256::ecdsa::Signature::from_der(&raw)
                .or_else(|_| p256::ecdsa::Signature::from_slice(&raw))
                .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
            key.verify_prehash(&prehash, &sig)
                .map_err(|_| CryptoError::SignatureVerificationFailed)
        }
        PublicKey::Secp256k1(key) => {
            let sig = k256::ecdsa::Signature::from_der(&raw)
                .or_else(|_| k256::ecdsa::Signature::from_slice(&raw))
                .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
            // k256 only accepts low-S signatures; other signers may emit high-S.
            let sig = sig.normalize_s().unwrap_or(sig);
            key.verify_prehash(&prehash, &sig)
                .map_err(|_| CryptoError::SignatureVerificationFailed)
        }
    }
}
