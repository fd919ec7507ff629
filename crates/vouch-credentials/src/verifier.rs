use std::sync::Arc;

use vouch_identity::{DidDocument, DidResolver, SignedVc};

use crate::error::CredentialError;

/// Result of a single-hop signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCheck {
    /// Whether the proof matches the issuer's published key.
    pub valid: bool,
    /// DID of the issuer whose key was used.
    pub issuer: String,
    /// DID of the credential subject.
    pub subject: String,
}

impl SignatureCheck {
    pub fn message(&self) -> String {
        if self.valid {
            format!(
                "signature of credential for {} is valid under issuer {}",
                self.subject, self.issuer
            )
        } else {
            format!(
                "signature of credential for {} does not match issuer {}",
                self.subject, self.issuer
            )
        }
    }
}

/// Checks a credential's proof against its issuer's DID Document.
///
/// This is one hop of the trust chain: the issuer's own authority is not
/// examined.
pub struct CredentialVerifier {
    resolver: Arc<dyn DidResolver>,
}

impl CredentialVerifier {
    pub fn new(resolver: Arc<dyn DidResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve the issuer and verify the proof.
    ///
    /// A missing issuer, an unresolvable issuer, or an issuer without a key
    /// are errors; a signature mismatch is a negative check.
    pub async fn verify_signature(
        &self,
        credential: &SignedVc,
    ) -> Result<SignatureCheck, CredentialError> {
        let issuer = credential.issuer();
        if issuer.is_empty() {
            return Err(CredentialError::MissingIssuer);
        }

        let document = self.resolver.resolve(issuer).await?;
        if document.is_keyless() {
            return Err(CredentialError::KeylessIssuer(issuer.to_string()));
        }

        Ok(SignatureCheck {
            valid: signature_matches(credential, &document),
            issuer: issuer.to_string(),
            subject: credential.subject().to_string(),
        })
    }
}

/// Whether `credential` was signed by the primary key of `issuer`.
///
/// Keyless documents and malformed keys never match.
pub(crate) fn signature_matches(credential: &SignedVc, issuer: &DidDocument) -> bool {
    let Some(pem) = issuer.primary_public_key_pem() else {
        tracing::debug!(issuer = %issuer.id, "issuer document has no public key");
        return false;
    };
    match credential.try_verify_with_pem(pem) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(
                issuer = %issuer.id,
                subject = credential.subject(),
                error = %e,
                "signature rejected"
            );
            false
        }
    }
}
