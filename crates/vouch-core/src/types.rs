/// Type tag every verifiable credential must carry in its `type` list.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Cheap syntactic check for `did:<method>:<method-specific-id>`.
///
/// Only the shape is checked; whether the DID exists is the resolver's job.
pub fn is_did(candidate: &str) -> bool {
    let mut parts = candidate.splitn(3, ':');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some("did"), Some(method), Some(id)) if !method.is_empty() && !id.is_empty()
    )
}
