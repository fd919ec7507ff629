//! Fixtures shared by the integration tests: a three-level accreditation
//! world (ministry → university → student) and a helper to serve an axum
//! router on an ephemeral port.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use vouch_credentials::{CredentialIssuer, PublicRegistry, StaticPermissionMap};
use vouch_crypto::{Curve, KeyPair};
use vouch_identity::{DidDocument, SignedVc};

pub const MINISTRY: &str = "did:vouch:ministry";
pub const UNIVERSITY: &str = "did:vouch:university";
pub const STUDENT: &str = "did:vouch:student";

/// Keys and identities of the three parties.
pub struct World {
    pub ministry: CredentialIssuer,
    pub university: CredentialIssuer,
    pub student: CredentialIssuer,
}

impl World {
    pub fn new() -> Self {
        Self {
            ministry: CredentialIssuer::new(MINISTRY, KeyPair::generate(Curve::P256)),
            university: CredentialIssuer::new(UNIVERSITY, KeyPair::generate(Curve::P256)),
            student: CredentialIssuer::new(STUDENT, KeyPair::generate(Curve::Secp256k1)),
        }
    }

    /// DID Documents for all parties; the university publishes its registry at `registry_url`.
    pub fn documents(&self, registry_url: &str) -> Vec<DidDocument> {
        vec![
            document(&self.ministry),
            document(&self.university).with_registry(registry_url),
            document(&self.student),
        ]
    }

    /// The ministry's grant to the university, of the given type.
    pub fn grant(&self, credential_type: &str) -> SignedVc {
        self.ministry
            .issue(
                UNIVERSITY,
                vec![credential_type.into()],
                serde_json::json!({"scope": "undergraduate"}),
            )
            .expect("grant issuance")
    }

    /// The university's registry holding a single grant of the given type.
    pub fn university_registry(&self, credential_type: &str) -> PublicRegistry {
        let mut registry = PublicRegistry::new();
        registry.add(self.grant(credential_type));
        registry
    }

    /// The student's diploma, issued by the university.
    pub fn diploma(&self) -> SignedVc {
        self.university
            .issue(
                STUDENT,
                vec!["BachelorDegree".into()],
                serde_json::json!({"degree": "BSc Computer Science", "year": 2024}),
            )
            .expect("diploma issuance")
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

pub fn document(issuer: &CredentialIssuer) -> DidDocument {
    DidDocument::for_keypair(issuer.did().to_string(), issuer.keypair()).expect("did document")
}

/// `BachelorDegree` needs `DiplomaIssuing`, which needs `Authorization`.
pub fn permissions() -> StaticPermissionMap {
    StaticPermissionMap::from_pairs([
        ("BachelorDegree", "DiplomaIssuing"),
        ("DiplomaIssuing", "Authorization"),
    ])
}

/// Serve `router` on `127.0.0.1:0` in the background and return its address.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    addr
}

/// A fresh path under the system temp dir.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("vouch-it-{}", rand::random::<u64>()))
        .join(name)
}
