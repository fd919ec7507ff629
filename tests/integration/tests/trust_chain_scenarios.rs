//! Integration test: trust-chain verification across crates.
//!
//! Walks ministry → university → student chains using in-memory DID
//! resolution and statically published registries.

use std::sync::Arc;

use serde_json::json;
use vouch_core::ChainLimits;
use vouch_credentials::{
    ChainError, ChainOutcome, CredentialIssuer, PublicRegistry, StaticRegistryFetcher,
    StaticRoots, TrustChainValidator,
};
use vouch_crypto::{Curve, KeyPair};
use vouch_identity::{InMemoryDidResolver, SignedVc};
use vouch_integration_tests::{document, permissions, World, MINISTRY, STUDENT, UNIVERSITY};

const UNI_REGISTRY: &str = "https://university.example/registry";

fn validator(world: &World, registry: PublicRegistry) -> TrustChainValidator {
    let fetcher = StaticRegistryFetcher::new();
    fetcher.publish(UNI_REGISTRY, registry);
    TrustChainValidator::new(
        Arc::new(InMemoryDidResolver::from_documents(world.documents(UNI_REGISTRY))),
        Arc::new(permissions()),
        Arc::new(StaticRoots::new([MINISTRY])),
        Arc::new(fetcher),
        ChainLimits::default(),
    )
}

async fn verify(validator: &TrustChainValidator, vc: Option<&SignedVc>) -> ChainOutcome {
    validator
        .verify_trustchain(vc)
        .await
        .expect("walk should reach a verdict")
}

// =========================================================================
// Scenarios
// =========================================================================

#[tokio::test]
async fn test_accredited_university_diploma_is_valid() {
    let world = World::new();
    let validator = validator(&world, world.university_registry("DiplomaIssuing"));

    let report = validator.walk(Some(&world.diploma())).await.unwrap();
    assert_eq!(report.outcome, ChainOutcome::Valid);
    assert_eq!(report.hops, vec![UNIVERSITY, MINISTRY]);
}

#[tokio::test]
async fn test_self_issued_diploma_with_wrong_key() {
    let world = World::new();
    let validator = validator(&world, world.university_registry("DiplomaIssuing"));

    // The student claims to have issued their own diploma but signs with a key
    // that is not in their DID Document.
    let forged = CredentialIssuer::new(STUDENT, KeyPair::generate(Curve::Secp256k1))
        .issue(STUDENT, vec!["BachelorDegree".into()], json!({}))
        .unwrap();

    assert_eq!(
        verify(&validator, Some(&forged)).await,
        ChainOutcome::InvalidSignature(STUDENT.into())
    );
}

#[tokio::test]
async fn test_university_holds_wrong_credential_type() {
    let world = World::new();
    let validator = validator(&world, world.university_registry("NotWhatYouNeed"));

    let outcome = verify(&validator, Some(&world.diploma())).await;
    assert_eq!(outcome, ChainOutcome::MissingPermission(UNIVERSITY.into()));
    assert!(outcome.message().contains(UNIVERSITY));
}

#[tokio::test]
async fn test_nothing_submitted() {
    let world = World::new();
    let validator = validator(&world, PublicRegistry::new());
    assert_eq!(verify(&validator, None).await, ChainOutcome::MissingInput);
}

// =========================================================================
// Properties
// =========================================================================

#[tokio::test]
async fn test_any_root_signed_credential_is_valid() {
    let world = World::new();
    let validator = validator(&world, PublicRegistry::new());

    for credential_type in ["DiplomaIssuing", "Authorization", "Unmapped"] {
        let vc = world
            .ministry
            .issue(STUDENT, vec![credential_type.into()], json!({"n": 1}))
            .unwrap();
        assert_eq!(verify(&validator, Some(&vc)).await, ChainOutcome::Valid);
    }
}

#[tokio::test]
async fn test_missing_vc_type_wins_over_signature() {
    let world = World::new();
    let validator = validator(&world, world.university_registry("DiplomaIssuing"));

    let mut signed_ok = world.diploma();
    signed_ok.credential.types = vec!["BachelorDegree".into()];
    assert_eq!(
        verify(&validator, Some(&signed_ok)).await,
        ChainOutcome::InvalidType(STUDENT.into())
    );

    let mut bad_signature = signed_ok.clone();
    bad_signature.proof.signature_value = "AAAA".into();
    assert_eq!(
        verify(&validator, Some(&bad_signature)).await,
        ChainOutcome::InvalidType(STUDENT.into())
    );
}

#[tokio::test]
async fn test_claim_tampering_is_detected() {
    let world = World::new();
    let validator = validator(&world, world.university_registry("DiplomaIssuing"));

    let mut vc = world.diploma();
    vc.credential
        .credential_subject
        .claims
        .insert("degree".into(), json!("PhD Computer Science"));
    assert_eq!(
        verify(&validator, Some(&vc)).await,
        ChainOutcome::InvalidSignature(STUDENT.into())
    );
}

#[tokio::test]
async fn test_grant_to_other_subject_does_not_authorize() {
    let world = World::new();
    // The ministry's grant sits in the university's registry but names someone else.
    let mut registry = PublicRegistry::new();
    registry.add(
        world
            .ministry
            .issue("did:vouch:other-university", vec!["DiplomaIssuing".into()], json!({}))
            .unwrap(),
    );
    let validator = validator(&world, registry);

    assert_eq!(
        verify(&validator, Some(&world.diploma())).await,
        ChainOutcome::MissingPermission(UNIVERSITY.into())
    );
}

#[tokio::test]
async fn test_first_matching_grant_is_used() {
    let world = World::new();
    let mut registry = PublicRegistry::new();
    registry.add(world.grant("Accreditation"));
    registry.add(world.grant("DiplomaIssuing"));
    registry.add(world.grant("DiplomaIssuing"));
    let validator = validator(&world, registry);

    let report = validator.walk(Some(&world.diploma())).await.unwrap();
    assert!(report.outcome.is_valid());
    assert_eq!(report.depth, 1);
}

#[tokio::test]
async fn test_non_root_grantor_needs_its_own_grant() {
    let world = World::new();
    // A grant signed by an unaccredited party resolves nowhere.
    let rogue = CredentialIssuer::new("did:vouch:rogue", KeyPair::generate(Curve::P256));
    let mut registry = PublicRegistry::new();
    registry.add(
        rogue
            .issue(UNIVERSITY, vec!["DiplomaIssuing".into()], json!({}))
            .unwrap(),
    );
    let validator = validator(&world, registry);

    let err = validator
        .verify_trustchain(Some(&world.diploma()))
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::Resolution { ref did, .. } if did == "did:vouch:rogue"));
}

// =========================================================================
// Multi-level chains
// =========================================================================

const REGION: &str = "did:vouch:region";
const REGION_REGISTRY: &str = "https://region.example/registry";

/// ministry → region → university → student, each intermediate publishing
/// its own registry. The region holds a ministry grant of `region_grant`.
fn regional_validator(
    world: &World,
    region: &CredentialIssuer,
    region_grant: &str,
) -> TrustChainValidator {
    let mut region_registry = PublicRegistry::new();
    region_registry.add(
        world
            .ministry
            .issue(REGION, vec![region_grant.into()], json!({}))
            .unwrap(),
    );
    let mut uni_registry = PublicRegistry::new();
    uni_registry.add(
        region
            .issue(UNIVERSITY, vec!["DiplomaIssuing".into()], json!({}))
            .unwrap(),
    );

    let fetcher = StaticRegistryFetcher::new();
    fetcher.publish(REGION_REGISTRY, region_registry);
    fetcher.publish(UNI_REGISTRY, uni_registry);

    let mut documents = world.documents(UNI_REGISTRY);
    documents.push(document(region).with_registry(REGION_REGISTRY));

    TrustChainValidator::new(
        Arc::new(InMemoryDidResolver::from_documents(documents)),
        Arc::new(permissions()),
        Arc::new(StaticRoots::new([MINISTRY])),
        Arc::new(fetcher),
        ChainLimits::default(),
    )
}

#[tokio::test]
async fn test_three_level_chain_is_valid() {
    let world = World::new();
    let region = CredentialIssuer::new(REGION, KeyPair::generate(Curve::Secp256k1));
    let validator = regional_validator(&world, &region, "Authorization");

    let report = validator.walk(Some(&world.diploma())).await.unwrap();
    assert_eq!(report.outcome, ChainOutcome::Valid);
    assert_eq!(report.depth, 2);
    assert_eq!(report.hops, vec![UNIVERSITY, REGION, MINISTRY]);
}

#[tokio::test]
async fn test_intermediate_without_authorization() {
    let world = World::new();
    let region = CredentialIssuer::new(REGION, KeyPair::generate(Curve::P256));
    let validator = regional_validator(&world, &region, "NotWhatYouNeed");

    let report = validator.walk(Some(&world.diploma())).await.unwrap();
    assert_eq!(report.outcome, ChainOutcome::MissingPermission(REGION.into()));
    assert_eq!(report.depth, 1);
    assert_eq!(report.hops, vec![UNIVERSITY, REGION]);
}

#[tokio::test]
async fn test_vc_tag_last_walks_the_chain() {
    let world = World::new();
    let validator = validator(&world, world.university_registry("DiplomaIssuing"));

    let vc = world
        .university
        .issue(
            STUDENT,
            vec!["BachelorDegree".into(), "VerifiableCredential".into()],
            json!({}),
        )
        .unwrap();
    assert_eq!(verify(&validator, Some(&vc)).await, ChainOutcome::Valid);
}
