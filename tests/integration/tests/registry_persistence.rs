//! Integration test: public registry persistence and wire format.

use vouch_credentials::PublicRegistry;
use vouch_integration_tests::{temp_path, World, STUDENT, UNIVERSITY};

#[test]
fn test_save_load_preserves_keys_and_order() {
    let world = World::new();
    let mut registry = PublicRegistry::new();
    registry.add(world.grant("Accreditation"));
    registry.add(world.grant("DiplomaIssuing"));
    registry.add(world.diploma());

    let path = temp_path("registry.json");
    registry.save(&path).expect("save");
    let loaded = PublicRegistry::load(&path).expect("load");

    assert_eq!(loaded, registry);
    assert_eq!(loaded.subjects().collect::<Vec<_>>(), vec![STUDENT, UNIVERSITY]);
    let grants = loaded.get(UNIVERSITY);
    assert!(grants[0].has_type("Accreditation"));
    assert!(grants[1].has_type("DiplomaIssuing"));

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn test_loaded_credentials_still_verify() {
    let world = World::new();
    let mut registry = PublicRegistry::new();
    registry.add(world.grant("DiplomaIssuing"));

    let path = temp_path("registry.json");
    registry.save(&path).unwrap();
    let loaded = PublicRegistry::load(&path).unwrap();

    let grant = loaded.find_by_type(UNIVERSITY, "DiplomaIssuing").unwrap();
    let ministry_pem = world.ministry.keypair().public_key_pem().unwrap();
    assert!(grant.verify_with_pem(&ministry_pem));

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn test_wire_format_uses_w3c_field_names() {
    let world = World::new();
    let mut registry = PublicRegistry::new();
    registry.add(world.diploma());

    let json = serde_json::to_value(&registry).unwrap();
    let vc = &json[STUDENT][0];
    assert_eq!(vc["type"][0], "VerifiableCredential");
    assert_eq!(vc["issuer"], UNIVERSITY);
    assert!(vc["issuanceDate"].is_string());
    assert_eq!(vc["credentialSubject"]["id"], STUDENT);
    assert_eq!(vc["credentialSubject"]["degree"], "BSc Computer Science");
    assert_eq!(vc["proof"]["proofPurpose"], "assertionMethod");
    assert!(vc["proof"]["signatureValue"].is_string());
}
