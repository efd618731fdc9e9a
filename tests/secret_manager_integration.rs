mod common;

use std::sync::Arc;

use procurement_backend::config::{ConfigError, MockEnvironment, SecretManager};
use procurement_backend::providers::TokenProvider;

#[test]
fn test_startup_with_valid_secrets() {
    let secret_manager = SecretManager::init_with_env(&common::test_env())
        .expect("SecretManager should initialize with valid secrets");

    assert_eq!(secret_manager.jwt_secret(), common::TEST_JWT_SECRET);
    assert_eq!(secret_manager.pepper(), common::TEST_PEPPER);
}

#[test]
fn test_startup_fails_with_missing_jwt_secret() {
    let env = MockEnvironment::empty().with_var("PASSWORD_PEPPER", common::TEST_PEPPER);

    match SecretManager::init_with_env(&env) {
        Err(ConfigError::Missing { setting_name }) => assert_eq!(setting_name, "JWT_SECRET"),
        Err(other) => panic!("Expected Missing error, got {:?}", other),
        Ok(_) => panic!("SecretManager should fail when JWT_SECRET is missing"),
    }
}

#[test]
fn test_startup_fails_with_short_pepper() {
    let env = MockEnvironment::empty()
        .with_var("JWT_SECRET", common::TEST_JWT_SECRET)
        .with_var("PASSWORD_PEPPER", "short");

    match SecretManager::init_with_env(&env) {
        Err(ConfigError::SecretTooShort {
            secret_name,
            expected,
            actual,
        }) => {
            assert_eq!(secret_name, "PASSWORD_PEPPER");
            assert_eq!(expected, 16);
            assert_eq!(actual, 5);
        }
        Err(other) => panic!("Expected SecretTooShort error, got {:?}", other),
        Ok(_) => panic!("SecretManager should reject a short pepper"),
    }
}

#[test]
fn test_tokens_validate_across_providers_sharing_secrets() {
    let secret_manager = Arc::new(SecretManager::init_with_env(&common::test_env()).unwrap());
    let issuer = TokenProvider::new(secret_manager.clone());
    let verifier = TokenProvider::new(secret_manager);

    let issued = issuer
        .generate_jwt("user-1", "user@example.mx", vec!["ordenes.crear".to_string()])
        .unwrap();
    let claims = verifier.validate_jwt(&issued.token).unwrap();

    assert_eq!(claims.sub, "user-1");
    assert_eq!(claims.jti, issued.jti);
    assert_eq!(claims.permisos, vec!["ordenes.crear"]);
}

#[test]
fn test_tokens_from_other_secret_are_rejected() {
    let ours = TokenProvider::new(Arc::new(SecretManager::init_with_env(&common::test_env()).unwrap()));
    let theirs = TokenProvider::new(Arc::new(
        SecretManager::init_with_env(
            &MockEnvironment::empty()
                .with_var("JWT_SECRET", "a-completely-different-secret-of-32+")
                .with_var("PASSWORD_PEPPER", common::TEST_PEPPER),
        )
        .unwrap(),
    ));

    let issued = theirs
        .generate_jwt("user-1", "user@example.mx", vec![])
        .unwrap();

    assert!(ours.validate_jwt(&issued.token).is_err());
}
