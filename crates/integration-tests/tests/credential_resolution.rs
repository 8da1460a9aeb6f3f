//! Integration tests for credential source precedence.
//!
//! The environment source is passed in explicitly so these tests never touch
//! the process environment.

use secrecy::ExposeSecret;
use shopnado_cli::resolver::resolve;
use shopnado_cli::{CredentialInput, CredentialSource, ProfileSelector, ResolveError};
use shopnado_core::Profile;
use shopnado_integration_tests::TempStore;

fn input(shop: &str, key: &str, password: &str) -> CredentialInput {
    CredentialInput {
        shop_name: Some(shop.to_owned()),
        api_key: Some(key.to_owned()),
        api_password: Some(password.to_owned()),
    }
}

fn store_with_default(tmp: &TempStore) -> ProfileSelector {
    tmp.store()
        .create("default", Profile::new("store-shop", "store-key", "store-pw"))
        .expect("create profile");
    ProfileSelector {
        config: tmp.config(),
        profile: "default".to_owned(),
    }
}

#[test]
fn test_all_sources_environment_wins() {
    let tmp = TempStore::new();
    let selector = store_with_default(&tmp);

    let creds = resolve(
        &input("env-shop", "env-key", "env-pw"),
        &input("flag-shop", "flag-key", "flag-pw"),
        &selector,
    )
    .expect("resolve");

    assert_eq!(creds.shop_name(), "env-shop");
    assert_eq!(creds.api_key(), "env-key");
    assert_eq!(creds.api_password().expose_secret(), "env-pw");
}

#[test]
fn test_flags_beat_store() {
    let tmp = TempStore::new();
    let selector = store_with_default(&tmp);

    let creds = resolve(
        &CredentialInput::default(),
        &input("flag-shop", "flag-key", "flag-pw"),
        &selector,
    )
    .expect("resolve");

    assert_eq!(creds.source(), &CredentialSource::Flags);
    assert_eq!(creds.shop_name(), "flag-shop");
}

#[test]
fn test_no_mixing_across_sources() {
    let tmp = TempStore::new();
    let selector = store_with_default(&tmp);

    // Together env and flags cover every field, but neither alone does.
    let env = CredentialInput {
        shop_name: Some("env-shop".to_owned()),
        api_key: Some("env-key".to_owned()),
        api_password: None,
    };
    let flags = CredentialInput {
        shop_name: None,
        api_key: None,
        api_password: Some("flag-pw".to_owned()),
    };

    let creds = resolve(&env, &flags, &selector).expect("resolve");

    assert_eq!(creds.shop_name(), "store-shop");
    assert_eq!(creds.api_key(), "store-key");
    assert_eq!(creds.api_password().expose_secret(), "store-pw");
}

#[test]
fn test_store_only() {
    let tmp = TempStore::new();
    let selector = store_with_default(&tmp);

    let creds = resolve(&CredentialInput::default(), &CredentialInput::default(), &selector)
        .expect("resolve");

    assert_eq!(
        creds.source(),
        &CredentialSource::Profile {
            name: "default".to_owned()
        }
    );
    assert_eq!(creds.host(), "store-shop.myshopify.com");
}

#[test]
fn test_named_profile_absent() {
    let tmp = TempStore::new();
    let mut selector = store_with_default(&tmp);
    selector.profile = "production".to_owned();

    let err = resolve(&CredentialInput::default(), &CredentialInput::default(), &selector)
        .expect_err("missing profile");

    assert!(matches!(err, ResolveError::ProfileMissing { .. }));
    assert_eq!(
        err.to_string(),
        format!("no profile production in {}", tmp.config())
    );
}

#[test]
fn test_nothing_available() {
    let tmp = TempStore::new();
    let selector = ProfileSelector {
        config: tmp.config(),
        profile: "default".to_owned(),
    };

    let err = resolve(&CredentialInput::default(), &CredentialInput::default(), &selector)
        .expect_err("no source");

    let message = err.to_string();
    assert!(message.contains("environment"));
    assert!(message.contains("flags"));
    assert!(message.contains(&tmp.config()));
}

#[test]
fn test_corrupt_store_is_reported() {
    let tmp = TempStore::new();
    std::fs::write(tmp.store().path(), "default: [not, a, profile\n").expect("write");
    let selector = ProfileSelector {
        config: tmp.config(),
        profile: "default".to_owned(),
    };

    let err = resolve(&CredentialInput::default(), &CredentialInput::default(), &selector)
        .expect_err("corrupt store");

    assert!(matches!(err, ResolveError::Store(_)));
}
