// SPDX-License-Identifier: Apache-2.0

//! Integration tests for config loading and credential resolution.
//!
//! These tests mutate process environment variables and run serially.

use bugsnag_core::{
    AuthType, BugsnagError, ConfigDocument, ConfigStore, OrganizationRef, Overrides, Resolver,
    TokenSource,
};
use secrecy::{ExposeSecret, SecretString};
use serial_test::serial;
use tempfile::TempDir;

fn written_store(dir: &TempDir) -> ConfigStore {
    let store = ConfigStore::with_path(dir.path().join(".bugsnag").join(".config.yml"));
    store
        .write(&ConfigDocument {
            api_endpoint: "https://api.example.com".to_string(),
            login: "alice@example.com".to_string(),
            organization: OrganizationRef {
                id: "o1".to_string(),
                name: "Acme".to_string(),
            },
        })
        .unwrap();
    store
}

/// Sets an environment variable for the lifetime of the guard.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            std::env::set_var(key, value);
        }
        Self(key)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            std::env::remove_var(self.0);
        }
    }
}

#[test]
#[serial]
fn test_environment_token_resolves_against_written_config() {
    let dir = TempDir::new().unwrap();
    let store = written_store(&dir);
    let _token = EnvGuard::set("BUGSNAG_API_TOKEN", "env-token");

    let resolver = Resolver::new(store.read().unwrap());
    let profile = resolver.resolve(&Overrides::default()).unwrap();

    assert_eq!(profile.api_endpoint, "https://api.example.com");
    assert_eq!(profile.login, "alice@example.com");
    assert_eq!(profile.api_token.expose_secret(), "env-token");
    assert_eq!(profile.token_source, TokenSource::Settings);
    assert_eq!(profile.auth_type, AuthType::Token);
    assert_eq!(profile.organization.unwrap().name, "Acme");
}

#[test]
#[serial]
fn test_environment_auth_type_and_login_override_file() {
    let dir = TempDir::new().unwrap();
    let store = written_store(&dir);
    let _auth = EnvGuard::set("BUGSNAG_AUTH_TYPE", "basic");
    let _login = EnvGuard::set("BUGSNAG_LOGIN", "bob@example.com");

    let resolver = Resolver::new(store.read().unwrap());
    let profile = resolver
        .resolve(&Overrides {
            api_token: Some(SecretString::from("flag-token")),
            ..Overrides::default()
        })
        .unwrap();

    assert_eq!(profile.auth_type, AuthType::Basic);
    assert_eq!(profile.login, "bob@example.com");
    assert_eq!(profile.token_source, TokenSource::Explicit);
}

#[test]
#[serial]
fn test_empty_environment_token_is_unset() {
    let dir = TempDir::new().unwrap();
    let store = written_store(&dir);
    let _token = EnvGuard::set("BUGSNAG_API_TOKEN", "");

    let resolver = Resolver::new(store.read().unwrap());
    let err = resolver.resolve(&Overrides::default()).unwrap_err();

    assert!(matches!(err, BugsnagError::TokenMissing));
}

#[test]
#[serial]
fn test_rewrite_keeps_single_backup() {
    let dir = TempDir::new().unwrap();
    let store = written_store(&dir);

    let second = ConfigDocument {
        api_endpoint: "https://api.example.com".to_string(),
        login: "bob@example.com".to_string(),
        organization: OrganizationRef::default(),
    };
    store.write(&second).unwrap();
    store.write(&second).unwrap();

    let backup = ConfigStore::with_path(store.backup_path()).read().unwrap();
    assert_eq!(backup.login.as_deref(), Some("bob@example.com"));
    assert_eq!(store.read().unwrap().document(), Some(second));
}

#[test]
#[serial]
fn test_numeric_environment_values_are_kept_verbatim() {
    let dir = TempDir::new().unwrap();
    let store = written_store(&dir);
    let _token = EnvGuard::set("BUGSNAG_API_TOKEN", "0123456789");
    let _login = EnvGuard::set("BUGSNAG_LOGIN", "1e10");

    let settings = store.read().unwrap();

    assert_eq!(settings.api_token.as_deref(), Some("0123456789"));
    assert_eq!(settings.login.as_deref(), Some("1e10"));
}

#[test]
#[serial]
fn test_environment_debug_flag_is_parsed() {
    let dir = TempDir::new().unwrap();
    let store = written_store(&dir);
    let _debug = EnvGuard::set("BUGSNAG_DEBUG", "true");

    assert!(store.read().unwrap().debug);
}
