// SPDX-License-Identifier: Apache-2.0

//! Credential resolution.
//!
//! Builds the effective [`CredentialProfile`] for a process run from,
//! in priority order:
//! 1. Explicit overrides (command-line flags)
//! 2. Config store settings (file + `BUGSNAG_*` environment variables)
//! 3. Netrc entry for the API host and login (token only)
//! 4. System keyring entry for the login (token only)
//!
//! Empty values never shadow a lower-priority source. Resolution does no
//! network I/O.

use std::fmt;

use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::client::{ClientConfig, DEFAULT_TIMEOUT};
use crate::config::{Settings, non_empty};
use crate::error::BugsnagError;
use crate::types::{AuthType, OrganizationRef};
use crate::{keychain, netrc};

/// Commands that run without an API token.
const TOKEN_FREE_COMMANDS: &[&str] = &["init", "help", "version", "bugsnag"];

/// Where the resolved API token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    /// Passed explicitly by the caller.
    Explicit,
    /// Config file or `BUGSNAG_API_TOKEN` environment variable.
    Settings,
    /// Netrc `machine` record.
    Netrc,
    /// System keyring.
    Keyring,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Explicit => write!(f, "command line"),
            TokenSource::Settings => write!(f, "config or environment"),
            TokenSource::Netrc => write!(f, "netrc file"),
            TokenSource::Keyring => write!(f, "system keyring"),
        }
    }
}

/// A secondary source of API tokens, keyed by API endpoint and login.
pub trait TokenStore: Send + Sync {
    /// Identifies the store in the resolved profile.
    fn source(&self) -> TokenSource;

    /// Returns the token for `login` at `api_endpoint`, if any.
    ///
    /// Lookup failures are reported as `None`.
    fn token(&self, api_endpoint: &str, login: &str) -> Option<SecretString>;
}

/// Token lookup in the user's netrc file.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetrcStore;

impl TokenStore for NetrcStore {
    fn source(&self) -> TokenSource {
        TokenSource::Netrc
    }

    fn token(&self, api_endpoint: &str, login: &str) -> Option<SecretString> {
        match netrc::lookup(api_endpoint, login) {
            Ok(entry) => entry
                .filter(|e| !e.password.is_empty())
                .map(|e| SecretString::from(e.password)),
            Err(e) => {
                debug!(error = %e, "Netrc lookup failed");
                None
            }
        }
    }
}

/// Token lookup in the system keyring.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringStore;

impl TokenStore for KeyringStore {
    fn source(&self) -> TokenSource {
        TokenSource::Keyring
    }

    fn token(&self, _api_endpoint: &str, login: &str) -> Option<SecretString> {
        keychain::get(login)
    }
}

/// Explicit values that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// API base URL.
    pub api_endpoint: Option<String>,
    /// Login.
    pub login: Option<String>,
    /// API token.
    pub api_token: Option<SecretString>,
    /// Authentication type.
    pub auth_type: Option<AuthType>,
    /// Organization id (the `-o/--organization` flag).
    pub organization: Option<String>,
}

/// Fully resolved configuration for a single process run.
#[derive(Debug, Clone)]
pub struct CredentialProfile {
    /// API base URL without trailing slash.
    pub api_endpoint: String,
    /// Login.
    pub login: String,
    /// API token.
    pub api_token: SecretString,
    /// Authentication type.
    pub auth_type: AuthType,
    /// Default organization, if configured.
    pub organization: Option<OrganizationRef>,
    /// Where the token came from.
    pub token_source: TokenSource,
}

impl CredentialProfile {
    /// Client settings for this profile.
    #[must_use]
    pub fn client_config(&self, debug: bool) -> ClientConfig {
        ClientConfig::builder()
            .api_endpoint(self.api_endpoint.clone())
            .login(self.login.clone())
            .api_token(self.api_token.clone())
            .auth_type(self.auth_type)
            .debug(debug)
            .timeout(DEFAULT_TIMEOUT)
            .build()
    }
}

/// Composes overrides, settings and token stores into a profile.
pub struct Resolver {
    settings: Settings,
    stores: Vec<Box<dyn TokenStore>>,
}

impl Resolver {
    /// Creates a resolver over `settings` with no secondary token stores.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            stores: Vec::new(),
        }
    }

    /// Creates a resolver that falls back to netrc, then the keyring.
    #[must_use]
    pub fn with_default_stores(settings: Settings) -> Self {
        Self::new(settings)
            .with_store(NetrcStore)
            .with_store(KeyringStore)
    }

    /// Appends a token store; earlier stores win.
    #[must_use]
    pub fn with_store(mut self, store: impl TokenStore + 'static) -> Self {
        self.stores.push(Box::new(store));
        self
    }

    /// Settings the resolver reads from.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolves the effective profile.
    ///
    /// # Errors
    ///
    /// Returns `BugsnagError::ConfigMissing` if no API endpoint or login is
    /// known, and `BugsnagError::TokenMissing` if no source supplies a token.
    #[instrument(skip_all)]
    pub fn resolve(&self, overrides: &Overrides) -> Result<CredentialProfile, BugsnagError> {
        let api_endpoint = pick(
            overrides.api_endpoint.as_deref(),
            self.settings.api_endpoint.as_deref(),
        )
        .ok_or(BugsnagError::ConfigMissing)?;
        let api_endpoint = api_endpoint.strip_suffix('/').unwrap_or(api_endpoint);

        let login = pick(overrides.login.as_deref(), self.settings.login.as_deref())
            .ok_or(BugsnagError::ConfigMissing)?;

        let (api_token, token_source) = self
            .resolve_token(overrides.api_token.as_ref(), api_endpoint, login)
            .ok_or(BugsnagError::TokenMissing)?;

        let auth_type = overrides
            .auth_type
            .or(self.settings.auth_type)
            .unwrap_or_default();

        let organization = self.resolve_organization(overrides.organization.as_deref());

        debug!(source = %token_source, auth_type = %auth_type, "Resolved credentials");

        Ok(CredentialProfile {
            api_endpoint: api_endpoint.to_string(),
            login: login.to_string(),
            api_token,
            auth_type,
            organization,
            token_source,
        })
    }

    /// Finds the highest-priority token for `login` at `api_endpoint`.
    pub fn resolve_token(
        &self,
        explicit: Option<&SecretString>,
        api_endpoint: &str,
        login: &str,
    ) -> Option<(SecretString, TokenSource)> {
        if let Some(token) = explicit
            && !secrecy::ExposeSecret::expose_secret(token).is_empty()
        {
            return Some((token.clone(), TokenSource::Explicit));
        }

        if let Some(token) = non_empty(self.settings.api_token.as_deref()) {
            return Some((SecretString::from(token), TokenSource::Settings));
        }

        self.stores.iter().find_map(|store| {
            store
                .token(api_endpoint, login)
                .map(|token| (token, store.source()))
        })
    }

    /// Returns true if any source can supply a token for `login`.
    ///
    /// Used to fail fast before commands that talk to the API.
    #[must_use]
    pub fn token_reachable(&self, api_endpoint: &str, login: &str) -> bool {
        self.resolve_token(None, api_endpoint, login).is_some()
    }

    fn resolve_organization(&self, override_id: Option<&str>) -> Option<OrganizationRef> {
        let configured = self.settings.organization.clone();
        match non_empty(override_id) {
            Some(id) => {
                let name = configured
                    .filter(|org| org.id == id)
                    .map_or_else(|| id.to_string(), |org| org.name);
                Some(OrganizationRef {
                    id: id.to_string(),
                    name,
                })
            }
            None => configured.filter(|org| !org.id.is_empty()),
        }
    }
}

/// Returns true unless `command` can run without an API token.
#[must_use]
pub fn requires_token(command: &str) -> bool {
    !TOKEN_FREE_COMMANDS.contains(&command)
}

fn pick<'a>(explicit: Option<&'a str>, configured: Option<&'a str>) -> Option<&'a str> {
    non_empty(explicit).or_else(|| non_empty(configured))
}
