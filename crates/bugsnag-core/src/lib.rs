// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Bugsnag Core
//!
//! Core library for the Bugsnag data CLI.
//!
//! This crate provides reusable components for:
//! - Layered configuration (YAML file + `BUGSNAG_*` environment variables)
//! - API token resolution across netrc and the system keyring
//! - An authenticated Bugsnag API client
//! - The interactive first-run config generator
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bugsnag_core::{Client, ConfigStore, Overrides, Resolver};
//!
//! # async fn example() -> bugsnag_core::Result<()> {
//! let store = ConfigStore::new()?;
//! let resolver = Resolver::with_default_stores(store.read()?);
//! let profile = resolver.resolve(&Overrides::default())?;
//!
//! let client = Client::new(profile.client_config(false))?;
//! for org in client.organizations().await? {
//!     println!("{} ({})", org.name, org.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`client`] - Bugsnag API client
//! - [`config`] - Config file location, reads and writes
//! - [`error`] - Error types
//! - [`generator`] - First-run config wizard
//! - [`netrc`] - Netrc parsing and lookup
//! - [`resolver`] - Credential precedence and the token gate

// ============================================================================
// Error Handling
// ============================================================================

pub use error::{ApiError, BugsnagError, ErrorBody};

/// Convenience Result type for Bugsnag operations.
///
/// This is equivalent to `std::result::Result<T, BugsnagError>`.
pub type Result<T> = std::result::Result<T, BugsnagError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    ConfigDocument, ConfigStore, ENV_PREFIX, Settings, config_home, default_config_path,
};

// ============================================================================
// API Client
// ============================================================================

pub use client::{Client, ClientConfig, DEFAULT_TIMEOUT};
pub use types::{AuthType, Organization, OrganizationRef, User};

// ============================================================================
// Credential Resolution
// ============================================================================

pub use keychain::KEYRING_SERVICE;
pub use resolver::{
    CredentialProfile, KeyringStore, NetrcStore, Overrides, Resolver, TokenSource, TokenStore,
    requires_token,
};

// ============================================================================
// Config Generation
// ============================================================================

pub use generator::{
    DEFAULT_API_ENDPOINT, Generator, InitOptions, Prompter, Validator, validate_endpoint,
    validate_login,
};

// ============================================================================
// Modules
// ============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod keychain;
pub mod netrc;
pub mod resolver;
pub mod types;
