// SPDX-License-Identifier: Apache-2.0

//! OS keyring lookup for API tokens.
//!
//! Tokens are stored under a fixed service name with the login as the
//! account. Keyring failures never surface to the caller: a locked store,
//! a missing backend and a missing entry all read as "no token".

use secrecy::SecretString;
use tracing::{debug, instrument};

/// Keyring service name shared by all lookups.
pub const KEYRING_SERVICE: &str = "bugsnag-data-cli";

/// Retrieves the token stored for `login`.
///
/// Returns `None` if no token is stored or if keyring access fails.
#[cfg(feature = "keyring")]
#[instrument]
pub fn get(login: &str) -> Option<SecretString> {
    if login.is_empty() {
        return None;
    }

    let entry = match ::keyring::Entry::new(KEYRING_SERVICE, login) {
        Ok(entry) => entry,
        Err(e) => {
            debug!(error = %e, "Failed to create keyring entry");
            return None;
        }
    };

    match entry.get_password() {
        Ok(password) if !password.is_empty() => {
            debug!("Retrieved token from keyring");
            Some(SecretString::from(password))
        }
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "No token in keyring");
            None
        }
    }
}

/// Keyring support is compiled out; no token is ever found.
#[cfg(not(feature = "keyring"))]
#[instrument]
pub fn get(login: &str) -> Option<SecretString> {
    debug!("Keyring support disabled");
    None
}
