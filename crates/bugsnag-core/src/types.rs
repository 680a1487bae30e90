// SPDX-License-Identifier: Apache-2.0

//! Shared data types for the Bugsnag API and local configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BugsnagError;

/// Bugsnag authentication type.
///
/// Currently supports basic and token (personal auth token).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// HTTP Basic authentication with login and token.
    Basic,
    /// `Authorization: token <token>` header.
    #[default]
    Token,
}

impl AuthType {
    /// Returns the lowercase wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Basic => "basic",
            AuthType::Token => "token",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = BugsnagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(AuthType::Basic),
            "token" => Ok(AuthType::Token),
            other => Err(BugsnagError::Config {
                message: format!("unknown auth_type '{other}', expected 'basic' or 'token'"),
            }),
        }
    }
}

/// Response of the `/user` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name of the user.
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    /// Email address, the canonical login for token auth.
    #[serde(default)]
    pub email: String,
}

/// An organization as returned by `/user/organizations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization id.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// API URL of the organization's projects.
    #[serde(default)]
    pub projects_url: String,
}

/// Minimal organization handle persisted in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRef {
    /// Organization id.
    pub id: String,
    /// Organization name.
    pub name: String,
}

impl From<&Organization> for OrganizationRef {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id.clone(),
            name: org.name.clone(),
        }
    }
}
