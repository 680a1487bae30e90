// SPDX-License-Identifier: Apache-2.0

//! Error types for the Bugsnag CLI.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Error envelope returned by the Bugsnag API on failed requests.
///
/// All fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    /// Per-field validation errors.
    pub errors: BTreeMap<String, String>,
    /// General error messages.
    pub error_messages: Vec<String>,
    /// Non-fatal warnings.
    pub warning_messages: Vec<String>,
}

impl ErrorBody {
    /// Returns true if the envelope carries no messages at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.error_messages.is_empty() && self.warning_messages.is_empty()
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.error_messages.is_empty() || !self.errors.is_empty() {
            writeln!(f, "\nError:")?;
            for msg in &self.error_messages {
                writeln!(f, "  - {msg}")?;
            }
            for (field, msg) in &self.errors {
                writeln!(f, "  - {field}: {msg}")?;
            }
        }

        if !self.warning_messages.is_empty() {
            writeln!(f, "\nWarning:")?;
            for msg in &self.warning_messages {
                writeln!(f, "  - {msg}")?;
            }
        }

        Ok(())
    }
}

/// A response whose status was not the expected success code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Status line, e.g. `401 Unauthorized`.
    pub status_text: String,
    /// Numeric status code.
    pub status_code: u16,
    /// Best-effort decoded error envelope.
    pub body: ErrorBody,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.body)
    }
}

/// Errors that can occur during Bugsnag CLI operations.
#[derive(Error, Debug)]
pub enum BugsnagError {
    /// The operation needs a config file and none was found.
    #[error("Missing configuration file")]
    ConfigMissing,

    /// No API token could be found in the environment, netrc or keyring.
    #[error("No Bugsnag API token found")]
    TokenMissing,

    /// The API returned a non-success status.
    #[error("{0}")]
    UnexpectedResponse(ApiError),

    /// Several requests failed; the message holds all of them.
    #[error("{message}")]
    MultipleFailed {
        /// Concatenated failure messages.
        message: String,
    },

    /// The API returned no body where one was required.
    #[error("bugsnag: empty response from server")]
    EmptyResponse,

    /// The API returned a body that did not match the expected shape.
    #[error("unexpected response format")]
    UnexpectedResponseFormat,

    /// The user declined to overwrite an existing config.
    #[error("skipping config generation")]
    Skip,

    /// The selected organization is not one of the user's organizations.
    #[error("organization not found\n  Please check the organization id and try again")]
    OrganizationNotFound(String),

    /// User input failed validation.
    #[error("{0}")]
    Validation(String),

    /// The netrc file could not be parsed.
    #[error("netrc config: {message}")]
    Netrc {
        /// Parse error description.
        message: String,
    },

    /// Configuration file error.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Config document could not be serialized.
    #[error("Failed to serialize configuration: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Interactive prompt failed or was interrupted.
    #[error("Prompt failed: {message}")]
    Prompt {
        /// Error message.
        message: String,
    },

    /// Filesystem error.
    #[error("{context}: {source}")]
    Io {
        /// What was being done.
        context: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Network/HTTP error from reqwest.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl BugsnagError {
    /// Wraps an I/O error with a description of the failed operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        BugsnagError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for BugsnagError {
    fn from(err: config::ConfigError) -> Self {
        BugsnagError::Config {
            message: err.to_string(),
        }
    }
}
