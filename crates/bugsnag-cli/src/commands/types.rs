// SPDX-License-Identifier: Apache-2.0

//! Result types returned by command handlers.
//!
//! These types allow command handlers to return data instead of printing
//! directly, improving testability and separation of concerns.

use bugsnag_core::Organization;
use serde::Serialize;

/// Result from the me command.
#[derive(Debug, Clone, Serialize)]
pub struct MeResult {
    /// Configured login.
    pub login: String,
}

/// Result from the organization list command.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct OrganizationsResult {
    /// Organizations in server order.
    pub organizations: Vec<Organization>,
}
