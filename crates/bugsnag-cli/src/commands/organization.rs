// SPDX-License-Identifier: Apache-2.0

//! `bugsnag organization list`.

use std::process::ExitCode;

use anyhow::Result;
use bugsnag_core::{Client, Overrides, Resolver};
use tracing::debug;

use super::maybe_spinner;
use super::types::OrganizationsResult;
use crate::cli::OutputContext;
use crate::output::{self, common};

/// Lists the organizations the configured user has access to.
///
/// An empty list is reported as a failure.
pub async fn list(
    resolver: &Resolver,
    organization: Option<String>,
    ctx: &OutputContext,
) -> Result<ExitCode> {
    let profile = resolver.resolve(&Overrides {
        organization,
        ..Overrides::default()
    })?;
    debug!(source = %profile.token_source, "Listing organizations");
    let client = Client::new(profile.client_config(ctx.debug))?;

    let spinner = maybe_spinner(ctx, "Fetching organizations...");
    let organizations = client.organizations().await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let organizations = organizations?;

    if organizations.is_empty() {
        common::fail("No organizations found.");
        return Ok(ExitCode::FAILURE);
    }

    output::render(&OrganizationsResult { organizations }, ctx)?;
    Ok(ExitCode::SUCCESS)
}
