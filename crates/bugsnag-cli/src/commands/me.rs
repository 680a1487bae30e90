// SPDX-License-Identifier: Apache-2.0

//! `bugsnag me`: prints the configured login.

use std::process::ExitCode;

use anyhow::Result;
use bugsnag_core::Resolver;

use super::types::MeResult;
use crate::cli::OutputContext;
use crate::output;

/// Prints the login from the config file or `BUGSNAG_LOGIN`.
///
/// No request is made; the value is not verified against the API.
pub fn run(resolver: &Resolver, ctx: &OutputContext) -> Result<ExitCode> {
    let login = resolver.settings().login.clone().unwrap_or_default();
    output::render(&MeResult { login }, ctx)?;
    Ok(ExitCode::SUCCESS)
}
