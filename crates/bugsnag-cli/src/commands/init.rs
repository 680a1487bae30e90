// SPDX-License-Identifier: Apache-2.0

//! `bugsnag init`: generates the config file interactively.

use std::process::ExitCode;

use anyhow::Result;
use bugsnag_core::{
    BugsnagError, Client, ClientConfig, ConfigStore, Generator, InitOptions, Resolver,
};
use tracing::debug;

use crate::cli::{InitArgs, OutputContext};
use crate::output::common;
use crate::prompt::DialoguerPrompter;

/// Runs the config wizard and reports its outcome.
///
/// The API token for verification is resolved from the environment,
/// netrc or keyring, never from the prompts.
pub async fn run(
    args: InitArgs,
    organization: Option<String>,
    store: &ConfigStore,
    resolver: &Resolver,
    ctx: &OutputContext,
) -> Result<ExitCode> {
    let auth_type = resolver.settings().auth_type.unwrap_or_default();
    let options = InitOptions {
        api_endpoint: args.api_endpoint,
        login: args.login,
        organization,
        force: args.force,
        auth_type,
    };

    let client_factory = |api_endpoint: &str, login: &str| -> Result<Client, BugsnagError> {
        let (api_token, source) = resolver
            .resolve_token(None, api_endpoint, login)
            .ok_or(BugsnagError::TokenMissing)?;
        debug!(source = %source, "Verifying with resolved token");
        Client::new(
            ClientConfig::builder()
                .api_endpoint(api_endpoint)
                .login(login)
                .api_token(api_token)
                .auth_type(auth_type)
                .debug(ctx.debug)
                .build(),
        )
    };

    let mut generator = Generator::new(
        store,
        options,
        DialoguerPrompter::new(ctx),
        client_factory,
    );

    match generator.generate().await {
        Ok(path) => {
            common::success(&format!("Configuration generated: {}", path.display()));
            Ok(ExitCode::SUCCESS)
        }
        Err(BugsnagError::Skip) => {
            common::success(&format!(
                "Skipping config generation. Current config: {}",
                store.path().display()
            ));
            Ok(ExitCode::SUCCESS)
        }
        Err(BugsnagError::TokenMissing) => Err(BugsnagError::TokenMissing.into()),
        Err(BugsnagError::UnexpectedResponse(api)) => {
            println!();
            common::fail(&format!(
                "Received unexpected response '{}' from bugsnag. Please try again.",
                api.status_text
            ));
            Ok(ExitCode::FAILURE)
        }
        Err(BugsnagError::UnexpectedResponseFormat) => {
            println!();
            common::fail(
                "Got response in unexpected format when fetching metadata. Please try again.",
            );
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            println!();
            common::fail(&format!("Unable to generate configuration: {e}"));
            Ok(ExitCode::FAILURE)
        }
    }
}
