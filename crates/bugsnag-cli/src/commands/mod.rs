// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the Bugsnag CLI.

pub mod init;
pub mod me;
pub mod organization;
pub mod types;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use bugsnag_core::{BugsnagError, ConfigStore, ENV_PREFIX, Resolver, Settings, requires_token};
use clap::CommandFactory;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::cli::{Cli, Commands, OrganizationCommand, OutputContext};

/// Creates a styled spinner (only if interactive).
pub fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if ctx.is_interactive() {
        let s = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            s.set_style(style);
        }
        s.set_message(message.to_string());
        s.enable_steady_tick(Duration::from_millis(100));
        Some(s)
    } else {
        None
    }
}

/// Loads the config store, runs the token gate and dispatches to a handler.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    if let Commands::Version = command {
        println!("bugsnag version {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let store = match &cli.config {
        Some(path) => ConfigStore::with_path(path),
        None => ConfigStore::new()?,
    };
    let gated = requires_token(command.name());

    let (settings, loaded) = match store.read() {
        Ok(settings) => (settings, true),
        Err(e) if gated => return Err(e.into()),
        Err(e) => {
            debug!(error = %e, "Ignoring unreadable configuration");
            (fallback_settings(), false)
        }
    };
    let ctx = OutputContext::from_cli(cli.output, cli.debug || settings.debug);

    if ctx.debug && loaded && store.exists() {
        println!("Using config file: {}", store.path().display());
    }

    let resolver = Resolver::with_default_stores(settings);

    if gated {
        check_token(&resolver)?;
        if !store.exists() {
            return Err(BugsnagError::ConfigMissing.into());
        }
    }

    match command {
        Commands::Init(args) => init::run(args, cli.organization, &store, &resolver, &ctx).await,
        Commands::Me => me::run(&resolver, &ctx),
        Commands::Organization(OrganizationCommand::List) => {
            organization::list(&resolver, cli.organization, &ctx).await
        }
        Commands::Version => Ok(ExitCode::SUCCESS),
    }
}

/// Settings used when the config file or the environment cannot be parsed.
///
/// Keeps only the API token from the environment.
fn fallback_settings() -> Settings {
    let api_token = std::env::var(format!("{ENV_PREFIX}_API_TOKEN"))
        .ok()
        .filter(|token| !token.is_empty());
    Settings {
        api_token,
        ..Settings::default()
    }
}

/// Fails with `TokenMissing` unless some source can supply a token.
fn check_token(resolver: &Resolver) -> Result<(), BugsnagError> {
    let settings = resolver.settings();
    let api_endpoint = settings.api_endpoint.as_deref().unwrap_or_default();
    let login = settings.login.as_deref().unwrap_or_default();

    if resolver.token_reachable(api_endpoint, login) {
        Ok(())
    } else {
        debug!("No API token reachable");
        Err(BugsnagError::TokenMissing)
    }
}
