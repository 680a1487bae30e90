// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for the Bugsnag CLI.
//!
//! Uses clap's derive API. Nested commands follow a noun-verb layout
//! (`bugsnag organization list`).

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for CLI results.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// YAML output for programmatic consumption
    Yaml,
}

/// Global output configuration passed to commands.
#[derive(Clone)]
pub struct OutputContext {
    /// Output format (text, json, yaml)
    pub format: OutputFormat,
    /// Dump HTTP traffic and print the config file in use
    pub debug: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, debug: bool) -> Self {
        Self {
            format,
            debug,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners, colors) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && matches!(self.format, OutputFormat::Text)
    }
}

/// Interactive Bugsnag CLI.
#[derive(Parser)]
#[command(name = "bugsnag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default is $XDG_CONFIG_HOME/.bugsnag/.config.yml)
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bugsnag organization to look into (defaults to the configured one)
    #[arg(long, short = 'o', global = true, value_name = "ID")]
    pub organization: Option<String>,

    /// Turn on debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Output format (text, json, yaml)
    #[arg(long, global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the bugsnag configuration required for the tool to work
    #[command(visible_aliases = ["initialize", "configure", "config", "setup"])]
    Init(InitArgs),

    /// Display the configured bugsnag user
    Me,

    /// Work with Bugsnag organizations
    #[command(subcommand)]
    #[command(visible_aliases = ["organizations", "orgs", "org"])]
    Organization(OrganizationCommand),

    /// Print the version
    Version,
}

impl Commands {
    /// Name of the leaf command, as checked by the token gate.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Init(_) => "init",
            Commands::Me => "me",
            Commands::Organization(OrganizationCommand::List) => "list",
            Commands::Version => "version",
        }
    }
}

/// Arguments of `bugsnag init`.
///
/// The default organization is taken from the global `--organization` flag.
#[derive(Args)]
pub struct InitArgs {
    /// Link to your bugsnag api endpoint
    #[arg(long = "api_endpoint", value_name = "URL")]
    pub api_endpoint: Option<String>,

    /// Bugsnag login username
    #[arg(long)]
    pub login: Option<String>,

    /// Forcefully override existing config if it exists
    #[arg(long)]
    pub force: bool,
}

/// Organization subcommands
#[derive(Subcommand)]
pub enum OrganizationCommand {
    /// List the Bugsnag organizations you have access to
    #[command(visible_aliases = ["lists", "ls"])]
    List,
}
