// SPDX-License-Identifier: Apache-2.0

//! bugsnag - Interactive Bugsnag CLI.
//!
//! Authenticates against the Bugsnag API, lists the organizations of the
//! current user and generates the local configuration on first run.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;
mod prompt;

use std::process::ExitCode;

use clap::Parser;
use console::Term;
use tracing::debug;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging();
    watch_interrupt();

    match commands::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            errors::report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Exits with status 1 on Ctrl-C.
///
/// Runs on its own task so it fires while a prompt blocks the main thread;
/// exiting drops any in-flight request.
fn watch_interrupt() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted");
            let _ = restore_terminal(&Term::stderr());
            std::process::exit(1);
        }
    });
}

/// Undoes what an interrupted prompt or spinner left on the terminal.
///
/// Clears the half-drawn line, shows the cursor and ends the line so the
/// shell prompt starts in column zero.
fn restore_terminal(term: &Term) -> std::io::Result<()> {
    if !term.is_term() {
        return Ok(());
    }
    term.clear_line()?;
    term.show_cursor()?;
    term.write_line("")?;
    term.flush()
}
