// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the Bugsnag CLI.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging.
//! Log level can be controlled via the `RUST_LOG` environment variable.
//!
//! The `--debug` flag controls the HTTP dump and is independent of tracing.
//!
//! # Examples
//!
//! ```bash
//! # Credential source selection and request lines
//! RUST_LOG=bugsnag=debug bugsnag organization list
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid.
///
/// `bugsnag` also matches the `bugsnag_core` target.
const DEFAULT_FILTER: &str = "bugsnag=warn,reqwest=error";

/// Initialize the logging subsystem.
///
/// Events go to stderr so they never mix with command output.
pub fn init_logging() {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
