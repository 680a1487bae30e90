// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with remediation hints.
//!
//! Downcasts `anyhow::Error` to `BugsnagError` and renders the message the
//! user sees, keeping the library free of terminal concerns.

use anyhow::Error;
use bugsnag_core::BugsnagError;

use crate::output::common;

/// Getting-started section of the project README.
pub const HELP_LINK: &str = "https://github.com/teamupstart/bugsnag-data-cli#getting-started";

/// Bugsnag documentation on generating API tokens.
pub const API_TOKEN_LINK: &str = "https://bugsnagapiv2.docs.apiary.io/#introduction/authentication";

/// Printed when no API token is reachable from any source.
pub fn token_guidance() -> String {
    format!(
        "The tool needs a Bugsnag API token to function.

You can generate the token using this link: {API_TOKEN_LINK}

After generating the token, you can either:
  - Export API token to your shell as a BUGSNAG_API_TOKEN env variable
  - Or, you can use a .netrc file to define required machine details

Once you are done with the above steps, run 'bugsnag init' to generate the config if you haven't already.

For more details, see: {HELP_LINK}
"
    )
}

/// Printed when a command needs a config file and none exists.
pub const MISSING_CONFIG: &str =
    "Missing configuration file.\nRun 'bugsnag init' to configure the tool.";

/// Formats an error for CLI display.
///
/// Errors that are not a `BugsnagError` render as `Error: <chain>`.
pub fn format_error(error: &Error) -> String {
    let Some(err) = error.downcast_ref::<BugsnagError>() else {
        return format!("Error: {error:#}");
    };

    match err {
        BugsnagError::UnexpectedResponse(api) => {
            format!(
                "{}\nbugsnag: Received unexpected response '{}'.\nPlease check the parameters you supplied and try again.",
                api.body, api.status_text
            )
        }
        BugsnagError::MultipleFailed { message } => {
            format!("\nSOME REQUESTS REPORTED ERROR:{message}")
        }
        BugsnagError::EmptyResponse => {
            "bugsnag: Received empty response.\nPlease try again.".to_string()
        }
        BugsnagError::TokenMissing => token_guidance(),
        BugsnagError::ConfigMissing => MISSING_CONFIG.to_string(),
        BugsnagError::Network(_) => {
            format!("Error: {err}\n\nTip: Check your internet connection and try again.")
        }
        _ => format!("Error: {err}"),
    }
}

/// Prints `error` to stderr in the style matching its kind.
pub fn report(error: &Error) {
    let message = format_error(error);
    match error.downcast_ref::<BugsnagError>() {
        Some(BugsnagError::TokenMissing) => common::warn(&message),
        Some(BugsnagError::ConfigMissing) => common::fail(&message),
        _ => eprintln!("{message}"),
    }
}
