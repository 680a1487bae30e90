// SPDX-License-Identifier: Apache-2.0

//! Status lines shared by all commands.
//!
//! Success goes to stdout, warnings and failures to stderr. Colors are
//! dropped automatically when the stream is not a terminal.

use console::style;

/// Prints `✓ <message>` in green, preceded by a blank line.
pub fn success(message: &str) {
    println!("\n{} {message}", style("✓").green());
}

/// Prints `message` in yellow to stderr.
pub fn warn(message: &str) {
    eprintln!("{}", style(message).yellow().for_stderr());
}

/// Prints `✗ <message>` in red to stderr.
pub fn fail(message: &str) {
    eprintln!("{} {message}", style("✗").red().for_stderr());
}
