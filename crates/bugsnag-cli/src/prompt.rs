// SPDX-License-Identifier: Apache-2.0

//! Terminal prompts for the config wizard.

use std::io::IsTerminal;
use std::path::Path;

use bugsnag_core::{BugsnagError, Prompter, Validator};
use dialoguer::{Confirm, Input, Select};
use indicatif::ProgressBar;

use crate::cli::OutputContext;
use crate::commands::maybe_spinner;

/// [`Prompter`] backed by `dialoguer`, with an `indicatif` spinner per step.
pub struct DialoguerPrompter {
    ctx: OutputContext,
    spinner: Option<ProgressBar>,
}

impl DialoguerPrompter {
    pub fn new(ctx: &OutputContext) -> Self {
        Self {
            ctx: ctx.clone(),
            spinner: None,
        }
    }
}

/// Interactive prompts require a terminal on stdin.
fn require_terminal() -> Result<(), BugsnagError> {
    if std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(BugsnagError::Prompt {
            message: "interactive mode requires a terminal, use the --api_endpoint, --login and --organization flags instead".to_string(),
        })
    }
}

fn prompt_error(e: dialoguer::Error) -> BugsnagError {
    BugsnagError::Prompt {
        message: e.to_string(),
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm_overwrite(&mut self, _path: &Path) -> Result<bool, BugsnagError> {
        require_terminal()?;
        Confirm::new()
            .with_prompt("Config already exist. Do you want to overwrite?")
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn input_endpoint(
        &mut self,
        default: &str,
        validate: Validator,
    ) -> Result<String, BugsnagError> {
        require_terminal()?;
        Input::<String>::new()
            .with_prompt("Link to Bugsnag API Endpoint:")
            .default(default.to_string())
            .validate_with(move |input: &String| validate(input).map_err(|e| e.to_string()))
            .interact_text()
            .map_err(prompt_error)
    }

    fn input_login(&mut self, validate: Validator) -> Result<String, BugsnagError> {
        require_terminal()?;
        Input::<String>::new()
            .with_prompt("Login username:")
            .validate_with(move |input: &String| validate(input).map_err(|e| e.to_string()))
            .interact_text()
            .map_err(prompt_error)
    }

    fn select_organization(&mut self, names: &[String]) -> Result<String, BugsnagError> {
        require_terminal()?;
        let index = Select::new()
            .with_prompt("Default organization:")
            .items(names)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        names
            .get(index)
            .cloned()
            .ok_or_else(|| BugsnagError::Prompt {
                message: "no organization selected".to_string(),
            })
    }

    fn start_step(&mut self, message: &str) {
        self.finish_step();
        self.spinner = maybe_spinner(&self.ctx, message);
    }

    fn finish_step(&mut self) {
        if let Some(s) = self.spinner.take() {
            s.finish_and_clear();
        }
    }
}
