// SPDX-License-Identifier: Apache-2.0

//! First-run configuration wizard.
//!
//! [`Generator::generate`] walks the following states:
//!
//! ```text
//! CheckExisting -> PromptEndpointLogin -> Verify -> FetchOrganizations
//!               -> SelectOrganization -> Persist
//! ```
//!
//! Declining to overwrite an existing file ends the run with
//! [`BugsnagError::Skip`]. Every other failure aborts without touching
//! the config file. Terminal interaction is delegated to a [`Prompter`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reqwest::Url;
use tracing::{debug, instrument};

use crate::client::Client;
use crate::config::{ConfigDocument, ConfigStore, non_empty};
use crate::error::BugsnagError;
use crate::types::{AuthType, Organization, OrganizationRef};

/// Canonical Bugsnag API endpoint offered as the prompt default.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.bugsnag.com";

const MIN_LOGIN_LEN: usize = 3;
const MAX_LOGIN_LEN: usize = 254;

/// Input validator handed to prompts.
pub type Validator = fn(&str) -> Result<(), BugsnagError>;

/// Accepts absolute `https` URLs with a host.
pub fn validate_endpoint(value: &str) -> Result<(), BugsnagError> {
    let invalid = || BugsnagError::Validation("not a valid URL".to_string());
    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    match url.host_str() {
        Some(host) if url.scheme() == "https" && !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Accepts logins of 3 to 254 characters.
pub fn validate_login(value: &str) -> Result<(), BugsnagError> {
    let len = value.chars().count();
    if (MIN_LOGIN_LEN..=MAX_LOGIN_LEN).contains(&len) {
        Ok(())
    } else {
        Err(BugsnagError::Validation("not a valid user".to_string()))
    }
}

/// Inputs of the `init` command.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// API endpoint; prompted for when absent.
    pub api_endpoint: Option<String>,
    /// Login; prompted for when absent.
    pub login: Option<String>,
    /// Organization id or name; selected interactively when absent.
    pub organization: Option<String>,
    /// Overwrite an existing config without asking.
    pub force: bool,
    /// Authentication type used for verification.
    pub auth_type: AuthType,
}

/// Terminal interaction needed by the wizard.
pub trait Prompter {
    /// Asks whether the existing config at `path` may be replaced.
    fn confirm_overwrite(&mut self, path: &Path) -> Result<bool, BugsnagError>;

    /// Asks for the API endpoint, re-prompting until `validate` passes.
    fn input_endpoint(&mut self, default: &str, validate: Validator)
    -> Result<String, BugsnagError>;

    /// Asks for the login, re-prompting until `validate` passes.
    fn input_login(&mut self, validate: Validator) -> Result<String, BugsnagError>;

    /// Asks the user to pick one of `names`.
    fn select_organization(&mut self, names: &[String]) -> Result<String, BugsnagError>;

    /// Marks the start of a long-running step.
    fn start_step(&mut self, _message: &str) {}

    /// Marks the end of the current step.
    fn finish_step(&mut self) {}
}

/// Organizations of the user, indexed for selection.
#[derive(Debug, Default)]
struct OrganizationIndex {
    by_id: HashMap<String, OrganizationRef>,
    by_name: HashMap<String, OrganizationRef>,
    suggestions: Vec<String>,
}

impl OrganizationIndex {
    /// Later duplicates of a case-folded name replace earlier ones.
    fn new(organizations: &[Organization]) -> Self {
        let mut index = Self::default();
        for org in organizations {
            let handle = OrganizationRef::from(org);
            index.by_id.insert(org.id.clone(), handle.clone());
            index.by_name.insert(org.name.to_lowercase(), handle);
            index.suggestions.push(org.name.clone());
        }
        index
    }

    fn by_name(&self, name: &str) -> Option<&OrganizationRef> {
        self.by_name.get(&name.to_lowercase())
    }

    fn by_id_or_name(&self, key: &str) -> Option<&OrganizationRef> {
        self.by_id.get(key).or_else(|| self.by_name(key))
    }
}

/// Drives the wizard and writes the resulting config document.
///
/// `client_factory` builds the API client for a candidate endpoint and
/// login; the CLI injects the resolved token through it.
pub struct Generator<'a, P, F> {
    store: &'a ConfigStore,
    options: InitOptions,
    prompter: P,
    client_factory: F,
}

impl<'a, P, F> Generator<'a, P, F>
where
    P: Prompter,
    F: FnMut(&str, &str) -> Result<Client, BugsnagError>,
{
    /// Creates a generator writing to `store`.
    pub fn new(store: &'a ConfigStore, options: InitOptions, prompter: P, client_factory: F) -> Self {
        Self {
            store,
            options,
            prompter,
            client_factory,
        }
    }

    /// The prompter, for inspection after a run.
    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Runs the wizard and returns the path of the written config.
    ///
    /// # Errors
    ///
    /// - `BugsnagError::Skip` if the user declined to overwrite.
    /// - `BugsnagError::UnexpectedResponse` if verification failed.
    /// - `BugsnagError::UnexpectedResponseFormat` on malformed metadata.
    /// - `BugsnagError::OrganizationNotFound` on an unknown selection.
    #[instrument(skip(self), fields(path = %self.store.path().display()))]
    pub async fn generate(&mut self) -> Result<PathBuf, BugsnagError> {
        self.check_existing()?;

        let (api_endpoint, login) = self.prompt_endpoint_and_login()?;

        self.prompter.start_step("Verifying login details...");
        let verified = self.verify(&api_endpoint, login).await;
        self.prompter.finish_step();
        let (client, login) = verified?;

        self.prompter.start_step("Fetching organizations...");
        let organizations = client.organizations().await;
        self.prompter.finish_step();
        let organizations = organizations?;
        if organizations.is_empty() {
            return Err(BugsnagError::UnexpectedResponseFormat);
        }

        let organization = self.select_organization(&OrganizationIndex::new(&organizations))?;

        self.prompter.start_step("Creating new configuration...");
        let written = self.store.write(&ConfigDocument {
            api_endpoint,
            login,
            organization,
        });
        self.prompter.finish_step();
        written
    }

    fn check_existing(&mut self) -> Result<(), BugsnagError> {
        self.prompter.start_step("Checking configuration...");
        let exists = self.store.exists();
        self.prompter.finish_step();

        if !exists || self.options.force {
            return Ok(());
        }

        let overwrite = self
            .prompter
            .confirm_overwrite(self.store.path())
            .unwrap_or_else(|e| {
                debug!(error = %e, "Overwrite confirmation failed");
                false
            });
        if overwrite { Ok(()) } else { Err(BugsnagError::Skip) }
    }

    fn prompt_endpoint_and_login(&mut self) -> Result<(String, String), BugsnagError> {
        let api_endpoint = match non_empty(self.options.api_endpoint.as_deref()) {
            Some(value) => value.to_string(),
            None => self
                .prompter
                .input_endpoint(DEFAULT_API_ENDPOINT, validate_endpoint)?,
        };
        let login = match non_empty(self.options.login.as_deref()) {
            Some(value) => value.to_string(),
            None => self.prompter.input_login(validate_login)?,
        };

        let api_endpoint = api_endpoint.trim_end_matches('/').to_string();
        Ok((api_endpoint, login))
    }

    async fn verify(
        &mut self,
        api_endpoint: &str,
        login: String,
    ) -> Result<(Client, String), BugsnagError> {
        let client = (self.client_factory)(api_endpoint, &login)?;
        let user = client.me().await?;

        let login = match self.options.auth_type {
            AuthType::Token if !user.email.is_empty() => user.email,
            _ => login,
        };
        debug!(login = %login, "Login verified");
        Ok((client, login))
    }

    fn select_organization(
        &mut self,
        index: &OrganizationIndex,
    ) -> Result<OrganizationRef, BugsnagError> {
        let found = match non_empty(self.options.organization.as_deref()) {
            Some(key) => index.by_id_or_name(key).cloned().ok_or_else(|| key.to_string()),
            None => {
                let name = self.prompter.select_organization(&index.suggestions)?;
                index.by_name(&name).cloned().ok_or(name)
            }
        };
        found.map_err(BugsnagError::OrganizationNotFound)
    }
}
