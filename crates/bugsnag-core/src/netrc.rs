// SPDX-License-Identifier: Apache-2.0

//! Read-only access to the user's netrc file.
//!
//! The file is parsed at most once per process. Lookups match the host of
//! an API URL and a login against `machine` records.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use reqwest::Url;
use tracing::debug;

use crate::error::BugsnagError;

/// A single `machine` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetrcEntry {
    /// Host name, without scheme.
    pub machine: String,
    /// Login name.
    pub login: String,
    /// Password, used as the API token.
    pub password: String,
}

/// Parsed contents of a netrc file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Netrc {
    entries: Vec<NetrcEntry>,
}

impl Netrc {
    /// Parses netrc text.
    ///
    /// Supports `machine`, `default`, `login`, `password`, `account` and
    /// `macdef`. `default` records are parsed but never matched.
    pub fn parse(text: &str) -> Result<Self, BugsnagError> {
        let mut entries = Vec::new();
        let mut current: Option<NetrcEntry> = None;
        let mut is_default = false;
        let mut lines = text.lines();

        while let Some(line) = lines.next() {
            let mut tokens = line.split_whitespace();

            while let Some(token) = tokens.next() {
                if token.starts_with('#') {
                    break;
                }

                match token {
                    "machine" | "default" => {
                        if let Some(entry) = current.take()
                            && !is_default
                        {
                            entries.push(entry);
                        }
                        is_default = token == "default";
                        let machine = if is_default {
                            String::new()
                        } else {
                            expect_value(&mut tokens, "machine")?.to_string()
                        };
                        current = Some(NetrcEntry {
                            machine,
                            login: String::new(),
                            password: String::new(),
                        });
                    }
                    "login" | "password" | "account" => {
                        let value = expect_value(&mut tokens, token)?;
                        let entry = current.as_mut().ok_or_else(|| BugsnagError::Netrc {
                            message: format!("'{token}' outside of a machine record"),
                        })?;
                        match token {
                            "login" => entry.login = value.to_string(),
                            "password" => entry.password = value.to_string(),
                            _ => {}
                        }
                    }
                    "macdef" => {
                        expect_value(&mut tokens, "macdef")?;
                        // Macro body runs until the next blank line.
                        for body in lines.by_ref() {
                            if body.trim().is_empty() {
                                break;
                            }
                        }
                        break;
                    }
                    other => {
                        return Err(BugsnagError::Netrc {
                            message: format!("unexpected token '{other}'"),
                        });
                    }
                }
            }
        }

        if let Some(entry) = current
            && !is_default
        {
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    /// All `machine` records in file order.
    #[must_use]
    pub fn entries(&self) -> &[NetrcEntry] {
        &self.entries
    }

    /// Finds the first record matching both host and login.
    #[must_use]
    pub fn find(&self, machine: &str, login: &str) -> Option<&NetrcEntry> {
        self.entries
            .iter()
            .find(|e| e.machine == machine && e.login == login)
    }

    /// Finds the record for the host of `base_url` and `login`.
    ///
    /// With an explicit port, `host:port` is tried before the bare host.
    pub fn lookup(&self, base_url: &str, login: &str) -> Result<Option<NetrcEntry>, BugsnagError> {
        let (host, port) = host_of(base_url)?;
        let with_port = port.and_then(|port| self.find(&format!("{host}:{port}"), login));
        Ok(with_port.or_else(|| self.find(&host, login)).cloned())
    }
}

fn expect_value<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    keyword: &str,
) -> Result<&'a str, BugsnagError> {
    tokens.next().ok_or_else(|| BugsnagError::Netrc {
        message: format!("missing value for '{keyword}'"),
    })
}

fn host_of(base_url: &str) -> Result<(String, Option<u16>), BugsnagError> {
    let url = Url::parse(base_url).map_err(|e| BugsnagError::Netrc {
        message: format!("invalid API endpoint '{base_url}': {e}"),
    })?;
    let host = url.host_str().ok_or_else(|| BugsnagError::Netrc {
        message: format!("API endpoint '{base_url}' has no host"),
    })?;
    Ok((host.to_string(), url.port()))
}

/// Location of the netrc file.
///
/// Honors `$NETRC`, otherwise `~/.netrc` (`~/_netrc` on Windows).
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("NETRC")
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    let name = if cfg!(windows) { "_netrc" } else { ".netrc" };
    dirs::home_dir().map(|home| home.join(name))
}

/// Loads a netrc file; a missing file is an empty netrc.
pub fn load(path: Option<PathBuf>) -> Result<Netrc, BugsnagError> {
    let Some(path) = path else {
        return Ok(Netrc::default());
    };
    match fs::read_to_string(&path) {
        Ok(text) => {
            debug!(path = %path.display(), "Parsing netrc file");
            Netrc::parse(&text)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Netrc::default()),
        Err(e) => Err(BugsnagError::io(
            format!("Failed to read netrc file {}", path.display()),
            e,
        )),
    }
}

static NETRC: OnceLock<Result<Netrc, String>> = OnceLock::new();

/// Looks up the process-wide netrc file, parsing it on first use.
///
/// A load failure is remembered and returned by every later call.
pub fn lookup(base_url: &str, login: &str) -> Result<Option<NetrcEntry>, BugsnagError> {
    let netrc = NETRC
        .get_or_init(|| load(default_path()).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|message| BugsnagError::Netrc {
            message: message.clone(),
        })?;
    netrc.lookup(base_url, login)
}
