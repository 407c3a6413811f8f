//! Configuration handling
//!
//! Values are read once, before anything touches the network, from (later wins):
//! - the TOML config file (`--config`, or `~/.config/.git-relocate/config.toml` if present)
//! - the environment, after loading `.env`
use std::{fs::read_to_string, path::PathBuf};

use home::home_dir;
use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    cli::GitRelocateCli,
    errors::{GitRelocateError, GitRelocateErrorKind},
    forgejo::{config::ForgejoConfig, platform::ForgejoPlatform},
    github::{config::GithubConfig, platform::GithubPlatform},
    gitlab::{config::GitlabConfig, platform::GitlabPlatform},
};

/// Configuration data
#[derive(Debug, Clone)]
pub struct GitRelocateConfig {
    /// path to the configuration file, if one was read
    pub config_path: Option<PathBuf>,

    /// actual configuration data
    pub config_data: ConfigData,

    /// CLI arguments
    pub cli_args: GitRelocateCli,
}

/// Settings of every platform
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigData {
    /// Gitlab configuration
    pub gitlab: GitlabConfig,

    /// Github configuration
    pub github: GithubConfig,

    /// Forgejo configuration
    pub forgejo: ForgejoConfig,
}

/// Validated platform clients
#[derive(Debug, Clone)]
pub(crate) struct Platforms {
    /// Source
    pub(crate) gitlab: GitlabPlatform,

    /// Destination
    pub(crate) github: GithubPlatform,

    /// Mirror
    pub(crate) forgejo: ForgejoPlatform,
}

impl ConfigData {
    /// Override the values with the ones found by `lookup` (usually the environment)
    pub fn merge_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overlay = |slot: &mut Option<String>, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        };
        overlay(&mut self.gitlab.url, "GITLAB_URL");
        overlay(&mut self.gitlab.token, "GITLAB_TOKEN");
        overlay(&mut self.github.api_url, "GITHUB_API_URL");
        overlay(&mut self.github.token, "GITHUB_TOKEN");
        overlay(&mut self.github.org, "GITHUB_ORG");
        overlay(&mut self.github.user, "GITHUB_USER");
        overlay(&mut self.forgejo.github_token, "GITHUB_FORGEJO_TOKEN");
        overlay(&mut self.forgejo.host, "FORGEJO_HOST");
        overlay(&mut self.forgejo.token, "FORGEJO_TOKEN");
        overlay(&mut self.forgejo.org, "FORGEJO_ORG");
        overlay(&mut self.forgejo.user, "FORGEJO_USER");
    }

    /// Check every required value and build the platform clients
    ///
    /// Tokens are checked first, then owners, then urls.
    pub(crate) fn validate(&self, is_owner_org: bool) -> Result<Platforms, GitRelocateError> {
        self.gitlab.check_token()?;
        self.github.check_token()?;
        self.forgejo.check_tokens()?;
        self.github.owner(is_owner_org)?;
        self.forgejo.owner(is_owner_org)?;
        Ok(Platforms {
            gitlab: self.gitlab.get_platform()?,
            github: self.github.get_platform(is_owner_org)?,
            forgejo: self.forgejo.get_platform(is_owner_org)?,
        })
    }
}

impl GitRelocateConfig {
    /// Load the configuration from the config file and the environment
    /// # Errors
    /// Error if the config file can't be read or parsed
    pub fn try_new(cli_args: GitRelocateCli) -> Result<Self, GitRelocateError> {
        dotenv::dotenv().ok();
        let config_path = match cli_args.config.clone() {
            Some(path) => Some(path),
            None => Self::get_config_path().filter(|path| path.exists()),
        };
        let contents = match &config_path {
            Some(path) => {
                debug!("reading config from {}", path.display());
                Some(read_to_string(path).map_err(|e| {
                    GitRelocateError::new(GitRelocateErrorKind::Config)
                        .with_text(&format!("Unable to open {}: {e}", path.display()))
                })?)
            }
            None => None,
        };
        Self::from_parts(cli_args, config_path, contents.as_deref(), |key| {
            std::env::var(key).ok()
        })
    }

    /// Build the configuration from a config file content and an environment lookup
    /// # Errors
    /// Error if the config file can't be parsed
    pub fn from_parts<F>(
        cli_args: GitRelocateCli,
        config_path: Option<PathBuf>,
        contents: Option<&str>,
        lookup: F,
    ) -> Result<Self, GitRelocateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config_data: ConfigData = match contents {
            Some(contents) => toml::from_str(contents)?,
            None => ConfigData::default(),
        };
        config_data.merge_env(lookup);
        Ok(GitRelocateConfig {
            config_path,
            config_data,
            cli_args,
        })
    }

    /// Default path of the config file
    pub fn get_config_path() -> Option<PathBuf> {
        match home_dir() {
            Some(path) if !path.as_os_str().is_empty() => Some(
                path.join(".config")
                    .join(".git-relocate")
                    .join("config.toml"),
            ),
            _ => None,
        }
    }

    /// Validate the configuration and build the platform clients
    pub(crate) fn platforms(&self) -> Result<Platforms, GitRelocateError> {
        self.config_data.validate(self.cli_args.is_owner_org())
    }
}

/// The value, unless missing or empty
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// The value, or an error naming the missing variable
pub(crate) fn required(value: &Option<String>, name: &str) -> Result<String, GitRelocateError> {
    match non_empty(value) {
        Some(v) => Ok(v.to_string()),
        None => Err(GitRelocateError::new(GitRelocateErrorKind::Config)
            .with_text(&format!("{name} is required"))),
    }
}

/// Check the value is an url
pub(crate) fn parse_url(value: &str, name: &str) -> Result<String, GitRelocateError> {
    let url = Url::parse(value).map_err(|e| {
        GitRelocateError::new(GitRelocateErrorKind::Config)
            .with_text(&format!("{name} is not a valid url ({value}): {e}"))
    })?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}
