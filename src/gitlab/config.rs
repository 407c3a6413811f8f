//! Gitlab configuration
use serde::{Deserialize, Serialize};

use super::{platform::GitlabPlatform, GITLAB_URL};
use crate::{
    config::{non_empty, parse_url, required},
    errors::GitRelocateError,
};

/// Gitlab configuration
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct GitlabConfig {
    /// Gitlab instance url (`GITLAB_URL`)
    pub url: Option<String>,

    /// Gitlab token (`GITLAB_TOKEN`)
    pub token: Option<String>,
}

impl GitlabConfig {
    /// Check the token is set
    pub(crate) fn check_token(&self) -> Result<String, GitRelocateError> {
        required(&self.token, "GITLAB_TOKEN")
    }

    /// Get the gitlab platform
    pub(crate) fn get_platform(&self) -> Result<GitlabPlatform, GitRelocateError> {
        let token = self.check_token()?;
        let url = parse_url(non_empty(&self.url).unwrap_or(GITLAB_URL), "GITLAB_URL")?;
        Ok(GitlabPlatform::new(url, token))
    }
}
