//! Github configuration
use serde::{Deserialize, Serialize};

use super::{platform::GithubPlatform, GITHUB_API_URL};
use crate::{
    config::{non_empty, parse_url, required},
    errors::{GitRelocateError, GitRelocateErrorKind},
    platform::{Owner, PlatformType},
};

/// Github configuration
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    /// API url (`GITHUB_API_URL`)
    pub api_url: Option<String>,

    /// Github token (`GITHUB_TOKEN`)
    pub token: Option<String>,

    /// Organization owning the new repositories (`GITHUB_ORG`)
    pub org: Option<String>,

    /// User owning the new repositories (`GITHUB_USER`)
    pub user: Option<String>,
}

impl GithubConfig {
    /// Check the token is set
    pub(crate) fn check_token(&self) -> Result<String, GitRelocateError> {
        required(&self.token, "GITHUB_TOKEN")
    }

    /// Resolve the owner of the new repositories
    pub(crate) fn owner(&self, is_owner_org: bool) -> Result<Owner, GitRelocateError> {
        if non_empty(&self.org).is_none() && non_empty(&self.user).is_none() {
            return Err(GitRelocateError::new(GitRelocateErrorKind::Config)
                .with_platform(PlatformType::Github)
                .with_text("either GITHUB_ORG or GITHUB_USER is required"));
        }
        Owner::resolve(non_empty(&self.org), non_empty(&self.user), is_owner_org).ok_or_else(
            || {
                GitRelocateError::new(GitRelocateErrorKind::Config)
                    .with_platform(PlatformType::Github)
                    .with_text("GITHUB_USER is required to own the repository as the current user")
            },
        )
    }

    /// Get the github platform
    pub(crate) fn get_platform(
        &self,
        is_owner_org: bool,
    ) -> Result<GithubPlatform, GitRelocateError> {
        let token = self.check_token()?;
        let owner = self.owner(is_owner_org)?;
        let api_url = parse_url(
            non_empty(&self.api_url).unwrap_or(GITHUB_API_URL),
            "GITHUB_API_URL",
        )?;
        Ok(GithubPlatform::new(api_url, token, owner))
    }
}
