//! Forgejo configuration
use serde::{Deserialize, Serialize};

use super::platform::ForgejoPlatform;
use crate::{
    config::{non_empty, parse_url, required},
    errors::{GitRelocateError, GitRelocateErrorKind},
    platform::{Owner, PlatformType},
};

/// Forgejo configuration
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct ForgejoConfig {
    /// Forgejo host, like `https://codeberg.org` (`FORGEJO_HOST`)
    pub host: Option<String>,

    /// Forgejo token (`FORGEJO_TOKEN`)
    pub token: Option<String>,

    /// Github token forgejo uses to pull the mirror (`GITHUB_FORGEJO_TOKEN`)
    pub github_token: Option<String>,

    /// Organization owning the mirror (`FORGEJO_ORG`)
    pub org: Option<String>,

    /// User owning the mirror (`FORGEJO_USER`)
    pub user: Option<String>,
}

impl ForgejoConfig {
    /// Check both tokens are set
    pub(crate) fn check_tokens(&self) -> Result<(String, String), GitRelocateError> {
        let github_token = required(&self.github_token, "GITHUB_FORGEJO_TOKEN")?;
        let token = required(&self.token, "FORGEJO_TOKEN")?;
        Ok((token, github_token))
    }

    /// Resolve the owner of the mirror
    pub(crate) fn owner(&self, is_owner_org: bool) -> Result<Owner, GitRelocateError> {
        if non_empty(&self.org).is_none() && non_empty(&self.user).is_none() {
            return Err(GitRelocateError::new(GitRelocateErrorKind::Config)
                .with_platform(PlatformType::Forgejo)
                .with_text("either FORGEJO_ORG or FORGEJO_USER is required"));
        }
        Owner::resolve(non_empty(&self.org), non_empty(&self.user), is_owner_org).ok_or_else(
            || {
                GitRelocateError::new(GitRelocateErrorKind::Config)
                    .with_platform(PlatformType::Forgejo)
                    .with_text("FORGEJO_USER is required to own the mirror as the current user")
            },
        )
    }

    /// Get the forgejo platform
    pub(crate) fn get_platform(
        &self,
        is_owner_org: bool,
    ) -> Result<ForgejoPlatform, GitRelocateError> {
        let (token, github_token) = self.check_tokens()?;
        let owner = self.owner(is_owner_org)?;
        let host = parse_url(&required(&self.host, "FORGEJO_HOST")?, "FORGEJO_HOST")?;
        Ok(ForgejoPlatform::new(host, token, github_token, owner))
    }
}
