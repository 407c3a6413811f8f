//! Forgejo wire types
use serde::{Deserialize, Serialize};

/// Forgejo repository
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct ForgejoRepo {
    /// Repository full name (`owner/name`)
    pub full_name: String,

    /// Whether the repository is a mirror
    #[serde(default)]
    pub mirror: bool,

    /// Repository URL
    pub html_url: String,
}

/// Body of `POST /repos/migrate`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MigrateRepoForgejo<'a> {
    /// Service the repository is pulled from
    pub service: &'a str,

    /// Keep pulling from the upstream
    pub mirror: bool,

    /// Repository private status
    pub private: bool,

    /// Owner of the new repository
    pub repo_owner: &'a str,

    /// Name of the new repository
    pub repo_name: &'a str,

    /// Upstream url
    pub clone_addr: &'a str,

    /// Token used to pull from the upstream
    pub auth_token: &'a str,
}

/// Body of `POST /repos/{owner}/{repo}/actions/variables/{name}`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ForgejoVariable<'a> {
    /// Variable value
    pub value: &'a str,
}
