//! Gitlab API module, the source of a migration.
pub(crate) mod config;
pub(crate) mod platform;
pub(crate) mod repo;

/// Default gitlab instance
const GITLAB_URL: &str = "https://gitlab.com";

/// Gitlab token header
const GITLAB_TOKEN_HEADER: &str = "PRIVATE-TOKEN";
