//! Forgejo API module, where the github repository is mirrored.
pub(crate) mod config;
pub(crate) mod platform;
pub(crate) mod repo;

/// Prefix of gitlab predefined variables, forgejo reserves its own
const GITLAB_VARIABLE_PREFIX: &str = "CI_";

/// Name of a gitlab variable once copied to forgejo
///
/// Only one leading `CI_` is stripped, other keys are kept as they are.
pub(crate) fn variable_name(key: &str) -> &str {
    key.strip_prefix(GITLAB_VARIABLE_PREFIX).unwrap_or(key)
}
