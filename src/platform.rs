//! Vocabulary shared by the gitlab, github and forgejo clients
use std::future::Future;

use log::info;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::GitRelocateError;

/// The platforms a migration talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformType {
    /// Source platform
    Gitlab,
    /// Destination platform
    Github,
    /// Mirror platform
    Forgejo,
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformType::Gitlab => write!(f, "gitlab"),
            PlatformType::Github => write!(f, "github"),
            PlatformType::Forgejo => write!(f, "forgejo"),
        }
    }
}

/// Who owns the repositories created on a destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    /// An organization
    Org(String),
    /// The authenticated user
    User(String),
}

impl Owner {
    /// Pick the owner: the organization unless the run asks for the user
    /// (or no organization is configured).
    pub(crate) fn resolve(
        org: Option<&str>,
        user: Option<&str>,
        is_owner_org: bool,
    ) -> Option<Self> {
        match (org, user) {
            (Some(org), _) if is_owner_org => Some(Owner::Org(org.to_string())),
            (_, Some(user)) => Some(Owner::User(user.to_string())),
            _ => None,
        }
    }

    /// Name of the owner, as used in repository paths
    pub fn name(&self) -> &str {
        match self {
            Owner::Org(name) | Owner::User(name) => name,
        }
    }
}

/// Result of a create-or-fetch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert<T> {
    /// The resource was created by this run
    Created(T),
    /// The resource already existed and was looked up
    Found(T),
}

impl<T> Upsert<T> {
    /// Whether this run created the resource
    pub fn is_created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }

    /// Get the resource, whichever way it was obtained
    pub fn into_inner(self) -> T {
        match self {
            Upsert::Created(inner) | Upsert::Found(inner) => inner,
        }
    }
}

/// Turn a creation response into an [`Upsert`].
///
/// A success is decoded as the created resource, `conflict` means the resource
/// already exists and `lookup` is awaited instead, anything else goes through `on_error`
/// with the response body.
pub(crate) async fn upsert<T, L, Fut, E>(
    response: Response,
    conflict: StatusCode,
    lookup: L,
    on_error: E,
) -> Result<Upsert<T>, GitRelocateError>
where
    T: DeserializeOwned,
    L: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, GitRelocateError>>,
    E: FnOnce(&str) -> GitRelocateError,
{
    let status = response.status();
    if status.is_success() {
        let text = response.text().await?;
        let created: T = serde_json::from_str(&text)?;
        return Ok(Upsert::Created(created));
    }
    if status == conflict {
        info!("already exists ({status}), looking it up");
        return lookup().await.map(Upsert::Found);
    }
    let text = response.text().await?;
    Err(on_error(&text))
}
