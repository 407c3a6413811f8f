//! Error handling for the git-relocate crate.
use std::{error::Error as StdError, fmt};

use crate::platform::PlatformType;

/// Error type for the git-relocate crate.
#[derive(Debug)]
pub struct GitRelocateError {
    /// Inner error.
    inner: Box<Inner>,
}

impl GitRelocateError {
    /// Create a new error.
    pub(crate) fn new(kind: GitRelocateErrorKind) -> Self {
        Self {
            inner: Box::new(Inner {
                kind,
                source: None,
                platform: None,
            }),
        }
    }

    /// Create a new error with a source.
    pub(crate) fn new_with_source<E>(kind: GitRelocateErrorKind, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            inner: Box::new(Inner {
                kind,
                source: Some(source.into()),
                platform: None,
            }),
        }
    }

    /// Attach a text (usually a response body) as the source.
    pub(crate) fn with_text(mut self, text: &str) -> Self {
        self.inner.source = Some(Box::new(std::io::Error::other(text)));
        self
    }

    /// Attach the platform the error comes from.
    pub(crate) fn with_platform(mut self, platform: PlatformType) -> Self {
        self.inner.platform = Some(platform);
        self
    }

    /// Kind of the error
    pub fn kind(&self) -> &GitRelocateErrorKind {
        &self.inner.kind
    }

    /// Platform the error comes from, if any
    pub fn platform(&self) -> Option<&PlatformType> {
        self.inner.platform.as_ref()
    }
}

/// Type alias for a boxed error.
pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Inner error type for the git-relocate crate.
#[derive(Debug)]
struct Inner {
    /// Error kind.
    kind: GitRelocateErrorKind,

    /// Platform error
    platform: Option<PlatformType>,

    /// Source error.
    source: Option<BoxError>,
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitRelocateErrorKind {
    /// Missing or invalid configuration.
    Config,

    /// Error related to the reqwest crate.
    Reqwest,

    /// Error related to serde.
    Serde,

    /// Error related to Git2.
    Git2,

    /// Error related to the filesystem.
    Io,

    /// Fetching the source project failed.
    GetProject,

    /// Listing the source variables failed.
    GetVariables,

    /// Listing the source issues failed.
    GetIssues,

    /// Creating a repository failed.
    RepoCreation,

    /// Looking up an existing repository failed.
    GetRepo,

    /// Creating an actions variable failed.
    VariableCreation,

    /// Creating an issue failed.
    IssueCreation,

    /// Creating the pull-mirror failed.
    MirrorCreation,

    /// Archiving the source project failed.
    Archive,

    /// Some refs were rejected by the destination.
    Push,

    /// Anything else.
    Custom,
}

impl fmt::Display for GitRelocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(platform) = &self.inner.platform {
            write!(f, "{platform} ")?;
        }
        write!(f, "{:?}", self.inner.kind)?;
        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for GitRelocateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl From<reqwest::Error> for GitRelocateError {
    fn from(e: reqwest::Error) -> Self {
        Self::new_with_source(GitRelocateErrorKind::Reqwest, e)
    }
}

impl From<serde_json::Error> for GitRelocateError {
    fn from(e: serde_json::Error) -> Self {
        Self::new_with_source(GitRelocateErrorKind::Serde, e)
    }
}

impl From<toml::de::Error> for GitRelocateError {
    fn from(e: toml::de::Error) -> Self {
        Self::new_with_source(GitRelocateErrorKind::Config, e)
    }
}

impl From<url::ParseError> for GitRelocateError {
    fn from(e: url::ParseError) -> Self {
        Self::new_with_source(GitRelocateErrorKind::Config, e)
    }
}

impl From<std::io::Error> for GitRelocateError {
    fn from(e: std::io::Error) -> Self {
        Self::new_with_source(GitRelocateErrorKind::Io, e)
    }
}

impl From<git2::Error> for GitRelocateError {
    fn from(e: git2::Error) -> Self {
        Self::new_with_source(GitRelocateErrorKind::Git2, e)
    }
}

impl From<&str> for GitRelocateError {
    fn from(text: &str) -> Self {
        Self::new(GitRelocateErrorKind::Custom).with_text(text)
    }
}

impl From<String> for GitRelocateError {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}
