//! # git-relocate
//!
//! Move a gitlab project to github, mirror it on forgejo and archive the gitlab project
//!
//! ## Usage
//!
//! ```txt
//! Usage: git-relocate [OPTIONS] <REPO_ID> [AS_USER]
//!
//! Arguments:
//!   <REPO_ID>  Gitlab project id (or full path, like `group/project`)
//!   [AS_USER]  Pass any value to own the new repositories as the authenticated user
//!
//! Options:
//!   -c, --config <CONFIG>    Custom configuration file path
//!   -w, --workdir <WORKDIR>  Directory where the local mirror is cloned
//!       --no-archive         Don't archive the gitlab project at the end
//!   -v, --verbose...         Verbose mode (-v, -vv)
//!   -h, --help               Print help
//!   -V, --version            Print version
//! ```
//!
//! ## Steps
//!
//! 1. fetch the gitlab project
//! 2. mirror-clone it locally
//! 3. create the github repository (or reuse the existing one)
//! 4. mirror-push to github
//! 5. copy the CI/CD variables and the issues to github
//! 6. create a forgejo pull-mirror of the github repository (or reuse the existing one)
//! 7. copy the CI/CD variables to forgejo
//! 8. remove the local clone and archive the gitlab project

#![warn(clippy::all, rust_2018_idioms)]
#![deny(
    missing_docs,
    clippy::all,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![warn(clippy::multiple_crate_versions)]

pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod git;
pub(crate) mod migrate;
pub(crate) mod platform;
pub(crate) mod utils;

mod forgejo;
mod github;
mod gitlab;

pub use cli::{git_relocate_main, GitRelocateCli};
pub use config::{ConfigData, GitRelocateConfig};
pub use errors::{GitRelocateError, GitRelocateErrorKind};
pub use migrate::Migration;
pub use platform::{Owner, PlatformType, Upsert};
