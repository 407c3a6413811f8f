//! Command line options for the git-relocate tool
use crate::{config::GitRelocateConfig, errors::GitRelocateError, migrate::Migration};
use clap::Parser;
use log::{debug, LevelFilter};
use std::path::PathBuf;

/// git-relocate - Move a gitlab project to github and mirror it on forgejo
#[derive(Parser, Default, Clone, Debug)]
#[command(version)]
pub struct GitRelocateCli {
    /// Gitlab project id (or full path, like `group/project`)
    pub repo_id: String,

    /// Pass any value to own the new repositories as the authenticated user
    /// instead of the configured organization
    pub as_user: Option<String>,

    /// Custom configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory where the local mirror is cloned
    #[arg(short, long)]
    pub workdir: Option<PathBuf>,

    /// Don't archive the gitlab project at the end
    #[arg(long = "no-archive")]
    pub no_archive: bool,

    /// Verbose mode (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GitRelocateCli {
    /// Whether the new repositories belong to the organization
    pub fn is_owner_org(&self) -> bool {
        self.as_user.is_none()
    }

    /// Log level asked for
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Run the git-relocate tool with the provided command line options
/// # Errors
/// Error if the configuration is incomplete or if a step of the migration fails
pub async fn git_relocate_main(args: GitRelocateCli) -> Result<(), GitRelocateError> {
    let config = GitRelocateConfig::try_new(args)?;
    match &config.config_path {
        Some(path) => debug!("using config file {}", path.display()),
        None => debug!("no config file, using the environment only"),
    }
    let migration = Migration::try_new(&config)?;
    migration.run().await
}
