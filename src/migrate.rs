//! Move one gitlab project to github, mirror it on forgejo and archive it
use std::path::PathBuf;

use log::{info, warn};

use crate::{
    config::{GitRelocateConfig, Platforms},
    errors::GitRelocateError,
    forgejo::{platform::ForgejoPlatform, repo::ForgejoRepo, variable_name},
    git::{mirror_clone, push_mirror, remove_mirror},
    github::{
        platform::GithubPlatform,
        repo::{CreateRepoGithub, GithubIssue, RepoGithub},
    },
    gitlab::{
        platform::GitlabPlatform,
        repo::{GitlabIssue, GitlabProject, GitlabVariable},
    },
    platform::Upsert,
    utils::{apply_all, Report},
};

/// One migration run
#[derive(Debug)]
pub struct Migration {
    /// Gitlab project id (or path)
    pub(crate) repo_id: String,

    /// Directory holding the local mirror
    pub(crate) workdir: PathBuf,

    /// Archive the gitlab project once done
    pub(crate) archive: bool,

    /// Source
    pub(crate) gitlab: GitlabPlatform,

    /// Destination
    pub(crate) github: GithubPlatform,

    /// Mirror
    pub(crate) forgejo: ForgejoPlatform,
}

impl Migration {
    /// Check the configuration and prepare the run, without any network call
    /// # Errors
    /// Error if a required value is missing or invalid
    pub fn try_new(config: &GitRelocateConfig) -> Result<Self, GitRelocateError> {
        let Platforms {
            gitlab,
            github,
            forgejo,
        } = config.platforms()?;
        Ok(Migration {
            repo_id: config.cli_args.repo_id.clone(),
            workdir: config
                .cli_args
                .workdir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
            archive: !config.cli_args.no_archive,
            gitlab,
            github,
            forgejo,
        })
    }

    /// Run every step, stopping at the first hard failure
    /// # Errors
    /// Error if a step other than copying variables and issues fails
    pub async fn run(&self) -> Result<(), GitRelocateError> {
        info!("fetching gitlab repo info...");
        let project = self.gitlab.get_project(&self.repo_id).await?;
        info!("found gitlab project {} ({})", project.path, project.id);
        let repo_name = project.path.as_str();
        let mirror_path = self.workdir.join(repo_name);

        info!("cloning gitlab repo code...");
        let mirror = mirror_clone(&project.ssh_url_to_repo, &mirror_path)?;

        info!("creating github repo...");
        let github_repo = self.create_github_repo(&project).await?;
        let prune = !github_repo.is_created();
        let github_repo = github_repo.into_inner();

        info!("pushing code to github...");
        push_mirror(&mirror, &github_repo.ssh_url, prune)?;
        drop(mirror);

        info!("copying gitlab repo variables to github...");
        let variables = self.gitlab.get_variables(&self.repo_id).await?;
        if variables.is_empty() {
            info!("no gitlab variables to copy");
        } else {
            self.copy_variables_to_github(repo_name, &variables).await;
        }

        info!("copying gitlab repo issues to github...");
        let issues = self.gitlab.get_issues(&self.repo_id).await?;
        if issues.is_empty() {
            info!("no gitlab issues to copy");
        } else {
            self.copy_issues_to_github(repo_name, &issues).await;
        }

        info!("creating forgejo repo mirroring the github repo...");
        self.create_forgejo_mirror(repo_name, &github_repo).await?;

        if !variables.is_empty() {
            info!("copying gitlab repo variables to forgejo...");
            self.copy_variables_to_forgejo(repo_name, &variables).await;
        }

        info!("removing cloned repo...");
        remove_mirror(&mirror_path)?;

        if self.archive {
            info!("archiving gitlab repo...");
            self.gitlab.archive_project(&self.repo_id).await?;
        } else {
            info!("not archiving gitlab repo");
        }

        info!("done");
        Ok(())
    }

    /// Create the github repository from the gitlab project
    pub(crate) async fn create_github_repo(
        &self,
        project: &GitlabProject,
    ) -> Result<Upsert<RepoGithub>, GitRelocateError> {
        let repo = self.github.create_repo(&CreateRepoGithub::from(project)).await?;
        match &repo {
            Upsert::Created(r) => info!(
                "created {} for {} (private: {})",
                r.full_name,
                self.github.owner().name(),
                r.private
            ),
            Upsert::Found(r) => info!("{} already exists", r.html_url),
        }
        Ok(repo)
    }

    /// Create the forgejo pull-mirror of the github repository
    pub(crate) async fn create_forgejo_mirror(
        &self,
        repo_name: &str,
        github_repo: &RepoGithub,
    ) -> Result<Upsert<ForgejoRepo>, GitRelocateError> {
        let repo = self
            .forgejo
            .migrate_repo(repo_name, &github_repo.html_url)
            .await?;
        match &repo {
            Upsert::Created(r) => info!(
                "created {} for {} (mirror: {})",
                r.full_name,
                self.forgejo.owner().name(),
                r.mirror
            ),
            Upsert::Found(r) => info!("{} already exists", r.html_url),
        }
        Ok(repo)
    }

    /// Copy the variables to github actions variables, one by one
    pub(crate) async fn copy_variables_to_github<'a>(
        &self,
        repo_name: &str,
        variables: &'a [GitlabVariable],
    ) -> Report<'a, GitlabVariable> {
        let report = apply_all(
            variables,
            |var| format!("{} to github actions variables", var.key),
            |var| self.github.create_variable(repo_name, &var.key, &var.value),
        )
        .await;
        summary("variables to github", &report, |var| var.key.as_str());
        report
    }

    /// Copy the issues to github, one by one
    pub(crate) async fn copy_issues_to_github<'a>(
        &self,
        repo_name: &str,
        issues: &'a [GitlabIssue],
    ) -> Report<'a, GitlabIssue> {
        let report = apply_all(
            issues,
            |issue| format!("\"{}\" to github issues", issue.title),
            |issue| async move {
                self.github
                    .create_issue(repo_name, &GithubIssue::from(issue))
                    .await
            },
        )
        .await;
        summary("issues to github", &report, |issue| issue.title.as_str());
        report
    }

    /// Copy the variables to forgejo actions variables, one by one
    pub(crate) async fn copy_variables_to_forgejo<'a>(
        &self,
        repo_name: &str,
        variables: &'a [GitlabVariable],
    ) -> Report<'a, GitlabVariable> {
        let report = apply_all(
            variables,
            |var| {
                format!(
                    "{} to forgejo actions variables as {}",
                    var.key,
                    variable_name(&var.key)
                )
            },
            |var| self.forgejo.create_variable(repo_name, &var.key, &var.value),
        )
        .await;
        summary("variables to forgejo", &report, |var| var.key.as_str());
        report
    }
}

/// Log how a best-effort copy went
fn summary<T>(what: &str, report: &Report<'_, T>, name: impl Fn(&T) -> &str) {
    if report.failed() == 0 {
        info!("copied {} {what}", report.succeeded());
    } else {
        let failed: Vec<&str> = report.failures().map(|o| name(o.item)).collect();
        warn!(
            "copied {} {what}, failed: {}",
            report.succeeded(),
            failed.join(", ")
        );
    }
}
