//! Forgejo platform implementation
use log::debug;
use reqwest::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    RequestBuilder, StatusCode,
};
use urlencoding::encode;

use super::{
    repo::{ForgejoRepo, ForgejoVariable, MigrateRepoForgejo},
    variable_name,
};
use crate::{
    errors::{GitRelocateError, GitRelocateErrorKind},
    platform::{upsert, Owner, PlatformType, Upsert},
};

/// Forgejo platform
#[derive(Debug, Clone)]
pub struct ForgejoPlatform {
    /// Forgejo host, without trailing slash
    host: String,

    /// Forgejo token
    token: String,

    /// Github token forgejo uses to pull the mirror
    github_token: String,

    /// Owner of the repositories
    owner: Owner,

    /// Reqwest client
    client: reqwest::Client,
}

impl ForgejoPlatform {
    /// Create a new forgejo platform
    pub(crate) fn new(host: String, token: String, github_token: String, owner: Owner) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token,
            github_token,
            owner,
            client: reqwest::Client::new(),
        }
    }

    /// Owner of the repositories
    pub(crate) fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Add the forgejo headers to a request
    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
    }

    /// Url of one repository of the owner
    fn repo_url(&self, repo_name: &str) -> String {
        format!(
            "{}/api/v1/repos/{}/{}",
            self.host,
            encode(self.owner.name()),
            encode(repo_name)
        )
    }

    /// Create a private pull-mirror of `clone_addr` (a github repository),
    /// or look it up if it already exists (409)
    pub(crate) async fn migrate_repo(
        &self,
        repo_name: &str,
        clone_addr: &str,
    ) -> Result<Upsert<ForgejoRepo>, GitRelocateError> {
        let url = format!("{}/api/v1/repos/migrate", self.host);
        let json_body = MigrateRepoForgejo {
            service: "github",
            mirror: true,
            private: true,
            repo_owner: self.owner.name(),
            repo_name,
            clone_addr,
            auth_token: &self.github_token,
        };
        debug!("POST {url}");
        let response = self
            .with_headers(self.client.post(&url))
            .json(&json_body)
            .send()
            .await?;
        upsert(
            response,
            StatusCode::CONFLICT,
            || self.get_repo(repo_name),
            |text| {
                GitRelocateError::new(GitRelocateErrorKind::MirrorCreation)
                    .with_platform(PlatformType::Forgejo)
                    .with_text(&format!("POST {url}: {text}"))
            },
        )
        .await
    }

    /// Get a repository of the owner
    pub(crate) async fn get_repo(&self, repo_name: &str) -> Result<ForgejoRepo, GitRelocateError> {
        let url = self.repo_url(repo_name);
        debug!("GET {url}");
        let response = self.with_headers(self.client.get(&url)).send().await?;
        if !response.status().is_success() {
            let text = response.text().await?;
            return Err(GitRelocateError::new(GitRelocateErrorKind::GetRepo)
                .with_platform(PlatformType::Forgejo)
                .with_text(&format!("GET {url}: {text}")));
        }
        let text = response.text().await?;
        let repo: ForgejoRepo = serde_json::from_str(&text)?;
        Ok(repo)
    }

    /// Create an actions variable from a gitlab variable
    pub(crate) async fn create_variable(
        &self,
        repo_name: &str,
        key: &str,
        value: &str,
    ) -> Result<(), GitRelocateError> {
        let url = format!(
            "{}/actions/variables/{}",
            self.repo_url(repo_name),
            encode(variable_name(key))
        );
        debug!("POST {url}");
        let response = self
            .with_headers(self.client.post(&url))
            .json(&ForgejoVariable { value })
            .send()
            .await?;
        if !response.status().is_success() {
            let text = response.text().await?;
            return Err(GitRelocateError::new(GitRelocateErrorKind::VariableCreation)
                .with_platform(PlatformType::Forgejo)
                .with_text(&format!("POST {url}: {text}")));
        }
        Ok(())
    }
}
