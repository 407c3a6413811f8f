//! Github Platform
use super::{
    repo::{CreateRepoGithub, GithubIssue, GithubVariable, RepoGithub},
    GITHUB_API_HEADER, GITHUB_API_VERSION,
};
use crate::{
    errors::{GitRelocateError, GitRelocateErrorKind},
    platform::{upsert, Owner, PlatformType, Upsert},
};
use log::{debug, error};
use reqwest::{
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
    RequestBuilder, StatusCode,
};
use serde::Serialize;
use urlencoding::encode;

/// Github Platform
#[derive(Debug, Clone)]
pub struct GithubPlatform {
    /// API url, without trailing slash
    api_url: String,

    /// Github token
    token: String,

    /// Owner of the repositories
    owner: Owner,

    /// Reqwest client
    client: reqwest::Client,
}

impl GithubPlatform {
    /// Create a new GithubPlatform
    pub(crate) fn new(api_url: String, token: String, owner: Owner) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            owner,
            client: reqwest::Client::new(),
        }
    }

    /// Owner of the repositories
    pub(crate) fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Add the github headers to a request
    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(
                USER_AGENT,
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )
            .header(GITHUB_API_HEADER, GITHUB_API_VERSION)
    }

    /// Url of one repository of the owner
    fn repo_url(&self, repo_name: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_url,
            encode(self.owner.name()),
            encode(repo_name)
        )
    }

    /// POST a json body, failing with `kind`
    async fn post<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        kind: GitRelocateErrorKind,
    ) -> Result<(), GitRelocateError> {
        debug!("POST {url}");
        let response = self
            .with_headers(self.client.post(url))
            .json(body)
            .send()
            .await?;
        if !response.status().is_success() {
            let text = response.text().await?;
            return Err(GitRelocateError::new(kind)
                .with_platform(PlatformType::Github)
                .with_text(&format!("POST {url}: {text}")));
        }
        Ok(())
    }

    /// Create the repository, or look it up if it already exists (422)
    pub(crate) async fn create_repo(
        &self,
        repo: &CreateRepoGithub,
    ) -> Result<Upsert<RepoGithub>, GitRelocateError> {
        let url = match &self.owner {
            Owner::Org(org) => format!("{}/orgs/{}/repos", self.api_url, encode(org)),
            Owner::User(_) => format!("{}/user/repos", self.api_url),
        };
        debug!("POST {url}");
        let response = self
            .with_headers(self.client.post(&url))
            .json(repo)
            .send()
            .await?;
        upsert(
            response,
            StatusCode::UNPROCESSABLE_ENTITY,
            || self.get_repo(&repo.name),
            |text| {
                error!("POST {url}");
                GitRelocateError::new(GitRelocateErrorKind::RepoCreation)
                    .with_platform(PlatformType::Github)
                    .with_text(text)
            },
        )
        .await
    }

    /// Get a repository of the owner
    pub(crate) async fn get_repo(&self, repo_name: &str) -> Result<RepoGithub, GitRelocateError> {
        let url = self.repo_url(repo_name);
        debug!("GET {url}");
        let response = self.with_headers(self.client.get(&url)).send().await?;
        if !response.status().is_success() {
            error!("GET {url}");
            let text = response.text().await?;
            return Err(GitRelocateError::new(GitRelocateErrorKind::GetRepo)
                .with_platform(PlatformType::Github)
                .with_text(&format!("GET {url}: {text}")));
        }
        let text = response.text().await?;
        let repo: RepoGithub = serde_json::from_str(&text)?;
        Ok(repo)
    }

    /// Create an actions variable on a repository
    pub(crate) async fn create_variable(
        &self,
        repo_name: &str,
        name: &str,
        value: &str,
    ) -> Result<(), GitRelocateError> {
        let url = format!("{}/actions/variables", self.repo_url(repo_name));
        self.post(
            &url,
            &GithubVariable { name, value },
            GitRelocateErrorKind::VariableCreation,
        )
        .await
    }

    /// Create an issue on a repository
    pub(crate) async fn create_issue(
        &self,
        repo_name: &str,
        issue: &GithubIssue,
    ) -> Result<(), GitRelocateError> {
        let url = format!("{}/issues", self.repo_url(repo_name));
        self.post(&url, issue, GitRelocateErrorKind::IssueCreation).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo_json() -> serde_json::Value {
        json!({
            "id": 1,
            "name": "widgets",
            "full_name": "acme/widgets",
            "description": "Internal **tool**",
            "private": true,
            "html_url": "https://github.com/acme/widgets",
            "ssh_url": "git@github.com:acme/widgets.git"
        })
    }

    fn create_body() -> CreateRepoGithub {
        CreateRepoGithub {
            name: "widgets".to_string(),
            description: "Internal **tool**".to_string(),
            private: true,
            allow_merge_commit: false,
            allow_rebase_merge: false,
            delete_branch_on_merge: true,
        }
    }

    #[tokio::test]
    async fn create_repo_in_org() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orgs/acme/repos"))
            .and(header("Authorization", "Bearer ghp"))
            .and(header("X-GitHub-Api-Version", "2022-11-28"))
            .and(body_json(json!({
                "name": "widgets",
                "description": "Internal **tool**",
                "private": true,
                "allow_merge_commit": false,
                "allow_rebase_merge": false,
                "delete_branch_on_merge": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(repo_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let github = GithubPlatform::new(
            mock_server.uri(),
            "ghp".to_string(),
            Owner::Org("acme".to_string()),
        );
        let repo = github.create_repo(&create_body()).await.unwrap();
        assert!(repo.is_created());
        assert_eq!(repo.into_inner().ssh_url, "git@github.com:acme/widgets.git");
    }

    #[tokio::test]
    async fn create_repo_as_user() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .respond_with(ResponseTemplate::new(201).set_body_json(repo_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let github = GithubPlatform::new(
            mock_server.uri(),
            "ghp".to_string(),
            Owner::User("me".to_string()),
        );
        assert!(github.create_repo(&create_body()).await.unwrap().is_created());
    }

    #[tokio::test]
    async fn existing_repo_is_looked_up() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orgs/acme/repos"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Repository creation failed.",
                "errors": [{"message": "name already exists on this account"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let github = GithubPlatform::new(
            mock_server.uri(),
            "ghp".to_string(),
            Owner::Org("acme".to_string()),
        );
        let repo = github.create_repo(&create_body()).await.unwrap();
        assert!(!repo.is_created());
        assert_eq!(repo.into_inner().html_url, "https://github.com/acme/widgets");
    }

    #[tokio::test]
    async fn other_creation_errors_abort() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orgs/acme/repos"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Must have admin rights"))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let github = GithubPlatform::new(
            mock_server.uri(),
            "ghp".to_string(),
            Owner::Org("acme".to_string()),
        );
        let err = github.create_repo(&create_body()).await.unwrap_err();
        assert_eq!(err.kind(), &GitRelocateErrorKind::RepoCreation);
        assert!(err.to_string().contains("Must have admin rights"));
    }

    #[tokio::test]
    async fn create_variable_and_issue() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/me/widgets/actions/variables"))
            .and(body_json(json!({"name": "CI_DEPLOY_TOKEN", "value": "secret"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/me/widgets/issues"))
            .and(body_json(json!({"title": "Crash", "body": "", "labels": ["bug"]})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"number": 1})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let github = GithubPlatform::new(
            mock_server.uri(),
            "ghp".to_string(),
            Owner::User("me".to_string()),
        );
        github
            .create_variable("widgets", "CI_DEPLOY_TOKEN", "secret")
            .await
            .unwrap();
        let issue = GithubIssue {
            title: "Crash".to_string(),
            body: String::new(),
            labels: vec!["bug".to_string()],
        };
        github.create_issue("widgets", &issue).await.unwrap();
    }

    #[tokio::test]
    async fn get_repo_error_names_the_url() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let github = GithubPlatform::new(
            mock_server.uri(),
            "ghp".to_string(),
            Owner::Org("acme".to_string()),
        );
        let err = github.get_repo("widgets").await.unwrap_err();
        assert_eq!(err.kind(), &GitRelocateErrorKind::GetRepo);
        assert!(err
            .to_string()
            .contains(&format!("GET {}/repos/acme/widgets: Not Found", mock_server.uri())));
    }
}
