//! Gitlab platform implementation
use log::debug;
use reqwest::header::ACCEPT;
use urlencoding::encode;

use super::{
    repo::{GitlabIssue, GitlabProject, GitlabVariable},
    GITLAB_TOKEN_HEADER,
};
use crate::{
    errors::{GitRelocateError, GitRelocateErrorKind},
    platform::PlatformType,
};

/// Gitlab platform
#[derive(Default, Debug, Clone)]
pub struct GitlabPlatform {
    /// Base url of the instance, without trailing slash
    url: String,

    /// Gitlab token
    token: String,

    /// Reqwest client
    client: reqwest::Client,
}

impl GitlabPlatform {
    /// Create a new gitlab platform
    pub(crate) fn new(url: String, token: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Url of a project, `id` can be the numeric id or the full path
    fn project_url(&self, id: &str) -> String {
        format!("{}/api/v4/projects/{}", self.url, encode(id))
    }

    /// GET a json document, failing with `kind` and the response body
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        kind: GitRelocateErrorKind,
    ) -> Result<T, GitRelocateError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .header(GITLAB_TOKEN_HEADER, &self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            let text = response.text().await?;
            return Err(GitRelocateError::new(kind)
                .with_platform(PlatformType::Gitlab)
                .with_text(&format!("GET {url}: {text}")));
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch the project
    pub(crate) async fn get_project(&self, id: &str) -> Result<GitlabProject, GitRelocateError> {
        let url = self.project_url(id);
        self.get_json(&url, GitRelocateErrorKind::GetProject).await
    }

    /// List the CI/CD variables of the project (first page only)
    pub(crate) async fn get_variables(
        &self,
        id: &str,
    ) -> Result<Vec<GitlabVariable>, GitRelocateError> {
        let url = format!("{}/variables", self.project_url(id));
        self.get_json(&url, GitRelocateErrorKind::GetVariables).await
    }

    /// List the issues of the project (first page only)
    pub(crate) async fn get_issues(&self, id: &str) -> Result<Vec<GitlabIssue>, GitRelocateError> {
        let url = format!("{}/issues", self.project_url(id));
        self.get_json(&url, GitRelocateErrorKind::GetIssues).await
    }

    /// Archive the project
    pub(crate) async fn archive_project(&self, id: &str) -> Result<(), GitRelocateError> {
        let url = format!("{}/archive", self.project_url(id));
        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .header(GITLAB_TOKEN_HEADER, &self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            let text = response.text().await?;
            return Err(GitRelocateError::new(GitRelocateErrorKind::Archive)
                .with_platform(PlatformType::Gitlab)
                .with_text(&format!("POST {url}: {text}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_project_sends_token() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/123"))
            .and(header("PRIVATE-TOKEN", "glpat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 123,
                "path": "widgets",
                "description": "Widgets",
                "ssh_url_to_repo": "git@gitlab.com:acme/widgets.git",
                "visibility": "public"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let gitlab = GitlabPlatform::new(mock_server.uri(), "glpat".to_string());
        let project = gitlab.get_project("123").await.unwrap();
        assert_eq!(project.path, "widgets");
        assert!(project.is_public());
    }

    #[tokio::test]
    async fn get_project_by_path_is_encoded() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/acme%2Fwidgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 123,
                "path": "widgets",
                "ssh_url_to_repo": "git@gitlab.com:acme/widgets.git",
                "visibility": "private"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let gitlab = GitlabPlatform::new(format!("{}/", mock_server.uri()), "t".to_string());
        let project = gitlab.get_project("acme/widgets").await.unwrap();
        assert_eq!(project.id, 123);
    }

    #[tokio::test]
    async fn get_project_error_surfaces_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("404 Project Not Found"))
            .mount(&mock_server)
            .await;

        let gitlab = GitlabPlatform::new(mock_server.uri(), "t".to_string());
        let err = gitlab.get_project("404").await.unwrap_err();
        assert_eq!(err.kind(), &GitRelocateErrorKind::GetProject);
        assert!(err.to_string().contains("404 Project Not Found"));
    }

    #[tokio::test]
    async fn archive_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/projects/123/archive"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let gitlab = GitlabPlatform::new(mock_server.uri(), "t".to_string());
        let err = gitlab.archive_project("123").await.unwrap_err();
        assert_eq!(err.kind(), &GitRelocateErrorKind::Archive);
    }
}
