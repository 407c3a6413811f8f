//! Github wire types
use serde::{Deserialize, Serialize};

use crate::gitlab::repo::{GitlabIssue, GitlabProject};

/// Github Repo
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct RepoGithub {
    /// Repository full name (`owner/name`)
    pub full_name: String,

    /// Repository private status
    pub private: bool,

    /// Repository URL
    pub html_url: String,

    /// Repository SSH URL
    pub ssh_url: String,
}

/// Body of the repository creation request
#[derive(Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct CreateRepoGithub {
    /// Repository name
    pub name: String,

    /// Repository description, without control characters
    pub description: String,

    /// Repository private status
    pub private: bool,

    /// Allow merge commits
    pub allow_merge_commit: bool,

    /// Allow rebase merges
    pub allow_rebase_merge: bool,

    /// Delete head branches once merged
    pub delete_branch_on_merge: bool,
}

impl From<&GitlabProject> for CreateRepoGithub {
    fn from(project: &GitlabProject) -> Self {
        CreateRepoGithub {
            name: project.path.clone(),
            description: sanitize_description(project.description.as_deref()),
            private: !project.is_public(),
            allow_merge_commit: false,
            allow_rebase_merge: false,
            delete_branch_on_merge: true,
        }
    }
}

/// Github actions variable
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GithubVariable<'a> {
    /// Variable name
    pub name: &'a str,

    /// Variable value
    pub value: &'a str,
}

/// Github issue
#[derive(Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct GithubIssue {
    /// Issue title
    pub title: String,

    /// Issue body
    pub body: String,

    /// Label names
    pub labels: Vec<String>,
}

impl From<&GitlabIssue> for GithubIssue {
    fn from(issue: &GitlabIssue) -> Self {
        GithubIssue {
            title: issue.title.clone(),
            body: issue.description.clone().unwrap_or_default(),
            labels: issue.labels.clone(),
        }
    }
}

/// Github refuses control characters in descriptions
pub(crate) fn sanitize_description(description: Option<&str>) -> String {
    description
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
