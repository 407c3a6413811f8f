//! Gitlab wire types
use serde::{Deserialize, Serialize};

/// Gitlab project, as returned by `GET /projects/:id`
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct GitlabProject {
    /// Project id
    pub id: u64,

    /// Project path, used as the name of every destination repository
    pub path: String,

    /// Project description
    pub description: Option<String>,

    /// SSH clone url
    pub ssh_url_to_repo: String,

    /// Visibility (`public`, `internal` or `private`)
    pub visibility: String,
}

impl GitlabProject {
    /// Whether the project is publicly visible
    pub fn is_public(&self) -> bool {
        self.visibility == "public"
    }
}

/// Gitlab CI/CD variable
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct GitlabVariable {
    /// Variable key
    pub key: String,

    /// Variable value
    pub value: String,
}

/// Gitlab issue
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct GitlabIssue {
    /// Issue title
    pub title: String,

    /// Issue description
    pub description: Option<String>,

    /// Label names
    #[serde(default)]
    pub labels: Vec<String>,
}
