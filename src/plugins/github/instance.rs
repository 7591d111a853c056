//! GitHub instance contract and its configuration

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DashError, Result};
use crate::plugins::{Instance, InstanceConfig};

fn default_address() -> String {
    "https://api.github.com".to_string()
}

/// Configuration of one GitHub organization
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubConfig {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub organization: String,
    /// API address, GitHub Enterprise installations use `https://<host>/api/v3`
    #[serde(default = "default_address")]
    pub address: String,
    /// Token used for all API requests
    #[serde(default)]
    pub token: Option<SecretString>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_name: String::new(),
            description: String::new(),
            organization: String::new(),
            address: default_address(),
            token: None,
            timeout: None,
        }
    }
}

impl GithubConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(DashError::config("Instance name cannot be empty"));
        }

        if self.organization.is_empty() {
            return Err(DashError::config("Organization cannot be empty"));
        }

        if !is_login(&self.organization) {
            return Err(DashError::config(format!(
                "Invalid organization '{}'",
                self.organization
            )));
        }

        Url::parse(&self.address).map_err(|e| {
            DashError::config(format!("Invalid address '{}': {}", self.address, e))
        })?;

        if self.timeout == Some(0) {
            return Err(DashError::config("Timeout cannot be 0"));
        }

        Ok(())
    }
}

/// GitHub logins are alphanumerics and hyphens, without a leading or trailing hyphen
fn is_login(value: &str) -> bool {
    !value.starts_with('-')
        && !value.ends_with('-')
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl InstanceConfig for GithubConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSearchResult {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<Issue>,
}

/// Operations every GitHub instance provides
#[async_trait]
pub trait GithubInstance: Instance {
    /// The organization all requests are scoped to
    fn organization(&self) -> &str;

    /// One page of the organization's repositories
    async fn get_repositories(&self, page: u32, per_page: u32) -> Result<Vec<Repository>>;

    /// Search issues and pull requests of the organization
    async fn search_issues(&self, query: &str, page: u32, per_page: u32)
        -> Result<IssueSearchResult>;
}
