//! GitHub instance backed by the REST API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use super::instance::{GithubConfig, GithubInstance, IssueSearchResult, Repository};
use crate::error::{DashError, Result};
use crate::plugins::{base_url, Instance};

const DEFAULT_TIMEOUT: u64 = 30;

/// GitHub instance for one organization
pub struct GithubClient {
    name: String,
    organization: String,
    address: Url,
    token: Option<SecretString>,
    http_client: Client,
}

impl GithubClient {
    /// Create a new client for the configured organization
    pub fn new(config: &GithubConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout.unwrap_or(DEFAULT_TIMEOUT)))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| DashError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: config.name.clone(),
            organization: config.organization.clone(),
            address: base_url(&config.address)?,
            token: config
                .token
                .as_ref()
                .map(|t| SecretString::new(t.expose_secret().clone())),
            http_client,
        })
    }

    fn get(&self, path: &str, operation: &str) -> Result<RequestBuilder> {
        let url = self
            .address
            .join(path)
            .map_err(|e| DashError::backend(&self.name, operation, e))?;

        let request = self.http_client.get(url);
        Ok(match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        })
    }

    async fn check(&self, response: Response, operation: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(body);

        Err(DashError::backend(
            &self.name,
            operation,
            format!("{} ({})", message, status.as_u16()),
        ))
    }
}

impl Instance for GithubClient {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl GithubInstance for GithubClient {
    fn organization(&self) -> &str {
        &self.organization
    }

    async fn get_repositories(&self, page: u32, per_page: u32) -> Result<Vec<Repository>> {
        let operation = "get repositories";
        let request = self
            .get(&format!("orgs/{}/repos", self.organization), operation)?
            .query(&[("page", page), ("per_page", per_page)]);

        let response = self.check(request.send().await?, operation).await?;
        Ok(response.json().await?)
    }

    async fn search_issues(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<IssueSearchResult> {
        let operation = "search issues";
        let request = self.get("search/issues", operation)?.query(&[
            ("q", scoped_query(&self.organization, query)),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ]);

        let response = self.check(request.send().await?, operation).await?;
        Ok(response.json().await?)
    }
}

/// Restrict a search query to the organization
fn scoped_query(organization: &str, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        format!("org:{}", organization)
    } else {
        format!("org:{} {}", organization, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_query() {
        assert_eq!(scoped_query("my-org", ""), "org:my-org");
        assert_eq!(
            scoped_query("my-org", " is:open is:pr "),
            "org:my-org is:open is:pr"
        );
    }
}
