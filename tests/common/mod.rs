//! Shared test doubles for the plugin routers
//!
//! The fakes implement the instance contracts directly and record every call,
//! so tests can assert on what reached an instance.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashplane::error::{DashError, Result};
use dashplane::plugins::elasticsearch::{Bucket, LogsData};
use dashplane::plugins::github::{Issue, IssueSearchResult, Repository};
use dashplane::plugins::{
    Catalog, CatalogEntry, ElasticsearchInstance, GithubInstance, Instance, InstanceRegistry,
    PluginKind, Plugins,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LogsCall {
    pub query: String,
    pub scroll_id: String,
    pub time_start: i64,
    pub time_end: i64,
}

/// Elasticsearch instance returning a canned result
pub struct FakeElasticsearch {
    name: String,
    result: std::result::Result<LogsData, String>,
    calls: Mutex<Vec<LogsCall>>,
}

impl FakeElasticsearch {
    pub fn returning(name: &str, data: LogsData) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            result: Ok(data),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(name: &str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            result: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<LogsCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Instance for FakeElasticsearch {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ElasticsearchInstance for FakeElasticsearch {
    async fn get_logs(
        &self,
        query: &str,
        scroll_id: &str,
        time_start: i64,
        time_end: i64,
    ) -> Result<LogsData> {
        self.calls.lock().unwrap().push(LogsCall {
            query: query.to_string(),
            scroll_id: scroll_id.to_string(),
            time_start,
            time_end,
        });

        match &self.result {
            Ok(data) => Ok(data.clone()),
            Err(message) => Err(DashError::backend(&self.name, "get logs", message)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GithubCall {
    Repositories { page: u32, per_page: u32 },
    Issues { query: String, page: u32, per_page: u32 },
}

/// GitHub instance serving fixed repositories and issues
pub struct FakeGithub {
    name: String,
    organization: String,
    repositories: Vec<Repository>,
    issues: Vec<Issue>,
    fail: bool,
    calls: Mutex<Vec<GithubCall>>,
}

impl FakeGithub {
    pub fn new(name: &str, organization: &str, repositories: Vec<Repository>, issues: Vec<Issue>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            organization: organization.to_string(),
            repositories,
            issues,
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(name: &str, organization: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            organization: organization.to_string(),
            repositories: Vec::new(),
            issues: Vec::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<GithubCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Instance for FakeGithub {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl GithubInstance for FakeGithub {
    fn organization(&self) -> &str {
        &self.organization
    }

    async fn get_repositories(&self, page: u32, per_page: u32) -> Result<Vec<Repository>> {
        self.calls
            .lock()
            .unwrap()
            .push(GithubCall::Repositories { page, per_page });

        if self.fail {
            return Err(DashError::backend(&self.name, "get repositories", "Bad credentials (401)"));
        }
        Ok(self.repositories.clone())
    }

    async fn search_issues(&self, query: &str, page: u32, per_page: u32) -> Result<IssueSearchResult> {
        self.calls.lock().unwrap().push(GithubCall::Issues {
            query: query.to_string(),
            page,
            per_page,
        });

        if self.fail {
            return Err(DashError::backend(&self.name, "search issues", "Bad credentials (401)"));
        }
        Ok(IssueSearchResult {
            total_count: self.issues.len() as u64,
            incomplete_results: false,
            items: self.issues.clone(),
        })
    }
}

pub fn logs_data(scroll_id: &str) -> LogsData {
    LogsData {
        scroll_id: scroll_id.to_string(),
        took: 4,
        hits: 1,
        documents: vec![serde_json::json!({
            "_index": "logs",
            "_source": { "@timestamp": "2022-01-01T00:00:00Z", "message": "hello" }
        })],
        buckets: vec![Bucket {
            key: 1_000_000,
            key_as_string: None,
            doc_count: 1,
        }],
    }
}

pub fn repository(name: &str) -> Repository {
    Repository {
        id: 1,
        name: name.to_string(),
        full_name: format!("my-org/{}", name),
        description: None,
        html_url: format!("https://github.com/my-org/{}", name),
        language: Some("Rust".to_string()),
        stargazers_count: 3,
        forks_count: 0,
        open_issues_count: 1,
        updated_at: None,
    }
}

pub fn issue(number: u64, title: &str) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        state: "open".to_string(),
        html_url: format!("https://github.com/my-org/api/issues/{}", number),
        user: None,
        labels: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

/// Plugins backed by the given fakes, with a catalog entry per instance
pub fn plugins(
    elasticsearch: Vec<Arc<FakeElasticsearch>>,
    github: Vec<Arc<FakeGithub>>,
) -> Arc<Plugins> {
    let mut catalog = Catalog::new();
    for instance in &elasticsearch {
        catalog.append(entry(instance.name(), PluginKind::Elasticsearch));
    }
    for instance in &github {
        catalog.append(entry(instance.name(), PluginKind::Github));
    }

    let elasticsearch = elasticsearch
        .into_iter()
        .map(|i| i as Arc<dyn ElasticsearchInstance>)
        .collect();
    let github = github
        .into_iter()
        .map(|i| i as Arc<dyn GithubInstance>)
        .collect();

    Arc::new(Plugins::new(
        catalog,
        InstanceRegistry::from_instances(elasticsearch),
        InstanceRegistry::from_instances(github),
    ))
}

fn entry(name: &str, kind: PluginKind) -> CatalogEntry {
    CatalogEntry {
        name: name.to_string(),
        display_name: name.to_uppercase(),
        description: format!("{} test instance", kind),
        r#type: kind.as_str().to_string(),
    }
}
