//! Elasticsearch instance backed by the cluster's REST API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::instance::{Bucket, ElasticsearchConfig, ElasticsearchInstance, LogsData};
use crate::error::{DashError, Result};
use crate::plugins::{base_url, Instance};

/// How long Elasticsearch keeps a scroll context alive between pages
const SCROLL_TIMEOUT: &str = "15m";
/// Documents per page
const PAGE_SIZE: u32 = 100;
/// Target number of buckets of the log count histogram
const HISTOGRAM_BUCKETS: u32 = 30;
const DEFAULT_TIMEOUT: u64 = 30;

enum Auth {
    None,
    Basic {
        username: String,
        password: Option<SecretString>,
    },
    Bearer(SecretString),
}

/// Elasticsearch instance talking to one cluster over HTTP
pub struct ElasticsearchClient {
    name: String,
    address: Url,
    auth: Auth,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "_scroll_id", default)]
    scroll_id: String,
    took: i64,
    hits: SearchHits,
    #[serde(default)]
    aggregations: Option<Aggregations>,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    total: HitsTotal,
    hits: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct HitsTotal {
    value: i64,
}

#[derive(Debug, Deserialize)]
struct Aggregations {
    logcount: LogCount,
}

#[derive(Debug, Deserialize)]
struct LogCount {
    buckets: Vec<Bucket>,
}

impl ElasticsearchClient {
    /// Create a new client for the configured cluster
    pub fn new(config: &ElasticsearchConfig) -> Result<Self> {
        config.validate()?;

        let address = base_url(&config.address)?;

        let auth = match (&config.username, &config.token) {
            (Some(username), _) => Auth::Basic {
                username: username.clone(),
                password: config
                    .password
                    .as_ref()
                    .map(|p| SecretString::new(p.expose_secret().clone())),
            },
            (None, Some(token)) => Auth::Bearer(SecretString::new(token.expose_secret().clone())),
            (None, None) => Auth::None,
        };

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout.unwrap_or(DEFAULT_TIMEOUT)))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: config.name.clone(),
            address,
            auth,
            http_client,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::None => request,
            Auth::Basic { username, password } => {
                request.basic_auth(username, password.as_ref().map(|p| p.expose_secret()))
            }
            Auth::Bearer(token) => request.bearer_auth(token.expose_secret()),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.address
            .join(path)
            .map_err(|e| DashError::backend(&self.name, "get logs", e))
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(DashError::backend(
            &self.name,
            "get logs",
            describe_error(status.as_u16(), &body),
        ))
    }
}

impl Instance for ElasticsearchClient {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ElasticsearchInstance for ElasticsearchClient {
    async fn get_logs(
        &self,
        query: &str,
        scroll_id: &str,
        time_start: i64,
        time_end: i64,
    ) -> Result<LogsData> {
        let request = if scroll_id.is_empty() {
            debug!(name = %self.name, query, time_start, time_end, "Starting new search");
            self.http_client
                .post(self.endpoint("_search")?)
                .query(&[("scroll", SCROLL_TIMEOUT)])
                .json(&search_body(query, time_start, time_end))
        } else {
            debug!(name = %self.name, scroll_id, "Continuing search");
            self.http_client
                .post(self.endpoint("_search/scroll")?)
                .json(&json!({ "scroll": SCROLL_TIMEOUT, "scroll_id": scroll_id }))
        };

        let response = self.check(self.authorize(request).send().await?).await?;
        let result: SearchResponse = response.json().await?;

        Ok(LogsData {
            scroll_id: result.scroll_id,
            took: result.took,
            hits: result.hits.total.value,
            documents: result.hits.hits,
            buckets: result
                .aggregations
                .map(|aggs| aggs.logcount.buckets)
                .unwrap_or_default(),
        })
    }
}

/// Body of the initial search request
fn search_body(query: &str, time_start: i64, time_end: i64) -> Value {
    let mut must = vec![json!({
        "range": {
            "@timestamp": {
                "gte": time_start,
                "lte": time_end,
                "format": "epoch_second"
            }
        }
    })];

    if !query.is_empty() {
        must.push(json!({ "query_string": { "query": query } }));
    }

    json!({
        "size": PAGE_SIZE,
        "sort": [{ "@timestamp": { "order": "desc" } }],
        "query": { "bool": { "must": must } },
        "aggs": {
            "logcount": {
                "auto_date_histogram": {
                    "field": "@timestamp",
                    "buckets": HISTOGRAM_BUCKETS
                }
            }
        }
    })
}

/// Extract a readable message from an Elasticsearch error response
fn describe_error(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    match parsed.as_ref().and_then(|v| v.get("error")) {
        Some(Value::Object(error)) => {
            let kind = error.get("type").and_then(Value::as_str).unwrap_or("error");
            let reason = error.get("reason").and_then(Value::as_str).unwrap_or("unknown reason");
            format!("{}: {}", kind, reason)
        }
        Some(Value::String(reason)) => reason.clone(),
        _ => format!("unexpected status code {}: {}", status, body),
    }
}
