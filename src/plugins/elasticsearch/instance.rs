//! Elasticsearch instance contract and its configuration

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DashError, Result};
use crate::plugins::{Instance, InstanceConfig};

/// Configuration of one Elasticsearch instance
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElasticsearchConfig {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Base address of the cluster, e.g. `http://localhost:9200`
    pub address: String,
    /// Basic auth user
    #[serde(default)]
    pub username: Option<String>,
    /// Basic auth password
    #[serde(default)]
    pub password: Option<SecretString>,
    /// Bearer token, mutually exclusive with basic auth
    #[serde(default)]
    pub token: Option<SecretString>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl ElasticsearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(DashError::config("Instance name cannot be empty"));
        }

        Url::parse(&self.address).map_err(|e| {
            DashError::config(format!("Invalid address '{}': {}", self.address, e))
        })?;

        if self.username.is_some() && self.token.is_some() {
            return Err(DashError::config(
                "Only one of username/password and token can be set",
            ));
        }

        if self.timeout == Some(0) {
            return Err(DashError::config("Timeout cannot be 0"));
        }

        Ok(())
    }
}

impl InstanceConfig for ElasticsearchConfig {
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

/// One bucket of the log count histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Start of the bucket in milliseconds since the epoch
    pub key: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_as_string: Option<String>,
    pub doc_count: i64,
}

/// Result of a log search: one page of documents plus their distribution over time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogsData {
    /// Continuation token for the next page
    #[serde(rename = "scrollID")]
    pub scroll_id: String,
    /// Milliseconds Elasticsearch spent on the search
    pub took: i64,
    /// Total number of matching documents
    pub hits: i64,
    pub documents: Vec<serde_json::Value>,
    pub buckets: Vec<Bucket>,
}

/// Operations every Elasticsearch instance provides
#[async_trait]
pub trait ElasticsearchInstance: Instance {
    /// Search the logs between `time_start` and `time_end` (seconds since the epoch).
    ///
    /// An empty `scroll_id` starts a new search, otherwise the next page of the
    /// search identified by it is returned.
    async fn get_logs(
        &self,
        query: &str,
        scroll_id: &str,
        time_start: i64,
        time_end: i64,
    ) -> Result<LogsData>;
}
