//! Elasticsearch plugin: log search across one or more configured clusters

mod client;
mod instance;
mod router;

pub use client::ElasticsearchClient;
pub use instance::{Bucket, ElasticsearchConfig, ElasticsearchInstance, LogsData};
pub use router::{configure, LogsParams, ROUTE};
