//! Dashplane - pluggable observability backend for Kubernetes dashboards
//!
//! This crate aggregates heterogeneous monitoring backends (log stores,
//! source-control hosts, ...) behind one HTTP API. Each backend kind is a
//! plugin with any number of named instances; requests are routed to exactly
//! one instance by name. Dashboards additionally get their variable lists
//! resolved from the request context and caller supplied placeholders.

pub mod config;
pub mod dashboards;
pub mod error;
pub mod plugins;
pub mod startup;
pub mod web;

pub use config::Config;
pub use error::{DashError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 15220;
