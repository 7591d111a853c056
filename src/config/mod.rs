//! Configuration module for Dashplane
//!
//! This module provides configuration management and loading utilities.

mod config;

// Re-export the main configuration types
pub use config::{duplicate_names, Config, LoggingConfig, PluginsConfig, ServerConfig};
