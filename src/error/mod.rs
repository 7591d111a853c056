//! Error handling module for Dashplane
//!
//! This module provides the error taxonomy shared by the plugin registry, the
//! plugin routers and the configuration layer, plus its HTTP mapping.

mod error;

// Re-export the main error types and utilities
pub use error::{DashError, Result};
