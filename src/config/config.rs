//! Configuration management for Dashplane

use crate::error::{DashError, Result};
use crate::plugins::elasticsearch::ElasticsearchConfig;
use crate::plugins::github::GithubConfig;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Main configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
    /// Plugin instances, grouped by plugin kind
    #[serde(default)]
    pub plugins: PluginsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Client request timeout in seconds
    pub timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json, text)
    pub format: String,
}

/// Ordered instance lists for every supported plugin kind.
///
/// The order of each list is the registration order, which is also the lookup
/// order: when two entries share a name the first one wins.
#[derive(Debug, Default, Deserialize)]
pub struct PluginsConfig {
    #[serde(default)]
    pub elasticsearch: Vec<ElasticsearchConfig>,
    #[serde(default)]
    pub github: Vec<GithubConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: Some(LoggingConfig::default()),
            plugins: PluginsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: crate::DEFAULT_HOST.to_string(),
            port: crate::DEFAULT_PORT,
            timeout: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Self::TEXT_FORMAT.to_string(),
        }
    }
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(DashError::config("Server host cannot be empty"));
        }

        if self.port == 0 {
            return Err(DashError::config("Server port cannot be 0"));
        }

        if self.timeout == 0 {
            return Err(DashError::config("Server timeout cannot be 0"));
        }

        Ok(())
    }
}

impl LoggingConfig {
    pub const TEXT_FORMAT: &'static str = "text";
    pub const JSON_FORMAT: &'static str = "json";

    /// Validate logging configuration
    pub fn validate(&self) -> Result<()> {
        match self.format.as_str() {
            Self::TEXT_FORMAT | Self::JSON_FORMAT => Ok(()),
            other => Err(DashError::config(format!(
                "Invalid log format '{}'. Supported formats are 'text' and 'json'",
                other
            ))),
        }
    }
}

impl PluginsConfig {
    /// Validate every plugin entry.
    ///
    /// Every entry is checked and the error names each invalid one. Duplicate
    /// names are reported but accepted; lookups resolve to the first entry
    /// with a given name.
    pub fn validate(&self) -> Result<()> {
        let mut failures = Vec::new();

        for (index, cfg) in self.elasticsearch.iter().enumerate() {
            if let Err(e) = cfg.validate() {
                failures.push(format!(
                    "plugins.elasticsearch[{}] '{}': {}",
                    index,
                    cfg.name,
                    e.detail()
                ));
            }
        }

        for (index, cfg) in self.github.iter().enumerate() {
            if let Err(e) = cfg.validate() {
                failures.push(format!("plugins.github[{}] '{}': {}", index, cfg.name, e.detail()));
            }
        }

        if !failures.is_empty() {
            return Err(DashError::config(failures.join("; ")));
        }

        warn_on_duplicates("elasticsearch", self.elasticsearch.iter().map(|c| c.name.as_str()));
        warn_on_duplicates("github", self.github.iter().map(|c| c.name.as_str()));

        Ok(())
    }

    /// Total number of configured instances across all kinds
    pub fn instance_count(&self) -> usize {
        self.elasticsearch.len() + self.github.len()
    }
}

/// Returns the names which appear more than once, in order of their second occurrence.
pub fn duplicate_names<'a, I>(names: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for name in names {
        if !seen.insert(name) && !duplicates.contains(&name) {
            duplicates.push(name);
        }
    }

    duplicates
}

fn warn_on_duplicates<'a, I>(kind: &str, names: I)
where
    I: IntoIterator<Item = &'a str>,
{
    for name in duplicate_names(names) {
        warn!(
            plugin = kind,
            name = name,
            "Duplicate instance name, only the first entry will be reachable"
        );
    }
}

impl Config {
    /// Load .env files in order of precedence
    fn load_env_files() {
        let env = std::env::var("DASHPLANE_ENV").unwrap_or_else(|_| "development".to_string());

        let env_specific_file = format!(".env.{}", env);
        let env_files = [".env", env_specific_file.as_str(), ".env.local"];

        for env_file in env_files {
            match dotenvy::from_filename(env_file) {
                Ok(_) => {
                    tracing::info!("Loaded environment variables from {}", env_file);
                }
                Err(e) if e.not_found() => {
                    tracing::debug!("No {} file found, skipping", env_file);
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", env_file, e);
                }
            }
        }
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| DashError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Load configuration from file with environment variables and CLI overrides
    pub fn load<P: AsRef<Path>>(
        path: P,
        host_override: Option<String>,
        port_override: Option<u16>,
    ) -> Result<Self> {
        Self::load_env_files();

        let mut config = if path.as_ref().exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                DashError::config(format!("Failed to read config file: {}", e))
            })?;

            Self::from_yaml(&content)?
        } else {
            tracing::warn!(path = ?path.as_ref(), "Config file not found, using defaults");
            Self::default()
        };

        // Precedence: .env < file < env < CLI
        config.apply_environment_overrides()?;

        if let Some(host) = host_override {
            config.server.host = host;
        }
        if let Some(port) = port_override {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("DASHPLANE_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }

        if let Ok(port_str) = std::env::var("DASHPLANE_PORT") {
            if !port_str.is_empty() {
                self.server.port = port_str.parse().map_err(|e| {
                    DashError::config(format!("Invalid DASHPLANE_PORT environment variable: {}", e))
                })?;
            }
        }

        if let Ok(log_level) = std::env::var("DASHPLANE_LOG_LEVEL") {
            if !log_level.is_empty() {
                self.logging.get_or_insert_with(LoggingConfig::default).level = log_level;
            }
        }

        Ok(())
    }

    /// Validate the complete configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;

        if let Some(ref logging) = self.logging {
            logging.validate()?;
        }

        self.plugins.validate()
    }
}
