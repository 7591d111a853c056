//! Startup logging

use tracing::{info, warn};

use crate::config::Config;
use crate::plugins::{PluginKind, Plugins};

/// Startup logger summarizing what is about to be served
pub struct StartupLogger;

impl StartupLogger {
    /// Display startup information once all plugins are registered
    pub fn display_startup_info(config: &Config, plugins: &Plugins, version: &str) {
        info!("Dashplane v{} starting...", version);

        Self::display_plugins(plugins);
        Self::display_server_information(config);
    }

    /// Display the registered instances per plugin kind
    fn display_plugins(plugins: &Plugins) {
        if plugins.catalog().is_empty() {
            warn!("No plugin instances configured");
            return;
        }

        info!("Plugins:");
        for kind in PluginKind::ALL {
            let names: Vec<&str> = plugins
                .catalog()
                .by_type(kind)
                .map(|entry| entry.name.as_str())
                .collect();

            if names.is_empty() {
                continue;
            }

            info!(
                "   {} ({} instances, route {}): {}",
                kind,
                plugins.instance_count(kind),
                kind.route(),
                names.join(", ")
            );
        }
    }

    /// Display server information
    fn display_server_information(config: &Config) {
        info!("Server Information:");
        info!("   HTTP: http://{}:{}", config.server.host, config.server.port);
        info!("   Request timeout: {}s", config.server.timeout);
    }
}
