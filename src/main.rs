use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use dashplane::config::{Config, LoggingConfig};
use dashplane::plugins::Plugins;
use dashplane::startup::StartupLogger;
use dashplane::web;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = dashplane::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error), overrides the configuration file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Server host
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config, cli.host.clone(), cli.port) {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.log_level.as_deref().unwrap_or("info"), "text")?;
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let logging = config.logging.clone().unwrap_or_default();
    init_logging(
        cli.log_level.as_deref().unwrap_or(&logging.level),
        &logging.format,
    )?;

    if !cli.config.exists() {
        warn!(path = ?cli.config, "Config file not found, started with defaults");
    }

    // Every instance is built before the listener starts; a single failure aborts startup.
    let plugins = Plugins::register(&config.plugins).map_err(|e| {
        error!("Failed to register plugins: {}", e);
        e
    })?;
    let plugins = Arc::new(plugins);

    StartupLogger::display_startup_info(&config, &plugins, dashplane::VERSION);

    run_http_server(&config, plugins).await
}

/// Serve the API until the process is stopped
async fn run_http_server(config: &Config, plugins: Arc<Plugins>) -> Result<()> {
    let bind_addr = (config.server.host.clone(), config.server.port);
    info!("HTTP server will bind to {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        let plugins = Arc::clone(&plugins);
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| web::configure_app(cfg, plugins))
    })
    .client_request_timeout(Duration::from_secs(config.server.timeout))
    .bind(bind_addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}

fn init_logging(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(env_filter);
    if format == LoggingConfig::JSON_FORMAT {
        registry.with(fmt_layer.json()).try_init()?;
    } else {
        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
