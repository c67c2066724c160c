//! calcweb server binary.
//!
//! Every flag can also be set through its `CALCWEB_*` environment variable.
//! `--environment` picks the logging preset; `--log-*` flags override it.

use std::path::PathBuf;
use std::time::Duration;

use calcweb_server::{
    init_logging, Environment, LogFormat, LoggingConfig, NetworkConfig, NetworkModule, TlsConfig,
};
use clap::Parser;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "calcweb-server", version, about = "Four-function calculator over HTTP")]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "CALCWEB_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on; 0 picks a free one.
    #[arg(long, env = "CALCWEB_PORT", default_value_t = 8000)]
    port: u16,

    /// Selects the logging preset.
    #[arg(long, env = "CALCWEB_ENV", value_enum, default_value_t = Environment::Development)]
    environment: Environment,

    /// Overrides the preset level (e.g. `info`, `debug`).
    #[arg(long, env = "CALCWEB_LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(long, env = "CALCWEB_LOG_FORMAT", value_enum)]
    log_format: Option<LogFormat>,

    /// Directory for rolling log files.
    #[arg(long, env = "CALCWEB_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Allowed CORS origin; repeat for several. Defaults to any origin.
    #[arg(long = "cors-origin", env = "CALCWEB_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,

    #[arg(long, env = "CALCWEB_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// PEM certificate chain; enables TLS together with `--tls-key`.
    #[arg(long, env = "CALCWEB_TLS_CERT", requires = "tls_key")]
    tls_cert: Option<PathBuf>,

    #[arg(long, env = "CALCWEB_TLS_KEY", requires = "tls_cert")]
    tls_key: Option<PathBuf>,
}

impl Cli {
    fn logging_config(&self) -> LoggingConfig {
        let mut config = self.environment.logging_config();
        if let Some(level) = &self.log_level {
            config.level.clone_from(level);
        }
        if let Some(format) = self.log_format {
            config.format = format;
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        config
    }

    fn network_config(&self) -> NetworkConfig {
        let defaults = NetworkConfig::default();
        let tls = match (&self.tls_cert, &self.tls_key) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path: cert_path.clone(),
                key_path: key_path.clone(),
            }),
            _ => None,
        };
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            tls,
            cors_origins: if self.cors_origins.is_empty() {
                defaults.cors_origins
            } else {
                self.cors_origins.clone()
            },
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..defaults
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guards = init_logging(&cli.logging_config())?;

    let mut module = NetworkModule::new(cli.network_config());
    let port = module.start().await?;
    info!(
        environment = ?cli.environment,
        "calcweb listening on {}:{}",
        cli.host,
        port
    );

    module.serve(shutdown_signal()).await?;
    info!("calcweb stopped");
    Ok(())
}
