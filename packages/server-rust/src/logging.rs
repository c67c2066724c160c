//! Logging setup for the calcweb server.
//!
//! One console layer in the configured format, plus two daily-rolling files
//! when a log directory is set: `app.log` with everything that passes the
//! level filter and `app_error.log` with `ERROR` events only.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::ValueEnum;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// File name prefix of the main log.
pub const APP_LOG_FILE: &str = "app.log";
/// File name prefix of the error-only log.
pub const ERROR_LOG_FILE: &str = "app_error.log";

/// Directives appended to the base level so dependency chatter stays quiet.
const DEPENDENCY_DIRECTIVES: &str = "hyper=warn,tower_http=info";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line, human oriented.
    Pretty,
    /// Single line per event.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

/// Deployment environment; selects a logging preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    #[must_use]
    pub fn logging_config(self) -> LoggingConfig {
        match self {
            Environment::Development => LoggingConfig::development(),
            Environment::Production => LoggingConfig::production(),
            Environment::Test => LoggingConfig::test(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Base level directive (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    pub format: LogFormat,
    /// ANSI colors on the console layer. Files never get colors.
    pub ansi: bool,
    /// Directory for rolling log files; `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
}

impl LoggingConfig {
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            ansi: true,
            log_dir: Some(PathBuf::from("logs")),
        }
    }

    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            ansi: false,
            log_dir: Some(PathBuf::from("logs")),
        }
    }

    #[must_use]
    pub fn test() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            ansi: false,
            log_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::development()
    }
}

/// Keeps the non-blocking file writers alive. Dropping it flushes them.
#[must_use = "dropping the guards stops file logging"]
#[derive(Debug, Default)]
pub struct LogGuards {
    guards: Vec<WorkerGuard>,
}

impl LogGuards {
    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

/// Filter directives for `level` with dependency caps applied.
#[must_use]
pub fn filter_directives(level: &str) -> String {
    format!("{level},{DEPENDENCY_DIRECTIVES}")
}

/// `RUST_LOG` when set, otherwise the configured level.
fn env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return EnvFilter::try_from_default_env().context("invalid RUST_LOG");
    }
    EnvFilter::try_new(filter_directives(level))
        .with_context(|| format!("invalid log level: {level}"))
}

fn console_layer(config: &LoggingConfig) -> BoxedLayer {
    let layer = fmt::layer().with_ansi(config.ansi).with_target(true);
    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Builds every layer for `config` without installing them.
///
/// # Errors
///
/// Returns an error if the level directive does not parse or the log
/// directory cannot be created.
pub fn build_layers(config: &LoggingConfig) -> anyhow::Result<(Vec<BoxedLayer>, LogGuards)> {
    let mut layers = vec![console_layer(config)
        .with_filter(env_filter(&config.level)?)
        .boxed()];
    let mut guards = LogGuards::default();

    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create log directory {}", dir.display()))?;

        let (app_writer, app_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, APP_LOG_FILE));
        let (error_writer, error_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, ERROR_LOG_FILE));
        guards.guards.extend([app_guard, error_guard]);

        let app_layer: BoxedLayer = match config.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(app_writer)
                .with_ansi(false)
                .boxed(),
            LogFormat::Pretty | LogFormat::Compact => fmt::layer()
                .with_writer(app_writer)
                .with_ansi(false)
                .boxed(),
        };
        layers.push(app_layer.with_filter(env_filter(&config.level)?).boxed());

        layers.push(
            fmt::layer()
                .with_writer(error_writer)
                .with_ansi(false)
                .with_filter(LevelFilter::ERROR)
                .boxed(),
        );
    }

    Ok((layers, guards))
}

/// Installs the global subscriber for `config`.
///
/// # Errors
///
/// Returns an error if the layers cannot be built or a global subscriber is
/// already set.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LogGuards> {
    let (layers, guards) = build_layers(config)?;
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("failed to initialize logging")?;
    Ok(guards)
}
