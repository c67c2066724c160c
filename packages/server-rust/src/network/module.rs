//! Network module with deferred startup lifecycle.
//!
//! `new()` creates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until shutdown. Splitting bind from serve
//! lets callers learn the OS-assigned port before traffic flows.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{get, post};
use axum::Router;
use calcweb_core::Calculator;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::{NetworkConfig, TlsConfig};
use super::handlers::{
    add_handler, divide_handler, health_handler, homepage_handler, liveness_handler,
    multiply_handler, openapi_handler, readiness_handler, subtract_handler, AppState,
};
use super::middleware::apply_http_layers;
use super::shutdown::ShutdownController;
use crate::service::{
    build_operation_pipeline, ArithmeticService, RequestClassifier, TracingObserver,
};

/// How long `serve()` waits for in-flight calculations after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Manages the full HTTP server lifecycle.
///
/// 1. `new()` -- builds the operation pipeline and shutdown controller
/// 2. `start()` -- binds TCP listener to the configured address
/// 3. `serve()` -- accepts connections until shutdown is signalled
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    state: AppState,
}

impl NetworkModule {
    /// Creates a module whose calculator logs every operation via `tracing`.
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        let calculator = Calculator::with_observer(Arc::new(TracingObserver));
        Self::with_calculator(config, calculator)
    }

    /// Creates a module around a caller-supplied calculator.
    #[must_use]
    pub fn with_calculator(config: NetworkConfig, calculator: Calculator) -> Self {
        let state = AppState {
            pipeline: build_operation_pipeline(ArithmeticService::new(calculator)),
            classifier: Arc::new(RequestClassifier::new()),
            shutdown: Arc::new(ShutdownController::new()),
            start_time: Instant::now(),
        };
        Self {
            config,
            listener: None,
            state,
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.state.shutdown)
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /` -- calculator page
    /// - `POST /add`, `/subtract`, `/multiply`, `/divide` -- arithmetic
    /// - `GET /health`, `/health/live`, `/health/ready` -- health checks
    /// - `GET /openapi.json` -- API description
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/", get(homepage_handler))
            .route("/add", post(add_handler))
            .route("/subtract", post(subtract_handler))
            .route("/multiply", post(multiply_handler))
            .route("/divide", post(divide_handler))
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .route("/openapi.json", get(openapi_handler))
            .with_state(self.state.clone());

        apply_http_layers(router, &self.config)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which differs from the configured one
    /// when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then drains.
    ///
    /// The health state moves to Draining as soon as `shutdown` resolves,
    /// while connections are still being closed. Once the listener stops,
    /// the server waits up to 30 seconds for in-flight calculations and the
    /// state becomes Stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called, if TLS material cannot
    /// be loaded, or on a fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;
        let router = self.build_router();
        let shutdown_ctrl = self.shutdown_controller();

        shutdown_ctrl.set_ready();
        let shutdown = draining_on(shutdown, Arc::clone(&shutdown_ctrl));

        if let Some(ref tls_config) = self.config.tls {
            serve_tls(listener, router, tls_config, shutdown).await?;
        } else {
            serve_plain(listener, router, shutdown).await?;
        }

        drain(&shutdown_ctrl).await;
        Ok(())
    }
}

/// Wraps `shutdown` so readiness fails the moment the signal fires.
fn draining_on(
    shutdown: impl Future<Output = ()> + Send + 'static,
    shutdown_ctrl: Arc<ShutdownController>,
) -> impl Future<Output = ()> + Send + 'static {
    async move {
        shutdown.await;
        shutdown_ctrl.trigger_shutdown();
        info!("Shutdown signalled, readiness set to draining");
    }
}

async fn serve_plain(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("Serving plain HTTP connections");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Serves TLS connections using `axum-server` with rustls, reusing the
/// pre-bound listener.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls_config: &TlsConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls_config.cert_path, &tls_config.key_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {e}"))?;

    let addr = listener.local_addr()?;
    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown.await;
        shutdown_handle.graceful_shutdown(None);
    });

    info!("Serving TLS connections on {}", addr);

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}

async fn drain(shutdown_ctrl: &ShutdownController) {
    let pending = shutdown_ctrl.in_flight_count();
    if pending > 0 {
        info!("Waiting for {} in-flight calculations", pending);
    }

    if shutdown_ctrl.wait_for_drain(DRAIN_TIMEOUT).await {
        info!("All in-flight calculations drained");
    } else {
        warn!("Drain timeout expired with in-flight calculations remaining");
    }
}
