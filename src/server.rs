use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    config::Config,
    handlers::{self, AppState},
    logging::SensitiveToken,
    metrics,
    signals::setup_signal_handlers,
};

/// Start the relay server
///
/// This function:
/// 1. Initializes metrics (when enabled)
/// 2. Sets up signal handlers for graceful shutdown and config reload
/// 3. Creates the Axum application
/// 4. Binds to the configured address
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config, config_path: PathBuf) -> Result<()> {
    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        match metrics::init_metrics() {
            Ok(handle) => Some(Arc::new(handle)),
            Err(e) => {
                warn!("Metrics disabled, recorder could not be installed: {}", e);
                None
            }
        }
    } else {
        None
    };

    // Wrap config in ArcSwap for atomic reload support
    let config_swap = Arc::new(ArcSwap::from_pointee(config.clone()));

    // Setup signal handlers (SIGTERM, SIGINT for shutdown; SIGHUP for reload)
    let (shutdown_tx, signal_handle) = setup_signal_handlers(config_swap.clone(), config_path);
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app_state = AppState::new(config_swap, reqwest::Client::new());

    match app_state.notifier.recipients(&config.telegram.recipient_chat_ids).await.len() {
        0 => warn!("No recipients configured or subscribed; notifications will fail until someone sends /start"),
        n => info!("{} notification recipient(s) known at startup", n),
    }

    let app = create_router(&config, app_state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting lead relay on {}", addr);
    info!(
        "Configuration: bot {}, {} static recipients, {} admins, subscribers in {}",
        SensitiveToken::new(&config.telegram.bot_token),
        config.telegram.recipient_chat_ids.len(),
        config.telegram.admin_chat_ids.len(),
        config.storage.subscribers_file.display()
    );
    info!("Webhook endpoint: http://{}/telegram/webhook", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    // The signal task exits after sending the shutdown signal
    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(
    config: &Config,
    app_state: AppState,
    metrics_handle: Option<Arc<PrometheusHandle>>,
) -> Router {
    let api_routes = Router::new()
        .route("/telegram/webhook", post(handlers::webhook::handle_update))
        .route("/webhook/set", post(handlers::webhook::set_webhook))
        .route("/webhook/delete", post(handlers::webhook::delete_webhook))
        .route(
            "/api/submissions",
            post(handlers::submissions::handle_submission),
        )
        .with_state(app_state);

    let mut public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/calculator",
            post(handlers::calculator::handle_calculator),
        );

    if let Some(handle) = metrics_handle {
        public_routes = public_routes.merge(
            Router::new()
                .route(
                    &config.metrics.endpoint,
                    get(handlers::metrics_handler::metrics),
                )
                .with_state(handle),
        );
    }

    public_routes
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
