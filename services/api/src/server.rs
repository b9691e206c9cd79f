use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryStore};
use crate::routes::application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use property_search::accommodations::AccommodationService;
use property_search::config::AppConfig;
use property_search::error::AppError;
use property_search::identity::{IdentityService, SessionStore};
use property_search::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryStore::default());
    let sessions = Arc::new(SessionStore::new(config.identity.session_ttl()));
    let identity = Arc::new(IdentityService::new(Arc::clone(&store), sessions));
    let accommodations = Arc::new(AccommodationService::new(
        Arc::clone(&store),
        Arc::clone(&store),
    ));

    let shutdown = CancellationToken::new();
    let app = application_routes(identity, accommodations, shutdown.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        session_ttl_minutes = config.identity.session_ttl_minutes,
        "property search service ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness_flag, shutdown))
        .await?;
    info!("property search service stopped");
    Ok(())
}

/// Wait for Ctrl-C, then flip readiness and cancel in-flight storage calls.
async fn shutdown_signal(readiness: Arc<AtomicBool>, shutdown: CancellationToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    info!("shutdown requested");
    readiness.store(false, Ordering::Release);
    shutdown.cancel();
}
