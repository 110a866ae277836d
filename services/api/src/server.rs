use crate::cli::ServeArgs;
use crate::infra::{load_directory, AppState};
use crate::routes::with_compatibility_routes;
use affinity::compatibility::{CompatibilityService, InMemoryScoreCache, InMemoryScoreStore};
use affinity::config::AppConfig;
use affinity::error::AppError;
use affinity::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let directory = load_directory(args.profiles.as_deref())?;
    info!(profiles = directory.len(), "profile directory loaded");

    let service = Arc::new(CompatibilityService::new(
        Arc::new(directory),
        Arc::new(InMemoryScoreStore::default()),
        Arc::new(InMemoryScoreCache::default()),
        config.estimator.clone(),
    ));

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        estimator: Arc::new(service.estimator().clone()),
    };

    let app = with_compatibility_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "affinity service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
