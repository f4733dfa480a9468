use crate::cli::ServeArgs;
use crate::infra::{AppState, CatalogMode, InMemoryCatalog, InMemoryRecordRepository};
use crate::routes::with_record_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use backoffice_guard::config::AppConfig;
use backoffice_guard::error::AppError;
use backoffice_guard::records::RecordService;
use backoffice_guard::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryRecordRepository::default());
    let mut service = RecordService::new(repository, config.validation.policies());
    match InMemoryCatalog::checker(&args.known_tax_ids, CatalogMode::Enumerating) {
        Some(checker) => service = service.with_tax_checker(checker),
        None => warn!("no tax catalog configured; tax id existence is not checked"),
    }
    match InMemoryCatalog::checker(&args.known_category_ids, CatalogMode::Counting) {
        Some(checker) => service = service.with_expense_category_checker(checker),
        None => warn!("no expense category catalog configured; category existence is not checked"),
    }

    let app = with_record_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_age_days = config.validation.max_age_days,
        future_skew_minutes = config.validation.future_skew_minutes,
        tax_ids_max_items = config.validation.tax_ids_max_items,
        "back office write guard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
