use crate::cli::ServeArgs;
use crate::infra::{AppState, LocalAssessmentStore};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use road_risk::assessment::{AssessmentService, AssessmentServiceError};
use road_risk::config::AppConfig;
use road_risk::error::AppError;
use road_risk::telemetry;
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
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        default_method: config.assessment.default_method,
    };

    let store = LocalAssessmentStore::from_path(config.assessment.store_path.as_deref())
        .map_err(AssessmentServiceError::from)?;
    let assessment_service = Arc::new(AssessmentService::new(Arc::new(store)));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_method = config.assessment.default_method.key(),
        store = ?config.assessment.store_path,
        "road risk service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
