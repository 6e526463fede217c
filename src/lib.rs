pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::services::driver::{StageDriver, StageTiming};
use crate::services::intake::IntakeGateway;
use crate::services::notify::Notifier;
use crate::services::registry::IngestRegistry;
use crate::services::validator::{DatasetValidator, create_validator};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::datasets::upload_datasets,
        handlers::datasets::list_datasets,
        handlers::datasets::remove_dataset,
        handlers::datasets::notification_stream,
        handlers::stats::overview,
        handlers::stats::analytics,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::UploadRecord,
            models::UploadStage,
            services::notify::Notification,
            handlers::datasets::DatasetRow,
            handlers::datasets::RejectedUpload,
            handlers::datasets::SubmitResponse,
            handlers::stats::StatCard,
            handlers::stats::ActivityItem,
            handlers::stats::OverviewResponse,
            handlers::stats::AnalyticsMetric,
            handlers::stats::ChartDescriptor,
            handlers::stats::ExportFormat,
            handlers::stats::AnalyticsResponse,
            handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "datasets", description = "Dataset ingestion endpoints"),
        (name = "stats", description = "Dashboard statistics endpoints"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<IngestRegistry>,
    pub intake: Arc<IntakeGateway>,
    pub notifier: Notifier,
    pub config: AppConfig,
}

impl AppState {
    /// Wire the pipeline with the validator selected by configuration
    pub fn new(config: AppConfig) -> Self {
        let validator = create_validator(&config.validator_type, config.pass_probability);
        Self::with_validator(config, validator)
    }

    /// Wire the pipeline around an explicit validator. Tests use this to make
    /// the outcome deterministic.
    pub fn with_validator(config: AppConfig, validator: Arc<dyn DatasetValidator>) -> Self {
        let registry = Arc::new(IngestRegistry::new());
        let notifier = Notifier::new(config.notification_capacity);
        let driver = StageDriver::new(
            registry.clone(),
            validator,
            notifier.clone(),
            StageTiming::from(&config),
        );
        let intake = Arc::new(IntakeGateway::new(
            registry.clone(),
            driver,
            notifier.clone(),
        ));

        Self {
            registry,
            intake,
            notifier,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/datasets/upload",
            post(handlers::datasets::upload_datasets),
        )
        .route("/datasets", get(handlers::datasets::list_datasets))
        .route("/datasets/:id", delete(handlers::datasets::remove_dataset))
        .route(
            "/datasets/notifications",
            get(handlers::datasets::notification_stream),
        )
        .route_layer(from_fn(middleware::auth::require_admin));

    let analyst_routes = Router::new()
        .route("/stats/analytics", get(handlers::stats::analytics))
        .route_layer(from_fn(middleware::auth::require_analyst));

    let shared_routes = Router::new().route("/stats/overview", get(handlers::stats::overview));

    // Token validation wraps every protected group; role gates sit inside it
    let protected = admin_routes
        .merge(analyst_routes)
        .merge(shared_routes)
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health::health_check))
        .merge(protected)
        .with_state(state)
}
