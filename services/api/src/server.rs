use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProfileRepository, InMemoryPropertyCatalog};
use crate::routes::with_rentpro_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rentpro::config::AppConfig;
use rentpro::error::AppError;
use rentpro::preferences::PreferenceProfileService;
use rentpro::recommendations::{PropertyCsvImporter, RecommendationService};
use rentpro::telemetry;
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
    };

    let catalog = match args.properties_csv.take() {
        Some(path) => {
            let properties = PropertyCsvImporter::from_path(&path)?;
            info!(path = %path.display(), count = properties.len(), "loaded property catalog");
            InMemoryPropertyCatalog::new(properties)
        }
        None => InMemoryPropertyCatalog::seeded(),
    };

    let profiles = Arc::new(PreferenceProfileService::new(
        Arc::new(InMemoryProfileRepository::default()),
        config.analysis.clone(),
    ));
    let recommendations = Arc::new(RecommendationService::new(
        profiles.clone(),
        Arc::new(catalog),
    ));

    let app = with_rentpro_routes(profiles, recommendations)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        cr_threshold = config.analysis.cr_threshold,
        "rentpro api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
