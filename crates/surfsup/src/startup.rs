use crate::{
    cutoff_date, db, index_handler, precipitation, routes, stations, stats_between, stats_from,
    tobs, ClimateAccess, ClimateData, DatabaseSettings,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use time::Date;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Shared, read-only request context
#[derive(Clone)]
pub struct AppState {
    /// `max(measurement date) - 365 days`, fixed for the life of the process
    pub cutoff: Date,
    pub climate_db: Arc<dyn ClimateData>,
}

impl AppState {
    /// Looks up the latest observation once and derives the cutoff from it.
    pub async fn new(climate_db: Arc<dyn ClimateData>) -> Result<Self, db::Error> {
        let latest = climate_db.latest_date().await?;
        let cutoff = cutoff_date(latest)?;
        info!("latest observation {}, serving last year from {}", latest, cutoff);

        Ok(Self { cutoff, climate_db })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::precipitation::precipitation,
        routes::climate::stations::stations,
        routes::climate::tobs::tobs,
        routes::climate::temperature_stats::stats_from,
        routes::climate::temperature_stats::stats_between,
    ),
    components(
        schemas(
            db::PrecipitationByDate,
            db::TemperatureObservation,
            db::TemperatureStats,
            routes::ErrorBody,
        )
    ),
    tags(
        (name = "surfsup climate api", description = "a read-only api over Hawaii weather station precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(settings: &DatabaseSettings) -> Result<AppState, anyhow::Error> {
    let climate_db = Arc::new(
        ClimateAccess::connect(settings)
            .await
            .map_err(|e| anyhow!("error opening climate dataset {}: {}", settings.path, e))?,
    );

    AppState::new(climate_db)
        .await
        .map_err(|e| anyhow!("error computing observation cutoff: {}", e))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(stats_from))
        .route("/api/v1.0/{start}/{end}", get(stats_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, {} code: {}, time: {}", path, response.status().as_str(), response_time);

    response
}
