//! HTTP surface: router, handlers and error responses.
//!
//! Routes (under `Settings::api_prefix`, `/api/v1` by default):
//! - `GET /air-quality?lat=<f64>&lon=<f64>` — normalized report
//! - `GET /health` — service name, version and current time

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::ingest::ObservationSource;
use crate::logging::{self, DataSource};
use crate::model::{AirQualityError, AirQualityReport};
use crate::report;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub source: Arc<dyn ObservationSource>,
}

impl AppState {
    pub fn new(settings: Settings, source: Arc<dyn ObservationSource>) -> Self {
        Self {
            settings: Arc::new(settings),
            source,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let prefix = state.settings.route_prefix().to_string();

    let api = Router::new()
        .route("/health", get(health_check))
        .route("/air-quality", get(get_air_quality));

    // axum refuses to nest at the root
    let router = if prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&prefix, api)
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves when `signal` fires. If the signal cannot be installed the error
/// is logged and this never resolves, so the server keeps running.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => logging::info(DataSource::System, None, "Shutdown signal received"),
        Err(e) => {
            logging::error(
                DataSource::System,
                None,
                &format!("failed to listen for shutdown signal: {}", e),
            );
            std::future::pending::<()>().await;
        }
    }
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub name: String,
    pub api_version: String,
    pub timestamp: String,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        name: state.settings.project_name.clone(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Deserialize)]
pub struct AirQualityQuery {
    pub lat: f64,
    pub lon: f64,
}

async fn get_air_quality(
    State(state): State<AppState>,
    query: Result<Query<AirQualityQuery>, QueryRejection>,
) -> Result<Json<AirQualityReport>, ApiError> {
    let Query(AirQualityQuery { lat, lon }) =
        query.map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;

    if !lat.is_finite() || !lon.is_finite() {
        return Err(ApiError::InvalidQuery(
            "lat and lon must be finite numbers".to_string(),
        ));
    }

    let location = format!("{},{}", lat, lon);
    logging::info(DataSource::Api, Some(&location), "air quality requested");

    let raw = state.source.fetch(lat, lon).await.map_err(|e| {
        logging::log_aqicn_failure(&location, "feed fetch", &e);
        ApiError::Upstream(e)
    })?;

    let report = report::assemble(raw, lat, lon).map_err(|e| {
        logging::log_aqicn_failure(&location, "report assembly", &e);
        ApiError::Upstream(e)
    })?;

    logging::log_report_summary(
        &location,
        report.aqi,
        report.pollutants.len(),
        report.iaqi.len(),
    );

    Ok(Json(report))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    /// Missing or unparseable query parameters.
    InvalidQuery(String),
    /// The provider failed or rejected the request.
    Upstream(AirQualityError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::InvalidQuery(msg) => msg,
            ApiError::Upstream(err) => err.to_string(),
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
