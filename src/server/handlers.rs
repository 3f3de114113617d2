use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::html::render_page;
use super::AppState;
use crate::core::decision::parse_threshold;
use crate::domain::model::UmbrellaVerdict;
use crate::domain::ports::{Clock, ForecastFetcher};
use crate::utils::error::UmbrellaError;

/// Query parameters for `/api/umbrella`. Kept as text so a bad value can fall
/// back to the default instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct ThresholdQuery {
    pub threshold: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TempResponse {
    pub min_temp: i32,
    pub max_temp: i32,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// JSON failure response for the API routes.
pub struct ApiError(UmbrellaError);

impl From<UmbrellaError> for ApiError {
    fn from(err: UmbrellaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(
            "❌ Failed to check umbrella status: {} (code: {}, category: {:?})",
            self.0,
            self.0.code(),
            self.0.category()
        );

        let body = ErrorBody {
            error: self.0.user_friendly_message(),
            code: self.0.code(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// `GET /api/umbrella`
pub async fn api_umbrella<F: ForecastFetcher, C: Clock>(
    State(state): State<AppState<F, C>>,
    Query(query): Query<ThresholdQuery>,
) -> Result<Json<UmbrellaVerdict>, ApiError> {
    tracing::info!("API request received: /api/umbrella");
    let threshold = parse_threshold(query.threshold.as_deref());
    let verdict = state.service.check(threshold).await?;
    Ok(Json(verdict))
}

/// `GET /api/temp`
pub async fn api_temp<F: ForecastFetcher, C: Clock>(
    State(state): State<AppState<F, C>>,
) -> Result<Json<TempResponse>, ApiError> {
    tracing::info!("API request received: /api/temp");
    let verdict = state.service.check(None).await?;
    Ok(Json(TempResponse {
        min_temp: verdict.min_temp,
        max_temp: verdict.max_temp,
    }))
}

/// `GET /` renders the verdict as a page; failures are plain text.
pub async fn index<F: ForecastFetcher, C: Clock>(State(state): State<AppState<F, C>>) -> Response {
    tracing::info!("Request received: /");
    match state.service.check(None).await {
        Ok(verdict) => Html(render_page(&verdict)).into_response(),
        Err(e) => {
            tracing::error!("❌ Failed to check umbrella status: {} (code: {})", e, e.code());
            (StatusCode::INTERNAL_SERVER_ERROR, e.user_friendly_message()).into_response()
        }
    }
}

/// Health check endpoint handler
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
