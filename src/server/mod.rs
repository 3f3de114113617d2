//! HTTP surface for the umbrella check.
//!
//! Handlers only render the verdict the service hands back; none of them
//! re-derive the decision.

pub mod handlers;
pub mod html;

use crate::core::engine::UmbrellaService;
use crate::domain::ports::{Clock, ForecastFetcher};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
pub struct AppState<F: ForecastFetcher, C: Clock> {
    pub service: Arc<UmbrellaService<F, C>>,
}

// Manual impl: derive would demand `F: Clone + C: Clone`.
impl<F: ForecastFetcher, C: Clock> Clone for AppState<F, C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<F: ForecastFetcher, C: Clock> AppState<F, C> {
    pub fn new(service: UmbrellaService<F, C>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app<F, C>(state: AppState<F, C>) -> Router
where
    F: ForecastFetcher + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/", get(handlers::index::<F, C>))
        .route("/api/umbrella", get(handlers::api_umbrella::<F, C>))
        .route("/api/temp", get(handlers::api_temp::<F, C>))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
