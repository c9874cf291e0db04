//! HTTP API Layer
//!
//! REST API for the claims decision service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: scoring, decision reads, model listing, demo seeding, health
//! - **Middleware**: trace context, API key guard, access logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(recorder, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_scoring::DecisionRecorder;

use crate::config::ApiConfig;
use crate::handlers::{claims, decisions, health, models, seed};
use crate::middleware::{access_log_middleware, api_key_middleware, trace_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub recorder: Arc<DecisionRecorder>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(recorder: DecisionRecorder, config: ApiConfig) -> Self {
        Self {
            recorder: Arc::new(recorder),
            config,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/decisions", get(decisions::list_decisions))
        .route("/api/decisions/:id", get(decisions::get_decision))
        .route("/api/models", get(models::list_models))
        .route("/api/seed", post(seed::seed_demo_data));

    // Scoring requires the API key when one is configured
    let scoring_routes = Router::new()
        .route("/api/claim/score", post(claims::score_claim))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(scoring_routes)
        .layer(axum_middleware::from_fn(access_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(trace_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
