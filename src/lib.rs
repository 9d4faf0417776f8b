//! Tricycle route administration portal
//! 
//! HTTP API for barangay staff and municipal administrators: routes and
//! their approval workflow, terminals, loading zones, restrictions,
//! operators, drivers, associations, submissions and documents.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::middleware::cors::cors_layer;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::state::AppState;

/// Assemble the full application router.
pub fn build_router(state: AppState) -> Router {
    let admin = routes::admin_routes::create_admin_router()
        .route_layer(from_fn(admin_only_middleware));

    let protected = Router::new()
        .route("/api/auth/me", get(routes::auth_routes::me))
        .nest("/api/barangays", routes::barangay_routes::create_barangay_router())
        .nest("/api/routes", routes::route_routes::create_route_router())
        .nest("/api/stops", routes::stop_routes::create_stop_router())
        .nest("/api/terminals", routes::terminal_routes::create_terminal_router())
        .nest("/api/loading-zones", routes::loading_zone_routes::create_loading_zone_router())
        .nest("/api/restrictions", routes::restriction_routes::create_restriction_router())
        .nest("/api/operators", routes::operator_routes::create_operator_router())
        .nest("/api/associations", routes::association_routes::create_association_router())
        .nest("/api/drivers", routes::driver_routes::create_driver_router())
        .nest("/api/submissions", routes::submission_routes::create_submission_router())
        .nest("/api/documents", routes::document_routes::create_document_router())
        .nest("/api/admin", admin)
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let login = post(routes::auth_routes::login).layer(from_fn_with_state(
        state.rate_limit.clone(),
        rate_limit_middleware,
    ));

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", login)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = sqlx::query("SELECT 1").execute(&state.pool).await;

    match database {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "connected",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        ),
        Err(e) => {
            error!("❌ Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "database": "unavailable",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                })),
            )
        }
    }
}
