use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;

use spark_shared::types::{HealthCheck, HealthResponse, HealthStatus};

use crate::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let database = match state.db.get() {
        Ok(mut conn) => match diesel::sql_query("SELECT 1").execute(&mut conn) {
            Ok(_) => HealthCheck::pass("database"),
            Err(e) => HealthCheck::fail("database", HealthStatus::Unhealthy, e.to_string()),
        },
        Err(e) => HealthCheck::fail("database", HealthStatus::Unhealthy, e.to_string()),
    };

    // Presence falls back to stored flags without Redis.
    let redis = match state.redis.ping().await {
        Ok(()) => HealthCheck::pass("redis"),
        Err(e) => HealthCheck::fail("redis", HealthStatus::Degraded, e.to_string()),
    };

    let response = HealthResponse::healthy("spark-profile", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![database, redis]);

    let status = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response)).into_response()
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}
