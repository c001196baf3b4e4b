use axum::{routing::{get, post}, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod models;
mod onboarding;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use spark_shared::clients::db::{create_pool, DbPool};
use spark_shared::clients::rabbitmq::RabbitMQClient;
use spark_shared::clients::redis::RedisClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub redis: RedisClient,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    spark_shared::middleware::init_tracing("spark-profile");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url, config.db_pool_size)?;

    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let redis = RedisClient::connect(&config.redis_url).await?;
    let metrics_handle = spark_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState { db, config, rabbitmq, redis, metrics_handle });

    // Spawn RabbitMQ subscriber for user.registered events
    let sub_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = events::subscriber::listen_user_registered(sub_state).await {
            tracing::error!(error = %e, "user.registered subscriber failed");
        }
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/me", get(routes::profile::get_profile).patch(routes::profile::update_profile))
        .route("/me/onboarding", get(routes::profile::get_onboarding))
        .route("/me/complete", post(routes::profile::complete_profile))
        .route("/me/presence", post(routes::presence::update_presence))
        // Internal service-to-service endpoints (no auth)
        .route("/internal/profiles/eligible", post(routes::internal::eligible_profiles))
        .route("/internal/profiles/batch", post(routes::internal::batch_profiles))
        .route("/internal/profiles/:id", get(routes::internal::get_profile))
        .layer(axum::middleware::from_fn(spark_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "spark-profile starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
