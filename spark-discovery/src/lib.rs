pub mod config;
pub mod events;
pub mod matching;
pub mod models;
pub mod routes;
pub mod schema;
pub mod store;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use spark_shared::clients::rabbitmq::RabbitMQClient;

use crate::matching::{CandidateSelector, SwipeProcessor};
use crate::store::{InteractionStore, ProfileStore};

pub struct AppState {
    pub config: config::AppConfig,
    pub profiles: Arc<dyn ProfileStore>,
    pub interactions: Arc<dyn InteractionStore>,
    pub selector: CandidateSelector,
    pub swipes: SwipeProcessor,
    /// `None` disables event publishing.
    pub rabbitmq: Option<RabbitMQClient>,
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(
        config: config::AppConfig,
        profiles: Arc<dyn ProfileStore>,
        interactions: Arc<dyn InteractionStore>,
        rabbitmq: Option<RabbitMQClient>,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        Self {
            config,
            selector: CandidateSelector::new(profiles.clone(), interactions.clone()),
            swipes: SwipeProcessor::new(interactions.clone()),
            profiles,
            interactions,
            rabbitmq,
            metrics_handle,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/discovery/candidates", get(routes::candidates::get_candidates))
        .route("/swipes", post(routes::swipes::create_swipe))
        .route("/matches", get(routes::matches::list_matches))
        .route("/likes/received", get(routes::matches::list_received_likes))
        .layer(axum::middleware::from_fn(spark_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
