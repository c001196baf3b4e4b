use std::sync::Arc;

use spark_discovery::config::AppConfig;
use spark_discovery::store::{HttpProfileStore, PgInteractionStore};
use spark_discovery::AppState;
use spark_shared::clients::db::create_pool;
use spark_shared::clients::rabbitmq::RabbitMQClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    spark_shared::middleware::init_tracing("spark-discovery");

    let config = AppConfig::load()?;
    let port = config.port;

    // Database pool
    let db = create_pool(&config.database_url, config.db_pool_size)?;

    // Infrastructure clients
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let profiles = HttpProfileStore::new(&config.profile_service_url, config.profile_service_timeout())?;
    tracing::info!(url = %config.profile_service_url, "profile store configured");

    let metrics_handle = spark_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState::new(
        config,
        Arc::new(profiles),
        Arc::new(PgInteractionStore::new(db)),
        Some(rabbitmq),
        metrics_handle,
    ));

    let app = spark_discovery::router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "spark-discovery starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
