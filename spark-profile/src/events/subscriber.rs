use std::sync::Arc;

use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;

use spark_shared::types::event::{payloads, routing_keys, Event};

use crate::services::profile_service;
use crate::AppState;

const QUEUE: &str = "spark-profile.auth.user.registered";

/// Creates a default profile for every `auth.user.registered` event.
pub async fn listen_user_registered(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state
        .rabbitmq
        .subscribe(QUEUE, &[routing_keys::AUTH_USER_REGISTERED])
        .await?;

    tracing::info!("listening for auth.user.registered events");

    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                tracing::error!(error = %e, "consumer error");
                continue;
            }
        };

        match serde_json::from_slice::<Event<payloads::UserRegistered>>(&delivery.data) {
            Ok(event) => {
                let data = &event.data;
                tracing::info!(user_id = %data.user_id, "received user.registered event");

                match profile_service::create_default_profile(
                    &state.db,
                    data.user_id,
                    &data.email,
                    data.display_name.as_deref(),
                ) {
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        tracing::debug!(user_id = %data.user_id, "profile already exists");
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            user_id = %data.user_id,
                            "failed to create default profile"
                        );
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to deserialize user.registered event");
            }
        }

        if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
            tracing::warn!(error = %e, "failed to ack user.registered delivery");
        }
    }

    Ok(())
}
