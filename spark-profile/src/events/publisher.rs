use uuid::Uuid;

use spark_shared::clients::rabbitmq::RabbitMQClient;
use spark_shared::types::event::{payloads, routing_keys, Event};

const SOURCE: &str = "spark-profile";

pub async fn publish_profile_updated(rabbitmq: &RabbitMQClient, profile_id: Uuid) {
    let event = Event::new(
        SOURCE,
        routing_keys::PROFILE_UPDATED,
        payloads::ProfileUpdated { profile_id },
    )
    .with_user(profile_id);

    rabbitmq.emit(&event).await;
}

pub async fn publish_onboarding_completed(rabbitmq: &RabbitMQClient, profile_id: Uuid, display_name: &str) {
    let event = Event::new(
        SOURCE,
        routing_keys::PROFILE_ONBOARDING_COMPLETED,
        payloads::OnboardingCompleted {
            profile_id,
            display_name: display_name.to_string(),
        },
    )
    .with_user(profile_id);

    rabbitmq.emit(&event).await;
}
