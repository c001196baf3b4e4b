use spark_shared::clients::rabbitmq::RabbitMQClient;
use spark_shared::types::event::{payloads, routing_keys, Event};

use crate::models::Swipe;

const SOURCE: &str = "spark-discovery";

pub async fn publish_swipe_recorded(rabbitmq: &RabbitMQClient, swipe: &Swipe) {
    let event = Event::new(
        SOURCE,
        routing_keys::DISCOVERY_SWIPE_RECORDED,
        payloads::SwipeRecorded {
            actor_id: swipe.actor_id,
            target_id: swipe.target_id,
            action: swipe.action.as_str().to_string(),
        },
    )
    .with_user(swipe.actor_id);

    rabbitmq.emit(&event).await;
}

/// `user_a_id` is the user whose swipe completed the match.
pub async fn publish_match_created(rabbitmq: &RabbitMQClient, swipe: &Swipe) {
    let event = Event::new(
        SOURCE,
        routing_keys::DISCOVERY_MATCH_CREATED,
        payloads::MatchCreated {
            user_a_id: swipe.actor_id,
            user_b_id: swipe.target_id,
        },
    )
    .with_user(swipe.actor_id);

    rabbitmq.emit(&event).await;
}
