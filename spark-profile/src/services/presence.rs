use uuid::Uuid;

use spark_shared::clients::redis::RedisClient;
use spark_shared::types::ProfileDocument;

pub fn presence_key(user_id: Uuid) -> String {
    format!("online:{user_id}")
}

/// Refreshes (or clears) the short-lived online marker for `user_id`.
pub async fn heartbeat(redis: &RedisClient, user_id: Uuid, is_online: bool, ttl_secs: u64) {
    let key = presence_key(user_id);
    let result = if is_online {
        redis.set(&key, "1", ttl_secs).await
    } else {
        redis.del(&key).await
    };

    if let Err(e) = result {
        tracing::warn!(error = %e, user_id = %user_id, is_online, "failed to update presence key");
    }
}

/// Overrides `is_online` with the live Redis marker; keeps the stored flag if Redis fails.
pub async fn apply_live_presence(redis: &RedisClient, documents: &mut [ProfileDocument]) {
    let keys: Vec<String> = documents.iter().map(|d| presence_key(d.id)).collect();

    match redis.exists_multi(&keys).await {
        Ok(flags) => merge_flags(documents, &flags),
        Err(e) => {
            tracing::warn!(error = %e, count = keys.len(), "presence lookup failed, using stored flags");
        }
    }
}

fn merge_flags(documents: &mut [ProfileDocument], flags: &[bool]) {
    for (doc, online) in documents.iter_mut().zip(flags) {
        doc.is_online = *online;
    }
}
