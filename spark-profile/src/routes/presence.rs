use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use spark_shared::errors::AppResult;
use spark_shared::types::auth::AuthUser;
use spark_shared::types::ApiResponse;

use crate::services::{presence, profile_service};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PresenceRequest {
    pub is_online: bool,
}

#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub is_online: bool,
    /// Seconds before the online marker lapses without another heartbeat.
    pub ttl_secs: u64,
}

// --- POST /me/presence ---

pub async fn update_presence(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<PresenceRequest>,
) -> AppResult<Json<ApiResponse<PresenceResponse>>> {
    profile_service::set_presence(&state.db, user.id, req.is_online)?;

    let ttl_secs = state.config.presence_ttl_secs;
    presence::heartbeat(&state.redis, user.id, req.is_online, ttl_secs).await;

    tracing::debug!(user_id = %user.id, is_online = req.is_online, "presence updated");

    Ok(Json(ApiResponse::ok(PresenceResponse {
        is_online: req.is_online,
        ttl_secs,
    })))
}
