use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use spark_shared::errors::{AppError, AppResult, ErrorCode};
use spark_shared::types::auth::AuthUser;
use spark_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{Swipe, SwipeAction};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub target_id: Uuid,
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub matched: bool,
    /// `false` when the swipe was a repeat or could not be stored.
    pub recorded: bool,
}

// --- POST /swipes ---

pub async fn create_swipe(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SwipeRequest>,
) -> AppResult<Json<ApiResponse<SwipeResponse>>> {
    let action: SwipeAction = req
        .action
        .parse()
        .map_err(|e: String| AppError::new(ErrorCode::InvalidSwipeAction, e))?;

    if req.target_id == user.id {
        return Err(AppError::new(ErrorCode::CannotSwipeSelf, "cannot swipe on your own profile"));
    }

    let swipe = Swipe::new(user.id, req.target_id, action);
    let outcome = state.swipes.record(swipe).await;

    if let Some(bus) = &state.rabbitmq {
        if outcome.was_recorded() {
            publisher::publish_swipe_recorded(bus, &swipe).await;
        }
        if outcome.is_match() {
            publisher::publish_match_created(bus, &swipe).await;
        }
    }

    Ok(Json(ApiResponse::ok(SwipeResponse {
        matched: outcome.is_match(),
        recorded: outcome.was_recorded(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InteractionStatus;
    use crate::store::memory::{MemoryInteractionStore, MemoryProfileStore};
    use crate::test_support;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn swipe(
        state: Arc<AppState>,
        actor: Uuid,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/swipes")
            .header("Authorization", test_support::bearer(actor))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = crate::router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn reciprocal_like_reports_match() {
        let profiles = Arc::new(MemoryProfileStore::default());
        let interactions = Arc::new(MemoryInteractionStore::default());
        let state = test_support::state(&profiles, &interactions);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let (status, json) = swipe(
            state.clone(),
            a,
            serde_json::json!({ "target_id": b, "action": "like" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["matched"], false);
        assert_eq!(json["data"]["recorded"], true);

        let (_, json) = swipe(
            state.clone(),
            b,
            serde_json::json!({ "target_id": a, "action": "superlike" }),
        )
        .await;
        assert_eq!(json["data"]["matched"], true);
        assert_eq!(interactions.get(a, b).unwrap().status, InteractionStatus::Matched);

        let (_, json) = swipe(state, b, serde_json::json!({ "target_id": a, "action": "like" })).await;
        assert_eq!(json["data"]["matched"], false);
        assert_eq!(json["data"]["recorded"], false);
    }

    #[tokio::test]
    async fn rejects_unknown_action_and_self_swipe() {
        let profiles = Arc::new(MemoryProfileStore::default());
        let interactions = Arc::new(MemoryInteractionStore::default());
        let state = test_support::state(&profiles, &interactions);
        let a = Uuid::new_v4();

        let (status, json) = swipe(
            state.clone(),
            a,
            serde_json::json!({ "target_id": Uuid::new_v4(), "action": "poke" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "E3002");

        let (status, json) = swipe(state, a, serde_json::json!({ "target_id": a, "action": "like" })).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"]["code"], "E3001");
        assert_eq!(interactions.len(), 0);
    }
}
