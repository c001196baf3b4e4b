use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use uuid::Uuid;

use spark_shared::errors::AppResult;
use spark_shared::types::auth::AuthUser;
use spark_shared::types::{ApiResponse, Paginated, PaginationParams, ProfileDocument};

use crate::AppState;

/// Pages `ids`, then resolves the page to profiles in the same order.
///
/// Ids the profile store no longer knows are skipped, so a page may be short.
async fn page_of_profiles(
    state: &AppState,
    ids: Vec<Uuid>,
    params: &PaginationParams,
) -> AppResult<Paginated<ProfileDocument>> {
    let page = Paginated::from_vec(ids, params);
    let mut by_id: HashMap<Uuid, ProfileDocument> = state
        .profiles
        .profiles_by_ids(&page.items)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let items = page.items.iter().filter_map(|id| by_id.remove(id)).collect();
    Ok(Paginated::new(items, page.total, params))
}

// --- GET /matches ---

pub async fn list_matches(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<ProfileDocument>>>> {
    let ids = state.interactions.matched_target_ids(user.id).await?;
    let page = page_of_profiles(&state, ids, &params).await?;

    Ok(Json(ApiResponse::ok(page)))
}

// --- GET /likes/received ---

/// Users whose like or superlike on the caller is still pending.
pub async fn list_received_likes(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<ProfileDocument>>>> {
    let ids = state.interactions.pending_liker_ids(user.id).await?;
    let page = page_of_profiles(&state, ids, &params).await?;

    Ok(Json(ApiResponse::ok(page)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SwipeAction;
    use crate::store::memory::{profile_at, MemoryInteractionStore, MemoryProfileStore};
    use crate::test_support;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use spark_shared::types::Gender;
    use tower::ServiceExt;

    async fn get(state: Arc<AppState>, uri: &str, user: Uuid) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .uri(uri)
            .header("Authorization", test_support::bearer(user))
            .body(Body::empty())
            .unwrap();
        let response = crate::router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn matches_and_received_likes_are_listed_separately() {
        let me = profile_at(48.85, 2.35, Gender::Female, 27);
        let matched = profile_at(48.86, 2.36, Gender::Male, 29);
        let admirer = profile_at(48.87, 2.37, Gender::Male, 31);
        let rejected = profile_at(48.88, 2.38, Gender::Male, 33);

        let profiles = Arc::new(MemoryProfileStore::with(vec![
            me.clone(),
            matched.clone(),
            admirer.clone(),
            rejected.clone(),
        ]));
        let interactions = Arc::new(MemoryInteractionStore::default());
        let state = test_support::state(&profiles, &interactions);

        state.swipes.record_swipe(matched.id, me.id, SwipeAction::Like).await;
        assert!(state.swipes.record_swipe(me.id, matched.id, SwipeAction::Like).await);
        state.swipes.record_swipe(admirer.id, me.id, SwipeAction::Superlike).await;
        state.swipes.record_swipe(rejected.id, me.id, SwipeAction::Dislike).await;

        let (status, json) = get(state.clone(), "/matches", me.id).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["items"][0]["id"], matched.id.to_string());

        let (_, json) = get(state, "/likes/received", me.id).await;
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["items"][0]["id"], admirer.id.to_string());
    }

    #[tokio::test]
    async fn received_likes_are_paged_newest_first() {
        let me = profile_at(48.85, 2.35, Gender::Female, 27);
        let admirers: Vec<ProfileDocument> =
            (0..5).map(|_| profile_at(48.86, 2.36, Gender::Male, 30)).collect();

        let mut all = admirers.clone();
        all.push(me.clone());
        let profiles = Arc::new(MemoryProfileStore::with(all));
        let interactions = Arc::new(MemoryInteractionStore::default());
        let state = test_support::state(&profiles, &interactions);

        for admirer in &admirers {
            state.swipes.record_swipe(admirer.id, me.id, SwipeAction::Like).await;
        }

        let (_, json) = get(state, "/likes/received?page=2&per_page=2", me.id).await;
        assert_eq!(json["data"]["total"], 5);
        assert_eq!(json["data"]["total_pages"], 3);
        let items = json["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], admirers[2].id.to_string());
        assert_eq!(items[1]["id"], admirers[1].id.to_string());
    }

    #[tokio::test]
    async fn matches_are_listed_most_recent_first() {
        let me = profile_at(48.85, 2.35, Gender::Female, 27);
        let others: Vec<ProfileDocument> =
            (0..3).map(|_| profile_at(48.86, 2.36, Gender::Male, 30)).collect();

        let mut all = others.clone();
        all.push(me.clone());
        let profiles = Arc::new(MemoryProfileStore::with(all));
        let interactions = Arc::new(MemoryInteractionStore::default());
        let state = test_support::state(&profiles, &interactions);

        for other in &others {
            state.swipes.record_swipe(me.id, other.id, SwipeAction::Like).await;
        }
        for i in [1, 0, 2] {
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
            assert!(state.swipes.record_swipe(others[i].id, me.id, SwipeAction::Like).await);
        }

        let (_, json) = get(state, "/matches", me.id).await;
        let ids: Vec<&str> = json["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        let expected: Vec<String> = [2, 0, 1].iter().map(|&i| others[i].id.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let me = profile_at(48.85, 2.35, Gender::Female, 27);
        let admirer = profile_at(48.86, 2.36, Gender::Male, 30);
        let profiles = Arc::new(MemoryProfileStore::with(vec![me.clone(), admirer.clone()]));
        let interactions = Arc::new(MemoryInteractionStore::default());
        let state = test_support::state(&profiles, &interactions);

        state.swipes.record_swipe(admirer.id, me.id, SwipeAction::Like).await;

        let uri = format!("/likes/received?page={}&per_page=100", u64::MAX);
        let (status, json) = get(state, &uri, me.id).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);
        assert!(json["data"]["items"].as_array().unwrap().is_empty());
    }
}
