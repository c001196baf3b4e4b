//! Service-to-service reads used by discovery. No auth.

use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use spark_shared::errors::{AppError, AppResult};
use spark_shared::types::{BatchProfilesRequest, EligibleProfilesQuery, ProfileDocument};

use crate::models::Profile;
use crate::services::{presence, profile_service};
use crate::AppState;

async fn to_documents(state: &AppState, rows: Vec<Profile>) -> Vec<ProfileDocument> {
    let mut documents: Vec<ProfileDocument> = rows.iter().map(Profile::to_document).collect();
    presence::apply_live_presence(&state.redis, &mut documents).await;
    documents
}

/// GET /internal/profiles/:id
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProfileDocument>> {
    let profile = profile_service::find_profile(&state.db, id)?;
    let document = to_documents(&state, vec![profile])
        .await
        .pop()
        .ok_or_else(AppError::profile_not_found)?;

    Ok(Json(document))
}

/// POST /internal/profiles/eligible
pub async fn eligible_profiles(
    State(state): State<Arc<AppState>>,
    Json(query): Json<EligibleProfilesQuery>,
) -> AppResult<Json<Vec<ProfileDocument>>> {
    let rows = profile_service::eligible_profiles(&state.db, &query, state.config.max_eligible)?;

    tracing::debug!(
        genders = ?query.genders,
        age_min = query.age_min,
        age_max = query.age_max,
        returned = rows.len(),
        "eligible profiles served"
    );

    Ok(Json(to_documents(&state, rows).await))
}

/// POST /internal/profiles/batch
pub async fn batch_profiles(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchProfilesRequest>,
) -> AppResult<Json<Vec<ProfileDocument>>> {
    let rows = profile_service::profiles_by_ids(&state.db, &req.ids)?;

    Ok(Json(to_documents(&state, rows).await))
}
