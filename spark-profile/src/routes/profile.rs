use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use spark_shared::errors::{AppError, AppResult, ErrorCode};
use spark_shared::types::auth::AuthUser;
use spark_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{Profile, UpdateProfileRequest};
use crate::onboarding::OnboardingProgress;
use crate::services::profile_service;
use crate::AppState;

// --- GET /me ---

pub async fn get_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let profile = profile_service::find_profile(&state.db, user.id)?;

    Ok(Json(ApiResponse::ok(profile)))
}

// --- PATCH /me ---

pub async fn update_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let changes = payload.into_changeset()?;
    let updated = profile_service::update_profile(&state.db, user.id, &changes)?;

    publisher::publish_profile_updated(&state.rabbitmq, updated.id).await;

    Ok(Json(ApiResponse::ok(updated)))
}

// --- GET /me/onboarding ---

pub async fn get_onboarding(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<OnboardingProgress>>> {
    let profile = profile_service::find_profile(&state.db, user.id)?;

    Ok(Json(ApiResponse::ok(OnboardingProgress::of(&profile))))
}

// --- POST /me/complete ---

pub async fn complete_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let profile = profile_service::find_profile(&state.db, user.id)?;
    if profile.profile_complete {
        return Ok(Json(ApiResponse::ok(profile)));
    }

    let progress = OnboardingProgress::of(&profile);
    if !progress.is_complete() {
        return Err(AppError::with_details(
            ErrorCode::OnboardingIncomplete,
            format!("{} of {} onboarding steps completed", progress.completed, progress.total),
            serde_json::json!({ "missing_steps": progress.missing() }),
        ));
    }

    let updated = profile_service::mark_complete(&state.db, user.id)?;
    let display_name = updated.display_name.as_deref().unwrap_or_default();

    publisher::publish_onboarding_completed(&state.rabbitmq, updated.id, display_name).await;

    tracing::info!(profile_id = %updated.id, "onboarding completed");

    Ok(Json(ApiResponse::ok(updated)))
}
