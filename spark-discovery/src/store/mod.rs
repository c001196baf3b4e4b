//! Persistence seams of the discovery service.
//!
//! Profiles are owned by `spark-profile` and consumed over its internal HTTP
//! API; interactions are owned here and live in Postgres.

use async_trait::async_trait;
use uuid::Uuid;

use spark_shared::errors::{AppError, ErrorCode};
use spark_shared::types::{EligibleProfilesQuery, ProfileDocument};

use crate::models::{Interaction, InteractionStatus, NewInteraction, Swipe};
use crate::matching::SwipeOutcome;

pub mod postgres;
pub mod profile_client;

#[cfg(test)]
pub mod memory;

pub use postgres::PgInteractionStore;
pub use profile_client::HttpProfileStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("profile service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("profile service returned status {0}")]
    Upstream(u16),

    #[error("corrupt interaction record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Http(_) | StoreError::Upstream(_) => {
                tracing::warn!(error = %err, "profile store unavailable");
                AppError::new(ErrorCode::ProfileStoreUnavailable, "profile service is unavailable")
            }
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Pool(_) | StoreError::Corrupt(_) => AppError::Internal(err.into()),
        }
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, id: Uuid) -> StoreResult<Option<ProfileDocument>>;

    /// Completed profiles matching `query`, at most `query.limit` rows.
    async fn eligible_profiles(&self, query: &EligibleProfilesQuery) -> StoreResult<Vec<ProfileDocument>>;

    /// Profiles for `ids`; unknown ids are skipped, order is unspecified.
    async fn profiles_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<ProfileDocument>>;
}

/// Operations available while a swipe pair is locked.
pub trait InteractionTx {
    fn find(&mut self, actor_id: Uuid, target_id: Uuid) -> StoreResult<Option<Interaction>>;

    /// Inserts the interaction; `None` when one already exists for (actor, target).
    fn insert(&mut self, new: &NewInteraction) -> StoreResult<Option<Interaction>>;

    /// Pending like/superlike from `actor_id` to `target_id`.
    fn find_pending_positive(&mut self, actor_id: Uuid, target_id: Uuid) -> StoreResult<Option<Interaction>>;

    fn set_status(&mut self, ids: &[Uuid], status: InteractionStatus) -> StoreResult<usize>;
}

pub type SwipeWork = fn(&mut dyn InteractionTx, &Swipe) -> StoreResult<SwipeOutcome>;

#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Every target the actor has liked, disliked or superliked.
    async fn judged_target_ids(&self, actor_id: Uuid) -> StoreResult<Vec<Uuid>>;

    /// Targets of the user's own interactions that reached `matched`.
    async fn matched_target_ids(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>>;

    /// Actors holding a pending like/superlike on the user, newest first.
    async fn pending_liker_ids(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>>;

    /// Runs `work` atomically with respect to every other swipe between the
    /// same two users, whichever direction.
    async fn with_pair_locked(&self, swipe: &Swipe, work: SwipeWork) -> StoreResult<SwipeOutcome>;

    async fn ping(&self) -> StoreResult<()>;
}
