use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use spark_shared::types::{EligibleProfilesQuery, Gender, ProfileDocument};

use super::geo::{distance_cutoff_km, haversine_km};
use crate::store::{InteractionStore, ProfileStore, StoreResult};

/// Maximum number of candidates returned per call.
pub const CANDIDATE_LIMIT: usize = 50;

/// Rows requested from the profile store, before any exclusion.
pub const POOL_FETCH_LIMIT: i64 = 50;

#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub profile: ProfileDocument,
    pub distance_km: f64,
}

/// Genders a profile wants to see in discovery.
pub fn accepted_genders(profile: &ProfileDocument) -> Vec<Gender> {
    if let Some(filter) = profile.gender_filter.as_ref().filter(|f| !f.is_empty()) {
        return filter.clone();
    }
    match profile.gender {
        Some(Gender::Male) => vec![Gender::Female],
        Some(Gender::Female) => vec![Gender::Male],
        _ => Gender::ALL.to_vec(),
    }
}

pub fn eligibility_query(viewer: &ProfileDocument) -> EligibleProfilesQuery {
    EligibleProfilesQuery {
        genders: accepted_genders(viewer),
        age_min: viewer.age_range.min,
        age_max: viewer.age_range.max,
        limit: POOL_FETCH_LIMIT,
    }
}

/// Filters, measures and orders a fetched pool for `viewer`.
///
/// The distance cutoff is chosen from the size of `pool` as fetched, before
/// excluded or unlocated profiles are removed.
pub fn rank_candidates(
    viewer: &ProfileDocument,
    pool: Vec<ProfileDocument>,
    excluded: &HashSet<Uuid>,
) -> Vec<Candidate> {
    let Some((origin_lat, origin_lng)) = viewer.location.coordinates() else {
        return vec![];
    };
    let cutoff = distance_cutoff_km(pool.len());

    let mut candidates: Vec<Candidate> = pool
        .into_iter()
        .filter(|p| p.id != viewer.id && !excluded.contains(&p.id))
        .filter_map(|profile| {
            let (lat, lng) = profile.location.coordinates()?;
            let distance_km = haversine_km(origin_lat, origin_lng, lat, lng);
            Some(Candidate {
                profile,
                distance_km,
            })
        })
        .filter(|c| c.distance_km <= cutoff)
        .collect();

    candidates.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    candidates.truncate(CANDIDATE_LIMIT);
    candidates
}

pub struct CandidateSelector {
    profiles: Arc<dyn ProfileStore>,
    interactions: Arc<dyn InteractionStore>,
}

impl CandidateSelector {
    pub fn new(profiles: Arc<dyn ProfileStore>, interactions: Arc<dyn InteractionStore>) -> Self {
        Self {
            profiles,
            interactions,
        }
    }

    /// Discovery feed for `viewer`, nearest first. Empty on any store failure.
    pub async fn select_candidates(&self, viewer: &ProfileDocument) -> Vec<Candidate> {
        match self.try_select(viewer).await {
            Ok(candidates) => {
                metrics::histogram!("discovery_candidates_served").record(candidates.len() as f64);
                candidates
            }
            Err(e) => {
                tracing::error!(error = %e, viewer_id = %viewer.id, "failed to load discovery candidates");
                vec![]
            }
        }
    }

    async fn try_select(&self, viewer: &ProfileDocument) -> StoreResult<Vec<Candidate>> {
        let mut excluded: HashSet<Uuid> = self
            .interactions
            .judged_target_ids(viewer.id)
            .await?
            .into_iter()
            .collect();
        excluded.insert(viewer.id);

        let query = eligibility_query(viewer);
        let pool = self.profiles.eligible_profiles(&query).await?;
        let fetched = pool.len();

        let candidates = rank_candidates(viewer, pool, &excluded);
        tracing::debug!(
            viewer_id = %viewer.id,
            fetched,
            excluded = excluded.len(),
            returned = candidates.len(),
            "discovery candidates ranked"
        );
        Ok(candidates)
    }
}
