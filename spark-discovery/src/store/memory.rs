//! In-memory stores for exercising discovery logic without Postgres or the
//! profile service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use spark_shared::types::{AgeRange, EligibleProfilesQuery, Gender, Location, ProfileDocument};

use super::{InteractionStore, InteractionTx, ProfileStore, StoreError, StoreResult, SwipeWork};
use crate::matching::SwipeOutcome;
use crate::models::{Interaction, InteractionStatus, NewInteraction, Swipe};

pub fn profile_at(latitude: f64, longitude: f64, gender: Gender, age: i32) -> ProfileDocument {
    ProfileDocument {
        id: Uuid::new_v4(),
        display_name: Some("someone".into()),
        age: Some(age),
        gender: Some(gender),
        location: Location {
            latitude: Some(latitude),
            longitude: Some(longitude),
            city: Some("Paris".into()),
            ..Default::default()
        },
        photos: vec!["https://cdn.example/1.jpg".into(), "https://cdn.example/2.jpg".into()],
        interests: vec!["hiking".into()],
        bio: None,
        age_range: AgeRange::default(),
        gender_filter: None,
        profile_complete: true,
        is_online: false,
        last_seen_at: None,
    }
}

fn outage() -> StoreError {
    StoreError::Upstream(503)
}

#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<Vec<ProfileDocument>>,
    failing: AtomicBool,
}

impl MemoryProfileStore {
    pub fn with(profiles: Vec<ProfileDocument>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(outage())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn profile(&self, id: Uuid) -> StoreResult<Option<ProfileDocument>> {
        self.check()?;
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn eligible_profiles(&self, query: &EligibleProfilesQuery) -> StoreResult<Vec<ProfileDocument>> {
        self.check()?;
        let range = AgeRange {
            min: query.age_min,
            max: query.age_max,
        };
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles
            .iter()
            .filter(|p| p.profile_complete)
            .filter(|p| p.gender.is_some_and(|g| query.genders.contains(&g)))
            .filter(|p| p.age.is_some_and(|age| range.contains(age)))
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<ProfileDocument>> {
        self.check()?;
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryInteractionStore {
    rows: Mutex<Vec<Interaction>>,
    failing: AtomicBool,
}

impl MemoryInteractionStore {
    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get(&self, actor_id: Uuid, target_id: Uuid) -> Option<Interaction> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|i| i.actor_id == actor_id && i.target_id == target_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(outage())
        } else {
            Ok(())
        }
    }
}

struct MemoryTx<'a> {
    rows: &'a mut Vec<Interaction>,
}

impl InteractionTx for MemoryTx<'_> {
    fn find(&mut self, actor_id: Uuid, target_id: Uuid) -> StoreResult<Option<Interaction>> {
        Ok(self
            .rows
            .iter()
            .find(|i| i.actor_id == actor_id && i.target_id == target_id)
            .cloned())
    }

    fn insert(&mut self, new: &NewInteraction) -> StoreResult<Option<Interaction>> {
        if self.find(new.actor_id, new.target_id)?.is_some() {
            return Ok(None);
        }
        let interaction = Interaction {
            id: Uuid::new_v4(),
            actor_id: new.actor_id,
            target_id: new.target_id,
            action: new.action.parse().map_err(StoreError::Corrupt)?,
            status: new.status.parse().map_err(StoreError::Corrupt)?,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.rows.push(interaction.clone());
        Ok(Some(interaction))
    }

    fn find_pending_positive(&mut self, actor_id: Uuid, target_id: Uuid) -> StoreResult<Option<Interaction>> {
        Ok(self
            .rows
            .iter()
            .find(|i| {
                i.actor_id == actor_id
                    && i.target_id == target_id
                    && i.action.is_positive()
                    && i.status == InteractionStatus::Pending
            })
            .cloned())
    }

    fn set_status(&mut self, ids: &[Uuid], status: InteractionStatus) -> StoreResult<usize> {
        let mut updated = 0;
        for row in self.rows.iter_mut().filter(|i| ids.contains(&i.id)) {
            row.status = status;
            row.updated_at = Utc::now();
            updated += 1;
        }
        Ok(updated)
    }
}

#[async_trait]
impl InteractionStore for MemoryInteractionStore {
    async fn judged_target_ids(&self, actor_id: Uuid) -> StoreResult<Vec<Uuid>> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|i| i.actor_id == actor_id).map(|i| i.target_id).collect())
    }

    async fn matched_target_ids(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<&Interaction> = rows
            .iter()
            .rev()
            .filter(|i| i.actor_id == user_id && i.status == InteractionStatus::Matched)
            .collect();
        matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(matched.into_iter().map(|i| i.target_id).collect())
    }

    async fn pending_liker_ids(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|i| {
                i.target_id == user_id && i.action.is_positive() && i.status == InteractionStatus::Pending
            })
            .map(|i| i.actor_id)
            .collect())
    }

    async fn with_pair_locked(&self, swipe: &Swipe, work: SwipeWork) -> StoreResult<SwipeOutcome> {
        self.check()?;
        // One mutex covers every pair, which is stricter than per-pair locking.
        let mut rows = self.rows.lock().unwrap();
        let mut tx = MemoryTx { rows: &mut rows };
        work(&mut tx, swipe)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }
}
