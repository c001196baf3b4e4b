use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{InteractionStatus, NewInteraction, Swipe, SwipeAction};
use crate::store::{InteractionStore, InteractionTx, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeOutcome {
    /// Stored; no reciprocal like (yet).
    Recorded,
    /// Stored and both directions promoted to `matched`.
    Matched,
    /// The actor already judged this target; nothing changed.
    Duplicate,
    /// Actor and target are the same user; nothing changed.
    SelfSwipe,
    /// The store failed; nothing is guaranteed to have changed.
    Failed,
}

impl SwipeOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, SwipeOutcome::Matched)
    }

    pub fn was_recorded(&self) -> bool {
        matches!(self, SwipeOutcome::Recorded | SwipeOutcome::Matched)
    }
}

/// Body of a swipe, executed while the pair is locked.
fn apply_swipe(tx: &mut dyn InteractionTx, swipe: &Swipe) -> StoreResult<SwipeOutcome> {
    if tx.find(swipe.actor_id, swipe.target_id)?.is_some() {
        return Ok(SwipeOutcome::Duplicate);
    }

    let Some(created) = tx.insert(&NewInteraction::from(swipe))? else {
        return Ok(SwipeOutcome::Duplicate);
    };

    if !swipe.action.is_positive() {
        return Ok(SwipeOutcome::Recorded);
    }

    match tx.find_pending_positive(swipe.target_id, swipe.actor_id)? {
        Some(reciprocal) => {
            tx.set_status(&[reciprocal.id, created.id], InteractionStatus::Matched)?;
            Ok(SwipeOutcome::Matched)
        }
        None => Ok(SwipeOutcome::Recorded),
    }
}

pub struct SwipeProcessor {
    interactions: Arc<dyn InteractionStore>,
}

impl SwipeProcessor {
    pub fn new(interactions: Arc<dyn InteractionStore>) -> Self {
        Self { interactions }
    }

    /// Records `action` by `actor_id` on `target_id`; `true` when it completes a match.
    pub async fn record_swipe(&self, actor_id: Uuid, target_id: Uuid, action: SwipeAction) -> bool {
        self.record(Swipe::new(actor_id, target_id, action)).await.is_match()
    }

    pub async fn record(&self, swipe: Swipe) -> SwipeOutcome {
        if swipe.actor_id == swipe.target_id {
            tracing::warn!(actor_id = %swipe.actor_id, "ignoring swipe on self");
            return SwipeOutcome::SelfSwipe;
        }

        let outcome = match self.interactions.with_pair_locked(&swipe, apply_swipe).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    actor_id = %swipe.actor_id,
                    target_id = %swipe.target_id,
                    action = %swipe.action,
                    "failed to record swipe"
                );
                return SwipeOutcome::Failed;
            }
        };

        match outcome {
            SwipeOutcome::Duplicate => {
                tracing::warn!(
                    actor_id = %swipe.actor_id,
                    target_id = %swipe.target_id,
                    "already swiped on this user"
                );
            }
            SwipeOutcome::Matched => {
                metrics::counter!("discovery_swipes_total", "action" => swipe.action.as_str()).increment(1);
                metrics::counter!("discovery_matches_total").increment(1);
                tracing::info!(
                    actor_id = %swipe.actor_id,
                    target_id = %swipe.target_id,
                    "match created"
                );
            }
            SwipeOutcome::Recorded => {
                metrics::counter!("discovery_swipes_total", "action" => swipe.action.as_str()).increment(1);
                tracing::debug!(
                    actor_id = %swipe.actor_id,
                    target_id = %swipe.target_id,
                    action = %swipe.action,
                    "swipe recorded"
                );
            }
            SwipeOutcome::SelfSwipe | SwipeOutcome::Failed => {}
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryInteractionStore;

    fn setup() -> (Arc<MemoryInteractionStore>, SwipeProcessor) {
        let store = Arc::new(MemoryInteractionStore::default());
        let processor = SwipeProcessor::new(store.clone());
        (store, processor)
    }

    #[tokio::test]
    async fn like_without_reciprocal_is_pending() {
        let (store, processor) = setup();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(!processor.record_swipe(a, b, SwipeAction::Like).await);

        let stored = store.get(a, b).unwrap();
        assert_eq!(stored.status, InteractionStatus::Pending);
        assert_eq!(stored.action, SwipeAction::Like);
    }

    #[tokio::test]
    async fn dislike_is_stored_rejected() {
        let (store, processor) = setup();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(!processor.record_swipe(a, b, SwipeAction::Dislike).await);
        assert_eq!(store.get(a, b).unwrap().status, InteractionStatus::Rejected);
    }

    #[tokio::test]
    async fn second_swipe_on_same_target_is_noop() {
        let (store, processor) = setup();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(processor.record(Swipe::new(a, b, SwipeAction::Dislike)).await, SwipeOutcome::Recorded);
        assert_eq!(processor.record(Swipe::new(a, b, SwipeAction::Like)).await, SwipeOutcome::Duplicate);

        assert_eq!(store.len(), 1);
        let stored = store.get(a, b).unwrap();
        assert_eq!(stored.action, SwipeAction::Dislike);
        assert_eq!(stored.status, InteractionStatus::Rejected);
    }

    #[tokio::test]
    async fn mutual_like_matches_in_either_order() {
        for (first, second) in [
            (SwipeAction::Like, SwipeAction::Superlike),
            (SwipeAction::Superlike, SwipeAction::Like),
        ] {
            let (store, processor) = setup();
            let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

            assert!(!processor.record_swipe(b, a, first).await);
            assert!(processor.record_swipe(a, b, second).await);

            assert_eq!(store.get(a, b).unwrap().status, InteractionStatus::Matched);
            assert_eq!(store.get(b, a).unwrap().status, InteractionStatus::Matched);
        }
    }

    #[tokio::test]
    async fn dislike_never_completes_a_match() {
        let (store, processor) = setup();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        processor.record_swipe(a, b, SwipeAction::Like).await;
        assert!(!processor.record_swipe(b, a, SwipeAction::Dislike).await);

        assert_eq!(store.get(a, b).unwrap().status, InteractionStatus::Pending);
        assert_eq!(store.get(b, a).unwrap().status, InteractionStatus::Rejected);
    }

    #[tokio::test]
    async fn like_after_being_disliked_stays_pending() {
        let (store, processor) = setup();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        processor.record_swipe(b, a, SwipeAction::Dislike).await;
        assert!(!processor.record_swipe(a, b, SwipeAction::Like).await);
        assert_eq!(store.get(a, b).unwrap().status, InteractionStatus::Pending);
    }

    #[tokio::test]
    async fn self_swipe_is_ignored() {
        let (store, processor) = setup();
        let a = Uuid::new_v4();

        assert_eq!(processor.record(Swipe::new(a, a, SwipeAction::Like)).await, SwipeOutcome::SelfSwipe);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn store_failure_reports_no_match() {
        let (store, processor) = setup();
        store.fail_requests(true);

        assert!(!processor.record_swipe(Uuid::new_v4(), Uuid::new_v4(), SwipeAction::Like).await);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reciprocal_likes_match_exactly_once() {
        for _ in 0..50 {
            let store = Arc::new(MemoryInteractionStore::default());
            let processor = Arc::new(SwipeProcessor::new(store.clone()));
            let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

            let p1 = processor.clone();
            let p2 = processor.clone();
            let (r1, r2) = tokio::join!(
                tokio::spawn(async move { p1.record_swipe(a, b, SwipeAction::Like).await }),
                tokio::spawn(async move { p2.record_swipe(b, a, SwipeAction::Like).await }),
            );

            let matches = [r1.unwrap(), r2.unwrap()].iter().filter(|m| **m).count();
            assert_eq!(matches, 1);
            assert_eq!(store.get(a, b).unwrap().status, InteractionStatus::Matched);
            assert_eq!(store.get(b, a).unwrap().status, InteractionStatus::Matched);
        }
    }
}
