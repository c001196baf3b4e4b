use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use spark_shared::clients::db::DbPool;

use super::{InteractionStore, InteractionTx, StoreError, StoreResult, SwipeWork};
use crate::matching::SwipeOutcome;
use crate::models::{Interaction, InteractionRow, InteractionStatus, NewInteraction, Swipe, SwipeAction};
use crate::schema::interactions;

pub struct PgInteractionStore {
    pool: DbPool,
}

impl PgInteractionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Key for `pg_advisory_xact_lock`, shared by A→B and B→A swipes.
pub fn pair_lock_id(swipe: &Swipe) -> i64 {
    let (lo, hi) = swipe.unordered_pair();
    let digest = Sha256::new()
        .chain_update(lo.as_bytes())
        .chain_update(hi.as_bytes())
        .finalize();
    let mut key = [0u8; 8];
    key.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(key)
}

fn to_domain(row: InteractionRow) -> StoreResult<Interaction> {
    Interaction::try_from(row).map_err(StoreError::Corrupt)
}

#[async_trait]
impl InteractionStore for PgInteractionStore {
    async fn judged_target_ids(&self, actor_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let mut conn = self.pool.get()?;
        let ids = interactions::table
            .filter(interactions::actor_id.eq(actor_id))
            .select(interactions::target_id)
            .load::<Uuid>(&mut conn)?;
        Ok(ids)
    }

    async fn matched_target_ids(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let mut conn = self.pool.get()?;
        let ids = interactions::table
            .filter(interactions::actor_id.eq(user_id))
            .filter(interactions::status.eq(InteractionStatus::Matched.as_str()))
            .order(interactions::updated_at.desc())
            .select(interactions::target_id)
            .load::<Uuid>(&mut conn)?;
        Ok(ids)
    }

    async fn pending_liker_ids(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let mut conn = self.pool.get()?;
        let ids = interactions::table
            .filter(interactions::target_id.eq(user_id))
            .filter(interactions::action.eq_any(SwipeAction::POSITIVE))
            .filter(interactions::status.eq(InteractionStatus::Pending.as_str()))
            .order(interactions::created_at.desc())
            .select(interactions::actor_id)
            .load::<Uuid>(&mut conn)?;
        Ok(ids)
    }

    async fn with_pair_locked(&self, swipe: &Swipe, work: SwipeWork) -> StoreResult<SwipeOutcome> {
        let mut conn = self.pool.get()?;
        let lock_id = pair_lock_id(swipe);

        conn.transaction::<_, StoreError, _>(|conn| {
            // Released automatically at commit/rollback.
            diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
                .bind::<BigInt, _>(lock_id)
                .execute(conn)?;

            let mut tx = PgInteractionTx { conn };
            work(&mut tx, swipe)
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.pool.get()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }
}

struct PgInteractionTx<'a> {
    conn: &'a mut PgConnection,
}

impl InteractionTx for PgInteractionTx<'_> {
    fn find(&mut self, actor_id: Uuid, target_id: Uuid) -> StoreResult<Option<Interaction>> {
        interactions::table
            .filter(interactions::actor_id.eq(actor_id))
            .filter(interactions::target_id.eq(target_id))
            .select(InteractionRow::as_select())
            .first(self.conn)
            .optional()?
            .map(to_domain)
            .transpose()
    }

    fn insert(&mut self, new: &NewInteraction) -> StoreResult<Option<Interaction>> {
        diesel::insert_into(interactions::table)
            .values(new)
            .on_conflict((interactions::actor_id, interactions::target_id))
            .do_nothing()
            .returning(InteractionRow::as_returning())
            .get_result(self.conn)
            .optional()?
            .map(to_domain)
            .transpose()
    }

    fn find_pending_positive(&mut self, actor_id: Uuid, target_id: Uuid) -> StoreResult<Option<Interaction>> {
        interactions::table
            .filter(interactions::actor_id.eq(actor_id))
            .filter(interactions::target_id.eq(target_id))
            .filter(interactions::action.eq_any(SwipeAction::POSITIVE))
            .filter(interactions::status.eq(InteractionStatus::Pending.as_str()))
            .select(InteractionRow::as_select())
            .first(self.conn)
            .optional()?
            .map(to_domain)
            .transpose()
    }

    fn set_status(&mut self, ids: &[Uuid], status: InteractionStatus) -> StoreResult<usize> {
        let updated = diesel::update(interactions::table.filter(interactions::id.eq_any(ids)))
            .set((
                interactions::status.eq(status.as_str()),
                interactions::updated_at.eq(chrono::Utc::now()),
            ))
            .execute(self.conn)?;
        Ok(updated)
    }
}
