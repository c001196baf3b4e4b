use chrono::Utc;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use uuid::Uuid;

use spark_shared::clients::db::DbPool;
use spark_shared::errors::{AppError, AppResult};
use spark_shared::types::EligibleProfilesQuery;

use crate::models::{NewProfile, Profile, ProfileChangeset};
use crate::schema::profiles;

type Conn = PooledConnection<ConnectionManager<PgConnection>>;

fn conn(pool: &DbPool) -> AppResult<Conn> {
    pool.get().map_err(|e| AppError::internal(e.to_string()))
}

pub fn find_profile(pool: &DbPool, id: Uuid) -> AppResult<Profile> {
    let mut conn = conn(pool)?;
    profiles::table
        .find(id)
        .select(Profile::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(AppError::profile_not_found)
}

/// Creates an empty profile for a newly registered user.
/// Returns `None` when the profile already exists (redelivered event).
pub fn create_default_profile(
    pool: &DbPool,
    user_id: Uuid,
    email: &str,
    display_name: Option<&str>,
) -> AppResult<Option<Profile>> {
    let mut conn = conn(pool)?;

    let new_profile = NewProfile {
        id: user_id,
        email: Some(email.to_lowercase()),
        display_name: display_name.map(str::to_string),
    };

    let profile = diesel::insert_into(profiles::table)
        .values(&new_profile)
        .on_conflict(profiles::id)
        .do_nothing()
        .returning(Profile::as_returning())
        .get_result(&mut conn)
        .optional()?;

    if let Some(profile) = &profile {
        tracing::info!(profile_id = %profile.id, "default profile created");
    }
    Ok(profile)
}

pub fn update_profile(pool: &DbPool, id: Uuid, changes: &ProfileChangeset) -> AppResult<Profile> {
    let mut conn = conn(pool)?;

    diesel::update(profiles::table.find(id))
        .set((changes, profiles::updated_at.eq(Utc::now())))
        .returning(Profile::as_returning())
        .get_result(&mut conn)
        .optional()?
        .ok_or_else(AppError::profile_not_found)
}

pub fn mark_complete(pool: &DbPool, id: Uuid) -> AppResult<Profile> {
    let mut conn = conn(pool)?;

    diesel::update(profiles::table.find(id))
        .set((
            profiles::profile_complete.eq(true),
            profiles::updated_at.eq(Utc::now()),
        ))
        .returning(Profile::as_returning())
        .get_result(&mut conn)
        .optional()?
        .ok_or_else(AppError::profile_not_found)
}

pub fn set_presence(pool: &DbPool, id: Uuid, is_online: bool) -> AppResult<()> {
    let mut conn = conn(pool)?;

    let updated = diesel::update(profiles::table.find(id))
        .set((
            profiles::is_online.eq(is_online),
            profiles::last_seen_at.eq(Some(Utc::now())),
        ))
        .execute(&mut conn)?;

    if updated == 0 {
        return Err(AppError::profile_not_found());
    }
    Ok(())
}

/// Completed profiles matching the query, at most `min(query.limit, cap)` rows.
pub fn eligible_profiles(pool: &DbPool, query: &EligibleProfilesQuery, cap: i64) -> AppResult<Vec<Profile>> {
    let Some(eligible) = eligible_query(query, cap) else {
        return Ok(vec![]);
    };
    let mut conn = conn(pool)?;

    let rows = eligible.select(Profile::as_select()).load(&mut conn)?;

    Ok(rows)
}

/// `None` when nothing can match: no genders, or an inverted age range.
fn eligible_query(query: &EligibleProfilesQuery, cap: i64) -> Option<profiles::BoxedQuery<'static, Pg>> {
    if query.genders.is_empty() || query.age_min > query.age_max {
        return None;
    }

    let genders: Vec<&'static str> = query.genders.iter().map(|g| g.as_str()).collect();
    Some(
        profiles::table
            .filter(profiles::profile_complete.eq(true))
            .filter(profiles::gender.eq_any(genders))
            .filter(profiles::age.between(query.age_min, query.age_max))
            .limit(eligible_limit(query.limit, cap))
            .into_boxed(),
    )
}

fn eligible_limit(requested: i64, cap: i64) -> i64 {
    requested.max(0).min(cap.max(0))
}

pub fn profiles_by_ids(pool: &DbPool, ids: &[Uuid]) -> AppResult<Vec<Profile>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let mut conn = conn(pool)?;

    let rows = profiles::table
        .filter(profiles::id.eq_any(ids))
        .select(Profile::as_select())
        .load(&mut conn)?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_shared::types::Gender;

    fn query(genders: Vec<Gender>, age_min: i32, age_max: i32, limit: i64) -> EligibleProfilesQuery {
        EligibleProfilesQuery { genders, age_min, age_max, limit }
    }

    fn sql(query: &EligibleProfilesQuery, cap: i64) -> String {
        let eligible = eligible_query(query, cap).unwrap();
        diesel::debug_query::<Pg, _>(&eligible).to_string()
    }

    #[test]
    fn eligibility_filters_on_completion_gender_and_inclusive_age() {
        let sql = sql(&query(vec![Gender::Male, Gender::Female], 25, 35, 50), 200);

        assert!(sql.contains(r#""profiles"."profile_complete" = $1"#), "{sql}");
        assert!(sql.contains(r#""profiles"."gender" = ANY($2)"#), "{sql}");
        assert!(sql.contains(r#""profiles"."age" BETWEEN $3 AND $4"#), "{sql}");
        assert!(sql.contains("LIMIT $5"), "{sql}");
        assert!(sql.contains(r#"binds: [true, ["male", "female"], 25, 35, 50]"#), "{sql}");
    }

    #[test]
    fn limit_is_capped_by_configuration() {
        let sql = sql(&query(vec![Gender::Other], 18, 99, 500), 200);
        assert!(sql.ends_with("18, 99, 200]"), "{sql}");
    }

    #[test]
    fn nothing_can_match_without_genders_or_with_inverted_range() {
        assert!(eligible_query(&query(vec![], 18, 99, 50), 200).is_none());
        assert!(eligible_query(&query(vec![Gender::Male], 40, 30, 50), 200).is_none());
        assert!(eligible_query(&query(vec![Gender::Male], 30, 30, 50), 200).is_some());
    }

    #[test]
    fn negative_limits_clamp_to_zero() {
        assert_eq!(eligible_limit(50, 200), 50);
        assert_eq!(eligible_limit(-5, 200), 0);
        assert_eq!(eligible_limit(50, -1), 0);
    }
}
