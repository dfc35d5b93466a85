use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{MacroGoal, MacroGoalRow};
use crate::dates::DayKey;
use crate::error::TrackerError;
use crate::nutrition::MacroTargets;

/// Storage collaborator for goals.
///
/// `upsert_goal` must be atomic and keyed by `(user_id, day)`: it either
/// inserts the first record for that key or replaces every target of the
/// existing one. Concurrent writers are ordered by the store.
#[async_trait]
pub trait GoalStorage: Send + Sync {
    async fn get_goal(&self, user_id: Uuid, day: DayKey) -> Result<Option<MacroGoal>, TrackerError>;
    async fn upsert_goal(
        &self,
        user_id: Uuid,
        day: DayKey,
        targets: MacroTargets,
    ) -> Result<MacroGoal, TrackerError>;
}

#[derive(Clone)]
pub struct PgGoalStorage {
    db: PgPool,
}

impl PgGoalStorage {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GoalStorage for PgGoalStorage {
    async fn get_goal(&self, user_id: Uuid, day: DayKey) -> Result<Option<MacroGoal>, TrackerError> {
        let row = sqlx::query_as::<_, MacroGoalRow>(
            r#"
            SELECT id, user_id, date, calories_target, protein_target, carbs_target, fat_target,
                   created_at
            FROM macro_goals
            WHERE user_id = $1 AND date = $2
            "#,
        )
        .bind(user_id)
        .bind(day.date())
        .fetch_optional(&self.db)
        .await
        .map_err(TrackerError::storage)?;
        Ok(row.map(MacroGoal::from))
    }

    async fn upsert_goal(
        &self,
        user_id: Uuid,
        day: DayKey,
        targets: MacroTargets,
    ) -> Result<MacroGoal, TrackerError> {
        let row = sqlx::query_as::<_, MacroGoalRow>(
            r#"
            INSERT INTO macro_goals
                (user_id, date, calories_target, protein_target, carbs_target, fat_target)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, date) DO UPDATE
            SET calories_target = EXCLUDED.calories_target,
                protein_target  = EXCLUDED.protein_target,
                carbs_target    = EXCLUDED.carbs_target,
                fat_target      = EXCLUDED.fat_target
            RETURNING id, user_id, date, calories_target, protein_target, carbs_target, fat_target,
                      created_at
            "#,
        )
        .bind(user_id)
        .bind(day.date())
        .bind(targets.calories_target)
        .bind(targets.protein_target)
        .bind(targets.carbs_target)
        .bind(targets.fat_target)
        .fetch_one(&self.db)
        .await
        .map_err(upsert_error)?;
        Ok(row.into())
    }
}

/// The database refusing the statement is an unresolved conflict. Failing to
/// reach it at all (pool, I/O, TLS, protocol) is a storage outage.
fn upsert_error(err: sqlx::Error) -> TrackerError {
    match err {
        sqlx::Error::Database(_) => TrackerError::conflict(err),
        other => TrackerError::storage(other),
    }
}
