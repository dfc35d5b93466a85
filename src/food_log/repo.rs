use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::{FoodItemRow, LoggedItem, LoggedItemRow, NewLogEntry};
use crate::dates::DayKey;
use crate::error::TrackerError;
use crate::nutrition::FoodItem;

/// Source of per-100g nutrient data.
#[async_trait]
pub trait FoodCatalog: Send + Sync {
    async fn food_item(&self, id: Uuid) -> Result<Option<FoodItem>, TrackerError>;
}

/// Source of a user's logged foods, already bucketed by UTC day.
#[async_trait]
pub trait FoodLog: Send + Sync {
    async fn items_for_day(&self, user_id: Uuid, day: DayKey) -> Result<Vec<LoggedItem>, TrackerError>;
    /// Days in `from..=to` that have at least one logged item.
    async fn logged_days(
        &self,
        user_id: Uuid,
        from: DayKey,
        to: DayKey,
    ) -> Result<BTreeSet<DayKey>, TrackerError>;
    async fn record(&self, entry: NewLogEntry) -> Result<LoggedItem, TrackerError>;
}

#[derive(Clone)]
pub struct PgFoodCatalog {
    db: PgPool,
}

impl PgFoodCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodCatalog for PgFoodCatalog {
    async fn food_item(&self, id: Uuid) -> Result<Option<FoodItem>, TrackerError> {
        let row = sqlx::query_as::<_, FoodItemRow>(
            r#"
            SELECT id, name, calories_per_100g, protein_per_100g, carbs_per_100g, fat_per_100g,
                   serving_size_g
            FROM food_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(TrackerError::storage)?;
        Ok(row.map(FoodItem::from))
    }
}

#[derive(Clone)]
pub struct PgFoodLog {
    db: PgPool,
}

impl PgFoodLog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodLog for PgFoodLog {
    async fn items_for_day(&self, user_id: Uuid, day: DayKey) -> Result<Vec<LoggedItem>, TrackerError> {
        let rows = sqlx::query_as::<_, LoggedItemRow>(
            r#"
            SELECT mi.id, m.user_id, m.date, m.meal_type, mi.food_item_id, f.name AS food_name,
                   mi.quantity_g, f.calories_per_100g, f.protein_per_100g, f.carbs_per_100g,
                   f.fat_per_100g, mi.calories, mi.protein, mi.carbs, mi.fat, mi.logged_at
            FROM meal_items mi
            JOIN meals m ON m.id = mi.meal_id
            JOIN food_items f ON f.id = mi.food_item_id
            WHERE m.user_id = $1 AND m.date = $2
            ORDER BY mi.logged_at ASC
            "#,
        )
        .bind(user_id)
        .bind(day.date())
        .fetch_all(&self.db)
        .await
        .map_err(TrackerError::storage)?;
        rows.into_iter().map(LoggedItem::try_from).collect()
    }

    async fn logged_days(
        &self,
        user_id: Uuid,
        from: DayKey,
        to: DayKey,
    ) -> Result<BTreeSet<DayKey>, TrackerError> {
        let days = sqlx::query_scalar::<_, Date>(
            r#"
            SELECT DISTINCT m.date
            FROM meals m
            JOIN meal_items mi ON mi.meal_id = m.id
            WHERE m.user_id = $1 AND m.date BETWEEN $2 AND $3
            "#,
        )
        .bind(user_id)
        .bind(from.date())
        .bind(to.date())
        .fetch_all(&self.db)
        .await
        .map_err(TrackerError::storage)?;
        Ok(days.into_iter().map(DayKey::from).collect())
    }

    async fn record(&self, entry: NewLogEntry) -> Result<LoggedItem, TrackerError> {
        let mut tx = self.db.begin().await.map_err(TrackerError::storage)?;

        let meal_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO meals (user_id, date, meal_type)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, date, meal_type) DO UPDATE SET meal_type = EXCLUDED.meal_type
            RETURNING id
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.date.date())
        .bind(entry.meal_type.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(TrackerError::storage)?;

        let item_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO meal_items
                (meal_id, food_item_id, quantity_g, calories, protein, carbs, fat, logged_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(meal_id)
        .bind(entry.food.id)
        .bind(entry.quantity.quantity_grams())
        .bind(entry.macros.calories)
        .bind(entry.macros.protein)
        .bind(entry.macros.carbs)
        .bind(entry.macros.fat)
        .bind(entry.logged_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(TrackerError::storage)?;

        tx.commit().await.map_err(TrackerError::storage)?;

        Ok(LoggedItem {
            id: item_id,
            user_id: entry.user_id,
            date: entry.date,
            meal_type: entry.meal_type,
            food_item_id: entry.food.id,
            food_name: entry.food.name,
            quantity: entry.quantity,
            macros: entry.macros,
            logged_at: entry.logged_at,
        })
    }
}
