use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::DayKey;
use crate::nutrition::MacroTargets;

#[derive(Debug, FromRow)]
pub struct MacroGoalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub calories_target: f64,
    pub protein_target: f64,
    pub carbs_target: f64,
    pub fat_target: f64,
    pub created_at: OffsetDateTime,
}

/// The single goal record for a (user, day).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DayKey,
    #[serde(flatten)]
    pub targets: MacroTargets,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<MacroGoalRow> for MacroGoal {
    fn from(r: MacroGoalRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            date: DayKey::from(r.date),
            targets: MacroTargets {
                calories_target: r.calories_target,
                protein_target: r.protein_target,
                carbs_target: r.carbs_target,
                fat_target: r.fat_target,
            },
            created_at: r.created_at,
        }
    }
}
