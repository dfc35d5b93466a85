use serde::Deserialize;
use uuid::Uuid;

use super::repo_types::MealType;
use crate::dates::{DayKey, IntoDayKey, UnixSeconds};
use crate::error::TrackerError;

#[derive(Debug, Deserialize)]
pub struct LogFoodRequest {
    pub food_item_id: Uuid,
    pub quantity_g: f64,
    pub meal_type: MealType,
    /// Day or timestamp the food belongs to; defaults to the current UTC day.
    #[serde(default)]
    pub date: Option<DayInput>,
}

/// A calendar day, an RFC 3339 timestamp, or unix seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DayInput {
    Text(String),
    Unix(i64),
}

impl IntoDayKey for DayInput {
    fn into_day_key(self) -> Result<DayKey, TrackerError> {
        match self {
            DayInput::Text(raw) => raw.into_day_key(),
            DayInput::Unix(secs) => UnixSeconds(secs).into_day_key(),
        }
    }
}
