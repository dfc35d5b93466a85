use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::DayKey;
use crate::error::TrackerError;
use crate::nutrition::{FoodItem, FoodProfile, LoggedQuantity, MacroValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(TrackerError::invalid(format!("unknown meal type {other:?}"))),
        }
    }
}

/// One logged food. `macros` is what was computed when it was logged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DayKey,
    pub meal_type: MealType,
    pub food_item_id: Uuid,
    pub food_name: String,
    pub quantity: LoggedQuantity,
    pub macros: MacroValues,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

/// A log write, already validated and scaled.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub user_id: Uuid,
    pub date: DayKey,
    pub meal_type: MealType,
    pub food: FoodItem,
    pub quantity: LoggedQuantity,
    pub macros: MacroValues,
    pub logged_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct FoodItemRow {
    pub id: Uuid,
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub serving_size_g: Option<f64>,
}

impl From<FoodItemRow> for FoodItem {
    fn from(r: FoodItemRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            profile: FoodProfile {
                calories_per_100g: r.calories_per_100g,
                protein_per_100g: r.protein_per_100g,
                carbs_per_100g: r.carbs_per_100g,
                fat_per_100g: r.fat_per_100g,
            },
            serving_size_g: r.serving_size_g,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct LoggedItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub meal_type: String,
    pub food_item_id: Uuid,
    pub food_name: String,
    pub quantity_g: f64,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub logged_at: OffsetDateTime,
}

impl TryFrom<LoggedItemRow> for LoggedItem {
    type Error = TrackerError;

    fn try_from(r: LoggedItemRow) -> Result<Self, Self::Error> {
        let profile = FoodProfile {
            calories_per_100g: r.calories_per_100g,
            protein_per_100g: r.protein_per_100g,
            carbs_per_100g: r.carbs_per_100g,
            fat_per_100g: r.fat_per_100g,
        };
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            date: DayKey::from(r.date),
            meal_type: r.meal_type.parse()?,
            food_item_id: r.food_item_id,
            food_name: r.food_name,
            quantity: LoggedQuantity::new(profile, r.quantity_g)?,
            macros: MacroValues {
                calories: r.calories,
                protein: r.protein,
                carbs: r.carbs,
                fat: r.fat,
            },
            logged_at: r.logged_at,
        })
    }
}
