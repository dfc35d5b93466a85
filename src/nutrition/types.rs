use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::DayKey;
use crate::error::TrackerError;

/// Nutrient density per 100 g, as supplied by the food catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodProfile {
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
}

impl FoodProfile {
    pub fn validate(&self) -> Result<(), TrackerError> {
        let fields = [
            ("calories_per_100g", self.calories_per_100g),
            ("protein_per_100g", self.protein_per_100g),
            ("carbs_per_100g", self.carbs_per_100g),
            ("fat_per_100g", self.fat_per_100g),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackerError::invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Catalog record for a food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub profile: FoodProfile,
    pub serving_size_g: Option<f64>,
}

/// A food profile paired with the grams that were eaten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoggedQuantity {
    profile: FoodProfile,
    quantity_grams: f64,
}

impl LoggedQuantity {
    pub fn new(profile: FoodProfile, quantity_grams: f64) -> Result<Self, TrackerError> {
        profile.validate()?;
        validate_quantity(quantity_grams)?;
        Ok(Self {
            profile,
            quantity_grams,
        })
    }

    pub fn profile(&self) -> &FoodProfile {
        &self.profile
    }

    pub fn quantity_grams(&self) -> f64 {
        self.quantity_grams
    }
}

pub(crate) fn validate_quantity(quantity_grams: f64) -> Result<(), TrackerError> {
    if !quantity_grams.is_finite() || quantity_grams <= 0.0 {
        return Err(TrackerError::invalid(format!(
            "quantity must be a finite number of grams greater than zero, got {quantity_grams}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroValues {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdherenceStatus {
    Under,
    OnTrack,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroProgress {
    pub current: f64,
    pub target: f64,
    pub percentage: f64,
    pub status: AdherenceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: DayKey,
    pub calories: MacroProgress,
    pub protein: MacroProgress,
    pub carbs: MacroProgress,
    pub fat: MacroProgress,
}

/// Full per-day target tuple. Every write carries all four values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories_target: f64,
    pub protein_target: f64,
    pub carbs_target: f64,
    pub fat_target: f64,
}

impl MacroTargets {
    pub fn validate(&self) -> Result<(), TrackerError> {
        let fields = [
            ("calories_target", self.calories_target),
            ("protein_target", self.protein_target),
            ("carbs_target", self.carbs_target),
            ("fat_target", self.fat_target),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackerError::invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
