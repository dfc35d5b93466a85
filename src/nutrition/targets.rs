use serde::{Deserialize, Serialize};

use super::types::{MacroTargets, MacroValues};
use crate::error::TrackerError;

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

const SPLIT_TOLERANCE: f64 = 1e-6;

/// A calorie budget divided between the three macros by percentage.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CalorieSplit {
    pub calories: f64,
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
}

impl CalorieSplit {
    /// Gram targets, each rounded to a whole gram.
    pub fn into_targets(self) -> Result<MacroTargets, TrackerError> {
        if !self.calories.is_finite() || self.calories < 0.0 {
            return Err(TrackerError::invalid(format!(
                "calories must be a finite non-negative number, got {}",
                self.calories
            )));
        }
        let pcts = [
            ("protein_pct", self.protein_pct),
            ("carbs_pct", self.carbs_pct),
            ("fat_pct", self.fat_pct),
        ];
        for (name, pct) in pcts {
            if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                return Err(TrackerError::invalid(format!(
                    "{name} must be between 0 and 100, got {pct}"
                )));
            }
        }
        let total = self.protein_pct + self.carbs_pct + self.fat_pct;
        if (total - 100.0).abs() > SPLIT_TOLERANCE {
            return Err(TrackerError::invalid(format!(
                "macro percentages must add up to 100, got {total}"
            )));
        }

        let grams = |pct: f64, kcal_per_gram: f64| (self.calories * pct / 100.0 / kcal_per_gram).round();
        Ok(MacroTargets {
            calories_target: self.calories.round(),
            protein_target: grams(self.protein_pct, KCAL_PER_GRAM_PROTEIN),
            carbs_target: grams(self.carbs_pct, KCAL_PER_GRAM_CARBS),
            fat_target: grams(self.fat_pct, KCAL_PER_GRAM_FAT),
        })
    }
}

/// Share of macro energy (4/4/9 kcal per gram) each macro contributes, in whole percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroComposition {
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
}

/// A day with no macro energy is 0% across the board. The shares are rounded
/// independently, so they need not add up to exactly 100.
pub fn composition(totals: &MacroValues) -> MacroComposition {
    let protein = totals.protein * KCAL_PER_GRAM_PROTEIN;
    let carbs = totals.carbs * KCAL_PER_GRAM_CARBS;
    let fat = totals.fat * KCAL_PER_GRAM_FAT;
    let total = protein + carbs + fat;
    if !total.is_finite() || total <= 0.0 {
        return MacroComposition::default();
    }

    let share = |kcal: f64| (kcal / total * 100.0).round();
    MacroComposition {
        protein_pct: share(protein),
        carbs_pct: share(carbs),
        fat_pct: share(fat),
    }
}
