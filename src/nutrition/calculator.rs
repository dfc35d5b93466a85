use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{validate_quantity, FoodProfile, LoggedQuantity, MacroValues};
use crate::error::TrackerError;

/// Rounds the exact binary value of `value` half-away-from-zero to `dp` decimals.
/// Values `Decimal` cannot hold (non-finite, beyond ~7.9e28) come back unchanged.
fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        // the shortest decimal text parses back to the nearest f64
        .and_then(|d| d.to_string().parse().ok())
        .unwrap_or(value)
}

/// Half-away-from-zero to 2 decimals.
pub fn round2(value: f64) -> f64 {
    round_dp(value, 2)
}

/// Half-away-from-zero to 1 decimal.
pub fn round1(value: f64) -> f64 {
    round_dp(value, 1)
}

/// Scales a per-100g profile to `quantity_grams`. Each field is rounded on its own.
pub fn scale(profile: &FoodProfile, quantity_grams: f64) -> Result<MacroValues, TrackerError> {
    profile.validate()?;
    validate_quantity(quantity_grams)?;

    let factor = quantity_grams / 100.0;
    Ok(MacroValues {
        calories: round2(profile.calories_per_100g * factor),
        protein: round2(profile.protein_per_100g * factor),
        carbs: round2(profile.carbs_per_100g * factor),
        fat: round2(profile.fat_per_100g * factor),
    })
}

/// Sums every field and rounds once at the end.
pub fn aggregate<'a, I>(values: I) -> MacroValues
where
    I: IntoIterator<Item = &'a MacroValues>,
{
    let sum = values
        .into_iter()
        .fold(MacroValues::default(), |acc, v| MacroValues {
            calories: acc.calories + v.calories,
            protein: acc.protein + v.protein,
            carbs: acc.carbs + v.carbs,
            fat: acc.fat + v.fat,
        });
    MacroValues {
        calories: round2(sum.calories),
        protein: round2(sum.protein),
        carbs: round2(sum.carbs),
        fat: round2(sum.fat),
    }
}

pub fn daily_totals(items: &[LoggedQuantity]) -> Result<MacroValues, TrackerError> {
    let scaled = items
        .iter()
        .map(|item| scale(item.profile(), item.quantity_grams()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(aggregate(&scaled))
}
