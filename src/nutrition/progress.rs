use super::calculator::{round1, round2};
use super::types::{AdherenceStatus, DailyProgress, MacroProgress, MacroTargets, MacroValues};
use crate::dates::DayKey;
use crate::error::TrackerError;

const ON_TRACK_LOW: f64 = 90.0;
const ON_TRACK_HIGH: f64 = 110.0;

/// Compares `current` against `target`.
///
/// A target of zero or less is treated as "no goal": percentage 0, status
/// `under`. The band is picked from the unrounded ratio and is closed on
/// both ends, so exactly 90% and exactly 110% are on track.
///
/// The ratio is `current * 100 / target`. Dividing first (`current / target * 100`)
/// turns 110/100 into 110.00000000000001 in f64 and would push an exact 110% over.
pub fn classify(current: f64, target: f64) -> Result<MacroProgress, TrackerError> {
    if !current.is_finite() || !target.is_finite() {
        return Err(TrackerError::invalid(format!(
            "progress needs finite numbers, got current={current} target={target}"
        )));
    }

    let ratio = if target > 0.0 {
        current * 100.0 / target
    } else {
        0.0
    };

    let status = if ratio < ON_TRACK_LOW {
        AdherenceStatus::Under
    } else if ratio <= ON_TRACK_HIGH {
        AdherenceStatus::OnTrack
    } else {
        AdherenceStatus::Over
    };

    Ok(MacroProgress {
        current: round2(current),
        target: round2(target),
        percentage: round1(ratio),
        status,
    })
}

pub fn daily_progress(
    date: DayKey,
    totals: &MacroValues,
    targets: &MacroTargets,
) -> Result<DailyProgress, TrackerError> {
    Ok(DailyProgress {
        date,
        calories: classify(totals.calories, targets.calories_target)?,
        protein: classify(totals.protein, targets.protein_target)?,
        carbs: classify(totals.carbs, targets.carbs_target)?,
        fat: classify(totals.fat, targets.fat_target)?,
    })
}
