use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dates::DayKey;
use crate::nutrition::{DailyProgress, MacroComposition, MacroTargets, MacroValues};

/// Totals for one day and, when a goal exists, progress against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: DayKey,
    pub totals: MacroValues,
    pub composition: MacroComposition,
    pub targets: Option<MacroTargets>,
    pub progress: Option<DailyProgress>,
    pub has_logged: bool,
    pub item_count: usize,
}

/// Trailing window of daily summaries, oldest first, with per-day averages
/// over every day in the window (days with nothing logged count as zero).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryReport {
    pub days: Vec<DailySummary>,
    pub averages: MacroValues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakReport {
    pub current_streak: u32,
    pub calendar: BTreeMap<DayKey, bool>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<u32>,
}
