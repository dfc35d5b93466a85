use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::dto::{DailySummary, HistoryReport, StreakReport};
use crate::dates::{canonical_day, current_streak, days_back, DayKey};
use crate::error::TrackerError;
use crate::nutrition::{composition, daily_progress, daily_totals, LoggedQuantity, MacroValues};
use crate::state::AppState;

pub const DEFAULT_HISTORY_DAYS: u32 = 7;
/// Today plus the 90 days before it.
pub const STREAK_WINDOW_DAYS: u32 = 91;

#[instrument(skip(state))]
pub async fn daily_summary(
    state: &AppState,
    user_id: Uuid,
    day: DayKey,
) -> Result<DailySummary, TrackerError> {
    let items = state.log.items_for_day(user_id, day).await?;
    let quantities: Vec<LoggedQuantity> = items.iter().map(|i| i.quantity).collect();
    let totals = daily_totals(&quantities)?;

    let targets = state.goals.get(user_id, day).await?.map(|g| g.targets);
    let progress = targets
        .as_ref()
        .map(|t| daily_progress(day, &totals, t))
        .transpose()?;

    debug!(%user_id, %day, items = items.len(), has_goal = targets.is_some(), "daily summary");
    Ok(DailySummary {
        date: day,
        composition: composition(&totals),
        totals,
        targets,
        progress,
        has_logged: !items.is_empty(),
        item_count: items.len(),
    })
}

/// Summaries for the `days` days ending at `now`'s UTC day, oldest first.
#[instrument(skip(state))]
pub async fn history(
    state: &AppState,
    user_id: Uuid,
    days: u32,
    now: OffsetDateTime,
) -> Result<HistoryReport, TrackerError> {
    let max = state.config.history_max_days;
    if days > max {
        return Err(TrackerError::invalid(format!(
            "history is limited to {max} days, asked for {days}"
        )));
    }

    let mut out = Vec::with_capacity(days as usize);
    for day in days_back(days, now)? {
        out.push(daily_summary(state, user_id, day).await?);
    }
    Ok(HistoryReport {
        averages: window_averages(&out),
        days: out,
    })
}

/// Mean of each total across the window, rounded to whole units.
fn window_averages(days: &[DailySummary]) -> MacroValues {
    if days.is_empty() {
        return MacroValues::default();
    }
    let n = days.len() as f64;
    let mean = |pick: fn(&MacroValues) -> f64| {
        (days.iter().map(|d| pick(&d.totals)).sum::<f64>() / n).round()
    };
    MacroValues {
        calories: mean(|t| t.calories),
        protein: mean(|t| t.protein),
        carbs: mean(|t| t.carbs),
        fat: mean(|t| t.fat),
    }
}

#[instrument(skip(state))]
pub async fn streak(
    state: &AppState,
    user_id: Uuid,
    now: OffsetDateTime,
) -> Result<StreakReport, TrackerError> {
    let window = days_back(STREAK_WINDOW_DAYS, now)?;
    let today = canonical_day(now)?;
    let Some(&first) = window.first() else {
        return Ok(StreakReport {
            current_streak: 0,
            calendar: Default::default(),
        });
    };

    let logged = state.log.logged_days(user_id, first, today).await?;
    Ok(StreakReport {
        current_streak: current_streak(&logged, today),
        calendar: window.into_iter().map(|d| (d, logged.contains(&d))).collect(),
    })
}
