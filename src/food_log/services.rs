use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::LogFoodRequest;
use super::repo_types::{LoggedItem, NewLogEntry};
use crate::dates::{canonical_day, DayKey};
use crate::error::TrackerError;
use crate::nutrition::{scale, LoggedQuantity};
use crate::state::AppState;

/// Looks the food up, scales it to the logged grams and hands the entry to the log.
#[instrument(skip(state))]
pub async fn log_food(
    state: &AppState,
    user_id: Uuid,
    req: LogFoodRequest,
    now: OffsetDateTime,
) -> Result<LoggedItem, TrackerError> {
    let date = match req.date {
        Some(raw) => canonical_day(raw)?,
        None => canonical_day(now)?,
    };

    let food = state
        .catalog
        .food_item(req.food_item_id)
        .await?
        .ok_or(TrackerError::UnknownFood(req.food_item_id))?;

    let quantity = LoggedQuantity::new(food.profile, req.quantity_g)?;
    let macros = scale(quantity.profile(), quantity.quantity_grams())?;

    let item = state
        .log
        .record(NewLogEntry {
            user_id,
            date,
            meal_type: req.meal_type,
            food,
            quantity,
            macros,
            logged_at: now,
        })
        .await?;

    info!(%user_id, %date, item_id = %item.id, calories = item.macros.calories, "food logged");
    Ok(item)
}

pub async fn items_for_day(
    state: &AppState,
    user_id: Uuid,
    day: DayKey,
) -> Result<Vec<LoggedItem>, TrackerError> {
    state.log.items_for_day(user_id, day).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food_log::dto::DayInput;
    use crate::food_log::repo_types::MealType;
    use crate::nutrition::{FoodItem, FoodProfile, MacroValues};
    use time::macros::datetime;

    fn chicken() -> FoodItem {
        FoodItem {
            id: Uuid::new_v4(),
            name: "Chicken breast".into(),
            profile: FoodProfile {
                calories_per_100g: 165.0,
                protein_per_100g: 31.0,
                carbs_per_100g: 0.0,
                fat_per_100g: 3.6,
            },
            serving_size_g: Some(120.0),
        }
    }

    fn request(food: &FoodItem, grams: f64, date: Option<&str>) -> LogFoodRequest {
        LogFoodRequest {
            food_item_id: food.id,
            quantity_g: grams,
            meal_type: MealType::Lunch,
            date: date.map(|d| DayInput::Text(d.to_string())),
        }
    }

    #[tokio::test]
    async fn logs_scaled_item_on_utc_day() {
        let food = chicken();
        let state = AppState::in_memory(vec![food.clone()]);
        let user = Uuid::new_v4();
        // 21:00 in UTC-5 is already the next day in UTC
        let now = datetime!(2024-03-10 21:00 -5);

        let item = log_food(&state, user, request(&food, 150.0, None), now)
            .await
            .unwrap();

        assert_eq!(item.date.to_string(), "2024-03-11");
        assert_eq!(
            item.macros,
            MacroValues {
                calories: 247.5,
                protein: 46.5,
                carbs: 0.0,
                fat: 5.4
            }
        );
        let day = item.date;
        assert_eq!(items_for_day(&state, user, day).await.unwrap(), vec![item]);
    }

    #[tokio::test]
    async fn explicit_date_wins_over_now() {
        let food = chicken();
        let state = AppState::in_memory(vec![food.clone()]);
        let item = log_food(
            &state,
            Uuid::new_v4(),
            request(&food, 100.0, Some("2024-01-02")),
            datetime!(2024-03-10 12:00 UTC),
        )
        .await
        .unwrap();
        assert_eq!(item.date.to_string(), "2024-01-02");
    }

    #[tokio::test]
    async fn unknown_food_is_reported() {
        let state = AppState::in_memory(vec![]);
        let ghost = chicken();
        let err = log_food(
            &state,
            Uuid::new_v4(),
            request(&ghost, 100.0, None),
            OffsetDateTime::now_utc(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TrackerError::UnknownFood(id) if id == ghost.id));
    }

    #[tokio::test]
    async fn zero_grams_is_rejected_before_logging() {
        let food = chicken();
        let state = AppState::in_memory(vec![food.clone()]);
        let user = Uuid::new_v4();
        let now = datetime!(2024-03-10 12:00 UTC);

        let err = log_food(&state, user, request(&food, 0.0, None), now)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));

        let day = canonical_day(now).unwrap();
        assert!(items_for_day(&state, user, day).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_date_is_rejected() {
        let food = chicken();
        let state = AppState::in_memory(vec![food.clone()]);
        let err = log_food(
            &state,
            Uuid::new_v4(),
            request(&food, 100.0, Some("last tuesday")),
            OffsetDateTime::now_utc(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
    }
}
