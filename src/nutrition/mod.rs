//! Pure macro arithmetic: scaling, totals and adherence.

pub mod calculator;
pub mod progress;
pub mod targets;
pub mod types;

pub use calculator::{daily_totals, scale};
pub use progress::daily_progress;
pub use targets::{composition, CalorieSplit, MacroComposition};
pub use types::{DailyProgress, FoodItem, FoodProfile, LoggedQuantity, MacroTargets, MacroValues};
