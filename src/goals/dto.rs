use serde::Deserialize;

use crate::error::TrackerError;
use crate::nutrition::MacroTargets;

/// Body of a goal write. All four targets are required; a missing one is
/// rejected rather than filled in from the stored goal.
#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub calories_target: Option<f64>,
    pub protein_target: Option<f64>,
    pub carbs_target: Option<f64>,
    pub fat_target: Option<f64>,
}

fn required(name: &str, value: Option<f64>) -> Result<f64, TrackerError> {
    value.ok_or_else(|| TrackerError::invalid(format!("{name} is required")))
}

impl TryFrom<GoalRequest> for MacroTargets {
    type Error = TrackerError;

    fn try_from(r: GoalRequest) -> Result<Self, Self::Error> {
        let targets = MacroTargets {
            calories_target: required("calories_target", r.calories_target)?,
            protein_target: required("protein_target", r.protein_target)?,
            carbs_target: required("carbs_target", r.carbs_target)?,
            fat_target: required("fat_target", r.fat_target)?,
        };
        targets.validate()?;
        Ok(targets)
    }
}
