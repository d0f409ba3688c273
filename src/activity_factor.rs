//! Advanced activity factor
//!
//! Combines BMR, NEAT and net EAT into an activity factor and a
//! maintenance-plus-activity figure. Legacy manual workout fields are not
//! inputs here and cannot affect the result.

use crate::constants::{finite_or_zero, round_kcal, round_to, UnitConstants};
use crate::eat::sum_eat;
use crate::neat::estimate_neat;
use crate::types::{Activity, AdvancedActivityFactor, Survey};

/// Factor reported when BMR is unknown or zero
pub const NEUTRAL_ACTIVITY_FACTOR: f64 = 1.0;

/// Inputs to the advanced activity factor
#[derive(Debug, Clone, Copy)]
pub struct AdvancedAfInput<'a> {
    pub bmr: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activities: &'a [Activity],
    pub steps: Option<f64>,
    pub survey: Option<&'a Survey>,
    pub constants: &'a UnitConstants,
}

/// Compute the advanced activity factor
pub fn compute_advanced_activity_factor(input: &AdvancedAfInput<'_>) -> AdvancedActivityFactor {
    let bmr = finite_or_zero(input.bmr);
    let weight_kg = finite_or_zero(input.weight_kg);

    let eat = sum_eat(input.activities, weight_kg, bmr, input.constants);
    let neat = estimate_neat(
        input.steps,
        input.weight_kg,
        input.survey,
        input.bmr,
        input.constants,
    );

    let expenditure = bmr + neat.neat as f64 + eat.total_net as f64;
    let af_advanced = if bmr > 0.0 {
        round_to(expenditure / bmr, 3)
    } else {
        NEUTRAL_ACTIVITY_FACTOR
    };

    AdvancedActivityFactor {
        af_advanced,
        neat: neat.neat,
        eat: eat.total_net,
        maintenance_plus_activity: round_kcal(expenditure),
        eat_details: eat.details,
    }
}
