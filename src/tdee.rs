//! TDEE composition
//!
//! The single place where the final expenditure number is formed, whatever
//! produced the activity factor (manual, NEAT-only or full advanced):
//!
//! `tdee = round(bmr * activity_factor) + round(intake * tef_ratio)`

use crate::constants::{finite_or, finite_or_zero, round_kcal, DEFAULT_TEF_RATIO};
use crate::types::TdeeResult;

/// Inputs to the TDEE composer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TdeeInput {
    pub bmr: f64,
    pub activity_factor: f64,
    pub intake_kcal: f64,
    /// Falls back to the default TEF ratio when unset or not finite
    pub tef_ratio: Option<f64>,
}

/// Compose TDEE from an activity factor and the thermic effect of food
pub fn compute_tdee_from_af_and_tef(input: &TdeeInput) -> TdeeResult {
    let bmr = finite_or_zero(Some(input.bmr));
    let activity_factor = finite_or_zero(Some(input.activity_factor));
    let intake = finite_or_zero(Some(input.intake_kcal));
    let tef_ratio = finite_or(input.tef_ratio, DEFAULT_TEF_RATIO);

    let maintenance_plus_activity = round_kcal(bmr * activity_factor);
    let tef = round_kcal(intake * tef_ratio);

    TdeeResult {
        maintenance_plus_activity,
        tef,
        tdee: maintenance_plus_activity + tef,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tdee_composition() {
        let result = compute_tdee_from_af_and_tef(&TdeeInput {
            bmr: 1800.0,
            activity_factor: 1.2,
            intake_kcal: 2000.0,
            tef_ratio: None,
        });

        assert_eq!(result.maintenance_plus_activity, 2160);
        assert_eq!(result.tef, 200);
        assert_eq!(result.tdee, 2360);
    }

    #[test]
    fn test_tef_override() {
        let result = compute_tdee_from_af_and_tef(&TdeeInput {
            bmr: 1800.0,
            activity_factor: 1.0,
            intake_kcal: 2000.0,
            tef_ratio: Some(0.08),
        });
        assert_eq!(result.tef, 160);

        let fallback = compute_tdee_from_af_and_tef(&TdeeInput {
            bmr: 1800.0,
            activity_factor: 1.0,
            intake_kcal: 2000.0,
            tef_ratio: Some(f64::NAN),
        });
        assert_eq!(fallback.tef, 200);
    }

    #[test]
    fn test_zero_intake_means_no_tef() {
        for (bmr, af) in [(1800.0, 1.0), (1650.0, 1.375), (2100.0, 1.725), (1234.0, 2.5)] {
            let result = compute_tdee_from_af_and_tef(&TdeeInput {
                bmr,
                activity_factor: af,
                intake_kcal: 0.0,
                tef_ratio: None,
            });
            assert_eq!(result.tef, 0);
            assert_eq!(result.tdee, round_kcal(bmr * af));
            assert_eq!(result.maintenance_plus_activity, round_kcal(bmr * af));
        }
    }

    #[test]
    fn test_malformed_input_is_zero() {
        let result = compute_tdee_from_af_and_tef(&TdeeInput {
            bmr: f64::NAN,
            activity_factor: 1.5,
            intake_kcal: f64::INFINITY,
            tef_ratio: None,
        });
        assert_eq!(result, TdeeResult::default());
    }
}
