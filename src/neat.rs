//! Non-exercise activity thermogenesis (NEAT)
//!
//! Two independent estimates, blended when both are available:
//! - From steps: step count x per-step cost x body weight
//! - From survey: a percentage of BMR chosen from subjective movement,
//!   standing hours and commute

use crate::constants::{round_kcal, UnitConstants};
use crate::types::{NeatEstimate, Survey};

/// Weight of the step-based estimate in the blend
const STEPS_BLEND_WEIGHT: f64 = 0.75;

/// Weight of the survey-based estimate in the blend
const SURVEY_BLEND_WEIGHT: f64 = 0.25;

/// Bounds of the survey percentage of BMR
const MIN_SURVEY_FRACTION: f64 = 0.03;
const MAX_SURVEY_FRACTION: f64 = 0.50;

/// NEAT from a step count; needs both steps and weight
pub fn neat_from_steps(
    steps: Option<f64>,
    weight_kg: Option<f64>,
    constants: &UnitConstants,
) -> Option<i64> {
    let steps = steps.filter(|s| s.is_finite())?;
    let weight_kg = weight_kg.filter(|w| w.is_finite())?;
    Some(round_kcal(steps * constants.step_kcal_const * weight_kg))
}

/// Fraction of BMR attributed to NEAT by the survey
pub fn survey_neat_fraction(survey: &Survey) -> f64 {
    let subjective = if survey.subjective.is_finite() {
        survey.subjective
    } else {
        0.0
    };

    let base: f64 = if subjective <= 20.0 {
        0.06
    } else if subjective <= 40.0 {
        0.09
    } else if subjective <= 60.0 {
        0.13
    } else if subjective <= 80.0 {
        0.20
    } else {
        0.30
    };

    let standing = if survey.standing_hours >= 5.0 {
        0.03
    } else if survey.standing_hours >= 2.0 {
        0.01
    } else {
        0.0
    };

    let commute = if survey.active_commute { 0.02 } else { 0.0 };

    (base + standing + commute).clamp(MIN_SURVEY_FRACTION, MAX_SURVEY_FRACTION)
}

/// NEAT from the survey; needs both a survey and BMR
pub fn neat_from_survey(survey: Option<&Survey>, bmr: Option<f64>) -> Option<i64> {
    let survey = survey?;
    let bmr = bmr.filter(|b| b.is_finite())?;
    Some(round_kcal(survey_neat_fraction(survey) * bmr))
}

/// Blend the step and survey estimates
pub fn estimate_neat(
    steps: Option<f64>,
    weight_kg: Option<f64>,
    survey: Option<&Survey>,
    bmr: Option<f64>,
    constants: &UnitConstants,
) -> NeatEstimate {
    let from_steps = neat_from_steps(steps, weight_kg, constants);
    let from_survey = neat_from_survey(survey, bmr);

    let neat = match (from_steps, from_survey) {
        (Some(s), Some(v)) => {
            round_kcal(STEPS_BLEND_WEIGHT * s as f64 + SURVEY_BLEND_WEIGHT * v as f64)
        }
        (Some(s), None) => s,
        (None, Some(v)) => v,
        (None, None) => 0,
    };

    NeatEstimate {
        neat,
        from_steps,
        from_survey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_survey(subjective: f64, standing_hours: f64, active_commute: bool) -> Survey {
        Survey {
            subjective,
            standing_hours,
            active_commute,
        }
    }

    #[test]
    fn test_neat_from_steps() {
        let constants = UnitConstants::default();
        // 3000 * 0.00057 * 80 = 136.8
        assert_eq!(neat_from_steps(Some(3000.0), Some(80.0), &constants), Some(137));
        assert_eq!(neat_from_steps(None, Some(80.0), &constants), None);
        assert_eq!(neat_from_steps(Some(3000.0), None, &constants), None);
    }

    #[test]
    fn test_survey_step_function() {
        let cases = [
            (0.0, 0.06),
            (20.0, 0.06),
            (21.0, 0.09),
            (40.0, 0.09),
            (60.0, 0.13),
            (80.0, 0.20),
            (81.0, 0.30),
            (100.0, 0.30),
        ];
        for (subjective, expected) in cases {
            let fraction = survey_neat_fraction(&make_survey(subjective, 0.0, false));
            assert!((fraction - expected).abs() < 1e-12, "subjective {subjective}");
        }
    }

    #[test]
    fn test_survey_bonuses() {
        let standing_long = survey_neat_fraction(&make_survey(10.0, 5.0, false));
        assert!((standing_long - 0.09).abs() < 1e-12);

        let standing_some = survey_neat_fraction(&make_survey(10.0, 2.0, false));
        assert!((standing_some - 0.07).abs() < 1e-12);

        let everything = survey_neat_fraction(&make_survey(90.0, 6.0, true));
        assert!((everything - 0.35).abs() < 1e-12);
        assert!(everything <= MAX_SURVEY_FRACTION);
    }

    #[test]
    fn test_survey_fraction_stays_within_bounds() {
        for subjective in [f64::NAN, -10.0, 0.0, 50.0, 100.0, 250.0] {
            for standing in [0.0, 2.0, 5.0, 12.0] {
                for commute in [false, true] {
                    let fraction = survey_neat_fraction(&make_survey(subjective, standing, commute));
                    assert!((MIN_SURVEY_FRACTION..=MAX_SURVEY_FRACTION).contains(&fraction));
                }
            }
        }
    }

    #[test]
    fn test_neat_from_survey() {
        assert_eq!(neat_from_survey(Some(&make_survey(60.0, 0.0, false)), Some(1800.0)), Some(234));
        assert_eq!(neat_from_survey(Some(&make_survey(90.0, 6.0, true)), Some(1800.0)), Some(630));
        assert_eq!(neat_from_survey(Some(&make_survey(60.0, 0.0, false)), None), None);
        assert_eq!(neat_from_survey(None, Some(1800.0)), None);
    }

    #[test]
    fn test_blend_when_both_present() {
        let survey = make_survey(60.0, 0.0, false);
        let estimate = estimate_neat(
            Some(3000.0),
            Some(80.0),
            Some(&survey),
            Some(1800.0),
            &UnitConstants::default(),
        );

        assert_eq!(estimate.from_steps, Some(137));
        assert_eq!(estimate.from_survey, Some(234));
        // 0.75 * 137 + 0.25 * 234 = 161.25
        assert_eq!(estimate.neat, 161);
    }

    #[test]
    fn test_single_source_used_exactly() {
        let constants = UnitConstants::default();
        let steps_only = estimate_neat(Some(3000.0), Some(80.0), None, Some(1800.0), &constants);
        assert_eq!(steps_only.neat, 137);

        let survey = make_survey(60.0, 0.0, false);
        let survey_only = estimate_neat(None, Some(80.0), Some(&survey), Some(1800.0), &constants);
        assert_eq!(survey_only.neat, 234);
    }

    #[test]
    fn test_no_sources() {
        let estimate = estimate_neat(None, None, None, None, &UnitConstants::default());
        assert_eq!(estimate, NeatEstimate::default());
    }
}
