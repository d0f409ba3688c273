//! Day derived-stats orchestration
//!
//! This module provides the public API for Synheart Balance. For one day
//! record and a profile it:
//! 1. Resolves the activity factor (manual, NEAT-only or full advanced)
//! 2. Totals the day's intake
//! 3. Composes TDEE from the factor and the thermic effect of food
//! 4. Reports the net balance (intake minus TDEE) and the full breakdown
//!
//! Only this module branches on [`ActivityMode`]; every stage it calls is a
//! mode-agnostic pure function.

use crate::activity_factor::{
    compute_advanced_activity_factor, AdvancedAfInput, NEUTRAL_ACTIVITY_FACTOR,
};
use crate::constants::{round_kcal, UnitConstants};
use crate::error::ComputeError;
use crate::meals::compute_day_meal_totals;
use crate::schema::{parse_day_documents, parse_day_record, parse_json, parse_profile};
use crate::tdee::{compute_tdee_from_af_and_tef, TdeeInput};
use crate::trends::summarize_range;
use crate::types::{
    Activity, ActivityMode, DayDerived, DayRecord, Profile, RangeSummary, TdeeBreakdown,
};

/// Compute derived stats for one day.
///
/// # Example
/// ```ignore
/// let derived = compute_day_derived(&day, &profile);
/// println!("{} kcal net", derived.net_kcal);
/// ```
pub fn compute_day_derived(day: &DayRecord, profile: &Profile) -> DayDerived {
    let constants = UnitConstants::resolve(Some(profile));
    derive_day(day, profile, &constants)
}

/// Convert a day record JSON and profile JSON into derived-stats JSON.
///
/// # Arguments
/// * `day_json` - Day record (lenient shape, see [`crate::schema`])
/// * `profile_json` - Profile settings
///
/// # Returns
/// Serialized [`DayDerived`]. Fails only on invalid JSON syntax.
pub fn day_to_derived_json(day_json: String, profile_json: String) -> Result<String, ComputeError> {
    let processor = DayProcessor::from_json(&profile_json)?;
    processor.process_json(&day_json)
}

/// Convert a document of day records into a range summary JSON.
///
/// Accepts every document shape understood by
/// [`crate::schema::split_day_documents`].
pub fn range_to_summary_json(days_json: String, profile_json: String) -> Result<String, ComputeError> {
    let processor = DayProcessor::from_json(&profile_json)?;
    let days = parse_day_documents(&days_json)?;
    let summary = processor.process_range(&days);
    serde_json::to_string(&summary).map_err(|e| ComputeError::EncodingError(e.to_string()))
}

/// Effective BMR: the day's snapshot when usable, else the profile's
fn effective_bmr(day: &DayRecord, profile: &Profile) -> Option<f64> {
    day.bmr_snapshot
        .filter(|b| b.is_finite() && *b > 0.0)
        .or(profile.bmr.filter(|b| b.is_finite()))
}

/// Manual-mode factor: the day's, else the profile default, else neutral
fn manual_activity_factor(day: &DayRecord, profile: &Profile) -> f64 {
    day.activity_factor
        .filter(|af| af.is_finite() && *af > 0.0)
        .or(profile
            .default_activity_factor
            .filter(|af| af.is_finite() && *af > 0.0))
        .unwrap_or(NEUTRAL_ACTIVITY_FACTOR)
}

/// Legacy manual workout energy, reported alongside manual-mode days
fn legacy_workout_kcal(day: &DayRecord) -> Option<i64> {
    let calories = day.workout_calories.filter(|c| c.is_finite())?;
    let factor = day
        .intensity_factor
        .filter(|f| f.is_finite())
        .unwrap_or(1.0);
    Some(round_kcal(calories * factor))
}

fn derive_day(day: &DayRecord, profile: &Profile, constants: &UnitConstants) -> DayDerived {
    let bmr = effective_bmr(day, profile);
    let bmr_value = bmr.unwrap_or(0.0);

    let meals = compute_day_meal_totals(&day.meals);
    let intake = meals.total;

    let (activity_factor, neat, eat, eat_details) = match day.activity_mode {
        ActivityMode::Manual => (manual_activity_factor(day, profile), 0, 0, Vec::new()),
        ActivityMode::AdvancedNeat | ActivityMode::AdvancedFull => {
            let activities: &[Activity] = if day.activity_mode == ActivityMode::AdvancedFull {
                day.activities.as_slice()
            } else {
                &[]
            };
            let advanced = compute_advanced_activity_factor(&AdvancedAfInput {
                bmr,
                weight_kg: profile.weight_kg,
                activities,
                steps: day.steps,
                survey: day.survey.as_ref(),
                constants,
            });
            (
                advanced.af_advanced,
                advanced.neat,
                advanced.eat,
                advanced.eat_details,
            )
        }
    };

    let tdee = compute_tdee_from_af_and_tef(&TdeeInput {
        bmr: bmr_value,
        activity_factor,
        intake_kcal: intake as f64,
        tef_ratio: Some(constants.default_tef_ratio),
    });

    let net_kcal = intake - tdee.tdee;
    let kcal_target_remaining = profile
        .daily_kcal_target
        .filter(|t| t.is_finite())
        .map(|target| round_kcal(target - intake as f64));
    let manual_workout_kcal = match day.activity_mode {
        ActivityMode::Manual => legacy_workout_kcal(day),
        _ => None,
    };

    tracing::debug!(
        date = ?day.date,
        mode = day.activity_mode.as_str(),
        bmr = bmr_value,
        activity_factor,
        intake,
        tdee = tdee.tdee,
        net_kcal,
        "derived day"
    );

    DayDerived {
        date: day.date,
        activity_mode: day.activity_mode,
        tdee: tdee.tdee,
        total_intake: intake,
        net_kcal,
        tdee_breakdown: TdeeBreakdown {
            bmr: round_kcal(bmr_value),
            af_computed: activity_factor,
            neat,
            eat,
            maintenance_plus_activity: tdee.maintenance_plus_activity,
            tef: tdee.tef,
            tdee: tdee.tdee,
        },
        meals,
        eat_details,
        kcal_target_remaining,
        manual_workout_kcal,
    }
}

/// Processor bound to one profile.
///
/// Resolves the profile's unit constants once and reuses them for every day.
/// It holds no mutable state: processing the same day twice yields identical
/// output.
#[derive(Debug, Clone)]
pub struct DayProcessor {
    profile: Profile,
    constants: UnitConstants,
}

impl Default for DayProcessor {
    fn default() -> Self {
        Self::new(Profile::default())
    }
}

impl DayProcessor {
    /// Create a processor for a profile
    pub fn new(profile: Profile) -> Self {
        let constants = UnitConstants::resolve(Some(&profile));
        Self { profile, constants }
    }

    /// Create a processor from profile JSON
    pub fn from_json(profile_json: &str) -> Result<Self, ComputeError> {
        Ok(Self::new(parse_profile(&parse_json(profile_json)?)))
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn constants(&self) -> &UnitConstants {
        &self.constants
    }

    /// Derived stats for one day
    pub fn process(&self, day: &DayRecord) -> DayDerived {
        derive_day(day, &self.profile, &self.constants)
    }

    /// Derived stats for many days, summarized as a trends series
    pub fn process_range(&self, days: &[DayRecord]) -> RangeSummary {
        let derived: Vec<DayDerived> = days.iter().map(|day| self.process(day)).collect();
        let summary = summarize_range(&derived);
        tracing::debug!(
            days = summary.days,
            avg_tdee = summary.avg_tdee,
            total_net_kcal = summary.total_net_kcal,
            "summarized range"
        );
        summary
    }

    /// Derived stats for one day record given as JSON
    pub fn process_json(&self, day_json: &str) -> Result<String, ComputeError> {
        let day = parse_day_record(&parse_json(day_json)?);
        serde_json::to_string(&self.process(&day))
            .map_err(|e| ComputeError::EncodingError(e.to_string()))
    }
}
