//! Core types for the Synheart Balance engine
//!
//! This module defines the typed records that flow through the engine: the
//! caller-owned inputs (profile, activities, survey, meals, day record) and the
//! derived outputs of each stage (EAT, NEAT, activity factor, TDEE, meal totals).
//!
//! All output records serialize in camelCase, which is the shape consumed by
//! the day-log and trends views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of logged exercise bout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    #[default]
    Walk,
    Jog,
    /// Any other label; modelled as a walk
    #[serde(untagged)]
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::Walk => "walk",
            ActivityType::Jog => "jog",
            ActivityType::Other(name) => name.as_str(),
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "walk" | "" => ActivityType::Walk,
            "jog" => ActivityType::Jog,
            other => ActivityType::Other(other.to_string()),
        }
    }
}

/// Where a day's activity factor comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityMode {
    /// Use the day's manually entered activity factor
    #[default]
    Manual,
    /// Derive the factor from steps and survey only
    AdvancedNeat,
    /// Derive the factor from steps, survey and logged activities
    AdvancedFull,
}

impl ActivityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityMode::Manual => "manual",
            ActivityMode::AdvancedNeat => "advanced_neat",
            ActivityMode::AdvancedFull => "advanced_full",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().replace('-', "_").as_str() {
            "advanced_neat" | "advancedneat" => ActivityMode::AdvancedNeat,
            "advanced_full" | "advancedfull" | "advanced" => ActivityMode::AdvancedFull,
            _ => ActivityMode::Manual,
        }
    }

    pub fn is_advanced(&self) -> bool {
        !matches!(self, ActivityMode::Manual)
    }
}

/// Meal category used for intake totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Lunch,
    Dinner,
    /// Folds together `extra`, `extras` and `snack`
    #[serde(alias = "extra", alias = "snack")]
    Extras,
    /// Unrecognised label; counts toward the grand total only
    #[serde(untagged)]
    Other(String),
}

impl MealType {
    pub fn as_str(&self) -> &str {
        match self {
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Extras => "extras",
            MealType::Other(name) => name.as_str(),
        }
    }

    /// Case-insensitive label lookup
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            "extra" | "extras" | "snack" => MealType::Extras,
            other => MealType::Other(other.to_string()),
        }
    }
}

/// Physiological and goal settings for one user
///
/// Every field is optional: the engine treats an unset value as zero or as the
/// documented default of the stage that consumes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Basal metabolic rate (kcal/day)
    pub bmr: Option<f64>,
    /// Body weight (kg)
    pub weight_kg: Option<f64>,
    /// Activity factor used when a day has none (typically 1.0-2.5)
    pub default_activity_factor: Option<f64>,
    /// Daily intake goal (kcal)
    pub daily_kcal_target: Option<f64>,
    /// Override for walking cost (kcal per kg per km)
    pub walk_kcal_per_kg_per_km: Option<f64>,
    /// Override for running cost (kcal per kg per km)
    pub run_kcal_per_kg_per_km: Option<f64>,
    /// Override for the per-step cost (kcal per step per kg)
    pub step_kcal_const: Option<f64>,
    /// Override for the thermic effect of food ratio
    pub default_tef_ratio: Option<f64>,
}

/// One logged exercise bout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Duration (minutes, >= 0)
    pub duration_min: f64,
    /// Distance (km); `None` triggers distance estimation from intensity
    pub distance_km: Option<f64>,
    /// Perceived intensity (0-100)
    pub intensity: f64,
    pub notes: Option<String>,
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            id: None,
            activity_type: ActivityType::Walk,
            duration_min: 0.0,
            distance_km: None,
            intensity: DEFAULT_INTENSITY,
            notes: None,
        }
    }
}

/// Intensity assumed when an activity does not carry one
pub const DEFAULT_INTENSITY: f64 = 50.0;

/// Subjective NEAT signal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    /// Self-rated daily movement (0-100)
    pub subjective: f64,
    /// Hours spent standing
    pub standing_hours: f64,
    /// Walked or cycled to work
    pub active_commute: bool,
}

/// One food log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    pub meal_type: MealType,
    pub quantity: Option<f64>,
    pub kcal_per_unit: Option<f64>,
    /// Precomputed total; takes precedence over quantity x kcal_per_unit
    pub total_kcal: Option<f64>,
}

impl MealEntry {
    /// Energy of this entry; 0 when neither form is usable
    pub fn kcal(&self) -> f64 {
        if let Some(total) = self.total_kcal.filter(|v| v.is_finite()) {
            return total;
        }
        match (self.quantity, self.kcal_per_unit) {
            (Some(q), Some(k)) if (q * k).is_finite() => q * k,
            _ => 0.0,
        }
    }
}

/// Everything logged for one calendar day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub date: Option<NaiveDate>,
    pub activities: Vec<Activity>,
    pub steps: Option<f64>,
    pub survey: Option<Survey>,
    pub meals: Vec<MealEntry>,
    /// Manually entered activity factor (manual mode)
    pub activity_factor: Option<f64>,
    pub activity_mode: ActivityMode,
    /// BMR captured when the day was logged; wins over the profile BMR
    pub bmr_snapshot: Option<f64>,
    /// Legacy manual workout energy (manual mode only)
    pub workout_calories: Option<f64>,
    /// Legacy multiplier for `workout_calories`
    pub intensity_factor: Option<f64>,
}

/// Energy of a single activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EatResult {
    /// Total energy of the bout (kcal)
    pub gross: i64,
    /// Gross minus the BMR share, never negative (kcal)
    pub net: i64,
    /// BMR that would have been burned anyway during the bout (kcal)
    pub bmr_share: i64,
}

/// Per-activity record for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EatDetail {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Distance used for the estimate (km)
    pub distance_km: f64,
    /// Whether `distance_km` was estimated from intensity and duration
    pub distance_estimated: bool,
    pub gross: i64,
    pub net: i64,
    pub bmr_share: i64,
}

/// Aggregate EAT over a list of activities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EatSummary {
    pub total_gross: i64,
    pub total_net: i64,
    pub total_bmr_share: i64,
    pub details: Vec<EatDetail>,
}

/// NEAT estimate with the partial estimates it was blended from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeatEstimate {
    pub neat: i64,
    pub from_steps: Option<i64>,
    pub from_survey: Option<i64>,
}

/// Output of the advanced activity factor composer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedActivityFactor {
    /// (bmr + neat + eat) / bmr, 3 decimals
    pub af_advanced: f64,
    pub neat: i64,
    pub eat: i64,
    pub maintenance_plus_activity: i64,
    pub eat_details: Vec<EatDetail>,
}

/// Output of the TDEE composer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TdeeResult {
    pub maintenance_plus_activity: i64,
    pub tef: i64,
    pub tdee: i64,
}

/// Full TDEE decomposition for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TdeeBreakdown {
    pub bmr: i64,
    pub af_computed: f64,
    pub neat: i64,
    pub eat: i64,
    pub maintenance_plus_activity: i64,
    pub tef: i64,
    pub tdee: i64,
}

/// Intake grouped by meal category (kcal)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealTotals {
    pub lunch: i64,
    pub dinner: i64,
    pub extras: i64,
    pub total: i64,
}

/// Derived stats for one day record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDerived {
    pub date: Option<NaiveDate>,
    pub activity_mode: ActivityMode,
    pub tdee: i64,
    pub total_intake: i64,
    /// Intake minus TDEE; positive is a surplus
    pub net_kcal: i64,
    pub tdee_breakdown: TdeeBreakdown,
    pub meals: MealTotals,
    pub eat_details: Vec<EatDetail>,
    /// Target minus intake, when the profile sets a target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kcal_target_remaining: Option<i64>,
    /// Legacy manual workout energy; informational, never part of TDEE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_workout_kcal: Option<i64>,
}

/// One point of a trends series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: Option<NaiveDate>,
    pub tdee: i64,
    pub total_intake: i64,
    pub net_kcal: i64,
    pub activity_mode: ActivityMode,
}

/// Aggregate over a range of days
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSummary {
    pub days: u32,
    pub days_with_intake: u32,
    pub avg_tdee: i64,
    pub avg_intake: i64,
    pub avg_net_kcal: i64,
    pub total_net_kcal: i64,
    pub points: Vec<TrendPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_labels_fold_case_insensitively() {
        assert_eq!(MealType::from_label("LUNCH"), MealType::Lunch);
        assert_eq!(MealType::from_label("Snack"), MealType::Extras);
        assert_eq!(MealType::from_label("extra"), MealType::Extras);
        assert_eq!(MealType::from_label(" Extras "), MealType::Extras);
        assert_eq!(
            MealType::from_label("breakfast"),
            MealType::Other("breakfast".to_string())
        );
    }

    #[test]
    fn test_activity_type_unknown_label_is_kept() {
        assert_eq!(ActivityType::from_label("Jog"), ActivityType::Jog);
        assert_eq!(
            ActivityType::from_label("swim"),
            ActivityType::Other("swim".to_string())
        );
        assert_eq!(ActivityType::from_label("swim").as_str(), "swim");
    }

    #[test]
    fn test_activity_type_defaults_to_walk() {
        assert_eq!(ActivityType::default(), ActivityType::Walk);
        assert_eq!(ActivityType::from_label(""), ActivityType::Walk);
    }

    #[test]
    fn test_activity_mode_labels() {
        assert_eq!(ActivityMode::from_label("advanced_full"), ActivityMode::AdvancedFull);
        assert_eq!(ActivityMode::from_label("advanced-neat"), ActivityMode::AdvancedNeat);
        assert_eq!(ActivityMode::from_label("advancedNeat"), ActivityMode::AdvancedNeat);
        assert_eq!(ActivityMode::from_label("bogus"), ActivityMode::Manual);
        assert!(!ActivityMode::Manual.is_advanced());
    }

    #[test]
    fn test_meal_entry_kcal_fallback() {
        let entry = MealEntry {
            meal_type: MealType::Lunch,
            quantity: Some(2.0),
            kcal_per_unit: Some(150.0),
            total_kcal: None,
        };
        assert_eq!(entry.kcal(), 300.0);

        let precomputed = MealEntry {
            total_kcal: Some(420.0),
            ..entry.clone()
        };
        assert_eq!(precomputed.kcal(), 420.0);

        let broken = MealEntry {
            quantity: None,
            total_kcal: Some(f64::NAN),
            ..entry
        };
        assert_eq!(broken.kcal(), 0.0);
    }

    #[test]
    fn test_output_serializes_camel_case() {
        let totals = MealTotals {
            lunch: 500,
            dinner: 0,
            extras: 120,
            total: 620,
        };
        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["extras"], 120);

        let result = EatResult {
            gross: 125,
            net: 88,
            bmr_share: 38,
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["bmrShare"], 38);
    }
}
