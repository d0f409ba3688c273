//! Exercise activity thermogenesis (EAT)
//!
//! This module estimates the energy of logged walks and jogs:
//! - Gross energy from distance, body weight and a per-km cost
//! - Intensity scaling when distance is known
//! - Distance estimation from intensity and duration when it is not
//! - Net energy after removing the BMR share of the bout

use crate::constants::{finite_or_zero, round_half_up, round_kcal, UnitConstants};
use crate::schema::ActivityBundle;
use crate::types::{
    Activity, ActivityType, EatDetail, EatResult, EatSummary, Profile, DEFAULT_INTENSITY,
};

/// Minutes in a day, for the BMR share of a bout
const MINUTES_PER_DAY: f64 = 1440.0;

/// Lower bound of the intensity scale factor (walk and jog)
const MIN_INTENSITY_SCALE: f64 = 0.75;

/// Upper bound of the intensity scale factor for walking
const MAX_WALK_INTENSITY_SCALE: f64 = 1.30;

/// Upper bound of the intensity scale factor for jogging
const MAX_JOG_INTENSITY_SCALE: f64 = 1.35;

/// Walking speed range (km/h) mapped over intensity 0-100
const WALK_SPEED_KMH: (f64, f64) = (3.0, 6.0);

/// Jogging speed range (km/h) mapped over intensity 0-100
const JOG_SPEED_KMH: (f64, f64) = (6.0, 10.0);

/// Energy model selected for an activity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gait {
    Walk,
    Jog,
}

impl Gait {
    fn of(activity_type: &ActivityType) -> Self {
        match activity_type {
            ActivityType::Jog => Gait::Jog,
            // Unknown types use the walk model
            ActivityType::Walk | ActivityType::Other(_) => Gait::Walk,
        }
    }

    fn kcal_per_kg_per_km(self, constants: &UnitConstants) -> f64 {
        match self {
            Gait::Walk => constants.walk_kcal_per_kg_per_km,
            Gait::Jog => constants.run_kcal_per_kg_per_km,
        }
    }

    /// Linear in intensity, 1.0 at intensity 50
    fn intensity_scale(self, intensity: f64) -> f64 {
        match self {
            Gait::Walk => (1.0 + (intensity - 50.0) / 400.0)
                .clamp(MIN_INTENSITY_SCALE, MAX_WALK_INTENSITY_SCALE),
            Gait::Jog => (1.0 + (intensity - 50.0) / 300.0)
                .clamp(MIN_INTENSITY_SCALE, MAX_JOG_INTENSITY_SCALE),
        }
    }

    fn speed_kmh(self, intensity: f64) -> f64 {
        let (base, max) = match self {
            Gait::Walk => WALK_SPEED_KMH,
            Gait::Jog => JOG_SPEED_KMH,
        };
        base + (intensity / 100.0).clamp(0.0, 1.0) * (max - base)
    }
}

/// Unrounded energy of one bout
#[derive(Debug, Clone, Copy)]
struct BoutEnergy {
    distance_km: f64,
    distance_estimated: bool,
    gross: f64,
    bmr_share: f64,
}

impl BoutEnergy {
    fn to_result(self) -> EatResult {
        EatResult {
            gross: round_kcal(self.gross),
            net: net_from_gross_and_bmr(self.gross, self.bmr_share),
            bmr_share: round_kcal(self.bmr_share),
        }
    }
}

fn evaluate(
    gait: Gait,
    duration_min: f64,
    distance_km: Option<f64>,
    intensity: f64,
    weight_kg: f64,
    bmr: f64,
    constants: &UnitConstants,
) -> BoutEnergy {
    let duration_min = sanitize_non_negative(duration_min);
    let weight_kg = sanitize_non_negative(weight_kg);
    let bmr = sanitize_non_negative(bmr);
    let intensity = if intensity.is_finite() {
        intensity
    } else {
        DEFAULT_INTENSITY
    };
    let per_km = gait.kcal_per_kg_per_km(constants);

    let (distance_km, distance_estimated, gross) =
        match distance_km.filter(|d| d.is_finite() && *d >= 0.0) {
            Some(distance) => {
                let gross = distance * weight_kg * per_km * gait.intensity_scale(intensity);
                (distance, false, gross)
            }
            None => {
                // Intensity is already reflected in the estimated speed
                let distance = gait.speed_kmh(intensity) * duration_min / 60.0;
                (distance, true, distance * weight_kg * per_km)
            }
        };

    BoutEnergy {
        distance_km,
        distance_estimated,
        gross,
        bmr_share: bmr * (duration_min / MINUTES_PER_DAY),
    }
}

fn sanitize_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Net EAT: gross minus the BMR share, rounded, never negative
pub fn net_from_gross_and_bmr(gross: f64, bmr_share: f64) -> i64 {
    round_kcal(gross - bmr_share).max(0)
}

/// EAT of a walk
pub fn compute_eat_walk(
    duration_min: f64,
    distance_km: Option<f64>,
    intensity: f64,
    weight_kg: f64,
    bmr: f64,
    constants: &UnitConstants,
) -> EatResult {
    evaluate(
        Gait::Walk,
        duration_min,
        distance_km,
        intensity,
        weight_kg,
        bmr,
        constants,
    )
    .to_result()
}

/// EAT of a jog
pub fn compute_eat_jog(
    duration_min: f64,
    distance_km: Option<f64>,
    intensity: f64,
    weight_kg: f64,
    bmr: f64,
    constants: &UnitConstants,
) -> EatResult {
    evaluate(
        Gait::Jog,
        duration_min,
        distance_km,
        intensity,
        weight_kg,
        bmr,
        constants,
    )
    .to_result()
}

/// EAT of any logged activity, dispatched on its type
pub fn compute_eat(
    activity: &Activity,
    weight_kg: f64,
    bmr: f64,
    constants: &UnitConstants,
) -> EatResult {
    compute_eat_detail(activity, weight_kg, bmr, constants).into()
}

/// EAT of an activity, tagged with its id and type for display
pub fn compute_eat_detail(
    activity: &Activity,
    weight_kg: f64,
    bmr: f64,
    constants: &UnitConstants,
) -> EatDetail {
    let energy = evaluate(
        Gait::of(&activity.activity_type),
        activity.duration_min,
        activity.distance_km,
        activity.intensity,
        weight_kg,
        bmr,
        constants,
    );
    let result = energy.to_result();

    tracing::trace!(
        id = activity.id.as_deref().unwrap_or("-"),
        activity_type = activity.activity_type.as_str(),
        distance_km = energy.distance_km,
        estimated = energy.distance_estimated,
        gross = result.gross,
        net = result.net,
        "evaluated activity"
    );

    EatDetail {
        id: activity.id.clone(),
        activity_type: activity.activity_type.clone(),
        distance_km: round_half_up(energy.distance_km * 100.0) / 100.0,
        distance_estimated: energy.distance_estimated,
        gross: result.gross,
        net: result.net,
        bmr_share: result.bmr_share,
    }
}

impl From<EatDetail> for EatResult {
    fn from(detail: EatDetail) -> Self {
        EatResult {
            gross: detail.gross,
            net: detail.net,
            bmr_share: detail.bmr_share,
        }
    }
}

/// Sum EAT across activities
pub fn sum_eat(
    activities: &[Activity],
    weight_kg: f64,
    bmr: f64,
    constants: &UnitConstants,
) -> EatSummary {
    let details: Vec<EatDetail> = activities
        .iter()
        .map(|a| compute_eat_detail(a, weight_kg, bmr, constants))
        .collect();

    EatSummary {
        total_gross: details.iter().map(|d| d.gross).sum(),
        total_net: details.iter().map(|d| d.net).sum(),
        total_bmr_share: details.iter().map(|d| d.bmr_share).sum(),
        details,
    }
}

/// Sum EAT for a parsed activity list.
///
/// A profile wrapped with the activities takes precedence over `profile`,
/// field by field, for weight, BMR and the unit constant overrides.
pub fn sum_eat_bundle(bundle: &ActivityBundle, profile: &Profile) -> EatSummary {
    let effective = match &bundle.profile {
        Some(wrapped) => overlay_profile(profile, wrapped),
        None => profile.clone(),
    };
    let constants = UnitConstants::resolve(Some(&effective));

    sum_eat(
        &bundle.activities,
        finite_or_zero(effective.weight_kg),
        finite_or_zero(effective.bmr),
        &constants,
    )
}

fn overlay_profile(base: &Profile, wrapped: &Profile) -> Profile {
    fn pick(wrapped: Option<f64>, base: Option<f64>) -> Option<f64> {
        wrapped.filter(|v| v.is_finite()).or(base)
    }

    Profile {
        bmr: pick(wrapped.bmr, base.bmr),
        weight_kg: pick(wrapped.weight_kg, base.weight_kg),
        walk_kcal_per_kg_per_km: pick(wrapped.walk_kcal_per_kg_per_km, base.walk_kcal_per_kg_per_km),
        run_kcal_per_kg_per_km: pick(wrapped.run_kcal_per_kg_per_km, base.run_kcal_per_kg_per_km),
        step_kcal_const: pick(wrapped.step_kcal_const, base.step_kcal_const),
        default_tef_ratio: pick(wrapped.default_tef_ratio, base.default_tef_ratio),
        ..base.clone()
    }
}
