//! Unit constants and rounding conventions
//!
//! Physiological tunables used by the energy models, resolved per profile:
//! - walking / running cost (kcal per kg per km)
//! - step cost (kcal per step per kg)
//! - thermic effect of food ratio
//!
//! Rounding follows one convention everywhere: half-way values round toward
//! positive infinity, applied only where a stage returns a value.

use serde::{Deserialize, Serialize};

use crate::types::Profile;

/// Default walking cost (kcal per kg per km)
pub const DEFAULT_WALK_KCAL_PER_KG_PER_KM: f64 = 0.78;

/// Default running cost (kcal per kg per km)
pub const DEFAULT_RUN_KCAL_PER_KG_PER_KM: f64 = 1.00;

/// Default step cost (kcal per step per kg)
pub const DEFAULT_STEP_KCAL_CONST: f64 = 0.00057;

/// Default thermic effect of food as a fraction of intake
pub const DEFAULT_TEF_RATIO: f64 = 0.10;

/// Resolved physiological constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitConstants {
    pub walk_kcal_per_kg_per_km: f64,
    pub run_kcal_per_kg_per_km: f64,
    pub step_kcal_const: f64,
    pub default_tef_ratio: f64,
}

impl Default for UnitConstants {
    fn default() -> Self {
        Self {
            walk_kcal_per_kg_per_km: DEFAULT_WALK_KCAL_PER_KG_PER_KM,
            run_kcal_per_kg_per_km: DEFAULT_RUN_KCAL_PER_KG_PER_KM,
            step_kcal_const: DEFAULT_STEP_KCAL_CONST,
            default_tef_ratio: DEFAULT_TEF_RATIO,
        }
    }
}

impl UnitConstants {
    /// Resolve constants for a profile. Overrides that are unset or not
    /// finite fall back to the defaults.
    pub fn resolve(profile: Option<&Profile>) -> Self {
        let defaults = Self::default();
        let Some(profile) = profile else {
            return defaults;
        };

        Self {
            walk_kcal_per_kg_per_km: finite_or(
                profile.walk_kcal_per_kg_per_km,
                defaults.walk_kcal_per_kg_per_km,
            ),
            run_kcal_per_kg_per_km: finite_or(
                profile.run_kcal_per_kg_per_km,
                defaults.run_kcal_per_kg_per_km,
            ),
            step_kcal_const: finite_or(profile.step_kcal_const, defaults.step_kcal_const),
            default_tef_ratio: finite_or(profile.default_tef_ratio, defaults.default_tef_ratio),
        }
    }
}

/// `Some(finite)` or the fallback
pub fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

/// Unset or non-finite values become 0
pub fn finite_or_zero(value: Option<f64>) -> f64 {
    finite_or(value, 0.0)
}

/// Round half-way values toward positive infinity (-2.5 -> -2, 2.5 -> 3).
/// Non-finite input rounds to 0.
pub fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to whole kcal
pub fn round_kcal(value: f64) -> i64 {
    round_half_up(value) as i64
}

/// Round to a fixed number of decimals with the same half-way rule
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}
