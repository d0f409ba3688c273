//! Synheart Balance - Deterministic energy-balance engine
//!
//! Balance turns a day's logged activities, steps, survey answers and meals
//! into a Total Daily Energy Expenditure decomposition and a net calorie
//! balance through a chain of pure stages: unit constants → EAT / NEAT →
//! activity factor → TDEE (with TEF) → net balance.
//!
//! ## Modules
//!
//! - **Calculation core**: `constants`, `eat`, `neat`, `activity_factor`,
//!   `tdee`, `meals` (pure functions, never fail)
//! - **Orchestration**: `pipeline` (per-day facade), `trends` (date ranges)
//! - **Input contract**: `schema` (lenient JSON → typed records)

pub mod activity_factor;
pub mod constants;
pub mod eat;
pub mod error;
pub mod meals;
pub mod neat;
pub mod pipeline;
pub mod schema;
pub mod tdee;
pub mod trends;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use activity_factor::{compute_advanced_activity_factor, AdvancedAfInput};
pub use constants::UnitConstants;
pub use eat::{compute_eat, compute_eat_jog, compute_eat_walk, sum_eat, sum_eat_bundle};
pub use error::ComputeError;
pub use meals::compute_day_meal_totals;
pub use neat::estimate_neat;
pub use pipeline::{compute_day_derived, day_to_derived_json, range_to_summary_json, DayProcessor};
pub use tdee::{compute_tdee_from_af_and_tef, TdeeInput};
pub use trends::{compute_range, summarize_range};
pub use types::{
    Activity, ActivityMode, ActivityType, DayDerived, DayRecord, MealEntry, MealTotals, MealType,
    Profile, RangeSummary, Survey, TdeeBreakdown,
};

/// Balance version
pub const BALANCE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "synheart-balance";
