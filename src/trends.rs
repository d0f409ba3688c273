//! Trends over a range of days
//!
//! Runs the day facade once per record and folds the results into a display
//! series plus range averages. Days are independent: the order of evaluation
//! does not affect any value.

use crate::constants::round_kcal;
use crate::pipeline::DayProcessor;
use crate::types::{DayDerived, DayRecord, Profile, RangeSummary, TrendPoint};

/// Derived stats for every day, summarized
pub fn compute_range(days: &[DayRecord], profile: &Profile) -> RangeSummary {
    DayProcessor::new(profile.clone()).process_range(days)
}

/// Summarize already derived days.
///
/// Points are ordered by date; undated days follow the dated ones in input
/// order.
pub fn summarize_range(derived: &[DayDerived]) -> RangeSummary {
    if derived.is_empty() {
        return RangeSummary::default();
    }

    let mut points: Vec<TrendPoint> = derived
        .iter()
        .map(|day| TrendPoint {
            date: day.date,
            tdee: day.tdee,
            total_intake: day.total_intake,
            net_kcal: day.net_kcal,
            activity_mode: day.activity_mode,
        })
        .collect();
    points.sort_by_key(|p| (p.date.is_none(), p.date));

    let count = points.len() as f64;
    let total_tdee: i64 = points.iter().map(|p| p.tdee).sum();
    let total_intake: i64 = points.iter().map(|p| p.total_intake).sum();
    let total_net_kcal: i64 = points.iter().map(|p| p.net_kcal).sum();

    RangeSummary {
        days: points.len() as u32,
        days_with_intake: points.iter().filter(|p| p.total_intake > 0).count() as u32,
        avg_tdee: round_kcal(total_tdee as f64 / count),
        avg_intake: round_kcal(total_intake as f64 / count),
        avg_net_kcal: round_kcal(total_net_kcal as f64 / count),
        total_net_kcal,
        points,
    }
}
