//! Meal totals
//!
//! Sums logged meal entries into lunch, dinner and extras plus a grand total.
//! Entries with unusable numbers contribute 0; unrecognised meal labels count
//! toward the grand total only.

use crate::constants::round_kcal;
use crate::types::{DayRecord, MealEntry, MealTotals, MealType};

/// Sum meal entries by category.
///
/// Each bucket and the total are rounded from their unrounded sums, so the
/// buckets may differ from `total` by a kcal or two.
pub fn compute_day_meal_totals(meals: &[MealEntry]) -> MealTotals {
    let mut lunch = 0.0;
    let mut dinner = 0.0;
    let mut extras = 0.0;
    let mut total = 0.0;

    for entry in meals {
        let kcal = entry.kcal();
        match entry.meal_type {
            MealType::Lunch => lunch += kcal,
            MealType::Dinner => dinner += kcal,
            MealType::Extras => extras += kcal,
            MealType::Other(_) => {}
        }
        total += kcal;
    }

    MealTotals {
        lunch: round_kcal(lunch),
        dinner: round_kcal(dinner),
        extras: round_kcal(extras),
        total: round_kcal(total),
    }
}

/// Meal totals of a day record
pub fn compute_day_record_meal_totals(day: &DayRecord) -> MealTotals {
    compute_day_meal_totals(&day.meals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_entry(meal_type: MealType, total_kcal: Option<f64>) -> MealEntry {
        MealEntry {
            meal_type,
            quantity: None,
            kcal_per_unit: None,
            total_kcal,
        }
    }

    #[test]
    fn test_lunch_and_extra() {
        let meals = vec![
            make_entry(MealType::Lunch, Some(500.0)),
            make_entry(MealType::from_label("extra"), Some(120.0)),
        ];

        assert_eq!(
            compute_day_meal_totals(&meals),
            MealTotals {
                lunch: 500,
                dinner: 0,
                extras: 120,
                total: 620,
            }
        );
    }

    #[test]
    fn test_quantity_fallback_and_extras_folding() {
        let meals = vec![
            MealEntry {
                meal_type: MealType::Dinner,
                quantity: Some(1.5),
                kcal_per_unit: Some(333.3),
                total_kcal: None,
            },
            make_entry(MealType::from_label("SNACK"), Some(80.4)),
            make_entry(MealType::from_label("Extras"), Some(40.4)),
        ];
        let totals = compute_day_meal_totals(&meals);

        // 1.5 * 333.3 = 499.95
        assert_eq!(totals.dinner, 500);
        assert_eq!(totals.extras, 121);
        assert_eq!(totals.total, 621);
    }

    #[test]
    fn test_malformed_entries_contribute_zero() {
        let meals = vec![
            make_entry(MealType::Lunch, None),
            make_entry(MealType::Lunch, Some(f64::NAN)),
            MealEntry {
                meal_type: MealType::Dinner,
                quantity: Some(2.0),
                kcal_per_unit: None,
                total_kcal: None,
            },
        ];
        assert_eq!(compute_day_meal_totals(&meals), MealTotals::default());
    }

    #[test]
    fn test_unknown_meal_type_counts_in_total_only() {
        let meals = vec![
            make_entry(MealType::from_label("breakfast"), Some(300.0)),
            make_entry(MealType::Lunch, Some(200.0)),
        ];
        let totals = compute_day_meal_totals(&meals);
        assert_eq!(totals.lunch, 200);
        assert_eq!(totals.total, 500);
    }

    #[test]
    fn test_day_record_meals() {
        let day = DayRecord {
            meals: vec![make_entry(MealType::Dinner, Some(700.0))],
            ..Default::default()
        };
        assert_eq!(compute_day_record_meal_totals(&day).dinner, 700);
    }

    #[test]
    fn test_buckets_and_total_rounded_independently() {
        let meals = vec![
            make_entry(MealType::Lunch, Some(100.5)),
            make_entry(MealType::Dinner, Some(100.5)),
        ];
        assert_eq!(
            compute_day_meal_totals(&meals),
            MealTotals {
                lunch: 101,
                dinner: 101,
                extras: 0,
                total: 201,
            }
        );
    }
}
