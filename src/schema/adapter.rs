//! Adapter from loosely-shaped JSON to typed records
//!
//! Parsing never fails on shape or content: malformed values are treated as
//! unset and recorded as [`SchemaIssue`]s. The only error is invalid JSON
//! syntax, reported by [`parse_json`] and [`parse_day_documents`].

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ComputeError;
use crate::schema::coerce::{coerce_bool, coerce_number, coerce_string, first_present, is_present};
use crate::types::{
    Activity, ActivityMode, ActivityType, DayRecord, MealEntry, MealType, Profile, Survey,
    DEFAULT_INTENSITY,
};

/// A value that was present but could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    /// JSON path of the offending value (e.g. `activities[1].distanceKm`)
    pub path: String,
    pub message: String,
}

/// Activities together with the profile they were wrapped with, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityBundle {
    pub activities: Vec<Activity>,
    pub profile: Option<Profile>,
}

/// Stateful adapter that collects issues while normalizing records
#[derive(Debug, Default)]
pub struct RecordAdapter {
    issues: Vec<SchemaIssue>,
}

impl RecordAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues recorded so far
    pub fn issues(&self) -> &[SchemaIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<SchemaIssue> {
        self.issues
    }

    fn issue(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let issue = SchemaIssue {
            path: path.into(),
            message: message.into(),
        };
        tracing::warn!(path = %issue.path, message = %issue.message, "ignored malformed input");
        self.issues.push(issue);
    }

    /// First usable number among `keys`, in order
    fn number(&mut self, obj: &Map<String, Value>, keys: &[&str], prefix: &str) -> Option<f64> {
        self.keyed_number(obj, keys, prefix).map(|(_, n)| n)
    }

    /// Like [`Self::number`], also returning the key the value was read from
    fn keyed_number<'k>(
        &mut self,
        obj: &Map<String, Value>,
        keys: &[&'k str],
        prefix: &str,
    ) -> Option<(&'k str, f64)> {
        for &key in keys {
            let Some(value) = obj.get(key) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            match coerce_number(value) {
                Some(n) => return Some((key, n)),
                None => self.issue(join(prefix, key), format!("not a finite number: {value}")),
            }
        }
        None
    }

    /// Like [`Self::number`] but negative values are rejected
    fn non_negative(&mut self, obj: &Map<String, Value>, keys: &[&str], prefix: &str) -> Option<f64> {
        let (key, value) = self.keyed_number(obj, keys, prefix)?;
        if value < 0.0 {
            self.issue(join(prefix, key), format!("negative value {value}"));
            return None;
        }
        Some(value)
    }

    pub fn parse_profile(&mut self, value: &Value) -> Profile {
        let Some(obj) = value.as_object() else {
            if is_present(Some(value)) {
                self.issue("profile", "expected an object");
            }
            return Profile::default();
        };
        let p = "profile";

        Profile {
            bmr: self.number(obj, &["bmr"], p),
            weight_kg: self.number(obj, &["weight_kg", "weightKg"], p),
            default_activity_factor: self.number(
                obj,
                &["default_activity_factor", "defaultActivityFactor"],
                p,
            ),
            daily_kcal_target: self.number(obj, &["daily_kcal_target", "dailyKcalTarget"], p),
            walk_kcal_per_kg_per_km: self.number(
                obj,
                &["walk_kcal_per_kg_per_km", "walkKcalPerKgPerKm"],
                p,
            ),
            run_kcal_per_kg_per_km: self.number(
                obj,
                &["run_kcal_per_kg_per_km", "runKcalPerKgPerKm"],
                p,
            ),
            step_kcal_const: self.number(obj, &["step_kcal_const", "stepKcalConst"], p),
            default_tef_ratio: self.number(obj, &["default_tef_ratio", "defaultTefRatio"], p),
        }
    }

    pub fn parse_activity(&mut self, value: &Value, path: &str) -> Option<Activity> {
        let Some(obj) = value.as_object() else {
            self.issue(path, "activity is not an object");
            return None;
        };

        let activity_type = first_present(obj, &["type", "activity_type", "activityType"])
            .and_then(|(_, v)| v.as_str())
            .map(ActivityType::from_label)
            .unwrap_or_default();

        let duration_min = self
            .non_negative(obj, &["durationMin", "duration_min", "duration"], path)
            .unwrap_or(0.0);
        let distance_km = self.non_negative(obj, &["distanceKm", "distance_km", "distance"], path);
        let intensity = self
            .number(obj, &["intensity"], path)
            .unwrap_or(DEFAULT_INTENSITY);

        Some(Activity {
            id: obj.get("id").and_then(coerce_string),
            activity_type,
            duration_min,
            distance_km,
            intensity,
            notes: obj.get("notes").and_then(|v| v.as_str()).map(str::to_string),
        })
    }

    /// Accepts a list, a `{ activities, profile }` wrapper, or a single activity
    pub fn parse_activities(&mut self, value: &Value) -> ActivityBundle {
        match value {
            Value::Null => ActivityBundle::default(),
            Value::Array(items) => ActivityBundle {
                activities: items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| self.parse_activity(item, &format!("activities[{i}]")))
                    .collect(),
                profile: None,
            },
            Value::Object(obj) if obj.contains_key("activities") => {
                let inner = self.parse_activities(&obj["activities"]);
                let profile = obj
                    .get("profile")
                    .filter(|p| p.is_object())
                    .map(|p| self.parse_profile(p));
                ActivityBundle {
                    activities: inner.activities,
                    profile: profile.or(inner.profile),
                }
            }
            Value::Object(_) => ActivityBundle {
                activities: self.parse_activity(value, "activities").into_iter().collect(),
                profile: None,
            },
            _ => {
                self.issue("activities", "expected a list of activities");
                ActivityBundle::default()
            }
        }
    }

    pub fn parse_meal(&mut self, value: &Value, path: &str) -> Option<MealEntry> {
        let Some(obj) = value.as_object() else {
            self.issue(path, "meal entry is not an object");
            return None;
        };

        let meal_type = first_present(obj, &["mealType", "meal_type"])
            .and_then(|(_, v)| v.as_str())
            .map(MealType::from_label)
            .unwrap_or_else(|| MealType::Other(String::new()));

        Some(MealEntry {
            meal_type,
            quantity: self.number(obj, &["quantity"], path),
            kcal_per_unit: self.number(obj, &["kcalPerUnit", "kcal_per_unit"], path),
            total_kcal: self.number(obj, &["totalKcal", "total_kcal"], path),
        })
    }

    /// Accepts a list, a day record carrying `meals`, or a single entry
    pub fn parse_meals(&mut self, value: &Value) -> Vec<MealEntry> {
        match value {
            Value::Null => Vec::new(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| self.parse_meal(item, &format!("meals[{i}]")))
                .collect(),
            Value::Object(obj) if obj.contains_key("meals") => self.parse_meals(&obj["meals"]),
            Value::Object(_) => self.parse_meal(value, "meals").into_iter().collect(),
            _ => {
                self.issue("meals", "expected a list of meal entries");
                Vec::new()
            }
        }
    }

    pub fn parse_survey(&mut self, value: &Value) -> Option<Survey> {
        let obj = match value {
            Value::Null => return None,
            Value::Object(obj) => obj,
            _ => {
                self.issue("survey", "expected an object");
                return None;
            }
        };
        let p = "survey";

        let active_commute = match first_present(obj, &["activeCommute", "active_commute"]) {
            Some((key, v)) => coerce_bool(v).unwrap_or_else(|| {
                self.issue(join(p, key), format!("not a boolean: {v}"));
                false
            }),
            None => false,
        };

        Some(Survey {
            subjective: self.number(obj, &["subjective"], p).unwrap_or(0.0),
            standing_hours: self
                .number(obj, &["standingHours", "standing_hours"], p)
                .unwrap_or(0.0),
            active_commute,
        })
    }

    pub fn parse_day_record(&mut self, value: &Value) -> DayRecord {
        let Some(obj) = value.as_object() else {
            if is_present(Some(value)) {
                self.issue("day", "expected an object");
            }
            return DayRecord::default();
        };
        let p = "day";

        let date = match obj.get("date") {
            Some(Value::String(s)) => {
                let parsed = parse_date(s);
                if parsed.is_none() {
                    self.issue("day.date", format!("not a YYYY-MM-DD date: {s}"));
                }
                parsed
            }
            Some(Value::Null) | None => None,
            Some(other) => {
                self.issue("day.date", format!("not a date string: {other}"));
                None
            }
        };

        let activity_mode = first_present(obj, &["activityMode", "activity_mode"])
            .and_then(|(_, v)| v.as_str())
            .map(ActivityMode::from_label)
            .unwrap_or_default();

        let activities = obj
            .get("activities")
            .map(|v| self.parse_activities(v).activities)
            .unwrap_or_default();
        let meals = obj
            .get("meals")
            .map(|v| self.parse_meals(v))
            .unwrap_or_default();
        let survey = obj.get("survey").and_then(|v| self.parse_survey(v));

        DayRecord {
            date,
            activities,
            steps: self.non_negative(obj, &["steps"], p),
            survey,
            meals,
            activity_factor: self.number(obj, &["activityFactor", "activity_factor"], p),
            activity_mode,
            bmr_snapshot: self.number(obj, &["bmrSnapshot", "bmr_snapshot"], p),
            workout_calories: self.number(obj, &["workoutCalories", "workout_calories"], p),
            intensity_factor: self.number(obj, &["intensityFactor", "intensity_factor"], p),
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    format!("{prefix}.{key}")
}

/// Parse `YYYY-MM-DD`, tolerating a trailing time component
fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    let day_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

/// Parse JSON text; empty input reads as `null`
pub fn parse_json(text: &str) -> Result<Value, ComputeError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}

pub fn parse_profile(value: &Value) -> Profile {
    RecordAdapter::new().parse_profile(value)
}

pub fn parse_activity(value: &Value) -> Option<Activity> {
    RecordAdapter::new().parse_activity(value, "activity")
}

pub fn parse_activities(value: &Value) -> ActivityBundle {
    RecordAdapter::new().parse_activities(value)
}

pub fn parse_meal(value: &Value) -> Option<MealEntry> {
    RecordAdapter::new().parse_meal(value, "meal")
}

pub fn parse_meals(value: &Value) -> Vec<MealEntry> {
    RecordAdapter::new().parse_meals(value)
}

pub fn parse_survey(value: &Value) -> Option<Survey> {
    RecordAdapter::new().parse_survey(value)
}

pub fn parse_day_record(value: &Value) -> DayRecord {
    RecordAdapter::new().parse_day_record(value)
}

/// Split a document into day values.
///
/// Accepts a JSON array of days, a `{ "days": [...] }` or
/// `{ "days": { "YYYY-MM-DD": {...} } }` store dump, a single day object, or
/// NDJSON with one day per line. Days keyed by date inherit the key as their
/// date when they do not carry one.
pub fn split_day_documents(text: &str) -> Result<Vec<Value>, ComputeError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(split_day_value(value)),
        Err(_) => {
            let mut values = Vec::new();
            for (line_num, line) in text.lines().enumerate() {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let value = serde_json::from_str::<Value>(trimmed).map_err(|e| {
                    ComputeError::ParseError(format!("Failed to parse line {}: {}", line_num + 1, e))
                })?;
                values.push(value);
            }
            Ok(values)
        }
    }
}

fn split_day_value(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) if obj.contains_key("days") => match obj.remove("days") {
            Some(Value::Array(items)) => items,
            Some(Value::Object(by_date)) => by_date
                .into_iter()
                .map(|(date, mut day)| {
                    if let Value::Object(ref mut fields) = day {
                        fields
                            .entry("date".to_string())
                            .or_insert_with(|| Value::String(date));
                    }
                    day
                })
                .collect(),
            _ => Vec::new(),
        },
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Parse a document of day records (see [`split_day_documents`])
pub fn parse_day_documents(text: &str) -> Result<Vec<DayRecord>, ComputeError> {
    let mut adapter = RecordAdapter::new();
    Ok(split_day_documents(text)?
        .iter()
        .map(|v| adapter.parse_day_record(v))
        .collect())
}
