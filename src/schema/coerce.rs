//! Lenient scalar coercion
//!
//! Anything that cannot be read as a usable value becomes `None` ("unset").

use serde_json::{Map, Value};

/// Read a finite number from a JSON number or numeric string
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Read a boolean from a bool, 0/1, or a "true"/"false" style string
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Read a label from a string or number
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Whether a field carries something other than null
pub fn is_present(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

/// First key (in order) that is present and not null
pub fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<(&'a str, &'a Value)> {
    keys.iter().find_map(|key| {
        obj.get_key_value(*key)
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.as_str(), v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(12.5)), Some(12.5));
        assert_eq!(coerce_number(&json!(" 80 ")), Some(80.0));
        assert_eq!(coerce_number(&json!("1e3")), Some(1000.0));
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!([1])), None);
    }

    #[test]
    fn test_coerce_bool() {
        assert_eq!(coerce_bool(&json!(true)), Some(true));
        assert_eq!(coerce_bool(&json!(0)), Some(false));
        assert_eq!(coerce_bool(&json!("TRUE")), Some(true));
        assert_eq!(coerce_bool(&json!("no")), Some(false));
        assert_eq!(coerce_bool(&json!("maybe")), None);
        assert_eq!(coerce_bool(&json!(null)), None);
    }

    #[test]
    fn test_first_present_skips_null() {
        let value = json!({ "weight_kg": null, "weightKg": 72 });
        let obj = value.as_object().unwrap();
        let (key, found) = first_present(obj, &["weight_kg", "weightKg"]).unwrap();
        assert_eq!(key, "weightKg");
        assert_eq!(found, &json!(72));
        assert!(first_present(obj, &["bmr"]).is_none());
    }
}
