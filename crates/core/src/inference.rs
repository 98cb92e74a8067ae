//! Field type inference

use crate::field::Field;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dashframe_types::FieldType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static NUMBER_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*-?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?\s*$").expect("valid number regex")
});

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Field names that always hold timestamps
const TIME_FIELD_NAMES: &[&str] = &["time", "date"];

fn looks_like_date(s: &str) -> bool {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s).is_ok()
        || DATE_TIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Determine the semantic type of a single raw value
pub fn guess_field_type_from_value(value: &Value) -> FieldType {
    match value {
        Value::Number(_) => FieldType::Number,
        Value::Bool(_) => FieldType::Boolean,
        Value::String(s) => {
            if NUMBER_LITERAL.is_match(s) {
                FieldType::Number
            } else if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
                FieldType::Boolean
            } else if looks_like_date(s) {
                FieldType::Time
            } else {
                FieldType::String
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => FieldType::Other,
    }
}

/// Work out a type for a field declared as `other`.
///
/// Returns `None` when nothing can be learned (no name hint and no
/// non-null values).
pub fn guess_field_type_for_field(field: &Field) -> Option<FieldType> {
    let lowered = field.name.to_ascii_lowercase();
    if TIME_FIELD_NAMES.contains(&lowered.as_str()) {
        return Some(FieldType::Time);
    }

    field
        .values
        .iter()
        .find(|v| !v.is_null())
        .map(guess_field_type_from_value)
        .filter(|t| *t != FieldType::Other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::ArrayVector;
    use dashframe_types::FieldConfig;
    use serde_json::json;

    #[test]
    fn test_guess_from_value() {
        assert_eq!(guess_field_type_from_value(&json!(1.5)), FieldType::Number);
        assert_eq!(guess_field_type_from_value(&json!("-12.5e3")), FieldType::Number);
        assert_eq!(guess_field_type_from_value(&json!(".5")), FieldType::Number);
        assert_eq!(guess_field_type_from_value(&json!(true)), FieldType::Boolean);
        assert_eq!(guess_field_type_from_value(&json!("FALSE")), FieldType::Boolean);
        assert_eq!(
            guess_field_type_from_value(&json!("2019-08-01T10:00:00Z")),
            FieldType::Time
        );
        assert_eq!(guess_field_type_from_value(&json!("2019-08-01")), FieldType::Time);
        assert_eq!(guess_field_type_from_value(&json!("hello")), FieldType::String);
        assert_eq!(guess_field_type_from_value(&json!("")), FieldType::String);
        assert_eq!(guess_field_type_from_value(&Value::Null), FieldType::Other);
    }

    #[test]
    fn test_guess_is_stable() {
        let v = json!("12");
        let first = guess_field_type_from_value(&v);
        for _ in 0..10 {
            assert_eq!(guess_field_type_from_value(&v), first);
        }
    }

    #[test]
    fn test_guess_for_field_skips_nulls() {
        let field = Field::new(
            "value",
            FieldType::Other,
            FieldConfig::default(),
            Box::new(ArrayVector::new(vec![Value::Null, json!("abc")])),
        );
        assert_eq!(guess_field_type_for_field(&field), Some(FieldType::String));

        let empty = Field::new(
            "value",
            FieldType::Other,
            FieldConfig::default(),
            Box::new(ArrayVector::new(vec![Value::Null])),
        );
        assert_eq!(guess_field_type_for_field(&empty), None);
    }

    #[test]
    fn test_guess_for_field_uses_time_name() {
        let field = Field::new(
            "Time",
            FieldType::Other,
            FieldConfig::default(),
            Box::new(ArrayVector::default()),
        );
        assert_eq!(guess_field_type_for_field(&field), Some(FieldType::Time));
    }
}
