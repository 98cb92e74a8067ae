//! String-to-typed-value parsers used while appending rows

use dashframe_types::FieldType;
use serde_json::{Number, Value};

/// Per-field parse strategy, chosen once from the field's type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldParser {
    /// Leading float prefix; unparseable input becomes null
    Number,
    /// False when the text starts with `F`, `f` or `0`, true otherwise
    Boolean,
    /// Value is stored as given
    Passthrough,
}

impl FieldParser {
    pub fn for_type(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Number => FieldParser::Number,
            FieldType::Boolean => FieldParser::Boolean,
            _ => FieldParser::Passthrough,
        }
    }

    pub fn parse(&self, value: &Value) -> Value {
        match self {
            FieldParser::Number => parse_number(value),
            FieldParser::Boolean => parse_boolean(value),
            FieldParser::Passthrough => value.clone(),
        }
    }
}

fn parse_number(value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        Value::String(s) => parse_float_prefix(s)
            .and_then(number_value)
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Whole numbers are stored as integers so they print as `12`, not `12.0`
fn number_value(parsed: f64) -> Option<Value> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if parsed.fract() == 0.0 && parsed.abs() <= MAX_SAFE_INTEGER {
        return Some(Value::from(parsed as i64));
    }
    Number::from_f64(parsed).map(Value::Number)
}

fn parse_boolean(value: &Value) -> Value {
    let text = match value {
        Value::Bool(_) | Value::Null => return value.clone(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Value::Bool(!matches!(text.chars().next(), Some('F' | 'f' | '0')))
}

/// Parse the longest leading decimal literal, ignoring leading whitespace
/// and any trailing garbage (`"12px"` reads as 12).
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_leading_character() {
        let p = FieldParser::Boolean;
        assert_eq!(p.parse(&json!("F")), json!(false));
        assert_eq!(p.parse(&json!("false")), json!(false));
        assert_eq!(p.parse(&json!("0")), json!(false));
        assert_eq!(p.parse(&json!("T")), json!(true));
        assert_eq!(p.parse(&json!("1")), json!(true));
        assert_eq!(p.parse(&json!("maybe")), json!(true));
        assert_eq!(p.parse(&json!(true)), json!(true));
        assert_eq!(p.parse(&Value::Null), Value::Null);
    }

    #[test]
    fn test_number_parse() {
        let p = FieldParser::Number;
        assert_eq!(p.parse(&json!("1.5")), json!(1.5));
        assert_eq!(p.parse(&json!(" 12px")), json!(12));
        assert_eq!(p.parse(&json!("12")).to_string(), "12");
        assert_eq!(p.parse(&json!("-3e2")), json!(-300));
        assert_eq!(p.parse(&json!("1e300")), json!(1e300));
        assert_eq!(p.parse(&json!(7)), json!(7));
        assert_eq!(p.parse(&json!("abc")), Value::Null);
        assert_eq!(p.parse(&Value::Null), Value::Null);
    }

    #[test]
    fn test_float_prefix() {
        assert_eq!(parse_float_prefix("-3.25e2x"), Some(-325.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("-"), None);
    }

    #[test]
    fn test_parser_for_type() {
        assert_eq!(FieldParser::for_type(FieldType::Number), FieldParser::Number);
        assert_eq!(FieldParser::for_type(FieldType::Time), FieldParser::Passthrough);
    }
}
