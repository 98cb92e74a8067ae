//! Turns raw cells into display values

use dashframe_formats::{
    get_decimals_for_value, get_value_format, number_to_string, to_fixed_unit, DecimalCount,
    ValueFormatter,
};
use dashframe_types::{resolve_color, DisplayValue, FieldConfig, Threshold, ValueMapping};
use log::warn;
use serde_json::Value;

use crate::reducers::numeric_reading;

/// Formats values for one resolved field config
pub struct DisplayProcessor {
    config: FieldConfig,
    formatter: ValueFormatter,
    is_utc: bool,
}

impl std::fmt::Debug for DisplayProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayProcessor")
            .field("config", &self.config)
            .field("is_utc", &self.is_utc)
            .finish_non_exhaustive()
    }
}

impl DisplayProcessor {
    pub fn new(config: FieldConfig, is_utc: bool) -> Self {
        let formatter = resolve_formatter(config.unit.as_deref());
        Self {
            config,
            formatter,
            is_utc,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Mappings first, then unit formatting, then threshold color.
    /// Text that comes out empty falls back to `no_value`, then `-`.
    pub fn display(&self, value: &Value) -> DisplayValue {
        let mut text = value_text(value);
        let mut numeric = to_number(value);
        let mut should_format = true;

        if let Some(mapped) = self
            .config
            .mappings
            .as_deref()
            .and_then(|mappings| get_mapped_value(mappings, value, numeric))
        {
            text = mapped.to_string();
            let from_text = to_number(&Value::String(text.clone()));
            if !from_text.is_nan() {
                numeric = from_text;
            }
            should_format = false;
        }

        let mut color = None;
        if !numeric.is_nan() {
            if should_format && !value.is_boolean() {
                let (decimals, scaled_decimals) = decimals_for(numeric, self.config.decimals);
                text = (self.formatter)(numeric, decimals, scaled_decimals, self.is_utc);
            }
            if let Some(thresholds) = self.config.thresholds.as_deref() {
                color = get_color_from_threshold(numeric, thresholds);
            }
        }

        if text.is_empty() {
            text = match self.config.no_value.as_deref() {
                Some(no_value) if !no_value.is_empty() => no_value.to_string(),
                _ => "-".to_string(),
            };
        }

        DisplayValue {
            text,
            numeric,
            color,
            title: None,
        }
    }
}

/// Registered formatter for the unit. Unknown ids become a plain suffix.
pub fn resolve_formatter(unit: Option<&str>) -> ValueFormatter {
    let id = unit.unwrap_or("none");
    match get_value_format(id) {
        Some(format) => format.clone(),
        None => {
            warn!("Unknown unit '{}', using it as a suffix", id);
            to_fixed_unit(id)
        }
    }
}

fn decimals_for(value: f64, requested: Option<i32>) -> (DecimalCount, DecimalCount) {
    match requested {
        Some(decimals) => (Some(decimals), None),
        None => {
            let info = get_decimals_for_value(value);
            (Some(info.decimals), Some(info.scaled_decimals))
        }
    }
}

/// Numeric reading of a cell; `NaN` when there is none
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        other => numeric_reading(other).unwrap_or(f64::NAN),
    }
}

/// Raw text of a cell, with numbers written the way a browser would
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => n.as_f64().map(number_to_string).unwrap_or_default(),
        other => other.to_string(),
    }
}

/// First mapping that matches the value's text or numeric range
pub fn get_mapped_value<'m>(
    mappings: &'m [ValueMapping],
    value: &Value,
    numeric: f64,
) -> Option<&'m str> {
    let raw_text = match value {
        Value::Null => "null".to_string(),
        other => value_text(other),
    };
    mappings.iter().find_map(|mapping| match mapping {
        ValueMapping::Value { value, text } if *value == raw_text => Some(text.as_str()),
        ValueMapping::Range { from, to, text } if numeric >= *from && numeric <= *to => {
            Some(text.as_str())
        }
        _ => None,
    })
}

/// Color of the highest threshold at or below `value`, else the lowest one.
/// Named colors resolve to hex.
pub fn get_color_from_threshold(value: f64, thresholds: &[Threshold]) -> Option<String> {
    let mut sorted: Vec<&Threshold> = thresholds.iter().collect();
    sorted.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut result = *sorted.first()?;
    for &threshold in &sorted {
        if threshold.value <= value {
            result = threshold;
        } else {
            break;
        }
    }
    Some(resolve_color(&result.color))
}
