//! Field types and per-field display configuration

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Semantic type of the data a field contains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Timestamps (epoch milliseconds or date strings)
    Time,
    /// Numerical data (e.g., 45.2, 3.4)
    Number,
    /// Text data
    String,
    /// Boolean value
    Boolean,
    /// Not yet known; resolved from the values when possible
    #[default]
    Other,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Time => "time",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Other => "other",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A color step. Values at or above `value` take `color`.
///
/// The base step has a value of `-Infinity`; it is written as `null` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    #[serde(
        default = "base_threshold_value",
        serialize_with = "serialize_threshold_value",
        deserialize_with = "deserialize_threshold_value"
    )]
    pub value: f64,
    pub color: String,
}

impl Threshold {
    pub fn new(value: f64, color: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
        }
    }

    /// The unconditional catch-all step
    pub fn base(color: impl Into<String>) -> Self {
        Self::new(f64::NEG_INFINITY, color)
    }
}

fn base_threshold_value() -> f64 {
    f64::NEG_INFINITY
}

fn serialize_threshold_value<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

fn deserialize_threshold_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(Option::<serde_json::Value>::deserialize(deserializer)?)
        .unwrap_or(f64::NEG_INFINITY))
}

/// Maps a raw value (or a numeric range) to replacement text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValueMapping {
    /// Exact match on the value's text form
    Value { value: String, text: String },
    /// Inclusive numeric range
    Range { from: f64, to: f64, text: String },
}

/// A link template declared on a field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLink {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub target_blank: bool,
}

/// Display configuration for a single field.
///
/// Every property is optional so the same struct doubles as a partial
/// layer when several configs are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    /// Title template for display values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    /// Value format id (see the formats registry)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Fractional digits, kept within `0..=MAX_DECIMALS`
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_decimals",
        skip_serializing_if = "Option::is_none"
    )]
    pub decimals: Option<i32>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub min: Option<f64>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Vec<Threshold>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<Vec<ValueMapping>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<DataLink>>,
    /// Text shown when a value is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_value: Option<String>,
}

impl FieldConfig {
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_thresholds(mut self, thresholds: Vec<Threshold>) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn has_links(&self) -> bool {
        self.links.as_ref().is_some_and(|links| !links.is_empty())
    }
}

/// Accepts numbers and numeric strings; anything else reads as absent.
fn lenient_f64(value: Option<serde_json::Value>) -> Option<f64> {
    match value? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = lenient_f64(raw.clone());
    if parsed.is_none() && raw.as_ref().is_some_and(|v| !v.is_null()) {
        log::warn!("Ignoring non-numeric config value: {:?}", raw);
    }
    Ok(parsed)
}

/// Upper bound on configured `decimals`
pub const MAX_DECIMALS: i32 = 20;

fn deserialize_lenient_decimals<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_f64(deserializer)?
        .filter(|d| d.is_finite())
        .map(|d| {
            let clamped = d.trunc().clamp(0.0, MAX_DECIMALS as f64);
            if clamped != d.trunc() {
                log::warn!("Clamping decimals {} to {}", d, clamped);
            }
            clamped as i32
        }))
}
