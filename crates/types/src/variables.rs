//! Scoped template variables

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A variable visible to template substitution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopedVar {
    pub text: String,
    pub value: Value,
}

impl ScopedVar {
    pub fn new(text: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }

    /// The string substituted into templates
    pub fn value_text(&self) -> String {
        match &self.value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            // f64 Display drops the trailing `.0` that serde_json writes
            Value::Number(n) => match n.as_f64() {
                Some(f) if n.is_f64() => f.to_string(),
                _ => n.to_string(),
            },
            other => other.to_string(),
        }
    }
}

pub type ScopedVars = HashMap<String, ScopedVar>;

/// Names of the variables the display pipeline provides
pub mod builtin {
    pub const SERIES_NAME: &str = "__series_name";
    pub const FIELD_NAME: &str = "__field_name";
    pub const CALC: &str = "__calc";
    pub const VALUE: &str = "__value";
    pub const VALUE_TIME: &str = "__value_time";
    pub const CELL_PREFIX: &str = "__cell_";
    pub const KEEP_TIME: &str = "__url_time_range";
    pub const INCLUDE_VARS: &str = "__all_variables";

    /// `__cell_<index>`
    pub fn cell(index: usize) -> String {
        format!("{}{}", CELL_PREFIX, index)
    }
}
