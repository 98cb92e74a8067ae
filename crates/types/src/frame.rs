//! Ingestion DTOs: the only accepted wire shape for frames

use crate::field::{FieldConfig, FieldType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key/value tags attached to a frame
pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

/// A message produced while executing the query behind a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResultNotice {
    pub severity: NoticeSeverity,
    pub text: String,
}

/// Free-form execution metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResultMeta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<QueryResultNotice>,
    #[serde(flatten)]
    pub custom: serde_json::Map<String, Value>,
}

/// A column as it arrives on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
}

impl FieldDto {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: Some(name.into()),
            field_type: Some(field_type),
            ..Default::default()
        }
    }

    /// A column whose type is inferred from its values
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_values(mut self, values: Vec<Value>) -> Self {
        self.values = Some(values);
        self
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// A frame as it arrives on the wire (and as `to_dto` emits it)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFrameDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<QueryResultMeta>,
    #[serde(default)]
    pub fields: Vec<FieldDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dto_from_json() {
        let dto: DataFrameDto = serde_json::from_value(json!({
            "refId": "A",
            "name": "cpu",
            "labels": {"host": "a"},
            "meta": {"notices": [{"severity": "warning", "text": "partial"}], "executedQuery": "q"},
            "fields": [
                {"name": "time", "type": "time", "values": [1, 2]},
                {"name": "value"}
            ]
        }))
        .unwrap();

        assert_eq!(dto.ref_id.as_deref(), Some("A"));
        assert_eq!(dto.fields.len(), 2);
        assert_eq!(dto.fields[1].values, None);
        let meta = dto.meta.unwrap();
        assert_eq!(meta.notices[0].severity, NoticeSeverity::Warning);
        assert_eq!(meta.custom["executedQuery"], json!("q"));
    }
}
