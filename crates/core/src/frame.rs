//! Read access shared by every frame flavour

use crate::error::{FrameError, Result};
use crate::field::Field;
use dashframe_types::{DataFrameDto, Labels, QueryResultMeta};
use serde_json::Value;

/// Trait for all frames
///
/// The display pipeline only reads frames through this trait, so it can
/// consume plain, mutable and circular frames alike.
pub trait Frame {
    fn name(&self) -> Option<&str>;

    /// Id of the query that produced this frame
    fn ref_id(&self) -> Option<&str>;

    fn labels(&self) -> Option<&Labels>;

    fn meta(&self) -> Option<&QueryResultMeta>;

    /// Fields in column order
    fn fields(&self) -> &[Field];

    /// Number of rows
    fn length(&self) -> usize;

    /// First field with the given name (linear scan)
    fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Project the frame back into its wire shape
    fn to_dto(&self) -> DataFrameDto {
        DataFrameDto {
            ref_id: self.ref_id().map(str::to_string),
            name: self.name().map(str::to_string),
            labels: self.labels().cloned(),
            meta: self.meta().cloned(),
            fields: self.fields().iter().map(Field::to_dto).collect(),
        }
    }
}

/// Parse a JSON document holding one frame DTO or an array of them
pub fn parse_frames(json: &str) -> Result<Vec<DataFrameDto>> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(FrameError::from))
            .collect(),
        object @ Value::Object(_) => Ok(vec![serde_json::from_value(object)?]),
        other => Err(FrameError::InvalidDto(format!(
            "expected a frame object or an array of frames, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_and_many() {
        let one = parse_frames(r#"{"name":"a","fields":[]}"#).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].name.as_deref(), Some("a"));

        let many = parse_frames(r#"[{"fields":[]},{"refId":"B","fields":[]}]"#).unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].ref_id.as_deref(), Some("B"));
    }

    #[test]
    fn test_parse_rejects_scalars() {
        let err = parse_frames("42").unwrap_err();
        assert!(matches!(err, FrameError::InvalidDto(_)));
        assert!(parse_frames("{not json").is_err());
    }
}
