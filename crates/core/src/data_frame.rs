//! Append-oriented columnar frame with name and type indexes

use crate::field::Field;
use crate::frame::Frame;
use crate::inference::{guess_field_type_for_field, guess_field_type_from_value};
use crate::vector::Vector;
use dashframe_types::{DataFrameDto, FieldDto, FieldType, Labels, QueryResultMeta, Record};
use log::warn;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Named, typed columns of equal length.
///
/// Every mutation keeps all fields at `length` values, padding with
/// `null` at the tail where needed.
#[derive(Debug, Default)]
pub struct DataFrame {
    pub ref_id: Option<String>,
    pub name: Option<String>,
    pub labels: Option<Labels>,
    pub meta: Option<QueryResultMeta>,
    fields: Vec<Field>,
    length: usize,
    field_by_name: HashMap<String, usize>,
    field_by_type: HashMap<FieldType, Vec<usize>>,
}

impl DataFrame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dto(dto: DataFrameDto) -> Self {
        let mut frame = Self {
            ref_id: dto.ref_id,
            name: dto.name,
            labels: dto.labels,
            meta: dto.meta,
            ..Default::default()
        };
        for field in dto.fields {
            frame.add_field(field);
        }
        frame
    }

    /// Copy any frame into a new `DataFrame`
    pub fn from_frame(frame: &dyn Frame) -> Self {
        Self::from_dto(frame.to_dto())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a column described by a DTO; values default to empty
    pub fn add_field(&mut self, dto: FieldDto) -> &Field {
        self.push_field(Field::from_dto(dto))
    }

    fn push_field(&mut self, mut field: Field) -> &Field {
        if field.name.is_empty() {
            let position = self.fields.len() + 1;
            field.name = if field.field_type == FieldType::Time {
                format!("Time {}", position)
            } else {
                format!("Column {}", position)
            };
        }

        let index = self.fields.len();
        self.index_type(&mut field, index);

        if self.field_by_name.contains_key(&field.name) {
            warn!("Duplicate field names in DataFrame: {}", field.name);
        } else {
            self.field_by_name.insert(field.name.clone(), index);
        }

        let new_length = field.values.len();
        if new_length > self.length {
            for existing in &mut self.fields {
                for _ in existing.values.len()..new_length {
                    existing.values.add(Value::Null);
                }
            }
            self.length = new_length;
        } else {
            for _ in new_length..self.length {
                field.values.add(Value::Null);
            }
        }

        self.fields.push(field);
        &self.fields[index]
    }

    /// Add an empty column whose type is inferred from a sample value
    pub fn add_field_for(&mut self, value: &Value, name: Option<&str>) -> &Field {
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Field {}", self.fields.len() + 1),
        };
        self.add_field(FieldDto::new(name, guess_field_type_from_value(value)))
    }

    /// Resolve an `other` type where possible, then record the field
    /// under its type
    fn index_type(&mut self, field: &mut Field, index: usize) {
        if field.field_type == FieldType::Other {
            if let Some(guessed) = guess_field_type_for_field(field) {
                field.field_type = guessed;
            }
        }
        self.field_by_type
            .entry(field.field_type)
            .or_default()
            .push(index);
    }

    /// Reverse the row order of every field.
    ///
    /// Anything holding row indexes into this frame is stale afterwards.
    pub fn reverse(&mut self) {
        for field in &mut self.fields {
            field.values.reverse();
        }
    }

    /// Append one value to each column, creating columns for extra cells.
    ///
    /// The first row decides the types of fields that are still `other`.
    pub fn append_row(&mut self, row: &[Value]) {
        for cell in row.iter().skip(self.fields.len()) {
            self.add_field_for(cell, None);
        }

        if self.length == 0 {
            self.field_by_type.clear();
            let mut fields = std::mem::take(&mut self.fields);
            for (i, field) in fields.iter_mut().enumerate() {
                if field.field_type == FieldType::Other {
                    field.field_type = row
                        .get(i)
                        .map(guess_field_type_from_value)
                        .unwrap_or(FieldType::Other);
                }
                self.index_type(field, i);
            }
            self.fields = fields;
        }

        for (i, field) in self.fields.iter_mut().enumerate() {
            let raw = row.get(i).unwrap_or(&Value::Null);
            let value = field.parse_value(raw);
            field.values.add(value);
        }
        self.length += 1;
    }

    /// Append one row, looking each field's value up by name
    pub fn append_row_from(&mut self, record: &Record) {
        for field in &mut self.fields {
            let raw = record.get(&field.name).unwrap_or(&Value::Null);
            let value = field.parse_value(raw);
            field.values.add(value);
        }
        self.length += 1;
    }

    /// Snapshot of all fields, or of one type in column order
    pub fn get_fields(&self, field_type: Option<FieldType>) -> Vec<&Field> {
        match field_type {
            None => self.fields.iter().collect(),
            Some(t) => self
                .field_by_type
                .get(&t)
                .map(|indexes| indexes.iter().map(|&i| &self.fields[i]).collect())
                .unwrap_or_default(),
        }
    }

    pub fn has_field_of_type(&self, field_type: FieldType) -> bool {
        self.field_by_type
            .get(&field_type)
            .is_some_and(|indexes| !indexes.is_empty())
    }

    pub fn get_first_field_of_type(&self, field_type: FieldType) -> Option<&Field> {
        self.field_by_type
            .get(&field_type)
            .and_then(|indexes| indexes.first())
            .map(|&i| &self.fields[i])
    }

    pub fn has_field_named(&self, name: &str) -> bool {
        self.field_by_name.contains_key(name)
    }

    /// First field with the given name
    pub fn get_field_by_name(&self, name: &str) -> Option<&Field> {
        self.field_by_name.get(name).map(|&i| &self.fields[i])
    }
}

impl Frame for DataFrame {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn ref_id(&self) -> Option<&str> {
        self.ref_id.as_deref()
    }

    fn labels(&self) -> Option<&Labels> {
        self.labels.as_ref()
    }

    fn meta(&self) -> Option<&QueryResultMeta> {
        self.meta.as_ref()
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn length(&self) -> usize {
        self.length
    }
}

impl From<DataFrameDto> for DataFrame {
    fn from(dto: DataFrameDto) -> Self {
        Self::from_dto(dto)
    }
}

impl Serialize for DataFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dto().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashframe_types::FieldConfig;
    use serde_json::json;

    fn assert_equal_lengths(frame: &DataFrame) {
        for field in frame.fields() {
            assert_eq!(field.values.len(), frame.length(), "field {}", field.name);
        }
    }

    fn values(frame: &DataFrame, name: &str) -> Vec<Value> {
        frame.get_field_by_name(name).unwrap().values.to_vec()
    }

    #[test]
    fn test_from_dto_pads_short_columns() {
        let frame = DataFrame::from_dto(DataFrameDto {
            fields: vec![
                FieldDto::new("a", FieldType::Number).with_values(vec![json!(1)]),
                FieldDto::new("b", FieldType::Number)
                    .with_values(vec![json!(1), json!(2), json!(3)]),
                FieldDto::new("c", FieldType::Number),
            ],
            ..Default::default()
        });

        assert_eq!(frame.length(), 3);
        assert_equal_lengths(&frame);
        assert_eq!(values(&frame, "a"), vec![json!(1), Value::Null, Value::Null]);
        assert_eq!(values(&frame, "c"), vec![Value::Null; 3]);
    }

    #[test]
    fn test_default_names() {
        let mut frame = DataFrame::new();
        frame.add_field(FieldDto {
            field_type: Some(FieldType::Time),
            ..Default::default()
        });
        frame.add_field(FieldDto::default());
        let names: Vec<&str> = frame.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Time 1", "Column 2"]);
    }

    #[test]
    fn test_other_type_resolved_from_values() {
        let mut frame = DataFrame::new();
        let field = frame.add_field(FieldDto {
            name: Some("v".into()),
            values: Some(vec![Value::Null, json!(4.5)]),
            ..Default::default()
        });
        assert_eq!(field.field_type, FieldType::Number);
        assert!(frame.has_field_of_type(FieldType::Number));
    }

    #[test]
    fn test_duplicate_name_keeps_first() {
        let mut frame = DataFrame::new();
        frame.add_field(FieldDto::new("x", FieldType::Number));
        frame.add_field(FieldDto::new("x", FieldType::String));
        assert_eq!(frame.fields().len(), 2);
        assert_eq!(
            frame.get_field_by_name("x").unwrap().field_type,
            FieldType::Number
        );
    }

    #[test]
    fn test_append_row_first_row_sets_types() {
        let mut frame = DataFrame::new();
        frame.add_field(FieldDto {
            name: Some("flag".into()),
            ..Default::default()
        });
        frame.append_row(&[json!("true"), json!("12"), json!("label")]);
        frame.append_row(&[json!("F"), json!("x")]);

        assert_eq!(frame.length(), 2);
        assert_equal_lengths(&frame);

        let types: Vec<FieldType> = frame.fields().iter().map(|f| f.field_type).collect();
        assert_eq!(
            types,
            vec![FieldType::Boolean, FieldType::Number, FieldType::String]
        );
        assert_eq!(values(&frame, "flag"), vec![json!(true), json!(false)]);
        assert_eq!(values(&frame, "Field 2"), vec![json!(12), Value::Null]);
        assert_eq!(values(&frame, "Field 3"), vec![json!("label"), Value::Null]);
        assert_eq!(
            frame.get_first_field_of_type(FieldType::String).unwrap().name,
            "Field 3"
        );
    }

    #[test]
    fn test_append_row_extra_cells_after_first_row() {
        let mut frame = DataFrame::new();
        frame.append_row(&[json!(1)]);
        frame.append_row(&[json!(2), json!("b")]);
        assert_equal_lengths(&frame);
        assert_eq!(values(&frame, "Field 2"), vec![Value::Null, json!("b")]);
    }

    #[test]
    fn test_append_row_from_by_name() {
        let mut frame = DataFrame::new();
        frame.add_field(FieldDto::new("time", FieldType::Time));
        frame.add_field(FieldDto::new("value", FieldType::Number));

        let mut record = Record::new();
        record.insert("value".into(), json!("3.5"));
        record.insert("time".into(), json!(1000));
        frame.append_row_from(&record);

        let mut partial = Record::new();
        partial.insert("value".into(), json!(1));
        frame.append_row_from(&partial);

        assert_eq!(frame.length(), 2);
        assert_equal_lengths(&frame);
        assert_eq!(values(&frame, "time"), vec![json!(1000), Value::Null]);
        assert_eq!(values(&frame, "value"), vec![json!(3.5), json!(1)]);
    }

    #[test]
    fn test_reverse() {
        let mut frame = DataFrame::from_dto(DataFrameDto {
            fields: vec![FieldDto::new("v", FieldType::String)
                .with_values(vec![json!("a"), json!("b"), json!("c")])],
            ..Default::default()
        });
        frame.reverse();
        assert_eq!(values(&frame, "v"), vec![json!("c"), json!("b"), json!("a")]);
    }

    #[test]
    fn test_get_fields_by_type_preserves_order() {
        let frame = DataFrame::from_dto(DataFrameDto {
            fields: vec![
                FieldDto::new("n1", FieldType::Number),
                FieldDto::new("s", FieldType::String),
                FieldDto::new("n2", FieldType::Number),
            ],
            ..Default::default()
        });
        let names: Vec<&str> = frame
            .get_fields(Some(FieldType::Number))
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["n1", "n2"]);
        assert_eq!(frame.get_fields(None).len(), 3);
        assert!(frame.get_fields(Some(FieldType::Boolean)).is_empty());
        assert!(!frame.has_field_named("missing"));
    }

    #[test]
    fn test_from_frame_copies_mutable_frame() {
        let mut source = crate::mutable_frame::MutableDataFrame::new();
        source.name = Some("live".into());
        source.add_field(FieldDto::new("time", FieldType::Time));
        source.add_field(FieldDto::new("value", FieldType::Number));
        let mut record = Record::new();
        record.insert("time".into(), json!(1000));
        record.insert("value".into(), json!(3));
        source.add(&record, false);

        let frame = DataFrame::from_frame(&source);
        assert_eq!(frame.name(), Some("live"));
        assert_eq!(frame.length(), 1);
        assert_eq!(values(&frame, "value"), vec![json!(3)]);
        assert_eq!(
            frame.get_first_field_of_type(FieldType::Time).unwrap().name,
            "time"
        );
    }

    #[test]
    fn test_dto_round_trip() {
        let mut labels = Labels::new();
        labels.insert("host".into(), "a".into());
        let dto = DataFrameDto {
            ref_id: Some("A".into()),
            name: Some("cpu".into()),
            labels: Some(labels),
            meta: Some(QueryResultMeta::default()),
            fields: vec![
                FieldDto::new("time", FieldType::Time)
                    .with_config(FieldConfig::default())
                    .with_values(vec![json!(1), json!(2)]),
                FieldDto::new("value", FieldType::Number)
                    .with_config(FieldConfig::default().with_unit("ms"))
                    .with_values(vec![json!(0.5), json!(1.5)]),
            ],
        };

        let frame = DataFrame::from_dto(dto.clone());
        assert_eq!(frame.to_dto(), dto);

        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["refId"], json!("A"));
        assert_eq!(json["fields"][1]["config"]["unit"], json!("ms"));
    }
}
