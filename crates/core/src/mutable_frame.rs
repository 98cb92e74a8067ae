//! Record-oriented frames: whole logical rows in and out

use crate::error::{FrameError, Result};
use crate::field::Field;
use crate::frame::Frame;
use crate::inference::guess_field_type_from_value;
use crate::vector::{ArrayVector, CircularOptions, CircularVector, Vector, VectorFactory};
use dashframe_types::{DataFrameDto, FieldDto, FieldType, Labels, QueryResultMeta, Record};
use log::debug;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// A frame that reads and writes whole records.
///
/// The backing storage for every column comes from the factory given at
/// construction. Length is the length of the first field added.
pub struct MutableDataFrame {
    pub name: Option<String>,
    pub labels: Option<Labels>,
    pub ref_id: Option<String>,
    pub meta: Option<QueryResultMeta>,
    fields: Vec<Field>,
    values: HashMap<String, usize>,
    creator: VectorFactory,
}

impl MutableDataFrame {
    /// Create an empty frame backed by array vectors
    pub fn new() -> Self {
        Self::with_factory(ArrayVector::factory())
    }

    /// Create an empty frame with custom vector storage
    pub fn with_factory(creator: VectorFactory) -> Self {
        Self {
            name: None,
            labels: None,
            ref_id: None,
            meta: None,
            fields: Vec::new(),
            values: HashMap::new(),
            creator,
        }
    }

    pub fn from_dto(dto: DataFrameDto) -> Self {
        Self::from_dto_with_factory(dto, ArrayVector::factory())
    }

    pub fn from_dto_with_factory(dto: DataFrameDto, creator: VectorFactory) -> Self {
        let mut frame = Self::with_factory(creator);
        frame.name = dto.name;
        frame.labels = dto.labels;
        frame.ref_id = dto.ref_id;
        frame.meta = dto.meta;
        for field in dto.fields {
            frame.add_field(field);
        }
        frame
    }

    /// Add a column. A field whose name already exists is skipped and
    /// `None` is returned.
    pub fn add_field(&mut self, dto: FieldDto) -> Option<&Field> {
        let buffer = dto.values.unwrap_or_default();
        let field_type = match dto.field_type {
            Some(t) => t,
            None => buffer
                .first()
                .map(guess_field_type_from_value)
                .unwrap_or(FieldType::Other),
        };

        let name = match dto.name {
            Some(name) if !name.is_empty() => name,
            _ if field_type == FieldType::Time => {
                if self.values.contains_key("Time") {
                    format!("Time {}", self.fields.len() + 1)
                } else {
                    "Time".to_string()
                }
            }
            _ => format!("Field {}", self.fields.len() + 1),
        };
        if self.values.contains_key(&name) {
            debug!("Field {} already exists, skipping", name);
            return None;
        }

        let index = self.fields.len();
        let values = (self.creator)(buffer);
        self.fields.push(Field::new(
            name.clone(),
            field_type,
            dto.config.unwrap_or_default(),
            values,
        ));
        self.values.insert(name, index);

        let length = self
            .fields
            .iter()
            .map(|f| f.values.len())
            .max()
            .unwrap_or(0);
        for field in &mut self.fields {
            for _ in field.values.len()..length {
                field.values.add(Value::Null);
            }
        }

        self.fields.get(index)
    }

    fn add_missing_fields_for(&mut self, record: &Record) {
        for (key, value) in record {
            if !self.values.contains_key(key) {
                self.add_field(FieldDto::new(key.clone(), guess_field_type_from_value(value)));
            }
        }
    }

    /// Append one record; fields missing from it receive `null`
    pub fn add(&mut self, record: &Record, add_missing_fields: bool) {
        if add_missing_fields {
            self.add_missing_fields_for(record);
        }
        for field in &mut self.fields {
            let value = record.get(&field.name).cloned().unwrap_or(Value::Null);
            field.values.add(value);
        }
    }

    /// Overwrite the record at `index`. Writing at `length` appends;
    /// anything further is rejected.
    pub fn set(
        &mut self,
        index: usize,
        record: Option<&Record>,
        add_missing_fields: bool,
    ) -> Result<()> {
        let length = self.length();
        if index > length {
            return Err(FrameError::IndexOutOfRange { index, length });
        }

        let empty = Record::new();
        let record = record.unwrap_or(&empty);
        if add_missing_fields {
            self.add_missing_fields_for(record);
        }
        for field in &mut self.fields {
            let value = record.get(&field.name).cloned().unwrap_or(Value::Null);
            field.values.set(index, value);
        }
        Ok(())
    }

    /// Rebuild the record at `index` from every column
    pub fn get(&self, index: usize) -> Record {
        self.fields
            .iter()
            .map(|f| {
                let value = f.values.get(index).cloned().unwrap_or(Value::Null);
                (f.name.clone(), value)
            })
            .collect()
    }

    /// Every record in row order
    pub fn to_array(&self) -> Vec<Record> {
        (0..self.length()).map(|i| self.get(i)).collect()
    }

    /// The vector backing a named field
    pub fn values(&self, name: &str) -> Option<&dyn Vector> {
        self.values
            .get(name)
            .map(|&i| self.fields[i].values.as_ref())
    }

    pub fn get_field_by_name(&self, name: &str) -> Option<&Field> {
        self.values.get(name).map(|&i| &self.fields[i])
    }
}

impl Default for MutableDataFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MutableDataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableDataFrame")
            .field("name", &self.name)
            .field("ref_id", &self.ref_id)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl Frame for MutableDataFrame {
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
        self.fields.first().map(|f| f.values.len()).unwrap_or(0)
    }
}

impl Serialize for MutableDataFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_dto().serialize(serializer)
    }
}

/// A [`MutableDataFrame`] whose columns never hold more than a fixed
/// number of values, for streaming ingestion.
#[derive(Debug)]
pub struct CircularDataFrame {
    inner: MutableDataFrame,
    options: CircularOptions,
}

impl CircularDataFrame {
    pub fn new(options: CircularOptions) -> Self {
        Self {
            inner: MutableDataFrame::with_factory(CircularVector::factory(options)),
            options,
        }
    }

    pub fn options(&self) -> CircularOptions {
        self.options
    }

    pub fn into_inner(self) -> MutableDataFrame {
        self.inner
    }
}

impl Deref for CircularDataFrame {
    type Target = MutableDataFrame;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for CircularDataFrame {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Frame for CircularDataFrame {
    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn ref_id(&self) -> Option<&str> {
        self.inner.ref_id()
    }

    fn labels(&self) -> Option<&Labels> {
        self.inner.labels()
    }

    fn meta(&self) -> Option<&QueryResultMeta> {
        self.inner.meta()
    }

    fn fields(&self) -> &[Field] {
        self.inner.fields()
    }

    fn length(&self) -> usize {
        self.inner.length()
    }
}

impl Serialize for CircularDataFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::AppendMode;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_add_with_missing_fields() {
        let mut frame = MutableDataFrame::new();
        frame.add(&record(&[("a", json!(1)), ("b", json!("x"))]), true);
        frame.add(&record(&[("a", json!(2))]), false);
        frame.add(&record(&[("c", json!(true))]), true);

        assert_eq!(frame.length(), 3);
        for field in frame.fields() {
            assert_eq!(field.values.len(), 3);
        }
        assert_eq!(frame.get_field_by_name("b").unwrap().field_type, FieldType::String);
        assert_eq!(frame.get_field_by_name("c").unwrap().field_type, FieldType::Boolean);
        assert_eq!(
            frame.get(2),
            record(&[("a", Value::Null), ("b", Value::Null), ("c", json!(true))])
        );
        assert_eq!(
            frame.values("c").unwrap().to_vec(),
            vec![Value::Null, Value::Null, json!(true)]
        );
    }

    #[test]
    fn test_add_field_skips_duplicates() {
        let mut frame = MutableDataFrame::new();
        assert!(frame.add_field(FieldDto::new("a", FieldType::Number)).is_some());
        assert!(frame.add_field(FieldDto::new("a", FieldType::String)).is_none());
        assert_eq!(frame.fields().len(), 1);
    }

    #[test]
    fn test_add_field_pads_to_longest() {
        let mut frame = MutableDataFrame::new();
        frame.add_field(FieldDto::new("a", FieldType::Number).with_values(vec![json!(1)]));
        frame.add_field(FieldDto {
            name: Some("b".into()),
            values: Some(vec![json!("x"), json!("y")]),
            ..Default::default()
        });
        assert_eq!(frame.length(), 2);
        assert_eq!(frame.get_field_by_name("b").unwrap().field_type, FieldType::String);
        assert_eq!(frame.values("a").unwrap().to_vec(), vec![json!(1), Value::Null]);
    }

    #[test]
    fn test_default_names() {
        let mut frame = MutableDataFrame::new();
        frame.add_field(FieldDto {
            field_type: Some(FieldType::Time),
            ..Default::default()
        });
        frame.add_field(FieldDto {
            field_type: Some(FieldType::Time),
            ..Default::default()
        });
        frame.add_field(FieldDto::default());
        let names: Vec<&str> = frame.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Time", "Time 2", "Field 3"]);
    }

    #[test]
    fn test_set_bounds() {
        let mut frame = MutableDataFrame::new();
        frame.add(&record(&[("a", json!(1))]), true);

        frame.set(0, Some(&record(&[("a", json!(5))])), false).unwrap();
        assert_eq!(frame.get(0)["a"], json!(5));

        // Writing exactly at the end appends
        frame.set(1, Some(&record(&[("a", json!(6))])), false).unwrap();
        assert_eq!(frame.length(), 2);

        let err = frame.set(5, None, false).unwrap_err();
        assert!(matches!(
            err,
            FrameError::IndexOutOfRange {
                index: 5,
                length: 2
            }
        ));

        frame.set(0, None, false).unwrap();
        assert_eq!(frame.get(0)["a"], Value::Null);
    }

    #[test]
    fn test_set_adds_missing_fields() {
        let mut frame = MutableDataFrame::new();
        frame.add(&record(&[("a", json!(1))]), true);
        frame.add(&record(&[("a", json!(2))]), true);

        let row = record(&[("a", json!(20)), ("b", json!("x"))]);
        frame.set(1, Some(&row), true).unwrap();
        assert_eq!(frame.length(), 2);
        assert_eq!(frame.get_field_by_name("b").unwrap().field_type, FieldType::String);
        assert_eq!(frame.values("b").unwrap().to_vec(), vec![Value::Null, json!("x")]);
        assert_eq!(frame.values("a").unwrap().to_vec(), vec![json!(1), json!(20)]);

        // Without the flag unknown keys are dropped
        frame.set(0, Some(&record(&[("c", json!(true))])), false).unwrap();
        assert!(frame.get_field_by_name("c").is_none());
        assert_eq!(frame.get(0), record(&[("a", Value::Null), ("b", Value::Null)]));

        // Appending through set grows every column together
        frame.set(2, Some(&record(&[("d", json!(4))])), true).unwrap();
        assert_eq!(frame.length(), 3);
        for field in frame.fields() {
            assert_eq!(field.values.len(), 3);
        }
        assert_eq!(
            frame.get(2),
            record(&[("a", Value::Null), ("b", Value::Null), ("d", json!(4))])
        );
    }

    #[test]
    fn test_circular_set_at_end_evicts() {
        let mut frame = CircularDataFrame::new(CircularOptions::new(2, AppendMode::Tail));
        frame.add(&record(&[("a", json!(1))]), true);
        frame.add(&record(&[("a", json!(2))]), true);

        frame.set(2, Some(&record(&[("a", json!(3))])), false).unwrap();
        assert_eq!(frame.length(), 2);
        assert_eq!(frame.values("a").unwrap().to_vec(), vec![json!(2), json!(3)]);

        frame.set(0, Some(&record(&[("a", json!(9))])), false).unwrap();
        assert_eq!(frame.values("a").unwrap().to_vec(), vec![json!(9), json!(3)]);
        assert!(frame.set(3, None, false).is_err());
    }

    #[test]
    fn test_to_array_and_dto() {
        let mut frame = MutableDataFrame::new();
        frame.name = Some("rows".into());
        frame.add(&record(&[("x", json!(1))]), true);
        frame.add(&record(&[("x", json!(2))]), true);
        assert_eq!(frame.to_array().len(), 2);

        let dto = frame.to_dto();
        assert_eq!(dto.name.as_deref(), Some("rows"));
        assert_eq!(dto.fields[0].values, Some(vec![json!(1), json!(2)]));

        let copy = MutableDataFrame::from_dto(dto.clone());
        assert_eq!(copy.to_dto(), dto);
    }

    #[test]
    fn test_circular_frame_is_bounded() {
        let mut frame = CircularDataFrame::new(CircularOptions::new(3, AppendMode::Tail));
        for i in 0..100 {
            frame.add(&record(&[("n", json!(i)), ("s", json!(format!("v{}", i)))]), true);
        }
        assert_eq!(frame.length(), 3);
        assert_eq!(
            frame.values("n").unwrap().to_vec(),
            vec![json!(97), json!(98), json!(99)]
        );
        assert_eq!(frame.get(0)["s"], json!("v97"));
    }

    #[test]
    fn test_circular_frame_late_field_stays_aligned() {
        let mut frame = CircularDataFrame::new(CircularOptions::new(2, AppendMode::Tail));
        frame.add(&record(&[("a", json!(1))]), true);
        frame.add(&record(&[("a", json!(2))]), true);
        frame.add(&record(&[("a", json!(3)), ("b", json!("late"))]), true);
        assert_eq!(frame.values("b").unwrap().to_vec(), vec![Value::Null, json!("late")]);
        assert_eq!(frame.values("a").unwrap().to_vec(), vec![json!(2), json!(3)]);
    }
}
