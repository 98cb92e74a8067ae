//! A named, typed column

use crate::parse::FieldParser;
use crate::vector::{ArrayVector, BoxedVector, Vector};
use dashframe_types::{FieldConfig, FieldDto, FieldType};
use serde_json::Value;

/// One column of a frame. The field exclusively owns its vector.
#[derive(Debug)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub config: FieldConfig,
    pub values: BoxedVector,
    parser: Option<FieldParser>,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        config: FieldConfig,
        values: BoxedVector,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            config,
            values,
            parser: None,
        }
    }

    /// Build an array-backed field from a DTO; missing parts stay empty
    pub fn from_dto(dto: FieldDto) -> Self {
        Self::new(
            dto.name.unwrap_or_default(),
            dto.field_type.unwrap_or_default(),
            dto.config.unwrap_or_default(),
            Box::new(ArrayVector::new(dto.values.unwrap_or_default())),
        )
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a raw cell with this field's parser, choosing the parser on
    /// first use
    pub fn parse_value(&mut self, raw: &Value) -> Value {
        let field_type = self.field_type;
        let parser = *self
            .parser
            .get_or_insert_with(|| FieldParser::for_type(field_type));
        parser.parse(raw)
    }

    pub fn to_dto(&self) -> FieldDto {
        FieldDto {
            name: Some(self.name.clone()),
            field_type: Some(self.field_type),
            config: Some(self.config.clone()),
            values: Some(self.values.to_vec()),
        }
    }
}
