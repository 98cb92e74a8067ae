//! dashframe-core: Columnar frames for dashframe.
//!
//! This crate contains the vector storage abstraction, field type
//! inference, and the three frame flavours (`DataFrame`,
//! `MutableDataFrame`, `CircularDataFrame`) that ingestion builds and the
//! display pipeline reads.

mod data_frame;
mod error;
mod field;
mod frame;
pub mod inference;
mod mutable_frame;
pub mod parse;
pub mod vector;

pub use data_frame::DataFrame;
pub use error::{FrameError, Result};
pub use field::Field;
pub use frame::{parse_frames, Frame};
pub use inference::{guess_field_type_for_field, guess_field_type_from_value};
pub use mutable_frame::{CircularDataFrame, MutableDataFrame};
pub use parse::FieldParser;
pub use vector::{
    AppendMode, ArrayVector, BoxedVector, CircularOptions, CircularVector, Vector, VectorFactory,
};

// Re-export types used in frame signatures for convenience
pub use dashframe_types::{
    DataFrameDto, FieldConfig, FieldDto, FieldType, Labels, QueryResultMeta, Record,
};
