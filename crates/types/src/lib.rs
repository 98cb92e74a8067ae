//! dashframe-types: Shared data types for dashframe.
//!
//! This crate contains pure data types (field configs, ingestion DTOs,
//! display values, link models, colors) that are shared across all
//! dashframe crates. These types carry no frame or formatting logic,
//! making them suitable as a foundation layer.

pub mod color;
pub mod display;
pub mod field;
pub mod frame;
pub mod variables;

// Re-export commonly used types at the crate root for convenience
pub use color::{resolve_color, Color};
pub use display::{DisplayValue, LinkModel, LinkTarget};
pub use field::{DataLink, FieldConfig, FieldType, Threshold, ValueMapping, MAX_DECIMALS};
pub use frame::{DataFrameDto, FieldDto, Labels, NoticeSeverity, QueryResultMeta, QueryResultNotice};
pub use variables::{builtin, ScopedVar, ScopedVars};

/// A logical row keyed by field name, in field order.
pub type Record = serde_json::Map<String, serde_json::Value>;
