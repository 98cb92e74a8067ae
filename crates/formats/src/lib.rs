//! Unit-aware number formatting.
//!
//! Formatters are grouped into categories and looked up by id through a
//! registry that is built once per process.

pub mod categories;
mod registry;
pub mod symbols;
pub mod time;
mod value_format;

pub use registry::{
    format_registry, get_value_format, get_value_formats, FormatMenu, FormatMenuItem,
    FormatRegistry,
};
pub use value_format::{
    get_decimals_for_value, locale, number_to_string, scaled_units, simple_count_unit, to_fixed,
    to_fixed_scaled, to_fixed_unit, DecimalCount, DecimalInfo, ValueFormat, ValueFormatCategory,
    ValueFormatter,
};
