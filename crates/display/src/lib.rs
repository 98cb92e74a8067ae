//! dashframe-display: From frames to display values.
//!
//! Resolves each field's effective config, reduces or enumerates its
//! values, then formats, colors, titles and links every result.

mod field_display;
mod field_properties;
pub mod links;
mod processor;
pub mod reducers;

pub use field_display::{
    get_field_display_values, get_title_template, FieldDisplay, FieldDisplayOptions,
    FieldDisplayRequest, FieldMatcher, FieldOverride,
};
pub use field_properties::{apply_field_properties, get_field_properties};
pub use links::{
    DataLinkResolver, LinkOptions, Linker, StaticTimeRange, TemplateReplacer, TimeRangeProvider,
    UrlTimeRange, VariableReplacer,
};
pub use processor::{
    get_color_from_threshold, get_mapped_value, resolve_formatter, to_number, DisplayProcessor,
};
pub use reducers::{get_field_reducers, reduce_field, FieldReducerInfo};
