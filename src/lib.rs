//! dashframe: Columnar data frames and display values for dashboard panels
//!
//! This library ties the workspace crates together:
//! - Frames and vector storage (`dashframe-core`)
//! - The value format registry (`dashframe-formats`)
//! - The field display pipeline (`dashframe-display`)
//! - Configuration management

pub mod config;
pub mod stream;

pub use dashframe_core as frames;
pub use dashframe_display as display;
pub use dashframe_formats as formats;
pub use dashframe_types as types;

// Re-export commonly used types
pub use config::AppConfig;
pub use dashframe_core::{CircularDataFrame, DataFrame, Frame, MutableDataFrame};
pub use dashframe_display::{get_field_display_values, FieldDisplay, FieldDisplayOptions};
