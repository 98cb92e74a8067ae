//! Layered merging of partial field configs

use dashframe_types::{FieldConfig, MAX_DECIMALS};
use log::{trace, warn};

/// Merge configs left to right. Later layers win property by property,
/// but only with values that are usable: non-finite numbers, empty
/// strings and the `none` unit are skipped.
///
/// The merged result always has its first threshold at `-Infinity` and
/// `min <= max`.
pub fn get_field_properties(layers: &[&FieldConfig]) -> FieldConfig {
    let mut merged = FieldConfig::default();
    for layer in layers {
        apply_field_properties(&mut merged, layer);
    }

    if let Some(first) = merged.thresholds.as_mut().and_then(|t| t.first_mut()) {
        first.value = f64::NEG_INFINITY;
    }

    if let (Some(min), Some(max)) = (merged.min, merged.max) {
        if min > max {
            merged.min = Some(max);
            merged.max = Some(min);
        }
    }

    merged
}

/// Merges one property from a layer into the accumulated config
type PropertyMerge = fn(&mut FieldConfig, &FieldConfig);

/// One validating merge per recognized property, applied in order
const FIELD_PROPERTIES: &[(&str, PropertyMerge)] = &[
    ("title", |target, source| {
        if let Some(title) = non_empty(&source.title) {
            target.title = Some(title);
        }
    }),
    ("filterable", |target, source| {
        if source.filterable.is_some() {
            target.filterable = source.filterable;
        }
    }),
    ("unit", |target, source| match source.unit.as_deref() {
        Some("none") | Some("") | None => {}
        Some(unit) => target.unit = Some(unit.to_string()),
    }),
    ("decimals", |target, source| {
        if let Some(decimals) = source.decimals {
            target.decimals = Some(decimals.clamp(0, MAX_DECIMALS));
        }
    }),
    ("min", |target, source| {
        if let Some(min) = finite("min", source.min) {
            target.min = Some(min);
        }
    }),
    ("max", |target, source| {
        if let Some(max) = finite("max", source.max) {
            target.max = Some(max);
        }
    }),
    ("thresholds", |target, source| {
        if source.thresholds.is_some() {
            target.thresholds = source.thresholds.clone();
        }
    }),
    ("mappings", |target, source| {
        if source.mappings.is_some() {
            target.mappings = source.mappings.clone();
        }
    }),
    ("links", |target, source| {
        if source.links.is_some() {
            target.links = source.links.clone();
        }
    }),
    ("noValue", |target, source| {
        if let Some(no_value) = non_empty(&source.no_value) {
            target.no_value = Some(no_value);
        }
    }),
];

/// Copy every valid property of `source` onto `target`
pub fn apply_field_properties(target: &mut FieldConfig, source: &FieldConfig) {
    for (name, merge) in FIELD_PROPERTIES {
        trace!("Merging field property {}", name);
        merge(target, source);
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn finite(name: &str, value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if v.is_finite() => Some(v),
        Some(v) => {
            warn!("Ignoring non-finite {} in field config: {}", name, v);
            None
        }
        None => None,
    }
}
