//! Aggregate functions that reduce a field to a single value

use std::collections::HashSet;

use dashframe_core::{Field, Vector};
use log::warn;
use once_cell::sync::Lazy;
use serde_json::{Number, Value};

/// Well-known reducer ids
pub mod reducer_id {
    pub const FIRST: &str = "first";
    pub const LAST: &str = "last";
    pub const FIRST_NOT_NULL: &str = "firstNotNull";
    pub const LAST_NOT_NULL: &str = "lastNotNull";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const MEAN: &str = "mean";
    pub const SUM: &str = "sum";
    pub const COUNT: &str = "count";
    pub const RANGE: &str = "range";
    pub const DELTA: &str = "delta";
    pub const DIFF: &str = "diff";
    pub const LOG_MIN: &str = "logmin";
    pub const ALL_IS_NULL: &str = "allIsNull";
    pub const ALL_IS_ZERO: &str = "allIsZero";
    pub const CHANGE_COUNT: &str = "changeCount";
    pub const DISTINCT_COUNT: &str = "distinctCount";
}

pub type ReduceFn = fn(&dyn Vector) -> Value;

#[derive(Debug, Clone, Copy)]
pub struct FieldReducerInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub reduce: ReduceFn,
}

impl FieldReducerInfo {
    const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        reduce: ReduceFn,
    ) -> Self {
        Self {
            id,
            name,
            description,
            reduce,
        }
    }
}

static REDUCERS: Lazy<Vec<FieldReducerInfo>> = Lazy::new(|| {
    use reducer_id::*;
    vec![
        FieldReducerInfo::new(FIRST, "First", "First value", first),
        FieldReducerInfo::new(LAST, "Last", "Last value", last),
        FieldReducerInfo::new(
            FIRST_NOT_NULL,
            "First (not null)",
            "First non-null value",
            first_not_null,
        ),
        FieldReducerInfo::new(
            LAST_NOT_NULL,
            "Last (not null)",
            "Last non-null value",
            last_not_null,
        ),
        FieldReducerInfo::new(MIN, "Min", "Minimum value", min),
        FieldReducerInfo::new(MAX, "Max", "Maximum value", max),
        FieldReducerInfo::new(MEAN, "Mean", "Average value", mean),
        FieldReducerInfo::new(SUM, "Total", "The sum of all values", sum),
        FieldReducerInfo::new(COUNT, "Count", "Number of values in response", count),
        FieldReducerInfo::new(
            RANGE,
            "Range",
            "Difference between minimum and maximum values",
            range,
        ),
        FieldReducerInfo::new(DELTA, "Delta", "Cumulative change, counter resets included", delta),
        FieldReducerInfo::new(DIFF, "Difference", "Difference between first and last values", diff),
        FieldReducerInfo::new(LOG_MIN, "Min (above zero)", "Used for log min scale", log_min),
        FieldReducerInfo::new(ALL_IS_NULL, "All Nulls", "Every value is null", all_is_null),
        FieldReducerInfo::new(ALL_IS_ZERO, "All Zeros", "Every value is zero", all_is_zero),
        FieldReducerInfo::new(
            CHANGE_COUNT,
            "Change Count",
            "Number of times the value changes",
            change_count,
        ),
        FieldReducerInfo::new(
            DISTINCT_COUNT,
            "Distinct Count",
            "Number of distinct values",
            distinct_count,
        ),
    ]
});

/// Every registered reducer, in menu order
pub fn field_reducers() -> &'static [FieldReducerInfo] {
    &REDUCERS
}

/// Look up reducers by id, keeping the requested order. Unknown ids are
/// skipped.
pub fn get_field_reducers<S: AsRef<str>>(ids: &[S]) -> Vec<&'static FieldReducerInfo> {
    ids.iter()
        .filter_map(|id| {
            let id = id.as_ref();
            let found = REDUCERS.iter().find(|r| r.id == id);
            if found.is_none() {
                warn!("Unknown reducer id: {}", id);
            }
            found
        })
        .collect()
}

/// Run each known reducer over the field's values
pub fn reduce_field<S: AsRef<str>>(field: &Field, ids: &[S]) -> Vec<(&'static str, Value)> {
    get_field_reducers(ids)
        .into_iter()
        .map(|reducer| (reducer.id, (reducer.reduce)(&*field.values)))
        .collect()
}

/// Numeric reading of a cell: JSON numbers and numeric strings
pub fn numeric_reading(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn numbers(values: &dyn Vector) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(numeric_reading)
}

fn number(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

fn first(values: &dyn Vector) -> Value {
    values.get(0).cloned().unwrap_or(Value::Null)
}

fn last(values: &dyn Vector) -> Value {
    values
        .len()
        .checked_sub(1)
        .and_then(|i| values.get(i))
        .cloned()
        .unwrap_or(Value::Null)
}

fn first_not_null(values: &dyn Vector) -> Value {
    values
        .iter()
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

fn last_not_null(values: &dyn Vector) -> Value {
    let mut found = Value::Null;
    for value in values.iter().filter(|v| !v.is_null()) {
        found = value.clone();
    }
    found
}

fn min(values: &dyn Vector) -> Value {
    numbers(values).reduce(f64::min).map(number).unwrap_or(Value::Null)
}

fn max(values: &dyn Vector) -> Value {
    numbers(values).reduce(f64::max).map(number).unwrap_or(Value::Null)
}

fn sum(values: &dyn Vector) -> Value {
    number(numbers(values).sum())
}

fn mean(values: &dyn Vector) -> Value {
    let (total, n) = numbers(values).fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
    if n == 0 {
        return Value::Null;
    }
    number(total / n as f64)
}

fn count(values: &dyn Vector) -> Value {
    Value::from(values.len())
}

fn range(values: &dyn Vector) -> Value {
    let bounds = numbers(values).fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        None => Some((v, v)),
    });
    match bounds {
        Some((lo, hi)) => number(hi - lo),
        None => Value::Null,
    }
}

fn delta(values: &dyn Vector) -> Value {
    let mut total = 0.0;
    let mut previous: Option<f64> = None;
    for current in numbers(values) {
        if let Some(prev) = previous {
            let step = current - prev;
            // A drop means the counter was reset
            total += if step >= 0.0 { step } else { current };
        }
        previous = Some(current);
    }
    number(total)
}

fn diff(values: &dyn Vector) -> Value {
    let mut readings = numbers(values);
    let Some(first) = readings.next() else {
        return Value::Null;
    };
    let last = readings.last().unwrap_or(first);
    number(last - first)
}

fn log_min(values: &dyn Vector) -> Value {
    numbers(values)
        .filter(|v| *v > 0.0)
        .reduce(f64::min)
        .map(number)
        .unwrap_or(Value::Null)
}

fn all_is_null(values: &dyn Vector) -> Value {
    Value::Bool(values.iter().all(Value::is_null))
}

fn all_is_zero(values: &dyn Vector) -> Value {
    let mut seen = false;
    for value in values.iter().filter(|v| !v.is_null()) {
        if numeric_reading(value) != Some(0.0) {
            return Value::Bool(false);
        }
        seen = true;
    }
    Value::Bool(seen)
}

fn change_count(values: &dyn Vector) -> Value {
    let mut changes = 0usize;
    let mut previous: Option<&Value> = None;
    for value in values.iter().filter(|v| !v.is_null()) {
        if previous.is_some_and(|p| p != value) {
            changes += 1;
        }
        previous = Some(value);
    }
    Value::from(changes)
}

fn distinct_count(values: &dyn Vector) -> Value {
    let distinct: HashSet<String> = values
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .collect();
    Value::from(distinct.len())
}
