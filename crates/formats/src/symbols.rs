//! Prefix-scaled and currency formatters

use std::sync::Arc;

use crate::value_format::{scaled_units, ValueFormatter};

const SI_PREFIXES: [&str; 12] = ["n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y"];
const BINARY_PREFIXES: [&str; 9] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi", "Yi"];

/// Powers of 1024 with IEC prefixes: `1536` bytes -> `1.5 KiB`
pub fn binary_prefix(unit: &str, offset: usize) -> ValueFormatter {
    let units = BINARY_PREFIXES
        .iter()
        .skip(offset)
        .map(|prefix| format!(" {}{}", prefix, unit))
        .collect();
    scaled_units(1024.0, units)
}

/// Powers of 1000 with SI prefixes. `offset` shifts the base: an offset
/// of 1 treats the input as already in kilo-units.
pub fn decimal_si_prefix(unit: &str, offset: i32) -> ValueFormatter {
    let start = (3 + offset).clamp(0, SI_PREFIXES.len() as i32) as usize;
    let units = SI_PREFIXES[start..]
        .iter()
        .map(|prefix| format!(" {}{}", prefix, unit))
        .collect();
    scaled_units(1000.0, units)
}

/// Symbol prefixed to a K/M/B/T scaled amount: `1500` -> `$1.5K`
pub fn currency(symbol: &str) -> ValueFormatter {
    let units: Vec<String> = ["", "K", "M", "B", "T"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let scaler = scaled_units(1000.0, units);
    let symbol = symbol.to_string();
    Arc::new(move |size, decimals, scaled_decimals, is_utc| {
        if size.is_nan() {
            return String::new();
        }
        let scaled = scaler(size, decimals, scaled_decimals, is_utc);
        format!("{}{}", symbol, scaled)
    })
}
