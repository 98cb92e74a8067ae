//! Formatting primitives shared by every unit.
//!
//! A formatter maps a number plus optional decimal hints to display text.
//! `NaN` stands in for a missing value and always formats as `""`.

use std::sync::Arc;

/// Requested fractional digits; `None` lets the value pick its own
pub type DecimalCount = Option<i32>;

/// Most fractional digits `to_fixed` will write
pub const MAX_DECIMALS: i32 = 20;

/// `(value, decimals, scaled_decimals, is_utc) -> text`
pub type ValueFormatter =
    Arc<dyn Fn(f64, DecimalCount, DecimalCount, bool) -> String + Send + Sync>;

/// A registered formatter
#[derive(Clone)]
pub struct ValueFormat {
    pub name: String,
    pub id: String,
    pub format: ValueFormatter,
}

impl ValueFormat {
    pub fn new(name: &str, id: &str, format: ValueFormatter) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            format,
        }
    }
}

impl std::fmt::Debug for ValueFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueFormat")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// A named group of formatters, shown together in unit pickers
#[derive(Debug, Clone)]
pub struct ValueFormatCategory {
    pub name: String,
    pub formats: Vec<ValueFormat>,
}

impl ValueFormatCategory {
    pub fn new(name: &str, formats: Vec<ValueFormat>) -> Self {
        Self {
            name: name.to_string(),
            formats,
        }
    }
}

/// Decimal counts derived from a value's magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalInfo {
    pub decimals: i32,
    pub scaled_decimals: i32,
}

/// Round half up (toward positive infinity), as browsers do
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Shortest round-trip text for a number, switching to exponent
/// notation outside `[1e-6, 1e21)`
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }
    exponent_with_sign(format!("{:e}", value))
}

/// `1e21` -> `1e+21`
pub(crate) fn exponent_with_sign(formatted: String) -> String {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Pick "nice" decimal counts for a value.
///
/// The step size snaps to 1, 2, 2.5, 5 or 10 times a power of ten;
/// `scaled_decimals` is the precision needed once the value is scaled
/// by a unit prefix.
pub fn get_decimals_for_value(value: f64) -> DecimalInfo {
    let delta = value.abs() / 2.0;
    if delta == 0.0 || !delta.is_finite() {
        return DecimalInfo {
            decimals: 0,
            scaled_decimals: 0,
        };
    }

    let mut dec = -((delta.ln() / std::f64::consts::LN_10).floor() as i32);
    let magn = 10f64.powi(-dec);
    let norm = delta / magn;

    let mut size = if norm < 1.5 {
        1.0
    } else if norm < 3.0 {
        if norm > 2.25 {
            dec += 1;
            2.5
        } else {
            2.0
        }
    } else if norm < 7.5 {
        5.0
    } else {
        10.0
    };
    size *= magn;

    if value.floor() == value {
        dec = 0;
    }

    let decimals = dec.max(0);
    let scaled_decimals =
        decimals - (size.ln() / std::f64::consts::LN_10).floor() as i32 + 2;
    DecimalInfo {
        decimals,
        scaled_decimals,
    }
}

/// Round to `decimals` fractional digits and pad with zeros to exactly
/// that many. Without `decimals` the value's own magnitude decides.
pub fn to_fixed(value: f64, decimals: DecimalCount) -> String {
    if value.is_nan() {
        return String::new();
    }

    let decimals = decimals
        .unwrap_or_else(|| get_decimals_for_value(value).decimals)
        .clamp(0, MAX_DECIMALS);
    let factor = 10f64.powi(decimals);
    let rounded = round_half_up(value * factor) / factor;
    let formatted = if rounded.is_finite() {
        number_to_string(rounded)
    } else {
        number_to_string(value)
    };

    if formatted.contains('e') || value == 0.0 || !value.is_finite() {
        return formatted;
    }

    let precision = formatted
        .find('.')
        .map(|pos| formatted.len() - pos - 1)
        .unwrap_or(0) as i32;
    if precision < decimals {
        let mut padded = formatted;
        if precision == 0 {
            padded.push('.');
        }
        padded.push_str(&"0".repeat((decimals - precision) as usize));
        return padded;
    }

    formatted
}

/// Fixed formatting for a value already divided down to `ext`'s scale;
/// `additional_decimals` restores precision lost to the division.
pub fn to_fixed_scaled(
    value: f64,
    decimals: DecimalCount,
    scaled_decimals: DecimalCount,
    additional_decimals: i32,
    ext: &str,
) -> String {
    let (decimals, scaled_decimals) = match decimals {
        Some(d) => (Some(d), scaled_decimals),
        None => {
            let info = get_decimals_for_value(value);
            (Some(info.decimals), Some(info.scaled_decimals))
        }
    };

    match scaled_decimals {
        Some(scaled) if scaled != 0 => {
            format!("{}{}", to_fixed(value, Some(scaled + additional_decimals)), ext)
        }
        _ => format!("{}{}", to_fixed(value, decimals), ext),
    }
}

/// Fixed formatting followed by a space and `unit`
pub fn to_fixed_unit(unit: &str) -> ValueFormatter {
    let unit = unit.to_string();
    Arc::new(move |size, decimals, _, _| {
        if size.is_nan() {
            return String::new();
        }
        let fixed = to_fixed(size, decimals);
        if unit.is_empty() {
            fixed
        } else {
            format!("{} {}", fixed, unit)
        }
    })
}

/// Divide by `factor` while the magnitude allows, picking the suffix for
/// the number of divisions. Running off the suffix table yields `NA`.
pub fn scaled_units(factor: f64, suffixes: Vec<String>) -> ValueFormatter {
    Arc::new(move |size, decimals, scaled_decimals, _| {
        if size.is_nan() {
            return String::new();
        }

        let mut size = size;
        let mut steps = 0usize;
        while size.abs() >= factor {
            steps += 1;
            size /= factor;
            if steps >= suffixes.len() {
                return "NA".to_string();
            }
        }

        let decimals = match scaled_decimals {
            Some(scaled) if steps > 0 => Some(scaled + 3 * steps as i32),
            _ => decimals,
        };

        format!("{}{}", to_fixed(size, decimals), suffixes[steps])
    })
}

/// Counts with K/M/B/T scaling and a trailing symbol
pub fn simple_count_unit(symbol: &str) -> ValueFormatter {
    let scaler = scaled_units(1000.0, suffixes(&["", "K", "M", "B", "T"]));
    let symbol = symbol.to_string();
    Arc::new(move |size, decimals, scaled_decimals, is_utc| {
        if size.is_nan() {
            return String::new();
        }
        format!("{} {}", scaler(size, decimals, scaled_decimals, is_utc), symbol)
    })
}

/// Grouped thousands with at most `decimals` fractional digits (default 3)
pub fn locale(value: f64, decimals: DecimalCount) -> String {
    if value.is_nan() {
        return String::new();
    }
    if value.is_infinite() {
        return number_to_string(value);
    }

    let max_fraction = decimals.unwrap_or(3).clamp(0, 20) as usize;
    let rounded = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i.to_string(), f.trim_end_matches('0').to_string()),
        None => (rounded, String::new()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

pub(crate) fn suffixes(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_default_decimals() {
        assert_eq!(to_fixed(1.0, None), "1");
        assert_eq!(to_fixed(1.2345678901, None), "1.2");
        assert_eq!(to_fixed(1.23456789012, None), "1.2");
        assert_eq!(to_fixed(1.234567890123, None), "1.2");
        assert_eq!(to_fixed(12345.678, None), "12346");
    }

    #[test]
    fn test_to_fixed_explicit_decimals() {
        assert_eq!(to_fixed(1.0, Some(3)), "1.000");
        assert_eq!(to_fixed(1.2, Some(3)), "1.200");
        assert_eq!(to_fixed(1.23, Some(3)), "1.230");
        assert_eq!(to_fixed(1.234, Some(3)), "1.234");
        assert_eq!(to_fixed(1.2345, Some(3)), "1.235");
        assert_eq!(to_fixed(1.23456789, Some(3)), "1.235");
        assert_eq!(to_fixed(-2.5, Some(0)), "-2");
    }

    #[test]
    fn test_to_fixed_edge_cases() {
        assert_eq!(to_fixed(f64::NAN, Some(2)), "");
        assert_eq!(to_fixed(0.0, Some(2)), "0");
        assert_eq!(to_fixed(1e21, Some(2)), "1e+21");
        assert_eq!(to_fixed(5.0, Some(-1)), "5");
    }

    #[test]
    fn test_to_fixed_caps_decimals() {
        let huge = to_fixed(1.5, Some(50_000_000));
        assert_eq!(huge, format!("1.5{}", "0".repeat(19)));
        assert_eq!(to_fixed(1.0, Some(i32::MAX)).len(), 22);
        assert_eq!(to_fixed(1e300, Some(30)), "1e+300");
    }

    #[test]
    fn test_decimals_for_value() {
        assert_eq!(get_decimals_for_value(1.2345678901).decimals, 1);
        assert_eq!(get_decimals_for_value(12345.678).decimals, 0);
        assert_eq!(get_decimals_for_value(10.0).decimals, 0);
        assert_eq!(get_decimals_for_value(0.0).decimals, 0);
        assert_eq!(get_decimals_for_value(0.0123).decimals, 3);
    }

    #[test]
    fn test_scaled_units() {
        let f = scaled_units(1000.0, suffixes(&[" B", " kB", " MB"]));
        assert_eq!(f(500.0, Some(0), None, false), "500 B");
        assert_eq!(f(1500.0, Some(1), None, false), "1.5 kB");
        assert_eq!(f(2_000_000.0, Some(0), None, false), "2 MB");
        assert_eq!(f(5e9, Some(0), None, false), "NA");
        assert_eq!(f(f64::NAN, None, None, false), "");
    }

    #[test]
    fn test_scaled_decimals_add_three_per_step() {
        let f = scaled_units(1000.0, suffixes(&["", "k"]));
        assert_eq!(f(1234.5678, Some(0), Some(-2), false), "1.2k");
    }

    #[test]
    fn test_to_fixed_scaled() {
        assert_eq!(to_fixed_scaled(1.5, Some(2), None, 3, " s"), "1.50 s");
        assert_eq!(to_fixed_scaled(2.5, Some(1), Some(1), 3, " s"), "2.5000 s");
    }

    #[test]
    fn test_locale_grouping() {
        assert_eq!(locale(1234567.891, Some(2)), "1,234,567.89");
        assert_eq!(locale(-1000.0, None), "-1,000");
        assert_eq!(locale(12.0, None), "12");
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(1.0), "1");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(2e21), "2e+21");
    }
}
