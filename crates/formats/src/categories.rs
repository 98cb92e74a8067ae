//! The built-in unit catalogue

use std::sync::Arc;

use crate::symbols::{binary_prefix, currency, decimal_si_prefix};
use crate::time::{
    date_time_formatter, to_clock, to_days, to_duration, to_hours, to_micro_seconds,
    to_milli_seconds, to_minutes, to_nano_seconds, to_seconds, DurationScale, ISO_FORMAT,
    ISO_TODAY_FORMAT, US_FORMAT, US_TODAY_FORMAT,
};
use crate::value_format::{
    exponent_with_sign, locale, scaled_units, simple_count_unit, suffixes, to_fixed,
    to_fixed_unit, DecimalCount, ValueFormat, ValueFormatCategory, ValueFormatter,
};

pub fn to_percent(size: f64, decimals: DecimalCount) -> String {
    if size.is_nan() {
        return String::new();
    }
    format!("{}%", to_fixed(size, decimals))
}

/// Ratio in `0.0..=1.0` shown as a percentage
pub fn to_percent_unit(size: f64, decimals: DecimalCount) -> String {
    if size.is_nan() {
        return String::new();
    }
    format!("{}%", to_fixed(100.0 * size, decimals))
}

/// Upper-case hexadecimal, fractional digits included
pub fn to_hex(value: f64, decimals: DecimalCount) -> String {
    if value.is_nan() {
        return String::new();
    }
    let rounded: f64 = to_fixed(value, decimals).parse().unwrap_or(value);
    if !rounded.is_finite() {
        return String::new();
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    let magnitude = rounded.abs();
    let mut text = format!("{}{:X}", sign, magnitude.trunc() as u64);

    let mut fraction = magnitude.fract();
    if fraction > 0.0 {
        text.push('.');
        // 13 hex digits cover the 52-bit mantissa
        for _ in 0..13 {
            if fraction == 0.0 {
                break;
            }
            fraction *= 16.0;
            let digit = fraction.trunc() as u32;
            text.push(std::char::from_digit(digit, 16).unwrap_or('0').to_ascii_uppercase());
            fraction = fraction.fract();
        }
    }
    text
}

pub fn to_hex_0x(value: f64, decimals: DecimalCount) -> String {
    let hex = to_hex(value, decimals);
    if hex.is_empty() {
        return hex;
    }
    match hex.strip_prefix('-') {
        Some(rest) => format!("-0x{}", rest),
        None => format!("0x{}", hex),
    }
}

/// Scientific notation with `decimals` mantissa digits
pub fn sci(value: f64, decimals: DecimalCount) -> String {
    if value.is_nan() {
        return String::new();
    }
    let text = match decimals {
        Some(d) => format!("{:.*e}", d.clamp(0, 20) as usize, value),
        None => format!("{:e}", value),
    };
    exponent_with_sign(text)
}

/// Adapt a formatter that only looks at value and decimals
fn plain(f: fn(f64, DecimalCount) -> String) -> ValueFormatter {
    Arc::new(move |size, decimals, _, _| f(size, decimals))
}

/// Adapt a duration chain that also takes scaled decimals
fn scaled(f: fn(f64, DecimalCount, DecimalCount) -> String) -> ValueFormatter {
    Arc::new(move |size, decimals, scaled_decimals, _| f(size, decimals, scaled_decimals))
}

fn fmt(name: &str, id: &str, format: ValueFormatter) -> ValueFormat {
    ValueFormat::new(name, id, format)
}

/// Every category in menu order. Ids are unique across categories.
pub fn get_categories() -> Vec<ValueFormatCategory> {
    vec![
        ValueFormatCategory::new(
            "Misc",
            vec![
                fmt("none", "none", to_fixed_unit("")),
                fmt(
                    "short",
                    "short",
                    scaled_units(
                        1000.0,
                        suffixes(&[
                            "", " K", " Mil", " Bil", " Tri", " Quadr", " Quint", " Sext", " Sept",
                        ]),
                    ),
                ),
                fmt("percent (0-100)", "percent", plain(to_percent)),
                fmt("percent (0.0-1.0)", "percentunit", plain(to_percent_unit)),
                fmt("Humidity (%H)", "humidity", to_fixed_unit("%H")),
                fmt("decibel", "decibel", to_fixed_unit("dB")),
                fmt("hexadecimal (0x)", "hex0x", plain(to_hex_0x)),
                fmt("hexadecimal", "hex", plain(to_hex)),
                fmt("scientific notation", "sci", plain(sci)),
                fmt("locale format", "locale", plain(locale)),
            ],
        ),
        ValueFormatCategory::new(
            "Data (IEC)",
            vec![
                fmt("bits", "bits", binary_prefix("b", 0)),
                fmt("bytes", "bytes", binary_prefix("B", 0)),
                fmt("kibibytes", "kbytes", binary_prefix("B", 1)),
                fmt("mebibytes", "mbytes", binary_prefix("B", 2)),
                fmt("gibibytes", "gbytes", binary_prefix("B", 3)),
            ],
        ),
        ValueFormatCategory::new(
            "Data (Metric)",
            vec![
                fmt("bits", "decbits", decimal_si_prefix("b", 0)),
                fmt("bytes", "decbytes", decimal_si_prefix("B", 0)),
                fmt("kilobytes", "deckbytes", decimal_si_prefix("B", 1)),
                fmt("megabytes", "decmbytes", decimal_si_prefix("B", 2)),
                fmt("gigabytes", "decgbytes", decimal_si_prefix("B", 3)),
            ],
        ),
        ValueFormatCategory::new(
            "Data Rate",
            vec![
                fmt("packets/sec", "pps", decimal_si_prefix("pps", 0)),
                fmt("bits/sec", "bps", decimal_si_prefix("bps", 0)),
                fmt("bytes/sec", "Bps", decimal_si_prefix("B/s", 0)),
                fmt("kilobytes/sec", "KBs", decimal_si_prefix("Bs", 1)),
                fmt("kilobits/sec", "Kbits", decimal_si_prefix("bps", 1)),
            ],
        ),
        ValueFormatCategory::new(
            "Throughput",
            vec![
                fmt("ops/sec (ops)", "ops", simple_count_unit("ops")),
                fmt("requests/sec (rps)", "reqps", simple_count_unit("reqps")),
                fmt("reads/sec (rps)", "rps", simple_count_unit("rd/s")),
                fmt("writes/sec (wps)", "wps", simple_count_unit("wr/s")),
                fmt("I/O ops/sec (iops)", "iops", simple_count_unit("io/s")),
                fmt("ops/min (opm)", "opm", simple_count_unit("ops/min")),
                fmt("reads/min (rpm)", "rpm", simple_count_unit("rd/min")),
                fmt("writes/min (wpm)", "wpm", simple_count_unit("wr/min")),
            ],
        ),
        ValueFormatCategory::new(
            "Time",
            vec![
                fmt("Hertz (1/s)", "hertz", decimal_si_prefix("Hz", 0)),
                fmt("nanoseconds (ns)", "ns", scaled(to_nano_seconds)),
                fmt("microseconds (µs)", "µs", scaled(to_micro_seconds)),
                fmt("milliseconds (ms)", "ms", scaled(to_milli_seconds)),
                fmt("seconds (s)", "s", scaled(to_seconds)),
                fmt("minutes (m)", "m", scaled(to_minutes)),
                fmt("hours (h)", "h", scaled(to_hours)),
                fmt("days (d)", "d", scaled(to_days)),
                fmt(
                    "duration (ms)",
                    "dtdurationms",
                    Arc::new(|size, decimals, _, _| {
                        to_duration(size, decimals, DurationScale::Milliseconds)
                    }),
                ),
                fmt(
                    "duration (s)",
                    "dtdurations",
                    Arc::new(|size, decimals, _, _| {
                        to_duration(size, decimals, DurationScale::Seconds)
                    }),
                ),
                fmt("clock (ms)", "clockms", plain(to_clock)),
            ],
        ),
        ValueFormatCategory::new(
            "Date & time",
            vec![
                fmt(
                    "YYYY-MM-DD HH:mm:ss",
                    "dateTimeAsIso",
                    date_time_formatter(ISO_FORMAT, ISO_TODAY_FORMAT),
                ),
                fmt(
                    "MM/DD/YYYY h:mm:ss a",
                    "dateTimeAsUS",
                    date_time_formatter(US_FORMAT, US_TODAY_FORMAT),
                ),
            ],
        ),
        ValueFormatCategory::new(
            "Energy",
            vec![
                fmt("Watt (W)", "watt", decimal_si_prefix("W", 0)),
                fmt("Kilowatt (kW)", "kwatt", decimal_si_prefix("W", 1)),
                fmt("Volt-ampere (VA)", "voltamp", decimal_si_prefix("VA", 0)),
                fmt("Joule (J)", "joule", decimal_si_prefix("J", 0)),
                fmt("Watt-hour (Wh)", "watth", decimal_si_prefix("Wh", 0)),
            ],
        ),
        ValueFormatCategory::new(
            "Temperature",
            vec![
                fmt("Celsius (°C)", "celsius", to_fixed_unit("°C")),
                fmt("Fahrenheit (°F)", "fahrenheit", to_fixed_unit("°F")),
                fmt("Kelvin (K)", "kelvin", to_fixed_unit("K")),
            ],
        ),
        ValueFormatCategory::new(
            "Currency",
            vec![
                fmt("Dollars ($)", "currencyUSD", currency("$")),
                fmt("Pounds (£)", "currencyGBP", currency("£")),
                fmt("Euro (€)", "currencyEUR", currency("€")),
                fmt("Yen (¥)", "currencyJPY", currency("¥")),
            ],
        ),
        ValueFormatCategory::new(
            "Length",
            vec![
                fmt("meter (m)", "lengthm", decimal_si_prefix("m", 0)),
                fmt("kilometer (km)", "lengthkm", decimal_si_prefix("m", 1)),
            ],
        ),
        ValueFormatCategory::new(
            "Mass",
            vec![
                fmt("gram (g)", "massg", decimal_si_prefix("g", 0)),
                fmt("kilogram (kg)", "masskg", decimal_si_prefix("g", 1)),
            ],
        ),
        ValueFormatCategory::new(
            "Volume",
            vec![
                fmt("litre (L)", "litre", decimal_si_prefix("L", 0)),
                fmt("millilitre (mL)", "mlitre", decimal_si_prefix("L", -1)),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for category in get_categories() {
            for format in category.formats {
                assert!(seen.insert(format.id.clone()), "duplicate id {}", format.id);
            }
        }
        assert!(seen.contains("percentunit"));
        assert!(seen.contains("dateTimeAsUS"));
    }

    #[test]
    fn test_percent() {
        assert_eq!(to_percent(42.0, Some(1)), "42.0%");
        assert_eq!(to_percent_unit(0.256, Some(1)), "25.6%");
        assert_eq!(to_percent(f64::NAN, None), "");
    }

    #[test]
    fn test_hex() {
        assert_eq!(to_hex(255.0, Some(0)), "FF");
        assert_eq!(to_hex(10.5, Some(1)), "A.8");
        assert_eq!(to_hex_0x(255.0, Some(0)), "0xFF");
        assert_eq!(to_hex_0x(-255.0, Some(0)), "-0xFF");
    }

    #[test]
    fn test_sci() {
        assert_eq!(sci(12345.0, Some(2)), "1.23e+4");
        assert_eq!(sci(0.00012, Some(1)), "1.2e-4");
        assert_eq!(sci(f64::NAN, Some(1)), "");
    }
}
