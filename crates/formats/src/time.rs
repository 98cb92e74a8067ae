//! Duration, clock and timestamp formatters

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::value_format::{to_fixed, to_fixed_scaled, DecimalCount, ValueFormatter};

/// One rung of a duration chain: below `limit` the value is divided by
/// `divisor` and printed with `suffix`
struct Step {
    limit: f64,
    divisor: f64,
    additional: i32,
    suffix: &'static str,
}

const fn step(limit: f64, divisor: f64, additional: i32, suffix: &'static str) -> Step {
    Step {
        limit,
        divisor,
        additional,
        suffix,
    }
}

/// Walk the chain until the magnitude fits; the last rung has no limit
fn scale_by_steps(
    size: f64,
    decimals: DecimalCount,
    scaled_decimals: DecimalCount,
    base_suffix: &str,
    base_limit: f64,
    steps: &[Step],
) -> String {
    if size.is_nan() {
        return String::new();
    }
    if size.abs() < base_limit {
        return format!("{}{}", to_fixed(size, decimals), base_suffix);
    }
    for s in steps {
        if size.abs() < s.limit {
            return to_fixed_scaled(
                size / s.divisor,
                decimals,
                scaled_decimals,
                s.additional,
                s.suffix,
            );
        }
    }
    String::new()
}

pub fn to_nano_seconds(size: f64, decimals: DecimalCount, scaled: DecimalCount) -> String {
    const STEPS: [Step; 4] = [
        step(1e6, 1e3, 3, " µs"),
        step(1e9, 1e6, 6, " ms"),
        step(6e10, 1e9, 9, " s"),
        step(f64::INFINITY, 6e10, 12, " min"),
    ];
    scale_by_steps(size, decimals, scaled, " ns", 1000.0, &STEPS)
}

pub fn to_micro_seconds(size: f64, decimals: DecimalCount, scaled: DecimalCount) -> String {
    const STEPS: [Step; 2] = [
        step(1e6, 1e3, 3, " ms"),
        step(f64::INFINITY, 1e6, 6, " s"),
    ];
    scale_by_steps(size, decimals, scaled, " µs", 1000.0, &STEPS)
}

pub fn to_milli_seconds(size: f64, decimals: DecimalCount, scaled: DecimalCount) -> String {
    const STEPS: [Step; 5] = [
        step(60_000.0, 1000.0, 3, " s"),
        step(3_600_000.0, 60_000.0, 5, " min"),
        step(86_400_000.0, 3_600_000.0, 7, " hour"),
        step(31_536_000_000.0, 86_400_000.0, 8, " day"),
        step(f64::INFINITY, 31_536_000_000.0, 10, " year"),
    ];
    scale_by_steps(size, decimals, scaled, " ms", 1000.0, &STEPS)
}

pub fn to_seconds(size: f64, decimals: DecimalCount, scaled: DecimalCount) -> String {
    if size.is_nan() {
        return String::new();
    }

    // Sub-second values scale up instead of down
    let sub_second = scaled.zip(decimals).map(|(s, d)| s - d);
    let magnitude = size.abs();
    if magnitude > 0.0 && magnitude < 1e-6 {
        return to_fixed_scaled(size * 1e9, decimals, sub_second, -9, " ns");
    }
    if magnitude > 0.0 && magnitude < 1e-3 {
        return to_fixed_scaled(size * 1e6, decimals, sub_second, -6, " µs");
    }
    if magnitude > 0.0 && magnitude < 1.0 {
        return to_fixed_scaled(size * 1e3, decimals, sub_second, -3, " ms");
    }

    const STEPS: [Step; 5] = [
        step(3600.0, 60.0, 1, " min"),
        step(86_400.0, 3600.0, 4, " hour"),
        step(604_800.0, 86_400.0, 5, " day"),
        step(31_536_000.0, 604_800.0, 6, " week"),
        step(f64::INFINITY, 3.15569e7, 7, " year"),
    ];
    scale_by_steps(size, decimals, scaled, " s", 60.0, &STEPS)
}

pub fn to_minutes(size: f64, decimals: DecimalCount, scaled: DecimalCount) -> String {
    const STEPS: [Step; 4] = [
        step(1440.0, 60.0, 2, " hour"),
        step(10_080.0, 1440.0, 3, " day"),
        step(604_800.0, 10_080.0, 4, " week"),
        step(f64::INFINITY, 5.25948e5, 5, " year"),
    ];
    scale_by_steps(size, decimals, scaled, " min", 60.0, &STEPS)
}

pub fn to_hours(size: f64, decimals: DecimalCount, scaled: DecimalCount) -> String {
    const STEPS: [Step; 3] = [
        step(168.0, 24.0, 2, " day"),
        step(8760.0, 168.0, 3, " week"),
        step(f64::INFINITY, 8760.0, 4, " year"),
    ];
    scale_by_steps(size, decimals, scaled, " hour", 24.0, &STEPS)
}

pub fn to_days(size: f64, decimals: DecimalCount, scaled: DecimalCount) -> String {
    const STEPS: [Step; 2] = [
        step(365.0, 7.0, 2, " week"),
        step(f64::INFINITY, 365.0, 3, " year"),
    ];
    scale_by_steps(size, decimals, scaled, " day", 7.0, &STEPS)
}

/// Input scale for [`to_duration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationScale {
    Milliseconds,
    Seconds,
}

impl DurationScale {
    fn millis(self) -> f64 {
        match self {
            DurationScale::Milliseconds => 1.0,
            DurationScale::Seconds => 1000.0,
        }
    }

    fn plural(self) -> &'static str {
        match self {
            DurationScale::Milliseconds => "milliseconds",
            DurationScale::Seconds => "seconds",
        }
    }
}

const DURATION_UNITS: [(&str, f64); 8] = [
    ("year", 31_536_000_000.0),
    ("month", 2_592_000_000.0),
    ("week", 604_800_000.0),
    ("day", 86_400_000.0),
    ("hour", 3_600_000.0),
    ("minute", 60_000.0),
    ("second", 1000.0),
    ("millisecond", 1.0),
];

/// Human duration such as `1 hour, 2 minutes, 3 seconds`.
///
/// After the first non-zero unit, `decimals` more units are printed
/// (two when unset). Negative values get an ` ago` suffix.
pub fn to_duration(size: f64, decimals: DecimalCount, scale: DurationScale) -> String {
    if size.is_nan() {
        return String::new();
    }
    if size == 0.0 {
        return format!("0 {}", scale.plural());
    }
    if size < 0.0 {
        return format!("{} ago", to_duration(-size, decimals, scale));
    }

    let mut remaining = size * scale.millis();
    let mut budget = decimals.unwrap_or(2);
    let mut started = false;
    let mut parts = Vec::new();

    for (name, interval) in DURATION_UNITS {
        if budget < 0 {
            break;
        }
        let value = remaining / interval;
        if value >= 1.0 || started {
            started = true;
            let whole = value.floor();
            let plural = if whole != 1.0 { "s" } else { "" };
            parts.push(format!("{} {}{}", whole, name, plural));
            remaining %= interval;
            budget -= 1;
        }
    }

    parts.join(", ")
}

/// Stopwatch style: `05h:03m:20s:100ms`, coarser with fewer decimals
pub fn to_clock(size: f64, decimals: DecimalCount) -> String {
    if size.is_nan() {
        return String::new();
    }

    let total = size.max(0.0).floor() as u64;
    let millis = total % 1000;
    let seconds = (total / 1000) % 60;
    let minutes = (total / 60_000) % 60;
    let hours = total / 3_600_000;

    if size < 1000.0 {
        return format!("{:03}ms", millis);
    }
    if size < 60_000.0 {
        return match decimals {
            Some(0) => format!("{:02}s", seconds),
            _ => format!("{:02}s:{:03}ms", seconds, millis),
        };
    }
    if size < 3_600_000.0 {
        return match decimals {
            Some(0) => format!("{:02}m", minutes),
            Some(1) => format!("{:02}m:{:02}s", minutes, seconds),
            _ => format!("{:02}m:{:02}s:{:03}ms", minutes, seconds, millis),
        };
    }

    // Hours keep only their last two digits
    let hours_text = format!("{:02}", hours % 100);
    match decimals {
        Some(0) => format!("{}h", hours_text),
        Some(1) => format!("{}h:{:02}m", hours_text, minutes),
        Some(2) => format!("{}h:{:02}m:{:02}s", hours_text, minutes, seconds),
        _ => format!(
            "{}h:{:02}m:{:02}s:{:03}ms",
            hours_text, minutes, seconds, millis
        ),
    }
}

/// Epoch-millisecond timestamp formatter. Values from today print only
/// the time of day.
pub fn date_time_formatter(full: &'static str, today: &'static str) -> ValueFormatter {
    Arc::new(move |value, _, _, is_utc| {
        if !value.is_finite() {
            return String::new();
        }
        let millis = value as i64;
        if is_utc {
            match Utc.timestamp_millis_opt(millis).single() {
                Some(time) => format_date_time(&time, Utc::now(), full, today),
                None => String::new(),
            }
        } else {
            match Local.timestamp_millis_opt(millis).single() {
                Some(time) => format_date_time(&time, Local::now(), full, today),
                None => String::new(),
            }
        }
    })
}

fn format_date_time<Tz: TimeZone>(
    time: &DateTime<Tz>,
    now: DateTime<Tz>,
    full: &str,
    today: &str,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if time.date_naive() == now.date_naive() {
        time.format(today).to_string()
    } else {
        time.format(full).to_string()
    }
}

pub const ISO_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const ISO_TODAY_FORMAT: &str = "%H:%M:%S";
pub const US_FORMAT: &str = "%m/%d/%Y %-I:%M:%S %P";
pub const US_TODAY_FORMAT: &str = "%-I:%M:%S %P";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milliseconds_chain() {
        assert_eq!(to_milli_seconds(500.0, Some(0), None), "500 ms");
        assert_eq!(to_milli_seconds(1500.0, Some(1), None), "1.5 s");
        assert_eq!(to_milli_seconds(120_000.0, Some(0), None), "2 min");
        assert_eq!(to_milli_seconds(7_200_000.0, Some(0), None), "2 hour");
        assert_eq!(to_milli_seconds(f64::NAN, Some(0), None), "");
    }

    #[test]
    fn test_seconds_chain() {
        assert_eq!(to_seconds(30.0, Some(0), None), "30 s");
        assert_eq!(to_seconds(0.5, Some(0), None), "500 ms");
        assert_eq!(to_seconds(90.0, Some(1), None), "1.5 min");
        assert_eq!(to_seconds(172_800.0, Some(0), None), "2 day");
    }

    #[test]
    fn test_small_chains() {
        assert_eq!(to_nano_seconds(2000.0, Some(0), None), "2 µs");
        assert_eq!(to_micro_seconds(3_000_000.0, Some(0), None), "3 s");
        assert_eq!(to_minutes(120.0, Some(0), None), "2 hour");
        assert_eq!(to_hours(48.0, Some(0), None), "2 day");
        assert_eq!(to_days(14.0, Some(0), None), "2 week");
    }

    #[test]
    fn test_duration() {
        assert_eq!(
            to_duration(3_723_000.0, Some(2), DurationScale::Milliseconds),
            "1 hour, 2 minutes, 3 seconds"
        );
        assert_eq!(
            to_duration(3723.0, Some(0), DurationScale::Seconds),
            "1 hour"
        );
        assert_eq!(to_duration(0.0, None, DurationScale::Seconds), "0 seconds");
        assert_eq!(
            to_duration(-60.0, Some(0), DurationScale::Seconds),
            "1 minute ago"
        );
    }

    #[test]
    fn test_clock() {
        assert_eq!(to_clock(250.0, None), "250ms");
        assert_eq!(to_clock(5_100.0, None), "05s:100ms");
        assert_eq!(to_clock(5_100.0, Some(0)), "05s");
        assert_eq!(to_clock(125_000.0, Some(1)), "02m:05s");
        assert_eq!(to_clock(3_725_000.0, Some(1)), "01h:02m");
        assert_eq!(to_clock(3_725_000.0, Some(0)), "01h");
    }

    #[test]
    fn test_date_time_utc() {
        let iso = date_time_formatter(ISO_FORMAT, ISO_TODAY_FORMAT);
        assert_eq!(iso(0.0, None, None, true), "1970-01-01 00:00:00");

        let us = date_time_formatter(US_FORMAT, US_TODAY_FORMAT);
        assert_eq!(us(1_500_000_000_000.0, None, None, true), "07/14/2017 2:40:00 am");
        assert_eq!(us(f64::NAN, None, None, true), "");
    }
}
