//! Color handling for thresholds and display values.
//!
//! Threshold colors may be written as named palette entries ("green")
//! or hex strings ("#73BF69"); display values always carry hex.

use serde::{Deserialize, Serialize};

/// RGBA color with alpha channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Named palette entries accepted in threshold configs
const NAMED_COLORS: &[(&str, &str)] = &[
    ("green", "#73BF69"),
    ("dark-green", "#37872D"),
    ("red", "#F2495C"),
    ("dark-red", "#C4162A"),
    ("orange", "#FF9830"),
    ("dark-orange", "#FA6400"),
    ("yellow", "#FADE2A"),
    ("dark-yellow", "#E0B400"),
    ("blue", "#5794F2"),
    ("dark-blue", "#1F60C4"),
    ("purple", "#B877D9"),
    ("dark-purple", "#8F3BB8"),
    ("white", "#FFFFFF"),
    ("black", "#000000"),
];

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }

    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        )
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Some(Self::from_rgba8(expand(0)?, expand(1)?, expand(2)?, 255))
            }
            6 | 8 => {
                let a = if digits.len() == 8 {
                    channel(&digits[6..8])?
                } else {
                    255
                };
                Some(Self::from_rgba8(
                    channel(&digits[0..2])?,
                    channel(&digits[2..4])?,
                    channel(&digits[4..6])?,
                    a,
                ))
            }
            _ => None,
        }
    }

    /// Look up a palette name (case-insensitive)
    pub fn named(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, hex)| Self::from_hex(hex))
    }

    /// Uppercase `#RRGGBB`, with an alpha pair only when not opaque
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        if a == 255 {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// Normalize a configured color string to hex.
///
/// Unknown names pass through untouched so CSS keywords still work downstream.
pub fn resolve_color(color: &str) -> String {
    let trimmed = color.trim();
    Color::from_hex(trimmed)
        .or_else(|| Color::named(trimmed))
        .map(|c| c.to_hex())
        .unwrap_or_else(|| trimmed.to_string())
}
