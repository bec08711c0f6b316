//! Text rendering for measured points: `"<x> ; <y> // <x%> ; <y%>"`.
//!
//! Percentages follow the number conventions of the active locale, with no
//! fraction digits, the same way a browser's default percent formatter does.

use serde::Serialize;

use crate::mapper::{ImageDimensions, Point};

/// Marker printed in front of a midpoint line.
pub const MIDPOINT_MARKER: &str = "--> ";

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';
const MINUS_SIGN: char = '\u{2212}';

/// Where the percent sign goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentPattern {
    /// `25%`, or `25 %` when a separator is given.
    Suffix(Option<char>),
    /// `%25`
    Prefix,
}

/// Number formatting conventions for percentages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLocale {
    tag: String,
    pattern: PercentPattern,
    group_separator: char,
    minus_sign: char,
    // Grouping only kicks in once the integer part has this many extra digits.
    min_grouping: usize,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::from_tag("en")
    }
}

impl NumberLocale {
    /// Build from a BCP-47 (`de-DE`) or POSIX (`de_DE.UTF-8`) tag.
    /// Unknown languages fall back to English conventions.
    pub fn from_tag(tag: &str) -> Self {
        let language = language_of(tag);
        let (pattern, group_separator, min_grouping) = match language.as_str() {
            "de" => (PercentPattern::Suffix(Some(NBSP)), '.', 1),
            "fr" => (PercentPattern::Suffix(Some(NBSP)), NARROW_NBSP, 1),
            "es" => (PercentPattern::Suffix(Some(NBSP)), '.', 2),
            "it" => (PercentPattern::Suffix(None), '.', 2),
            "pt" | "nl" => (PercentPattern::Suffix(None), '.', 1),
            "ru" | "sv" => (PercentPattern::Suffix(Some(NBSP)), NBSP, 1),
            "pl" => (PercentPattern::Suffix(None), NBSP, 2),
            "tr" => (PercentPattern::Prefix, '.', 1),
            _ => (PercentPattern::Suffix(None), ',', 1),
        };
        let minus_sign = if language == "sv" { MINUS_SIGN } else { '-' };
        Self {
            tag: if language.is_empty() { "en".to_string() } else { language },
            pattern,
            group_separator,
            minus_sign,
            min_grouping,
        }
    }

    /// Resolve the locale the way the desktop exposes a preferred language:
    /// `LC_ALL`, then `LC_NUMERIC`, then `LANG`.
    pub fn from_env() -> Self {
        ["LC_ALL", "LC_NUMERIC", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty())
            .map(|value| Self::from_tag(&value))
            .unwrap_or_default()
    }

    /// Configured tag wins over the environment.
    pub fn resolve(configured: Option<&str>) -> Self {
        match configured {
            Some(tag) if !tag.trim().is_empty() => Self::from_tag(tag),
            _ => Self::from_env(),
        }
    }

    /// Primary language subtag, lower-cased.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Format a ratio (0.25 for a quarter) as a whole-number percentage.
    ///
    /// Rounding works on the shortest decimal form of the ratio, so `0.145`
    /// is exactly on the half and becomes `15%`, even though `0.145 * 100.0`
    /// lands just below 14.5 in binary.
    pub fn format_percent(&self, ratio: f64) -> String {
        if !ratio.is_finite() {
            return String::new();
        }
        let digits = self.group_digits(&percent_digits(ratio.abs()));
        let sign = if ratio.is_sign_negative() {
            self.minus_sign.to_string()
        } else {
            String::new()
        };
        match self.pattern {
            PercentPattern::Suffix(None) => format!("{sign}{digits}%"),
            PercentPattern::Suffix(Some(sep)) => format!("{sign}{digits}{sep}%"),
            PercentPattern::Prefix => format!("{sign}%{digits}"),
        }
    }

    fn group_digits(&self, digits: &str) -> String {
        if digits.len() < 4 + self.min_grouping - 1 {
            return digits.to_string();
        }
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(ch);
        }
        out
    }
}

// Whole percent of a non-negative ratio, rounded half away from zero on its
// shortest round-trip decimal. `Display` for f64 never uses exponent notation.
fn percent_digits(ratio: f64) -> String {
    let decimal = ratio.to_string();
    let (int_part, frac_part) = decimal.split_once('.').unwrap_or((decimal.as_str(), ""));

    let mut digits = String::with_capacity(int_part.len() + 2);
    digits.push_str(int_part);
    let mut frac = frac_part.chars();
    for _ in 0..2 {
        digits.push(frac.next().unwrap_or('0'));
    }
    let round_up = frac.next().is_some_and(|next| next >= '5');

    let trimmed = digits.trim_start_matches('0');
    let mut digits = if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() };
    if round_up {
        digits = increment_decimal(&digits);
    }
    digits
}

fn increment_decimal(digits: &str) -> String {
    let mut out: Vec<u8> = digits.bytes().collect();
    for byte in out.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8_lossy(&out).into_owned();
        }
    }
    out.insert(0, b'1');
    String::from_utf8_lossy(&out).into_owned()
}

fn language_of(tag: &str) -> String {
    let tag = tag.trim();
    if tag.eq_ignore_ascii_case("C") || tag.eq_ignore_ascii_case("POSIX") {
        return "en".to_string();
    }
    tag.split(['-', '_', '.', '@'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Coordinates that can be rendered as a measurement line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for Coordinates {
    fn from(point: Point) -> Self {
        Self {
            x: f64::from(point.x),
            y: f64::from(point.y),
        }
    }
}

// Whole numbers print without a fraction, midpoints keep their `.5`.
fn format_coordinate(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// `"<x> ; <y> // <x%> ; <y%>"`.
///
/// Returns `None` for empty dimensions so no `NaN%` or `inf%` reaches the screen.
pub fn format_point(
    point: impl Into<Coordinates>,
    dims: ImageDimensions,
    locale: &NumberLocale,
) -> Option<String> {
    if dims.is_empty() {
        return None;
    }
    let coords = point.into();
    Some(format!(
        "{} ; {} // {} ; {}",
        format_coordinate(coords.x),
        format_coordinate(coords.y),
        locale.format_percent(coords.x / f64::from(dims.width)),
        locale.format_percent(coords.y / f64::from(dims.height)),
    ))
}

/// Midpoint line: the arrow marker followed by the formatted point.
pub fn format_midpoint(
    midpoint: impl Into<Coordinates>,
    dims: ImageDimensions,
    locale: &NumberLocale,
) -> Option<String> {
    format_point(midpoint, dims, locale).map(|line| format!("{MIDPOINT_MARKER}{line}"))
}
