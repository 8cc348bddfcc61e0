// Utility helpers for parsing cells and formatting numbers.
//
// CSV exports from spreadsheets are messy: blank cells, "NA", thousands
// separators. Everything here turns such text into `Option`s so the rest of
// the crate only ever sees typed values or an explicit "missing".
use num_format::{Locale, ToFormattedString};

/// Parse a cell into `f64`, returning `None` for anything that is not a
/// plain finite number.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (`NA`, `n/a`, ...).
/// - Strips thousands separators like `","` before parsing.
/// - Rejects `NaN`/infinite results so missing data never leaks as a number.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Numeric year from a display label such as `2023–24` or `2018`.
///
/// Takes the first run of four ASCII digits.
pub fn parse_year_label(s: &str) -> Option<i32> {
    let digits: String = s
        .trim()
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.len() < 4 {
        return None;
    }
    digits[..4].parse().ok()
}

/// Position of a goal id like `SDG 12` in the canonical ordering. Anything
/// without a goal number (the composite score) sorts after every goal.
pub fn sdg_number(id: &str) -> u32 {
    id.split_whitespace()
        .nth(1)
        .and_then(|n| n.parse::<u32>().ok())
        .unwrap_or(u32::MAX)
}

/// Mean of the present values; `None` when nothing is present.
pub fn average<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Render a score the way tables show it: integers without a decimal
/// point, everything else with up to two decimals.
pub fn format_score(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages, e.g. `1,234 rows loaded`.
    n.to_formatted_string(&Locale::en)
}
