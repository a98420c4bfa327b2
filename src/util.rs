// Utility helpers for parsing and formatting.
//
// This module centralizes all the "dirty" CSV/number/input handling so the
// rest of the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};
use std::collections::BTreeSet;

use crate::error::DashboardError;

/// Parse a string-like value into `i32`.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Parse a count cell into `u64` while being forgiving about formatting
/// issues that are common in CSV exports (thousands separators, spaces).
///
/// Negative or non-numeric values return `None`; headcounts are never
/// negative in a valid dataset.
pub fn parse_u64_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<u64>().ok()
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for headcount metrics and console messages (e.g., `1,234 students`).
    n.to_formatted_string(&Locale::en)
}

/// Format an optional share as a one-decimal percentage, e.g. `51.4%`.
/// An undefined share (zero denominator upstream) renders as `n/a`.
pub fn format_share(v: Option<f64>) -> String {
    match v {
        Some(x) => format!("{:.1}%", x * 100.0),
        None => "n/a".to_string(),
    }
}

/// Format an optional fraction for a table cell, e.g. `0.2381`.
/// Undefined values render as a dash so they read as absent, not as zero.
pub fn format_fraction(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(x) => format!("{:.*}", decimals, x),
        None => "—".to_string(),
    }
}

/// Parse a comma-separated year selection against the years present in the
/// dataset.
///
/// - `all` selects every available year.
/// - An empty input or `none` is a valid empty selection.
/// - A year that does not occur in the dataset is rejected, since selections
///   are subsets of the observed values.
pub fn parse_year_selection(
    input: &str,
    available: &[i32],
) -> Result<BTreeSet<i32>, DashboardError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("all") {
        return Ok(available.iter().copied().collect());
    }
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(BTreeSet::new());
    }
    let mut out = BTreeSet::new();
    for part in trimmed.split(',') {
        let year = parse_i32_safe(Some(part)).ok_or_else(|| DashboardError::InvalidSelection {
            what: "year",
            input: part.trim().to_string(),
        })?;
        if !available.contains(&year) {
            return Err(DashboardError::InvalidSelection {
                what: "year",
                input: part.trim().to_string(),
            });
        }
        out.insert(year);
    }
    Ok(out)
}

/// Parse a comma-separated specialisation selection against the names present
/// in the dataset. Matching is case-insensitive; the stored names are the
/// dataset's own spellings.
pub fn parse_specialisation_selection(
    input: &str,
    available: &[String],
) -> Result<BTreeSet<String>, DashboardError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("all") {
        return Ok(available.iter().cloned().collect());
    }
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(BTreeSet::new());
    }
    let mut out = BTreeSet::new();
    for part in trimmed.split(',') {
        let name = part.trim();
        match available.iter().find(|s| s.eq_ignore_ascii_case(name)) {
            Some(found) => {
                out.insert(found.clone());
            }
            None => {
                return Err(DashboardError::InvalidSelection {
                    what: "specialisation",
                    input: name.to_string(),
                });
            }
        }
    }
    Ok(out)
}
