//! Number formatting for the terminal dashboard.
//!
//! Every figure the back-end can omit goes through [`or_na`], so a missing
//! fundamental renders as `N/A` instead of failing the whole view.

use chrono::{DateTime, FixedOffset};

pub const NOT_AVAILABLE: &str = "N/A";

/// One crore is ten million rupees.
pub const CRORE: f64 = 10_000_000.0;

const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

/// `₹` followed by the value with two decimals.
pub fn format_currency(value: f64) -> String {
    format!("₹{:.2}", value)
}

/// Large rupee figures in crore.
///
/// Values with magnitude of at least one crore are divided by 1e7; smaller
/// values keep their scale because the back-end does not say which unit it
/// used. Either way the result is rounded to two decimals, grouped by
/// thousands, and trailing zero decimals are dropped.
pub fn format_currency_crore(value: f64) -> String {
    let scaled = if value.abs() >= CRORE { value / CRORE } else { value };
    format!("₹{} Cr", format_grouped(scaled, 2))
}

/// `+1.23%` / `-0.40%`.
pub fn format_signed_percent(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, value)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_ratio(value: f64) -> String {
    format!("{:.2}", value)
}

/// Whole number grouped by thousands (`1,234,567`).
pub fn format_count(value: f64) -> String {
    format_grouped(value, 0)
}

pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Text gauge for a 0-1 score. Out-of-range scores are pinned to the ends.
pub fn score_bar(score: f64, width: usize) -> String {
    let filled = if score.is_finite() {
        (score.clamp(0.0, 1.0) * width as f64).round() as usize
    } else {
        0
    };
    let mut bar = String::with_capacity(width * BAR_FILLED.len_utf8());
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(width - filled));
    bar
}

pub fn format_date(time: &DateTime<FixedOffset>) -> String {
    time.format("%d %b %Y").to_string()
}

/// Formats a present, finite value or falls back to `N/A`.
pub fn or_na(value: Option<f64>, format: impl FnOnce(f64) -> String) -> String {
    value
        .filter(|v| v.is_finite())
        .map(format)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn format_grouped(value: f64, max_decimals: usize) -> String {
    let factor = 10f64.powi(max_decimals as i32);
    let mut rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        // Avoid rendering "-0".
        rounded = 0.0;
    }

    let text = format!("{:.*}", max_decimals, rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(1234.5), "₹1234.50");
        assert_eq!(format_currency(0.0), "₹0.00");
    }

    #[test]
    fn test_crore_below_threshold_keeps_scale() {
        assert_eq!(format_currency_crore(5_000_000.0), "₹5,000,000 Cr");
        assert_eq!(format_currency_crore(1234.5), "₹1,234.5 Cr");
        assert_eq!(format_currency_crore(999.999), "₹1,000 Cr");
    }

    #[test]
    fn test_crore_at_or_above_threshold_is_divided() {
        assert_eq!(format_currency_crore(50_000_000.0), "₹5 Cr");
        assert_eq!(format_currency_crore(10_000_000.0), "₹1 Cr");
        assert_eq!(format_currency_crore(123_456_789.0), "₹12.35 Cr");
        assert_eq!(format_currency_crore(2_408_930_000_000.0), "₹240,893 Cr");
    }

    #[test]
    fn test_crore_negative_values() {
        assert_eq!(format_currency_crore(-50_000_000.0), "₹-5 Cr");
        assert_eq!(format_currency_crore(-0.001), "₹0 Cr");
    }

    #[test]
    fn test_percentages() {
        assert_eq!(format_signed_percent(1.234), "+1.23%");
        assert_eq!(format_signed_percent(-0.4), "-0.40%");
        assert_eq!(format_signed_percent(0.0), "+0.00%");
        assert_eq!(format_percent(12.3), "12.30%");
    }

    #[test]
    fn test_count_grouping() {
        assert_eq!(format_count(1_234_567.0), "1,234,567");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.4), "1,000");
        assert_eq!(format_count(3_618_087_518.0), "3,618,087,518");
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(0.5, 10), "█████░░░░░");
        assert_eq!(score_bar(1.7, 4), "████");
        assert_eq!(score_bar(-0.2, 4), "░░░░");
        assert_eq!(score_bar(f64::NAN, 2), "░░");
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(Some(29.444), format_ratio), "29.44");
        assert_eq!(or_na(None, format_ratio), "N/A");
        assert_eq!(or_na(Some(f64::INFINITY), format_currency), "N/A");
    }

    #[test]
    fn test_date() {
        let time = DateTime::parse_from_rfc3339("2026-10-16T09:30:00+05:30").unwrap();
        assert_eq!(format_date(&time), "16 Oct 2026");
    }
}
