//! Day counts, odometer deltas, and statutory timeline classification.
//!
//! None of these helpers fail. Malformed input degrades to a safe default so
//! that an incomplete in-progress form never breaks rendering.
//!
//! # Statutory windows (Consumer Rights Act 2015)
//!
//! - Up to 30 days: short-term right to reject.
//! - 31 to 180 days: dealer may repair or replace first; a fault is presumed
//!   to have existed at sale.
//! - Over 180 days: the burden of proof shifts to the customer.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Last day (inclusive) of the short-term right to reject.
pub const SHORT_TERM_REJECTION_DAYS: i64 = 30;

/// Last day (inclusive) of the presumption that a fault existed at sale.
pub const PRESUMPTION_OF_FAULT_DAYS: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "under-30")]
    Under30Days,
    #[serde(rename = "30-to-6-months")]
    ThirtyDaysToSixMonths,
    #[serde(rename = "over-6-months")]
    OverSixMonths,
}

impl Timeline {
    /// Bucket a day count. Boundaries are inclusive: 30 is under-30, 180 is
    /// still 30-to-6-months.
    pub fn classify(days: i64) -> Self {
        if days <= SHORT_TERM_REJECTION_DAYS {
            Self::Under30Days
        } else if days <= PRESUMPTION_OF_FAULT_DAYS {
            Self::ThirtyDaysToSixMonths
        } else {
            Self::OverSixMonths
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Under30Days => "under-30",
            Self::ThirtyDaysToSixMonths => "30-to-6-months",
            Self::OverSixMonths => "over-6-months",
        }
    }

    /// Wording used on printed documents.
    pub fn label(self) -> &'static str {
        match self {
            Self::Under30Days => "Under 30 Days (Short-term right to reject)",
            Self::ThirtyDaysToSixMonths => "30 Days – 6 Months (Repair/replace phase)",
            Self::OverSixMonths => "Over 6 Months (Proof shifts to customer)",
        }
    }

    /// Legal position stated to the response generator.
    pub fn legal_position(self) -> &'static str {
        match self {
            Self::Under30Days => "Under 30 days (Short-term right to reject period)",
            Self::ThirtyDaysToSixMonths => "30 days to 6 months (dealer right to repair/replace)",
            Self::OverSixMonths => "Over 6 months (burden of proof shifts to consumer)",
        }
    }
}

/// Parse a reference date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_reference_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    // Datetime without offset, e.g. from a `datetime-local` input.
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Whole days from `reference` to `today`.
///
/// Returns 0 when the reference is empty, unparsable, or in the future.
pub fn days_between(reference: &str, today: NaiveDate) -> i64 {
    parse_reference_date(reference)
        .map(|date| (today - date).num_days().max(0))
        .unwrap_or(0)
}

/// Whole days from `reference` to the local date today.
pub fn days_since(reference: &str) -> i64 {
    days_between(reference, Local::now().date_naive())
}

/// Read an odometer entered as text.
///
/// Thousands separators are ignored and leading digits are read up to the
/// first non-digit; anything unreadable is 0.
pub fn parse_odometer(s: &str) -> i64 {
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(cleaned)),
    };

    let mut value: i64 = 0;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        value = value.saturating_mul(10).saturating_add(i64::from(d));
    }
    if negative { -value } else { value }
}

/// Miles driven since the reference reading. Never negative.
pub fn mileage_since(at_reference: &str, current: &str) -> u64 {
    let delta = parse_odometer(current).saturating_sub(parse_odometer(at_reference));
    u64::try_from(delta).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn classify_boundaries() {
        assert_eq!(Timeline::classify(0), Timeline::Under30Days);
        assert_eq!(Timeline::classify(30), Timeline::Under30Days);
        assert_eq!(Timeline::classify(31), Timeline::ThirtyDaysToSixMonths);
        assert_eq!(Timeline::classify(180), Timeline::ThirtyDaysToSixMonths);
        assert_eq!(Timeline::classify(181), Timeline::OverSixMonths);
    }

    #[test]
    fn buckets_are_ordered() {
        assert!(Timeline::Under30Days < Timeline::ThirtyDaysToSixMonths);
        assert!(Timeline::ThirtyDaysToSixMonths < Timeline::OverSixMonths);
    }

    #[test]
    fn timeline_wire_names() {
        assert_eq!(
            serde_json::to_string(&Timeline::ThirtyDaysToSixMonths).unwrap(),
            "\"30-to-6-months\""
        );
        for t in [
            Timeline::Under30Days,
            Timeline::ThirtyDaysToSixMonths,
            Timeline::OverSixMonths,
        ] {
            assert_eq!(serde_json::to_string(&t).unwrap(), format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn days_between_iso_date() {
        assert_eq!(days_between("2026-01-01", date(2026, 1, 31)), 30);
        assert_eq!(days_between("2026-01-01", date(2026, 1, 1)), 0);
    }

    #[test]
    fn days_between_rfc3339() {
        assert_eq!(days_between("2026-01-01T10:30:00Z", date(2026, 1, 11)), 10);
        assert_eq!(days_between("2026-01-01T10:30", date(2026, 1, 11)), 10);
    }

    #[test]
    fn malformed_dates_are_zero() {
        let today = date(2026, 10, 19);
        for bad in ["", "   ", "yesterday", "2026-13-45", "19/10/2026", "2026-1"] {
            assert_eq!(days_between(bad, today), 0, "input {bad:?}");
        }
    }

    #[test]
    fn future_dates_are_zero() {
        assert_eq!(days_between("2026-12-25", date(2026, 10, 19)), 0);
    }

    #[test]
    fn days_since_empty_is_zero() {
        assert_eq!(days_since(""), 0);
    }

    #[test]
    fn odometer_parsing() {
        assert_eq!(parse_odometer("45,120"), 45_120);
        assert_eq!(parse_odometer(" 1200 "), 1_200);
        assert_eq!(parse_odometer("1200 miles"), 1_200);
        assert_eq!(parse_odometer(""), 0);
        assert_eq!(parse_odometer("abc"), 0);
        assert_eq!(parse_odometer("-50"), -50);
    }

    #[test]
    fn mileage_since_positive() {
        assert_eq!(mileage_since("45,000", "45,650"), 650);
    }

    #[test]
    fn mileage_since_never_negative() {
        assert_eq!(mileage_since("50000", "49000"), 0);
        assert_eq!(mileage_since("100", ""), 0);
        assert_eq!(mileage_since("junk", "junk"), 0);
    }
}
