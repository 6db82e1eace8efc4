//! Short, human-scannable draft identifiers.
//!
//! Identifiers combine a fixed prefix, a time-derived component and four
//! random base-36 characters. They only need to avoid collisions within one
//! session, not globally.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use uuid::Uuid;

const RANDOM_LEN: u32 = 4;

/// `PREFIX-<base36 millis>-<random>`, e.g. `DRB-MGX3K2P1-7QZA`.
pub fn timestamped_id(prefix: &str, now: DateTime<Utc>) -> String {
    let millis = u128::try_from(now.timestamp_millis()).unwrap_or(0);
    format!("{prefix}-{}-{}", base36(millis), random_token())
}

/// `PREFIX-YYYYMMDD-<random>`, e.g. `DSS-20261019-4KQ2`.
pub fn dated_id(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{prefix}-{:04}{:02}{:02}-{}",
        date.year(),
        date.month(),
        date.day(),
        random_token()
    )
}

/// Four uppercase base-36 characters drawn from a v4 UUID.
pub fn random_token() -> String {
    let space = 36u128.pow(RANDOM_LEN);
    let n = Uuid::new_v4().as_u128() % space;
    format!("{:0>width$}", base36(n), width = RANDOM_LEN as usize)
}

/// Uppercase base-36 rendering of `n`.
pub fn base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
