//! Line classification: one input line in, at most one histogram key out.
//!
//! The pipeline only knows the [`Classify`] trait. [`AgeClassifier`] is the
//! classifier the binary uses: it reads an ISO `YYYY-MM-DD` birth date and
//! yields the age in whole years.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// A histogram key. Valid keys live in `0..=MAX_KEY`.
pub type Key = u32;

/// Largest key the pipeline will count.
pub const MAX_KEY: Key = 130;

/// Number of distinct keys in the fixed domain.
pub const KEY_DOMAIN: usize = MAX_KEY as usize + 1;

/// Average length of a Gregorian year in days.
pub const DAYS_PER_YEAR: f64 = 365.2425;

/// Maps one line of input to a key.
///
/// Implementations are called concurrently from every worker thread and must
/// not panic on malformed input; return `None` instead.
pub trait Classify: Send + Sync {
    fn classify(&self, line: &str) -> Option<Key>;
}

impl<F> Classify for F
where
    F: Fn(&str) -> Option<Key> + Send + Sync,
{
    fn classify(&self, line: &str) -> Option<Key> {
        self(line)
    }
}

pub fn in_domain(key: Key) -> bool {
    key <= MAX_KEY
}

/// Truncates a fractional year count to a key, rejecting NaN, infinities,
/// negatives and anything past `MAX_KEY`.
pub fn key_from_years(years: f64) -> Option<Key> {
    if !years.is_finite() || years < 0.0 {
        return None;
    }
    let whole = years.trunc();
    if whole > MAX_KEY as f64 {
        return None;
    }
    Some(whole as Key)
}

/// A proleptic Gregorian calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDate {
    pub year: i64,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError(String);

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date '{}', expected YYYY-MM-DD", self.0)
    }
}

impl std::error::Error for DateParseError {}

impl CivilDate {
    pub fn new(year: i64, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Days since 1970-01-01 (negative before it).
    pub fn days_since_epoch(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    /// Strict `YYYY-MM-DD` parse. Returns `None` rather than an error so the
    /// hot path never allocates on bad input.
    pub fn parse_iso(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        let year = parse_digits(&bytes[0..4])?;
        let month = parse_digits(&bytes[5..7])?;
        let day = parse_digits(&bytes[8..10])?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self::new(year as i64, month, day))
    }

    /// The current UTC calendar date.
    pub fn today_utc() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        civil_from_days(secs.div_euclid(86_400))
    }
}

impl FromStr for CivilDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_iso(s.trim()).ok_or_else(|| DateParseError(s.to_string()))
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

fn parse_digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            Some(acc * 10 + (b - b'0') as u32)
        } else {
            None
        }
    })
}

// Howard Hinnant's days_from_civil. The epoch is 1970-01-01.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = (y - era * 400) as u64;
    let mp = ((month + 9) % 12) as u64;
    let doy = (153 * mp + 2) / 5 + day as u64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe as i64 - 719_468
}

fn civil_from_days(days: i64) -> CivilDate {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe as i64 + era * 400 + if month <= 2 { 1 } else { 0 };
    CivilDate::new(year, month, day)
}

/// Classifies `YYYY-MM-DD` birth dates into whole years of age relative to a
/// fixed reference date.
///
/// Age is `elapsed_days / 365.2425`, truncated. This is an average-year
/// approximation and can be a day off around birthdays.
#[derive(Debug, Clone, Copy)]
pub struct AgeClassifier {
    reference_days: i64,
}

impl AgeClassifier {
    pub fn as_of(reference: CivilDate) -> Self {
        Self {
            reference_days: reference.days_since_epoch(),
        }
    }

    pub fn today() -> Self {
        Self::as_of(CivilDate::today_utc())
    }

    /// Fractional age in years, or `None` when the line is not a date.
    pub fn age_in_years(&self, line: &str) -> Option<f64> {
        let birth = CivilDate::parse_iso(line)?;
        Some((self.reference_days - birth.days_since_epoch()) as f64 / DAYS_PER_YEAR)
    }
}

impl Classify for AgeClassifier {
    fn classify(&self, line: &str) -> Option<Key> {
        self.age_in_years(line).and_then(key_from_years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_is_day_zero() {
        assert_eq!(CivilDate::new(1970, 1, 1).days_since_epoch(), 0);
        assert_eq!(CivilDate::new(1970, 1, 2).days_since_epoch(), 1);
        assert_eq!(CivilDate::new(1969, 12, 31).days_since_epoch(), -1);
        assert_eq!(CivilDate::new(2000, 3, 1).days_since_epoch(), 11_017);
    }

    #[test]
    fn test_civil_round_trip_across_leap_years() {
        for days in [-719_468, -1, 0, 59, 60, 11_016, 11_017, 19_000, 2_932_896] {
            let date = civil_from_days(days);
            assert_eq!(date.days_since_epoch(), days, "date {}", date);
        }
        assert_eq!(civil_from_days(11_016), CivilDate::new(2000, 2, 29));
    }

    #[test]
    fn test_parse_iso_accepts_strict_format() {
        assert_eq!(CivilDate::parse_iso("2005-01-06"), Some(CivilDate::new(2005, 1, 6)));
        assert_eq!("0001-12-31".parse::<CivilDate>(), Ok(CivilDate::new(1, 12, 31)));
    }

    #[test]
    fn test_parse_iso_rejects_malformed_lines() {
        for bad in [
            "", "2005-1-06", "2005/01/06", "20050106xx", "2005-13-01", "2005-00-10",
            "2005-01-32", "2005-01-00", "abcd-ef-gh", "2005-01-06 ", "+005-01-06",
        ] {
            assert_eq!(CivilDate::parse_iso(bad), None, "{:?} should not parse", bad);
        }
    }

    #[test]
    fn test_key_from_years_bounds() {
        assert_eq!(key_from_years(0.0), Some(0));
        assert_eq!(key_from_years(20.99), Some(20));
        assert_eq!(key_from_years(130.5), Some(130));
        assert_eq!(key_from_years(131.0), None);
        assert_eq!(key_from_years(-0.01), None);
        assert_eq!(key_from_years(f64::NAN), None);
        assert_eq!(key_from_years(f64::INFINITY), None);
    }

    #[test]
    fn test_age_classifier_truncates() {
        let classifier = AgeClassifier::as_of(CivilDate::new(2025, 10, 1));
        assert_eq!(classifier.classify("2005-01-06"), Some(20));
        assert_eq!(classifier.classify("2025-10-01"), Some(0));
        assert_eq!(classifier.classify("1895-10-01"), Some(130));
        assert_eq!(classifier.classify("1800-01-01"), None);
        assert_eq!(classifier.classify("2030-01-01"), None);
        assert_eq!(classifier.classify("not a date"), None);
    }

    #[test]
    fn test_closures_are_classifiers() {
        let parse = |line: &str| line.parse::<Key>().ok();
        assert_eq!(parse.classify("42"), Some(42));
        assert_eq!(parse.classify("x"), None);
    }
}
