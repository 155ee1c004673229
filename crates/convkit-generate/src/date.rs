//! Random calendar dates in an inclusive range.

use chrono::NaiveDate;
use convkit_error::{Result, invalid_option};
use convkit_random::{RandomSource, check_count};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateOptions {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// chrono `strftime` format
    pub format: String,
    /// Emit dates in ascending order
    pub sorted: bool,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2030, 12, 31).unwrap_or_default(),
            format: DEFAULT_DATE_FORMAT.to_string(),
            sorted: false,
        }
    }
}

/// Generate `count` dates between `opts.start` and `opts.end`.
pub fn dates(rng: &mut RandomSource, count: usize, opts: &DateOptions) -> Result<Vec<String>> {
    check_count(count)?;
    if opts.start > opts.end {
        return Err(invalid_option(
            "date range",
            format!("start {} is after end {}", opts.start, opts.end),
        ));
    }

    let span = (opts.end - opts.start).num_days();
    let mut picked: Vec<NaiveDate> = (0..count)
        .map(|_| opts.start + chrono::Duration::days(rng.range_i64(0, span)))
        .collect();
    if opts.sorted {
        picked.sort_unstable();
    }
    tracing::debug!(count, span_days = span + 1, sorted = opts.sorted, "generate dates");

    picked
        .into_iter()
        .map(|date| format_date(date, &opts.format))
        .collect()
}

/// Format a date, rejecting formats chrono cannot render for a date alone.
pub fn format_date(date: NaiveDate, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).map_err(|_| {
        invalid_option("date format", format!("'{format}' cannot be used for dates"))
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dates_in_range() {
        let mut rng = RandomSource::seeded(1);
        let opts = DateOptions {
            start: date(2024, 2, 27),
            end: date(2024, 3, 2),
            ..DateOptions::default()
        };
        for text in dates(&mut rng, 100, &opts).unwrap() {
            let parsed = NaiveDate::parse_from_str(&text, DEFAULT_DATE_FORMAT).unwrap();
            assert!(parsed >= opts.start && parsed <= opts.end, "{text}");
        }
    }

    #[test]
    fn test_single_day_range() {
        let mut rng = RandomSource::seeded(2);
        let opts = DateOptions {
            start: date(2024, 2, 29),
            end: date(2024, 2, 29),
            ..DateOptions::default()
        };
        assert_eq!(dates(&mut rng, 3, &opts).unwrap(), vec!["2024-02-29"; 3]);
    }

    #[test]
    fn test_sorted() {
        let mut rng = RandomSource::seeded(3);
        let opts = DateOptions {
            sorted: true,
            ..DateOptions::default()
        };
        let out = dates(&mut rng, 50, &opts).unwrap();
        let mut expected = out.clone();
        expected.sort();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_custom_format() {
        assert_eq!(format_date(date(2024, 7, 4), "%d/%m/%Y").unwrap(), "04/07/2024");
        insta::assert_snapshot!(format_date(date(2024, 7, 4), "%A %e %B").unwrap(), @"Thursday  4 July");
    }

    #[test]
    fn test_time_format_rejected() {
        let err = format_date(date(2024, 7, 4), "%H:%M").unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_reversed_range() {
        let mut rng = RandomSource::seeded(4);
        let opts = DateOptions {
            start: date(2024, 1, 2),
            end: date(2024, 1, 1),
            ..DateOptions::default()
        };
        let err = dates(&mut rng, 1, &opts).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"invalid date range: start 2024-01-02 is after end 2024-01-01");
    }
}
