//! Tolerant parsing of the heterogeneous date encodings the sheet export
//! returns, plus display formatting and delay computation.
//!
//! Three encodings appear in practice:
//! 1. a structured literal `Date(Y,M,D[,h,m,s])` with a zero-based month,
//! 2. an Excel day-serial number (1899-12-30 epoch) for date-typed cells,
//! 3. a plain date/time string in one of a few common formats.
//!
//! Parse failures never propagate: the formatter degrades to the original
//! input and the delay calculator degrades to zero.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

/// Display format for timestamps and submission moments.
const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Day-serial offset between the 1899-12-30 sheet epoch and 1970-01-01.
const SERIAL_UNIX_EPOCH_OFFSET: f64 = 25569.0;

/// Numbers at or below this are not treated as day serials.
const MIN_DAY_SERIAL: f64 = 30000.0;

const SECONDS_PER_DAY: f64 = 86400.0;

const DATE_LITERAL_PATTERN: &str = r"^Date\((\d+),(\d+),(\d+)(?:,(\d+),(\d+),(\d+))?\)$";

/// Plain-string formats tried in order by the generic branch.
const GENERIC_DATETIME_FORMATS: [&str; 4] = [
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

const GENERIC_DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Parse a raw sheet timestamp using the three-branch rule.
///
/// Returns `None` for empty input, the `-` placeholder, or anything no
/// branch can make sense of.
#[must_use]
pub fn parse_sheet_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        return None;
    }
    if let Some(parsed) = parse_date_literal(raw) {
        return Some(parsed);
    }
    if let Some(parsed) = parse_day_serial(raw) {
        return Some(parsed);
    }
    parse_generic(raw)
}

/// Format a raw sheet timestamp for display as `DD/MM/YYYY HH:MM:SS`.
///
/// Empty input formats as `-`; unparseable input is returned unchanged.
#[must_use]
pub fn format_sheet_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "-".to_string();
    }
    match parse_sheet_timestamp(trimmed) {
        Some(parsed) => format_instant(parsed),
        None => {
            tracing::debug!(value = trimmed, "unparseable sheet timestamp, kept verbatim");
            trimmed.to_string()
        }
    }
}

/// Format an instant as `DD/MM/YYYY HH:MM:SS`.
#[must_use]
pub fn format_instant(instant: NaiveDateTime) -> String {
    instant.format(DISPLAY_FORMAT).to_string()
}

/// Whole days elapsed from the record's raw timestamp to `now`.
///
/// Never negative; `0` for empty, `-`, or unparseable input.
#[must_use]
pub fn delay_days(raw: &str, now: NaiveDateTime) -> i64 {
    parse_sheet_timestamp(raw).map_or(0, |parsed| (now - parsed).num_days().max(0))
}

/// Branch 1: the `Date(Y,M,D[,h,m,s])` literal, month zero-based.
fn parse_date_literal(raw: &str) -> Option<NaiveDateTime> {
    let re = Regex::new(DATE_LITERAL_PATTERN).expect("Invalid regex");
    let caps = re.captures(raw)?;
    let number = |index: usize| -> u32 {
        caps.get(index)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    let month = number(2);
    let day = number(3);
    NaiveDate::from_ymd_opt(year, month + 1, day)?.and_hms_opt(number(4), number(5), number(6))
}

/// Branch 2: day-count serial with the 1899-12-30 epoch convention.
fn parse_day_serial(raw: &str) -> Option<NaiveDateTime> {
    let serial: f64 = raw.parse().ok()?;
    if serial <= MIN_DAY_SERIAL {
        return None;
    }
    let seconds = (serial - SERIAL_UNIX_EPOCH_OFFSET) * SECONDS_PER_DAY;
    #[allow(clippy::cast_possible_truncation)]
    let whole_seconds = seconds.floor() as i64;
    DateTime::from_timestamp(whole_seconds, 0).map(|instant| instant.naive_utc())
}

/// Branch 3: plain date/time strings in a few common formats.
fn parse_generic(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    for format in GENERIC_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    for format in GENERIC_DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn date_literal_month_is_zero_based() {
        assert_eq!(
            format_sheet_timestamp("Date(2023,0,5)"),
            "05/01/2023 00:00:00"
        );
        assert_eq!(
            format_sheet_timestamp("Date(2024,11,31,23,59,59)"),
            "31/12/2024 23:59:59"
        );
    }

    #[test]
    fn date_literal_defaults_missing_time_to_zero() {
        assert_eq!(
            parse_sheet_timestamp("Date(2024,5,15)"),
            Some(at(2024, 6, 15, 0, 0, 0))
        );
    }

    #[test]
    fn date_literal_with_invalid_components_degrades() {
        // month 12 (zero-based) would be month 13, which no branch accepts
        assert_eq!(format_sheet_timestamp("Date(2024,12,1)"), "Date(2024,12,1)");
    }

    #[test]
    fn day_serial_uses_sheet_epoch() {
        // (45000 - 25569) * 86400 seconds since 1970 = 2023-03-15
        assert_eq!(format_sheet_timestamp("45000"), "15/03/2023 00:00:00");
        assert_eq!(
            parse_sheet_timestamp("45000.5"),
            Some(at(2023, 3, 15, 12, 0, 0))
        );
    }

    #[test]
    fn small_numbers_are_not_day_serials() {
        assert_eq!(parse_sheet_timestamp("30000"), None);
        assert_eq!(parse_sheet_timestamp("123"), None);
    }

    #[test]
    fn generic_strings_parse_in_common_formats() {
        assert_eq!(
            parse_sheet_timestamp("15/03/2023 08:30:00"),
            Some(at(2023, 3, 15, 8, 30, 0))
        );
        assert_eq!(
            parse_sheet_timestamp("2023-03-15"),
            Some(at(2023, 3, 15, 0, 0, 0))
        );
        assert_eq!(
            parse_sheet_timestamp("2023-03-15T08:30:00Z"),
            Some(at(2023, 3, 15, 8, 30, 0))
        );
    }

    #[test]
    fn formatter_degrades_to_input_on_failure() {
        assert_eq!(format_sheet_timestamp("soon"), "soon");
        assert_eq!(format_sheet_timestamp(""), "-");
        assert_eq!(format_sheet_timestamp("   "), "-");
    }

    #[test]
    fn delay_is_zero_for_empty_placeholder_and_garbage() {
        let now = at(2026, 8, 24, 12, 0, 0);
        assert_eq!(delay_days("", now), 0);
        assert_eq!(delay_days("-", now), 0);
        assert_eq!(delay_days("tomorrow maybe", now), 0);
    }

    #[test]
    fn delay_counts_whole_days_and_never_goes_negative() {
        let now = at(2023, 3, 18, 6, 0, 0);
        // 2 days and 22 hours elapsed, floored to 2
        assert_eq!(delay_days("15/03/2023 08:00:00", now), 2);
        assert_eq!(delay_days("45000", now), 3);
        // timestamp in the future clamps to zero
        assert_eq!(delay_days("20/03/2023 00:00:00", now), 0);
    }

    #[test]
    fn format_instant_is_day_month_year_24h() {
        assert_eq!(format_instant(at(2026, 8, 24, 14, 3, 5)), "24/08/2026 14:03:05");
    }
}
