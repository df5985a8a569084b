//! Date parsing shared by request normalization and status-report decoding.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::domain::validation::ValidationError;

/// Output format for normalized dates (`YYYY-MM-DD HH:MM:SS`).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// A parsed date before any timezone is applied.
enum ParsedDate {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

fn parse_components(input: &str) -> Result<ParsedDate, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidDate {
        input: input.to_owned(),
    };

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Ok(seconds) = trimmed.parse::<i64>() {
        return DateTime::from_timestamp(seconds, 0)
            .map(|utc| ParsedDate::Zoned(utc.with_timezone(&Local).fixed_offset()))
            .ok_or_else(invalid);
    }

    if let Ok(zoned) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ParsedDate::Zoned(zoned));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(ParsedDate::Naive)
        .ok_or_else(invalid)
}

/// Parse a caller- or gateway-provided date.
///
/// Accepted inputs, in order:
/// - a numeric Unix timestamp in seconds,
/// - RFC 3339 (the explicit offset is kept),
/// - one of the common wall-clock layouts (`2021-01-01 10:00:00`, `01.01.2021 10:00`, ...),
///   interpreted in the local timezone,
/// - a bare date, taken as local midnight.
pub fn parse_datetime(input: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    match parse_components(input)? {
        ParsedDate::Zoned(zoned) => Ok(zoned),
        // Wall-clock times falling into a DST gap have no local representation.
        ParsedDate::Naive(naive) => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.fixed_offset())
            .ok_or_else(|| ValidationError::InvalidDate {
                input: input.to_owned(),
            }),
    }
}

/// Parse a date and return its Unix timestamp in seconds.
pub fn to_unix_timestamp(input: &str) -> Result<i64, ValidationError> {
    Ok(parse_datetime(input)?.timestamp())
}

/// Reformat a date as `YYYY-MM-DD HH:MM:SS`.
///
/// Wall-clock input is only reformatted, never resolved against the local
/// timezone; zoned input is written in its own offset.
pub fn normalize_datetime(input: &str) -> Result<String, ValidationError> {
    Ok(match parse_components(input)? {
        ParsedDate::Zoned(zoned) => zoned.format(DATETIME_FORMAT).to_string(),
        ParsedDate::Naive(naive) => naive.format(DATETIME_FORMAT).to_string(),
    })
}
