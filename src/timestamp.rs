//! Target timestamp parsing
//!
//! Converts the user's `dd-mm-YYYY` date and `hh.mm.ss` time into epoch
//! seconds, interpreting the pair as local wall-clock time. This is the
//! same clock hieronymus uses when it names snapshot directories and
//! patch files.

use crate::error::{HadminError, Result};
use chrono::{LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Separator between day, month and year
pub const DATE_SEPARATOR: char = '-';
/// Separator between hours, minutes and seconds
pub const TIME_SEPARATOR: char = '.';

/// Parse a date and time into epoch seconds in the local timezone
///
/// # Errors
///
/// - [`HadminError::Parse`] if a field is not a number, a string has the
///   wrong number of fields, or the fields do not form a valid calendar
///   date and time of day
/// - [`HadminError::Parse`] if the local time does not exist (skipped by a
///   daylight saving transition)
pub fn parse_target(date: &str, time: &str) -> Result<i64> {
    parse_target_in(&chrono::Local, date, time)
}

/// Parse a date and time into epoch seconds in the given timezone
///
/// Ambiguous local times (repeated when clocks go back) resolve to the
/// earlier instant.
pub fn parse_target_in<Tz: TimeZone>(tz: &Tz, date: &str, time: &str) -> Result<i64> {
    let naive = parse_naive(date, time)?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.timestamp()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp()),
        LocalResult::None => Err(HadminError::parse(
            format!("{} {}", date, time),
            "local time does not exist in this timezone",
        )),
    }
}

/// Parse the date and time strings into a timezone-less datetime
pub fn parse_naive(date: &str, time: &str) -> Result<NaiveDateTime> {
    let [day, month, year] = fields(date, DATE_SEPARATOR)?;
    let [hour, minute, second] = fields(time, TIME_SEPARATOR)?;

    let year = i32::try_from(year)
        .map_err(|_| HadminError::parse(date, "year out of range"))?;
    let date_part = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| HadminError::parse(date, "not a valid calendar date"))?;
    let time_part = NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| HadminError::parse(time, "not a valid time of day"))?;

    Ok(date_part.and_time(time_part))
}

fn fields(input: &str, separator: char) -> Result<[u32; 3]> {
    let parts: Vec<&str> = input.split(separator).collect();
    if parts.len() != 3 {
        return Err(HadminError::parse(
            input,
            format!("expected 3 fields separated by '{}'", separator),
        ));
    }

    let mut out = [0u32; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        let part = part.trim();
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HadminError::parse(input, format!("{:?} is not a number", part)));
        }
        *slot = part
            .parse()
            .map_err(|_| HadminError::parse(input, format!("{:?} is too large", part)))?;
    }
    Ok(out)
}
