//! Turns the date and time text of an opener line into an absolute instant.
//!
//! The two grammars disagree on field order, so the text is split and
//! assigned positionally rather than handed to a format string:
//! [`Grammar::TwentyFourHour`] reads `day/month/year`,
//! [`Grammar::TwelveHour`] reads `month/day/year` and carries an AM/PM suffix.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use thiserror::Error;

use super::grammar::Grammar;

/// Two-digit years below this map to 20xx, the rest to 19xx.
pub const YEAR_PIVOT: i32 = 50;

/// Why an opener's date or time couldn't be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Date isn't three `/`-separated numbers.
    #[error("date '{0}' must be three numbers separated by '/'")]
    MalformedDate(String),
    /// Year has a width other than two or four digits.
    #[error("year '{0}' must have two or four digits")]
    InvalidYear(String),
    /// Month outside 1–12.
    #[error("month {0} is out of range")]
    MonthOutOfRange(u32),
    /// Day outside 1–31.
    #[error("day {0} is out of range")]
    DayOutOfRange(u32),
    /// Time isn't `H:mm:ss`, or the AM/PM suffix is missing.
    #[error("time '{0}' is malformed")]
    MalformedTime(String),
    /// Hour, minute or second outside its range.
    #[error("time '{0}' is out of range")]
    TimeOutOfRange(String),
    /// Fields are individually in range but name no real day (e.g. 30 February).
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    NoSuchDate {
        /// Four-digit year
        year: i32,
        /// Month 1–12
        month: u32,
        /// Day 1–31
        day: u32,
    },
}

/// 12-hour clock suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    /// Before noon.
    Am,
    /// Noon and after.
    Pm,
}

/// Converts a 12-hour clock hour (1–12) to 24-hour.
///
/// ```
/// use chatdoc::parsing::datetime::{Meridiem, to_24_hour};
///
/// assert_eq!(to_24_hour(12, Meridiem::Am), 0);
/// assert_eq!(to_24_hour(12, Meridiem::Pm), 12);
/// assert_eq!(to_24_hour(1, Meridiem::Pm), 13);
/// assert_eq!(to_24_hour(9, Meridiem::Am), 9);
/// ```
pub fn to_24_hour(hour: u32, meridiem: Meridiem) -> u32 {
    match (hour, meridiem) {
        (12, Meridiem::Am) => 0,
        (12, Meridiem::Pm) => 12,
        (h, Meridiem::Am) => h,
        (h, Meridiem::Pm) => h + 12,
    }
}

/// Expands a year field: two digits pivot at [`YEAR_PIVOT`], four digits
/// pass through.
///
/// ```
/// use chatdoc::parsing::datetime::expand_year;
///
/// assert_eq!(expand_year("49"), Ok(2049));
/// assert_eq!(expand_year("50"), Ok(1950));
/// assert_eq!(expand_year("2024"), Ok(2024));
/// assert!(expand_year("202").is_err());
/// ```
pub fn expand_year(raw: &str) -> Result<i32, ResolveError> {
    let digits = parse_number(raw).ok_or_else(|| ResolveError::InvalidYear(raw.to_string()))?;
    let value = i32::try_from(digits).map_err(|_| ResolveError::InvalidYear(raw.to_string()))?;
    match raw.len() {
        2 if value < YEAR_PIVOT => Ok(2000 + value),
        2 => Ok(1900 + value),
        4 => Ok(value),
        _ => Err(ResolveError::InvalidYear(raw.to_string())),
    }
}

/// Resolves the date and time text of a matched line into an instant in
/// `offset`.
///
/// Every failure is returned as a [`ResolveError`]; impossible calendar
/// dates never panic.
///
/// ```
/// use chatdoc::parsing::datetime::resolve;
/// use chatdoc::parsing::grammar::Grammar;
/// use chrono::{Datelike, FixedOffset, Timelike};
///
/// let utc = FixedOffset::east_opt(0).unwrap();
///
/// let a = resolve(Grammar::TwentyFourHour, "3/4/2024", "18:05:00", utc).unwrap();
/// assert_eq!((a.day(), a.month(), a.hour()), (3, 4, 18));
///
/// let b = resolve(Grammar::TwelveHour, "3/4/24", "6:05:00 PM", utc).unwrap();
/// assert_eq!((b.month(), b.day(), b.hour()), (3, 4, 18));
///
/// assert!(resolve(Grammar::TwentyFourHour, "30/2/2024", "10:00:00", utc).is_err());
/// ```
pub fn resolve(
    grammar: Grammar,
    date: &str,
    time: &str,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, ResolveError> {
    let (year, month, day) = resolve_date(grammar, date)?;
    let (hour, minute, second) = resolve_time(grammar, time)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ResolveError::NoSuchDate { year, month, day })?
        .and_hms_opt(hour, minute, second)
        .ok_or_else(|| ResolveError::TimeOutOfRange(time.to_string()))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or(ResolveError::NoSuchDate { year, month, day })
}

fn resolve_date(grammar: Grammar, date: &str) -> Result<(i32, u32, u32), ResolveError> {
    let malformed = || ResolveError::MalformedDate(date.to_string());

    let parts: Vec<&str> = date.trim().split('/').collect();
    let [first, second, year] = parts.as_slice() else {
        return Err(malformed());
    };

    let first = parse_number(first).ok_or_else(malformed)?;
    let second = parse_number(second).ok_or_else(malformed)?;
    let year = expand_year(year)?;

    let (day, month) = if grammar.is_day_first() {
        (first, second)
    } else {
        (second, first)
    };

    if !(1..=12).contains(&month) {
        return Err(ResolveError::MonthOutOfRange(month));
    }
    if !(1..=31).contains(&day) {
        return Err(ResolveError::DayOutOfRange(day));
    }

    Ok((year, month, day))
}

fn resolve_time(grammar: Grammar, time: &str) -> Result<(u32, u32, u32), ResolveError> {
    let out_of_range = || ResolveError::TimeOutOfRange(time.to_string());

    let (clock, meridiem) = match grammar {
        Grammar::TwentyFourHour => (time.trim(), None),
        Grammar::TwelveHour => {
            let (clock, meridiem) = split_meridiem(time)?;
            (clock, Some(meridiem))
        }
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let [hour, minute, second] = parts.as_slice() else {
        return Err(ResolveError::MalformedTime(time.to_string()));
    };
    let malformed = || ResolveError::MalformedTime(time.to_string());
    let hour = parse_number(hour).ok_or_else(malformed)?;
    let minute = parse_number(minute).ok_or_else(malformed)?;
    let second = parse_number(second).ok_or_else(malformed)?;

    if minute > 59 || second > 59 {
        return Err(out_of_range());
    }

    let hour = match meridiem {
        None if hour <= 23 => hour,
        Some(meridiem) if (1..=12).contains(&hour) => to_24_hour(hour, meridiem),
        _ => return Err(out_of_range()),
    };

    Ok((hour, minute, second))
}

fn split_meridiem(time: &str) -> Result<(&str, Meridiem), ResolveError> {
    let malformed = || ResolveError::MalformedTime(time.to_string());

    let trimmed = time.trim();
    let cut = trimmed
        .len()
        .checked_sub(2)
        .filter(|&i| trimmed.is_char_boundary(i))
        .ok_or_else(malformed)?;
    let (clock, suffix) = trimmed.split_at(cut);

    let meridiem = match suffix.to_ascii_lowercase().as_str() {
        "am" => Meridiem::Am,
        "pm" => Meridiem::Pm,
        _ => return Err(malformed()),
    };

    Ok((clock.trim_end(), meridiem))
}

fn parse_number(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
