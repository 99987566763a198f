//! Local time handling: the fixed Tehran offset, the Persian (Jalali) calendar
//! and Persian digits.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

use crate::error::ContestError;

/// Tehran has observed a fixed +03:30 offset since daylight saving was dropped.
const TEHRAN_OFFSET_SECS: i32 = 3 * 3600 + 30 * 60;

const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Persian week starts on Saturday.
const WEEKDAY_NAMES: [&str; 7] = [
    "شنبه",
    "یکشنبه",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنجشنبه",
    "جمعه",
];

/// Timestamp layout the contest API uses, without an offset.
pub const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn tehran() -> FixedOffset {
    FixedOffset::east_opt(TEHRAN_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn to_local(dt: &DateTime<Utc>) -> DateTime<FixedOffset> {
    dt.with_timezone(&tehran())
}

/// A date in the Persian solar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    pub fn from_gregorian(date: NaiveDate) -> Self {
        const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

        let gy = i64::from(date.year());
        let gm = date.month() as usize;
        let gd = i64::from(date.day());

        let gy2 = if gm > 2 { gy + 1 } else { gy };
        let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
            + gd
            + DAYS_BEFORE_MONTH[gm - 1];

        let mut year = -1595 + 33 * (days / 12053);
        days %= 12053;
        year += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            year += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        let (month, day) = if days < 186 {
            (1 + days / 31, 1 + days % 31)
        } else {
            (7 + (days - 186) / 30, 1 + (days - 186) % 30)
        };

        Self {
            year: year as i32,
            month: month as u32,
            day: day as u32,
        }
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month as usize - 1) % 12]
    }
}

/// Persian weekday name for a local date.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    let index = (date.weekday().num_days_from_monday() + 2) % 7;
    WEEKDAY_NAMES[index as usize]
}

/// Replaces ASCII digits with Extended Arabic-Indic (Persian) digits.
pub fn to_persian_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32('۰' as u32 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// Parses an API or operator supplied timestamp.
///
/// Accepts RFC 3339 (with offset) as well as naive `YYYY-MM-DDTHH:MM[:SS]`
/// and `YYYY-MM-DD HH:MM[:SS]`, which are taken as UTC.
pub fn parse_datetime(input: &str) -> Result<DateTime<Utc>, ContestError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ContestError::InvalidTimestamp {
            value: input.to_string(),
        })
}

/// Second-precision UTC timestamp for API query parameters.
pub fn format_api_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(API_TIMESTAMP_FORMAT).to_string()
}
