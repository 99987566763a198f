//! Channel message rendering in the local calendar.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::models::Contest;
use crate::utils::datetime::{to_local, to_persian_digits, weekday_name, JalaliDate};

pub const TODAY: &str = "امروز";
pub const TOMORROW: &str = "فردا";
pub const DAY_AFTER_TOMORROW: &str = "پس‌فردا";
/// Returned for contests past the fetch horizon.
pub const UNKNOWN_DAY: &str = "?";

pub const ALARM_HEADER: &str = "یک ساعت تا شروع مسابقه!";
pub const DAILY_GREETING: &str = "سلام ملت!";

const AND: &str = " و ";

/// Labels `start` relative to `now`, both compared as local calendar dates.
pub fn relative_day_label(now: &DateTime<Utc>, start: &DateTime<Utc>) -> &'static str {
    let today = to_local(now).date_naive();
    let day = to_local(start).date_naive();

    match (day - today).num_days() {
        0 => TODAY,
        1 => TOMORROW,
        2 => DAY_AFTER_TOMORROW,
        offset => {
            warn!(
                "Contest starts {} local day(s) from now ({}), outside the labelled range",
                offset, start
            );
            UNKNOWN_DAY
        }
    }
}

/// Renders the nonzero day/hour/minute parts of `duration` joined with "and".
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    let parts: Vec<String> = [(days, "روز"), (hours, "ساعت"), (minutes, "دقیقه")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{} {}", value, unit))
        .collect();

    if parts.is_empty() {
        return to_persian_digits("0 دقیقه");
    }
    to_persian_digits(&parts.join(AND))
}

/// `HH:MM` in local time with Persian digits.
pub fn format_clock(dt: &DateTime<Utc>) -> String {
    to_persian_digits(&to_local(dt).format("%H:%M").to_string())
}

/// Weekday plus Jalali day and month of the local date, e.g. `شنبه ۲۸ مهر`.
pub fn format_local_date(dt: &DateTime<Utc>) -> String {
    let date = to_local(dt).date_naive();
    let jalali = JalaliDate::from_gregorian(date);
    format!(
        "{} {} {}",
        weekday_name(date),
        to_persian_digits(&jalali.day.to_string()),
        jalali.month_name()
    )
}

pub fn format_announcement(contest: &Contest, now: &DateTime<Utc>) -> String {
    [
        format!(
            "{}، {}",
            relative_day_label(now, &contest.start),
            format_local_date(&contest.start)
        ),
        format!("ساعت شروع: {}", format_clock(&contest.start)),
        format!("مدت: {}", format_duration(contest.duration())),
        contest.event.clone(),
        contest.href.clone(),
    ]
    .join("\n")
}

pub fn format_alarm(contest: &Contest) -> String {
    format!("{}\n{}\n{}", ALARM_HEADER, contest.event, contest.href)
}
