use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt::Write;
use std::time::Duration;

/// Layout of `date` output, as exported into START_TIME / END_TIME by CI scripts.
const UNIX_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Z %Y";
const EXECUTION_DATE_FORMAT: &str = "%B %-d, %Y %H:%M:%S";

/// Formats a duration rounded to milliseconds: `0s`, `150ms`, `3.2s`, `1m2.25s`, `1h0m0s`.
pub fn format_duration(duration: Duration) -> String {
    let millis = (duration.as_micros() + 500) / 1000;
    if millis == 0 {
        return "0s".to_owned();
    }
    if millis < 1000 {
        return format!("{}ms", millis);
    }
    let hours = millis / 3_600_000;
    let minutes = (millis / 60_000) % 60;
    let seconds = (millis / 1000) % 60;
    let fraction = millis % 1000;

    let mut formatted = String::new();
    if hours > 0 {
        let _ = write!(formatted, "{}h", hours);
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(formatted, "{}m", minutes);
    }
    let _ = write!(formatted, "{}", seconds);
    if fraction > 0 {
        let digits = format!("{:03}", fraction);
        let _ = write!(formatted, ".{}", digits.trim_end_matches('0'));
    }
    formatted.push('s');
    formatted
}

/// Parses `Mon Jan _2 15:04:05 MST 2006`. The zone name is ignored and the
/// timestamp is taken as local time.
pub fn parse_unix_date(value: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), UNIX_DATE_FORMAT).ok()?;
    Local.from_local_datetime(&naive).single()
}

pub fn format_execution_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(EXECUTION_DATE_FORMAT).to_string()
}

pub fn elapsed_between(start: &DateTime<Local>, end: &DateTime<Local>) -> Duration {
    end.signed_duration_since(*start)
        .to_std()
        .unwrap_or_default()
}
