//! Parsing of the search API's publication dates.
//!
//! Serper reports either relative ages ("3 hours ago", "an hour ago") or
//! absolute dates ("Mar 3, 2025"). A date without a time resolves to the last
//! second of that UTC day, capped at `now`, so the window filter only drops
//! it when the whole day is outside the window. Ages too large for chrono
//! parse as `None`.

use chrono::{DateTime, Duration, NaiveDate, Utc};

const DATE_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%d %b %Y", "%Y-%m-%d"];

pub fn parse_published(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let lower = text.to_lowercase();
    if lower == "just now" || lower == "now" {
        return Some(now);
    }
    if let Some(age) = lower.strip_suffix(" ago") {
        return parse_age(age).and_then(|age| now.checked_sub_signed(age));
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|end_of_day| end_of_day.and_utc().min(now))
}

fn parse_age(age: &str) -> Option<Duration> {
    let mut parts = age.split_whitespace();
    let count = match parts.next()? {
        "a" | "an" => 1,
        n => n.parse::<i64>().ok().filter(|n| *n >= 0)?,
    };
    let unit = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let unit = unit.trim_end_matches('s');
    match unit {
        "sec" | "second" => Duration::try_seconds(count),
        "min" | "minute" => Duration::try_minutes(count),
        "hr" | "hour" => Duration::try_hours(count),
        "day" => Duration::try_days(count),
        "week" => Duration::try_weeks(count),
        "month" => count.checked_mul(30).and_then(Duration::try_days),
        "year" => count.checked_mul(365).and_then(Duration::try_days),
        _ => None,
    }
}
