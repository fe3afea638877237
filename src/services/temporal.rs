//! Turns free-text utterances like "book me a table for 4 tomorrow around 7"
//! into an absolute, offset-aware, future-dated reservation time plus a
//! party size.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use regex::Regex;

/// Output of a successful resolution. `date_time` is anchored to the
/// restaurant's UTC offset and never lies in the past.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReservation {
    pub date_time: DateTime<FixedOffset>,
    pub party_size: u32,
}

static RE_ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());

static RE_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?\b").unwrap()
});

static RE_DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(?:of\s+)?(january|february|march|april|may|june|july|august|september|october|november|december)\b").unwrap()
});

static RE_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(next)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .unwrap()
});

static RE_OCLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*o\s*'?\s*clock").unwrap());

static RE_MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm|a\.m\.?|p\.m\.?)").unwrap()
});

static RE_PARTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s*(?:people|persons?|guests?)\b").unwrap());

static RE_PARTY_FOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfor\s+(\d{1,2})\b").unwrap());

type DateStrategy = fn(&str, DateTime<FixedOffset>) -> Option<NaiveDateTime>;

/// Ordered parsing attempts; the first strategy that yields a date wins.
/// The first three together cover explicit calendar dates, the last two the
/// time-only phrasings with relative day words.
const STRATEGIES: &[(&str, DateStrategy)] = &[
    ("iso-date", parse_iso_date),
    ("month-day", parse_month_day),
    ("weekday", parse_weekday),
    ("oclock", parse_oclock),
    ("meridiem", parse_meridiem),
];

/// Resolve an utterance against an explicit "now" in the restaurant's zone.
/// Returns `None` when no strategy finds a date; the caller is expected to
/// ask the caller to clarify rather than treat this as an error.
pub fn resolve(utterance: &str, now: DateTime<FixedOffset>) -> Option<ResolvedReservation> {
    let naive = STRATEGIES.iter().find_map(|(name, strategy)| {
        let parsed = strategy(utterance, now)?;
        tracing::debug!(strategy = *name, parsed = %parsed, "date strategy matched");
        Some(parsed)
    })?;

    let mut date_time = now.offset().from_local_datetime(&naive).single()?;

    // A same-day time that has already elapsed means the next day ("7pm"
    // spoken at 9pm). An explicitly dated past time is left alone.
    if date_time < now && date_time.date_naive() == now.date_naive() {
        date_time += Duration::days(1);
    }

    Some(ResolvedReservation {
        date_time,
        party_size: extract_party_size(utterance),
    })
}

/// Full ISO-style date, optionally with a spoken time. No future bias: what
/// the caller dated explicitly stands as said.
fn parse_iso_date(text: &str, _now: DateTime<FixedOffset>) -> Option<NaiveDateTime> {
    let caps = RE_ISO_DATE.captures(text)?;
    let date = NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )?;
    let (hour, minute) = extract_time(text).unwrap_or((0, 0));
    date.and_hms_opt(hour, minute, 0)
}

/// "june 15" / "15th of june", no year given: biased to the next future
/// occurrence of that calendar date.
fn parse_month_day(text: &str, now: DateTime<FixedOffset>) -> Option<NaiveDateTime> {
    let (month, day) = if let Some(caps) = RE_MONTH_DAY.captures(text) {
        (month_number(&caps[1])?, caps[2].parse().ok()?)
    } else if let Some(caps) = RE_DAY_MONTH.captures(text) {
        (month_number(&caps[2])?, caps[1].parse().ok()?)
    } else {
        return None;
    };

    let mut date = NaiveDate::from_ymd_opt(now.year(), month, day)?;
    if date < now.date_naive() {
        date = NaiveDate::from_ymd_opt(now.year() + 1, month, day)?;
    }
    let (hour, minute) = extract_time(text).unwrap_or((0, 0));
    date.and_hms_opt(hour, minute, 0)
}

/// A weekday name plus a spoken time; resolves to the next occurrence of
/// that weekday. A bare weekday with no time is not enough to book, so the
/// strategy declines and resolution falls through to clarification.
fn parse_weekday(text: &str, now: DateTime<FixedOffset>) -> Option<NaiveDateTime> {
    let caps = RE_WEEKDAY.captures(text)?;
    let target = weekday_from_name(&caps[2])?;
    let (hour, minute) = extract_time(text)?;

    let today = now.date_naive();
    let mut days_ahead =
        (target.num_days_from_monday() as i64 - today.weekday().num_days_from_monday() as i64)
            .rem_euclid(7);
    if days_ahead == 0 && caps.get(1).is_some() {
        days_ahead = 7;
    }
    (today + Duration::days(days_ahead)).and_hms_opt(hour, minute, 0)
}

/// "N o'clock": bare hour with no meridiem. Hours 5 through 10 are read as
/// evening (dinner bias); day picked by the "tomorrow" keyword.
fn parse_oclock(text: &str, now: DateTime<FixedOffset>) -> Option<NaiveDateTime> {
    let caps = RE_OCLOCK.captures(text)?;
    let mut hour: u32 = caps[1].parse().ok()?;
    if (5..=10).contains(&hour) {
        hour += 12;
    }
    base_day(text, now).and_hms_opt(hour, 0, 0)
}

/// Explicit am/pm time with optional minutes; "tomorrow"/"tonight" pick the
/// day, otherwise today.
fn parse_meridiem(text: &str, now: DateTime<FixedOffset>) -> Option<NaiveDateTime> {
    let caps = RE_MERIDIEM.captures(text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    let hour = to_24_hour(hour, &caps[3]);
    base_day(text, now).and_hms_opt(hour, minute, 0)
}

fn month_number(name: &str) -> Option<u32> {
    let n = match name.to_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(n)
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let day = match name.to_lowercase().as_str() {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

fn base_day(text: &str, now: DateTime<FixedOffset>) -> NaiveDate {
    let today = now.date_naive();
    if text.to_lowercase().contains("tomorrow") {
        today + Duration::days(1)
    } else {
        today
    }
}

fn to_24_hour(hour: u32, meridiem: &str) -> u32 {
    let meridiem = meridiem.to_lowercase();
    if meridiem.starts_with('p') && hour < 12 {
        hour + 12
    } else if meridiem.starts_with('a') && hour == 12 {
        0
    } else {
        hour
    }
}

/// Shared time lookup for the date-bearing strategies: an am/pm time wins,
/// otherwise an o'clock hour with the same evening bias as `parse_oclock`.
fn extract_time(text: &str) -> Option<(u32, u32)> {
    if let Some(caps) = RE_MERIDIEM.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        return Some((to_24_hour(hour, &caps[3]), minute));
    }
    if let Some(caps) = RE_OCLOCK.captures(text) {
        let mut hour: u32 = caps[1].parse().ok()?;
        if (5..=10).contains(&hour) {
            hour += 12;
        }
        return Some((hour, 0));
    }
    None
}

/// Party size runs as an independent pass over the whole utterance. The
/// explicit "N people/guests" form wins; "for N" is accepted only when N is
/// not immediately followed by a time marker, so "table for 4 tomorrow"
/// yields 4 while "a table for 7pm" does not yield 7.
fn extract_party_size(text: &str) -> u32 {
    if let Some(caps) = RE_PARTY.captures(text) {
        if let Ok(n) = caps[1].parse::<u32>() {
            if n > 0 {
                return n;
            }
        }
    }

    for caps in RE_PARTY_FOR.captures_iter(text) {
        let Some(m) = caps.get(1) else { continue };
        let tail = text[m.end()..].trim_start().to_lowercase();
        let looks_like_time = text[m.end()..].starts_with(':')
            || ["am", "pm", "a.m", "p.m", "o'clock", "o clock", "oclock"]
                .iter()
                .any(|marker| tail.starts_with(marker));
        if looks_like_time {
            continue;
        }
        if let Ok(n) = caps[1].parse::<u32>() {
            if n > 0 {
                return n;
            }
        }
    }

    2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_tomorrow_evening_with_party() {
        let now = at("2024-06-10T10:00:00+05:30");
        let r = resolve("table for 4 tomorrow at 7pm", now).unwrap();
        assert_eq!(r.date_time, at("2024-06-11T19:00:00+05:30"));
        assert_eq!(r.party_size, 4);
    }

    #[test]
    fn test_oclock_evening_bias_same_day() {
        let now = at("2024-06-10T08:00:00+05:30");
        let r = resolve("book a table at 9 o'clock", now).unwrap();
        assert_eq!(r.date_time, at("2024-06-10T21:00:00+05:30"));
    }

    #[test]
    fn test_oclock_late_hour_not_shifted() {
        let now = at("2024-06-10T08:00:00+05:30");
        // 11 is outside the 5..=10 dinner window, stays as 11:00.
        let r = resolve("a table at 11 o'clock", now).unwrap();
        assert_eq!(r.date_time, at("2024-06-10T11:00:00+05:30"));
    }

    #[test]
    fn test_elapsed_same_day_time_rolls_forward() {
        let now = at("2024-06-10T21:00:00+05:30");
        let r = resolve("7pm", now).unwrap();
        assert_eq!(r.date_time, at("2024-06-11T19:00:00+05:30"));
    }

    #[test]
    fn test_explicit_past_date_left_alone() {
        let now = at("2024-06-10T10:00:00+05:30");
        let r = resolve("2024-01-05 at 7pm", now).unwrap();
        assert_eq!(r.date_time, at("2024-01-05T19:00:00+05:30"));
    }

    #[test]
    fn test_party_size_defaults_to_two() {
        let now = at("2024-06-10T10:00:00+05:30");
        let r = resolve("reserve a table tomorrow at 8pm", now).unwrap();
        assert_eq!(r.party_size, 2);
    }

    #[test]
    fn test_party_size_from_people_suffix() {
        let now = at("2024-06-10T10:00:00+05:30");
        let r = resolve("6 people tonight at 8:30 pm", now).unwrap();
        assert_eq!(r.party_size, 6);
        assert_eq!(r.date_time, at("2024-06-10T20:30:00+05:30"));
    }

    #[test]
    fn test_for_n_not_confused_with_time() {
        assert_eq!(extract_party_size("a table for 7pm please"), 2);
        assert_eq!(extract_party_size("a table for 7 pm please"), 2);
        assert_eq!(extract_party_size("a table for 7 o'clock"), 2);
        assert_eq!(extract_party_size("a table for 3"), 3);
    }

    #[test]
    fn test_weekday_next_occurrence() {
        // 2024-06-10 is a Monday.
        let now = at("2024-06-10T10:00:00+05:30");
        let r = resolve("friday at 7pm for 5 people", now).unwrap();
        assert_eq!(r.date_time, at("2024-06-14T19:00:00+05:30"));
        assert_eq!(r.party_size, 5);
    }

    #[test]
    fn test_next_weekday_skips_today() {
        let now = at("2024-06-10T10:00:00+05:30");
        let r = resolve("next monday at 6pm", now).unwrap();
        assert_eq!(r.date_time, at("2024-06-17T18:00:00+05:30"));
    }

    #[test]
    fn test_weekday_without_time_fails() {
        let now = at("2024-06-10T10:00:00+05:30");
        assert!(resolve("book a table for friday", now).is_none());
    }

    #[test]
    fn test_month_day_future_bias() {
        let now = at("2024-06-10T10:00:00+05:30");
        let r = resolve("march 5th at 7pm", now).unwrap();
        assert_eq!(r.date_time, at("2025-03-05T19:00:00+05:30"));
    }

    #[test]
    fn test_noon_hour_twelve_pm() {
        let now = at("2024-06-10T10:00:00+05:30");
        let r = resolve("12pm tomorrow", now).unwrap();
        assert_eq!(r.date_time, at("2024-06-11T12:00:00+05:30"));
    }

    #[test]
    fn test_twelve_am_is_midnight() {
        let now = at("2024-06-10T10:00:00+05:30");
        let r = resolve("12am tomorrow", now).unwrap();
        assert_eq!(r.date_time, at("2024-06-11T00:00:00+05:30"));
    }

    #[test]
    fn test_unparseable_utterance_returns_none() {
        let now = at("2024-06-10T10:00:00+05:30");
        assert!(resolve("I want to make a reservation", now).is_none());
        assert!(resolve("", now).is_none());
    }
}
