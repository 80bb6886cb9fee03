//! Calendar-week arithmetic shared by plan tagging, grocery scoping and
//! reminder scheduling.
//!
//! There are exactly two week conventions in the app, and each use-case is
//! pinned to one by name. Plans and their grocery items are tagged and looked
//! up by Sunday-start weeks; the weekly "regenerate" reminder lands at the end
//! of a Monday-start week. Call sites must use these constants, never a
//! weekday literal.

use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, Weekday};

/// Week convention for plan/grocery association and "this week's plan".
pub const PLAN_WEEK_START: Weekday = Weekday::Sunday;

/// Week convention for the weekly regenerate reminder.
pub const REMINDER_WEEK_START: Weekday = Weekday::Monday;

/// The most recent occurrence of `week_start` on or before `reference`.
pub fn start_of_week(reference: Date, week_start: Weekday) -> Date {
    let days_back = (reference.weekday().number_days_from_monday() as i64
        - week_start.number_days_from_monday() as i64)
        .rem_euclid(7);
    reference - Duration::days(days_back)
}

/// Last calendar day of the week beginning at `week_start`.
pub fn week_end(week_start: Date) -> Date {
    week_start + Duration::days(6)
}

/// True iff `week_start <= timestamp < week_start + 7 days` (UTC midnights).
pub fn is_within_week(timestamp: OffsetDateTime, week_start: Date) -> bool {
    let start = at_midnight(week_start);
    timestamp >= start && timestamp < start + Duration::days(7)
}

pub fn at_midnight(date: Date) -> OffsetDateTime {
    PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc()
}

pub fn at_time(date: Date, time: Time) -> OffsetDateTime {
    PrimitiveDateTime::new(date, time).assume_utc()
}

/// Parse an "HH:MM" wall-clock string, e.g. "08:30".
pub fn parse_hhmm(s: &str) -> Option<Time> {
    let format = time::macros::format_description!("[hour]:[minute]");
    Time::parse(s, &format).ok()
}

/// Parse a "YYYY-MM-DD" calendar date, the same format `serde_date` emits.
pub fn parse_date(s: &str) -> Option<Date> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(s, &format).ok()
}

/// Serde adapter for bare calendar dates as "YYYY-MM-DD" strings.
pub mod serde_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{format_description::FormatItem, macros::format_description, Date};

    const FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let s = date.format(&FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let s = String::deserialize(deserializer)?;
        Date::parse(&s, &FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn start_of_week_on_the_anchor_day_is_identity() {
        // 2024-01-01 was a Monday, 2024-01-07 a Sunday.
        assert_eq!(
            start_of_week(date!(2024 - 01 - 01), Weekday::Monday),
            date!(2024 - 01 - 01)
        );
        assert_eq!(
            start_of_week(date!(2024 - 01 - 07), Weekday::Sunday),
            date!(2024 - 01 - 07)
        );
    }

    #[test]
    fn start_of_week_goes_back_to_most_recent_anchor() {
        let wednesday = date!(2024 - 01 - 03);
        assert_eq!(
            start_of_week(wednesday, Weekday::Sunday),
            date!(2023 - 12 - 31)
        );
        assert_eq!(
            start_of_week(wednesday, Weekday::Monday),
            date!(2024 - 01 - 01)
        );
    }

    #[test]
    fn sunday_and_monday_conventions_differ_on_sundays() {
        let sunday = date!(2024 - 01 - 07);
        assert_eq!(start_of_week(sunday, PLAN_WEEK_START), sunday);
        assert_eq!(
            start_of_week(sunday, REMINDER_WEEK_START),
            date!(2024 - 01 - 01)
        );
    }

    #[test]
    fn week_end_is_six_days_out() {
        assert_eq!(week_end(date!(2024 - 01 - 01)), date!(2024 - 01 - 07));
    }

    #[test]
    fn within_week_is_half_open() {
        let week_start = date!(2024 - 01 - 07);
        assert!(is_within_week(at_midnight(week_start), week_start));
        assert!(is_within_week(
            at_midnight(week_start) + Duration::days(6) + Duration::hours(23),
            week_start
        ));
        assert!(!is_within_week(
            at_midnight(week_start) + Duration::days(7),
            week_start
        ));
        assert!(!is_within_week(
            at_midnight(week_start) - Duration::seconds(1),
            week_start
        ));
    }

    #[test]
    fn parses_meal_times() {
        assert_eq!(parse_hhmm("08:30"), Time::from_hms(8, 30, 0).ok());
        assert_eq!(parse_hhmm("12:00"), Time::from_hms(12, 0, 0).ok());
        assert_eq!(parse_hhmm("not a time"), None);
    }

    #[test]
    fn date_serde_round_trip() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "serde_date")]
            date: Date,
        }
        let json = serde_json::to_string(&Wrapper {
            date: date!(2024 - 02 - 29),
        })
        .unwrap();
        assert_eq!(json, r#"{"date":"2024-02-29"}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.date, date!(2024 - 02 - 29));
    }
}
