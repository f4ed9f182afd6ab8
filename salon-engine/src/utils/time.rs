//! Time helpers - placing salon-local dates and clock times on the timeline
//!
//! Storage and policy arithmetic work in Unix millis; these helpers are the
//! only place a salon-local (date, minute-of-day) pair becomes an instant.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Date + minute-of-day (salon timezone) → Unix millis
///
/// Returns `None` when the local time does not exist (DST gap). An
/// ambiguous local time (DST overlap) resolves to the earlier instant.
pub fn local_minute_to_millis(date: NaiveDate, minute: u32, tz: Tz) -> Option<i64> {
    let naive = date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minute));
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_utc_minute_to_millis() {
        let millis = local_minute_to_millis(date(2026, 3, 16), 9 * 60, Tz::UTC).unwrap();
        let expected = Tz::UTC
            .with_ymd_and_hms(2026, 3, 16, 9, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(millis, expected);
    }

    #[test]
    fn test_end_of_day_rolls_to_next_midnight() {
        let end = local_minute_to_millis(date(2026, 3, 16), 1440, Tz::UTC).unwrap();
        let next = local_minute_to_millis(date(2026, 3, 17), 0, Tz::UTC).unwrap();
        assert_eq!(end, next);
    }

    #[test]
    fn test_dst_gap_has_no_instant() {
        // Europe/Madrid jumps from 02:00 to 03:00 on 2026-03-29
        let tz: Tz = "Europe/Madrid".parse().unwrap();
        assert!(local_minute_to_millis(date(2026, 3, 29), 2 * 60 + 30, tz).is_none());
        assert!(local_minute_to_millis(date(2026, 3, 29), 3 * 60, tz).is_some());
    }
}
