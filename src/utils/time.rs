use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

/// This is the standard way of converting a date to a preference key value in hydrawatch.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y%m%d").ok()
}

/// Returns the next top of the hour after `now`.
pub fn next_hour_start(now: NaiveDateTime) -> NaiveDateTime {
    (now + Duration::hours(1))
        .with_minute(0)
        .unwrap()
        .with_second(0)
        .unwrap()
        .with_nanosecond(0)
        .unwrap()
}

/// Reminders only fire between 07:00 and 23:59 local time. Ticks outside the window are dropped
/// silently.
pub fn in_reminder_window(hour: u32) -> bool {
    (7..=23).contains(&hour)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use super::{date_key, in_reminder_window, next_hour_start, parse_date_key};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveTime::from_hms_opt(h, m, s).unwrap(),
        )
    }

    #[test]
    fn date_key_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(date_key(date), "20240102");
        assert_eq!(parse_date_key("20240102"), Some(date));
        assert_eq!(parse_date_key(""), None);
        assert_eq!(parse_date_key("yesterday"), None);
    }

    #[test]
    fn next_hour_start_rounds_up() {
        assert_eq!(next_hour_start(at(6, 30, 12)), at(7, 0, 0));
        assert_eq!(next_hour_start(at(6, 0, 0)), at(7, 0, 0));
        // Midnight flips over to the next day.
        let last = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
        );
        let next = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            NaiveTime::MIN,
        );
        assert_eq!(next_hour_start(last), next);
    }

    #[test]
    fn reminder_window_bounds() {
        assert!(!in_reminder_window(0));
        assert!(!in_reminder_window(6));
        assert!(in_reminder_window(7));
        assert!(in_reminder_window(23));
    }
}
