//! Time helpers

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use shared::Timestamp;

/// Current time as Unix milliseconds
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Start of a UTC day as Unix milliseconds
pub fn day_start_millis(date: NaiveDate) -> Timestamp {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
        .timestamp_millis()
}

/// UTC date of a Unix-millisecond timestamp
pub fn date_of_millis(millis: Timestamp) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

/// UTC hour-of-day (0..=23) of a Unix-millisecond timestamp
pub fn hour_of_millis(millis: Timestamp) -> u32 {
    use chrono::Timelike;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.hour())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_start_round_trips() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let millis = day_start_millis(date);
        assert_eq!(date_of_millis(millis), date);
        assert_eq!(hour_of_millis(millis), 0);
    }

    #[test]
    fn hour_extraction() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let millis = day_start_millis(date) + 13 * 3_600_000 + 55 * 60_000;
        assert_eq!(hour_of_millis(millis), 13);
    }
}
