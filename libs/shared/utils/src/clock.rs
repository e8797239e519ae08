//! Slot times are a calendar date plus an `HH:MM` time-of-day, interpreted in
//! facility local time with no timezone attached. Every expiry or
//! future/past decision goes through these helpers so each read path compares
//! against the same live clock.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Current instant in facility local time.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Combine a slot's (date, time) pair into a comparable instant.
pub fn slot_instant(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// Strictly-in-the-future check used by slot creation and booking validation.
pub fn is_future(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> bool {
    slot_instant(date, time) > now
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn parse_hhmm(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
}

/// Serde adapter for the wire format `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_hhmm(&value).map_err(D::Error::custom)
    }
}

/// Serde adapter for optional `"HH:MM"` fields on update requests.
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_some(&super::format_hhmm(*t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        value
            .map(|v| super::parse_hhmm(&v).map_err(D::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn instant_combines_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let time = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        let instant = slot_instant(date, time);
        assert_eq!(instant.format("%Y-%m-%d %H:%M").to_string(), "2025-06-01 10:30");
    }

    #[test]
    fn five_minutes_ago_is_not_future() {
        let past = now_local() - Duration::minutes(5);
        assert!(!is_future(past.date(), past.time(), now_local()));

        let future = now_local() + Duration::minutes(5);
        assert!(is_future(future.date(), future.time(), now_local()));
    }

    #[test]
    fn hhmm_round_trip() {
        let time = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        assert_eq!(format_hhmm(time), "09:05");
        assert_eq!(parse_hhmm("09:05").unwrap(), time);
        // Postgres time columns come back with seconds attached.
        assert_eq!(parse_hhmm("09:05:00").unwrap(), time);
        assert!(parse_hhmm("9 o'clock").is_err());
    }
}
