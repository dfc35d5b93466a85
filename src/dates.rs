//! UTC day bucketing for logs and goals.
//!
//! Every log entry and goal is keyed by a [`DayKey`]: the calendar day of the
//! instant in UTC. The caller's local offset never moves an instant to a
//! different day.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, Duration,
    OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

use crate::error::TrackerError;

/// Canonical `YYYY-MM-DD` day in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(Date);

impl DayKey {
    pub fn date(self) -> Date {
        self.0
    }

    pub fn previous(self) -> Option<DayKey> {
        self.0.previous_day().map(DayKey)
    }

    pub fn minus_days(self, days: u32) -> Result<DayKey, TrackerError> {
        self.0
            .checked_sub(Duration::days(i64::from(days)))
            .map(DayKey)
            .ok_or_else(|| TrackerError::invalid(format!("{self} minus {days} days is out of range")))
    }
}

impl From<Date> for DayKey {
    fn from(d: Date) -> Self {
        DayKey(d)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl FromStr for DayKey {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_day(s)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Unix timestamp in whole seconds.
#[derive(Debug, Clone, Copy)]
pub struct UnixSeconds(pub i64);

/// Anything that can be bucketed into a UTC day.
pub trait IntoDayKey {
    fn into_day_key(self) -> Result<DayKey, TrackerError>;
}

impl IntoDayKey for DayKey {
    fn into_day_key(self) -> Result<DayKey, TrackerError> {
        Ok(self)
    }
}

impl IntoDayKey for Date {
    fn into_day_key(self) -> Result<DayKey, TrackerError> {
        Ok(DayKey(self))
    }
}

impl IntoDayKey for OffsetDateTime {
    fn into_day_key(self) -> Result<DayKey, TrackerError> {
        Ok(DayKey(self.to_offset(UtcOffset::UTC).date()))
    }
}

// no offset attached: read as UTC wall time
impl IntoDayKey for PrimitiveDateTime {
    fn into_day_key(self) -> Result<DayKey, TrackerError> {
        self.assume_utc().into_day_key()
    }
}

impl IntoDayKey for UnixSeconds {
    fn into_day_key(self) -> Result<DayKey, TrackerError> {
        OffsetDateTime::from_unix_timestamp(self.0)
            .map_err(|e| TrackerError::invalid(format!("timestamp {} out of range: {e}", self.0)))?
            .into_day_key()
    }
}

impl IntoDayKey for &str {
    fn into_day_key(self) -> Result<DayKey, TrackerError> {
        parse_day(self)
    }
}

impl IntoDayKey for String {
    fn into_day_key(self) -> Result<DayKey, TrackerError> {
        parse_day(&self)
    }
}

pub fn canonical_day(input: impl IntoDayKey) -> Result<DayKey, TrackerError> {
    input.into_day_key()
}

fn parse_day(raw: &str) -> Result<DayKey, TrackerError> {
    let s = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(s, &Rfc3339) {
        return ts.into_day_key();
    }
    if let Ok(d) = Date::parse(s, format_description!("[year]-[month]-[day]")) {
        return Ok(DayKey(d));
    }
    if let Ok(dt) = PrimitiveDateTime::parse(
        s,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return dt.into_day_key();
    }
    if let Ok(dt) = PrimitiveDateTime::parse(
        s,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    ) {
        return dt.into_day_key();
    }
    Err(TrackerError::invalid(format!("malformed date {raw:?}")))
}

/// The `n` consecutive days ending at `from`'s day, oldest first.
pub fn days_back(n: u32, from: impl IntoDayKey) -> Result<Vec<DayKey>, TrackerError> {
    let end = from.into_day_key()?;
    (0..n).rev().map(|offset| end.minus_days(offset)).collect()
}

/// Consecutive logged days ending at `today`. Zero when `today` itself has no log.
pub fn current_streak(logged: &BTreeSet<DayKey>, today: DayKey) -> u32 {
    let mut streak = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor.filter(|d| logged.contains(d)) {
        streak += 1;
        cursor = day.previous();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn day(s: &str) -> DayKey {
        s.parse().expect("valid day")
    }

    #[test]
    fn same_instant_maps_to_same_day_across_offsets() {
        let new_york = datetime!(2024-03-10 23:30 -5);
        let utc = datetime!(2024-03-11 04:30 UTC);
        let tokyo = datetime!(2024-03-11 13:30 +9);

        let expected = canonical_day(utc).unwrap();
        assert_eq!(canonical_day(new_york).unwrap(), expected);
        assert_eq!(canonical_day(tokyo).unwrap(), expected);
        assert_eq!(expected.to_string(), "2024-03-11");
    }

    #[test]
    fn rfc3339_strings_are_converted_to_utc() {
        let a = canonical_day("2024-03-10T23:30:00-05:00").unwrap();
        let b = canonical_day("2024-03-11T04:30:00Z").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "2024-03-11");
    }

    #[test]
    fn plain_and_naive_strings() {
        assert_eq!(canonical_day("2024-02-29").unwrap().date(), date!(2024 - 02 - 29));
        assert_eq!(canonical_day("2024-02-29T23:59:59").unwrap().to_string(), "2024-02-29");
        assert_eq!(
            canonical_day("2024-02-29T23:59:59.250").unwrap().to_string(),
            "2024-02-29"
        );
        assert_eq!(canonical_day(" 2024-01-05 ").unwrap().to_string(), "2024-01-05");
    }

    #[test]
    fn unix_seconds_bucket_in_utc() {
        // 2024-01-01T00:00:00Z
        assert_eq!(canonical_day(UnixSeconds(1_704_067_200)).unwrap().to_string(), "2024-01-01");
        assert_eq!(canonical_day(UnixSeconds(1_704_067_199)).unwrap().to_string(), "2023-12-31");
        assert!(canonical_day(UnixSeconds(i64::MAX)).is_err());
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for bad in ["", "yesterday", "2024-13-01", "2024-02-30", "10/03/2024", "2024-3-1"] {
            let err = canonical_day(bad).unwrap_err();
            assert!(matches!(err, TrackerError::InvalidInput(_)), "{bad:?} -> {err}");
        }
    }

    #[test]
    fn days_back_is_ascending_and_ends_at_from() {
        let now = datetime!(2024-03-02 08:00 UTC);
        let days = days_back(7, now).unwrap();
        let rendered: Vec<String> = days.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "2024-02-25",
                "2024-02-26",
                "2024-02-27",
                "2024-02-28",
                "2024-02-29",
                "2024-03-01",
                "2024-03-02"
            ]
        );
        assert!(days.windows(2).all(|w| w[1].previous() == Some(w[0])));
    }

    #[test]
    fn days_back_zero_is_empty() {
        assert!(days_back(0, datetime!(2024-03-02 08:00 UTC)).unwrap().is_empty());
        assert_eq!(days_back(1, "2024-03-02").unwrap(), vec![day("2024-03-02")]);
    }

    #[test]
    fn days_back_uses_utc_day_of_from() {
        // late evening in Los Angeles is already the next day in UTC
        let days = days_back(2, datetime!(2024-06-30 20:00 -7)).unwrap();
        assert_eq!(days, vec![day("2024-06-30"), day("2024-07-01")]);
    }

    #[test]
    fn serde_uses_plain_day_strings() {
        let key = day("2024-07-04");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-07-04\"");
        let back: DayKey = serde_json::from_str("\"2024-07-04\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<DayKey>("\"not a day\"").is_err());
    }

    #[test]
    fn streak_counts_back_until_first_gap() {
        let logged: BTreeSet<DayKey> = ["2024-05-01", "2024-05-03", "2024-05-04", "2024-05-05"]
            .into_iter()
            .map(day)
            .collect();
        assert_eq!(current_streak(&logged, day("2024-05-05")), 3);
        assert_eq!(current_streak(&logged, day("2024-05-01")), 1);
        assert_eq!(current_streak(&logged, day("2024-05-06")), 0);
    }
}
