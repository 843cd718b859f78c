use std::{
    ops::{Add, Deref, Sub},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A date, time, and timezone. Serialized to rfc3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Time(
    #[serde(
        serialize_with = "time::serde::rfc3339::serialize",
        deserialize_with = "time::serde::rfc3339::deserialize"
    )]
    OffsetDateTime,
);

impl Time {
    pub fn now_utc() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }
}

impl Deref for Time {
    type Target = OffsetDateTime;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<OffsetDateTime> for Time {
    fn from(value: OffsetDateTime) -> Self {
        Time(value)
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Self::Output {
        Time(self.0 + rhs)
    }
}

impl Sub<Duration> for Time {
    type Output = Time;

    fn sub(self, rhs: Duration) -> Self::Output {
        Time(self.0 - rhs)
    }
}

#[cfg(test)]
mod test {
    use super::Time;
    use std::time::Duration;

    #[test]
    fn ordering_follows_the_clock() {
        let a = Time::now_utc();
        let b = a + Duration::from_micros(1);
        assert!(b > a);
        assert_eq!(a, b - Duration::from_micros(1));
    }

    #[test]
    fn rfc3339_roundtrip() {
        let t = Time::now_utc();
        let s = serde_json::to_string(&t).unwrap();
        let back: Time = serde_json::from_str(&s).unwrap();
        // rfc3339 keeps nanosecond precision, so this is lossless
        assert_eq!(t, back);
    }
}
