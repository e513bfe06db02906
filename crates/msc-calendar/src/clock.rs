//! Clock capability and zone projection.
//!
//! The real clock is the only temporal input to the engine. It is passed in as
//! a [`Clock`] rather than read ambiently so every other component stays a
//! pure function of a [`ClockReading`].

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

use crate::ClockReading;

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Host wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant (tests, replay, CLI `--at`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    /// Parse an RFC 3339 timestamp (any offset) and pin to it.
    pub fn parse_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        let at = DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc);
        Ok(Self { at })
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.at
    }
}

impl ClockReading {
    /// Civil weekday/time of `at` as observed in `tz`.
    pub fn in_zone(tz: Tz, at: DateTime<Utc>) -> Self {
        let local = at.with_timezone(&tz);
        Self {
            weekday: local.weekday().num_days_from_sunday() as u8,
            hour: local.hour() as u8,
            minute: local.minute() as u8,
            // chrono folds leap seconds into the nanosecond field; second() is 0..=59.
            second: local.second() as u8,
        }
    }
}

/// Read `clock` and project it into `tz`.
pub fn read_clock<C: Clock + ?Sized>(clock: &C, tz: Tz) -> ClockReading {
    ClockReading::in_zone(tz, clock.now_utc())
}
