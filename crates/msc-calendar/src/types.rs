use std::fmt;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Weekday indices used throughout the engine: 0 = Sunday .. 6 = Saturday.
pub const SUNDAY: u8 = 0;
pub const FRIDAY: u8 = 5;
pub const SATURDAY: u8 = 6;

const DAYS_PER_WEEK: u8 = 7;

// ---------------------------------------------------------------------------
// ScheduleError
// ---------------------------------------------------------------------------

/// Construction / validation failures for schedule data.
///
/// These are configuration defects. Evaluation never produces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    EmptyId,
    EmptyTradingDays,
    WeekdayOutOfRange(u8),
    HourOutOfRange { field: &'static str, value: u8 },
    MinuteOutOfRange { field: &'static str, value: u8 },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::EmptyId => write!(f, "market id must not be empty"),
            ScheduleError::EmptyTradingDays => write!(f, "trading_days must not be empty"),
            ScheduleError::WeekdayOutOfRange(d) => {
                write!(f, "weekday {d} out of range (expected 0=Sun..6=Sat)")
            }
            ScheduleError::HourOutOfRange { field, value } => {
                write!(f, "{field}={value} out of range (expected 0..=23)")
            }
            ScheduleError::MinuteOutOfRange { field, value } => {
                write!(f, "{field}={value} out of range (expected 0..=59)")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

// ---------------------------------------------------------------------------
// TradingDays
// ---------------------------------------------------------------------------

/// Non-empty set of weekday indices on which a session may open.
///
/// Stored as a 7-bit mask (bit `d` = weekday `d`). Serialized as an ascending
/// list, e.g. `[1, 2, 3, 4, 5]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct TradingDays(u8);

impl TradingDays {
    /// Monday through Friday.
    pub const WEEKDAYS: TradingDays = TradingDays(0b0011_1110);
    /// Sunday through Friday (overnight futures week).
    pub const SUNDAY_TO_FRIDAY: TradingDays = TradingDays(0b0011_1111);

    pub fn from_days(days: &[u8]) -> Result<Self, ScheduleError> {
        let mut mask = 0u8;
        for &d in days {
            if d >= DAYS_PER_WEEK {
                return Err(ScheduleError::WeekdayOutOfRange(d));
            }
            mask |= 1 << d;
        }
        if mask == 0 {
            return Err(ScheduleError::EmptyTradingDays);
        }
        Ok(Self(mask))
    }

    pub fn contains(&self, weekday: u8) -> bool {
        weekday < DAYS_PER_WEEK && self.0 & (1 << weekday) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..DAYS_PER_WEEK).filter(move |d| self.contains(*d))
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Always false for a constructed value; present for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<Vec<u8>> for TradingDays {
    type Error = ScheduleError;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_days(&days)
    }
}

impl From<TradingDays> for Vec<u8> {
    fn from(days: TradingDays) -> Self {
        days.iter().collect()
    }
}

impl fmt::Debug for TradingDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ---------------------------------------------------------------------------
// MarketSchedule
// ---------------------------------------------------------------------------

/// Static definition of one market's recurring session.
///
/// Boundaries are zone-local 24h wall-clock times. For an overnight session
/// the open on day D is later in the day than the close on day D: the close
/// belongs to the session that opened the evening before.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketSchedule {
    /// Unique and stable across runs.
    pub id: String,
    pub name: String,
    pub city: String,
    /// IANA zone; unknown names fail at deserialization.
    pub time_zone: Tz,
    pub open_hour: u8,
    pub open_minute: u8,
    pub close_hour: u8,
    pub close_minute: u8,
    pub trading_days: TradingDays,
    /// Display only.
    pub latitude: f64,
    /// Display only.
    pub longitude: f64,
    #[serde(default)]
    pub is_overnight: bool,
}

impl MarketSchedule {
    pub fn open_minute_of_day(&self) -> u32 {
        u32::from(self.open_hour) * 60 + u32::from(self.open_minute)
    }

    pub fn close_minute_of_day(&self) -> u32 {
        u32::from(self.close_hour) * 60 + u32::from(self.close_minute)
    }

    /// Range checks for the hand-editable fields. `time_zone` and
    /// `trading_days` are already validated by their types.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.id.trim().is_empty() {
            return Err(ScheduleError::EmptyId);
        }
        check_hour("open_hour", self.open_hour)?;
        check_minute("open_minute", self.open_minute)?;
        check_hour("close_hour", self.close_hour)?;
        check_minute("close_minute", self.close_minute)?;
        Ok(())
    }
}

fn check_hour(field: &'static str, value: u8) -> Result<(), ScheduleError> {
    if value > 23 {
        return Err(ScheduleError::HourOutOfRange { field, value });
    }
    Ok(())
}

fn check_minute(field: &'static str, value: u8) -> Result<(), ScheduleError> {
    if value > 59 {
        return Err(ScheduleError::MinuteOutOfRange { field, value });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ClockReading
// ---------------------------------------------------------------------------

/// Zone-local wall clock at one instant. Recomputed on every query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockReading {
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockReading {
    pub fn new(weekday: u8, hour: u8, minute: u8, second: u8) -> Self {
        debug_assert!(weekday < DAYS_PER_WEEK, "weekday must be 0..=6");
        debug_assert!(hour < 24 && minute < 60 && second < 60);
        Self {
            weekday,
            hour,
            minute,
            second,
        }
    }

    pub fn minute_of_day(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    pub fn weekday_abbrev(&self) -> &'static str {
        const NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        NAMES[usize::from(self.weekday % DAYS_PER_WEEK)]
    }
}

impl fmt::Display for ClockReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}:{:02}",
            self.weekday_abbrev(),
            self.hour,
            self.minute,
            self.second
        )
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Open,
    Close,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Open => "open",
            EventKind::Close => "close",
        }
    }

    /// Verb used in headlines ("opens in" / "closes in").
    pub fn verb(&self) -> &'static str {
        match self {
            EventKind::Open => "opens",
            EventKind::Close => "closes",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Next transition of a single market.
///
/// `millis_until == None` means no open could be resolved inside the one-week
/// scan window. Callers must treat it as "nothing to count down to".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub kind: EventKind,
    pub millis_until: Option<i64>,
}

/// Soonest transition across a roster. Lives for a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NextEvent<'a> {
    pub market: &'a MarketSchedule,
    pub kind: EventKind,
    /// Always strictly positive.
    pub millis_until: i64,
}
