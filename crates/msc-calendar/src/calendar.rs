//! Session calendar: open/closed evaluation and next-transition resolution.
//!
//! Deterministic, pure logic. No IO, no wall-clock, no randomness. Every
//! function here takes an already-projected [`ClockReading`].
//!
//! # Session shapes
//!
//! - Regular: open on `[open, close)` of the same zone-local day.
//! - Overnight (`is_overnight`): opens in the evening and closes the next
//!   afternoon. Any minute `>= open` or `< close` counts as open, except that
//!   Friday after the close is the weekend break.
//!
//! Saturday is closed for every market regardless of its `trading_days`.

use crate::{ClockReading, EventKind, MarketEvent, MarketSchedule, FRIDAY, SATURDAY};

const MINUTES_PER_DAY: i64 = 24 * 60;
const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_SECOND: i64 = 1_000;

/// Furthest day offset scanned for the next open. Offset 7 lands on today's
/// weekday next week, so single-day schedules always resolve.
const OPEN_SCAN_DAYS: u8 = 7;

// ---------------------------------------------------------------------------
// Session evaluator
// ---------------------------------------------------------------------------

/// Returns `true` if `schedule` is in session at the zone-local `clock`.
pub fn is_open(schedule: &MarketSchedule, clock: &ClockReading) -> bool {
    // Global weekend override, even for overnight sessions.
    if clock.weekday == SATURDAY {
        return false;
    }
    if !schedule.trading_days.contains(clock.weekday) {
        return false;
    }

    let now = clock.minute_of_day();
    let open = schedule.open_minute_of_day();
    let close = schedule.close_minute_of_day();

    if schedule.is_overnight {
        // Final close of the week.
        if clock.weekday == FRIDAY && now >= close {
            return false;
        }
        return now >= open || now < close;
    }

    open <= now && now < close
}

// ---------------------------------------------------------------------------
// Next-event resolver
// ---------------------------------------------------------------------------

/// Resolve the next open or close of a single market.
///
/// Open markets resolve to their close; closed markets to their next open.
/// Minutes are counted at day granularity, then converted to milliseconds
/// and reduced by the seconds already elapsed in the current minute.
pub fn next_event(schedule: &MarketSchedule, clock: &ClockReading) -> MarketEvent {
    if is_open(schedule, clock) {
        MarketEvent {
            kind: EventKind::Close,
            millis_until: Some(millis_until_close(schedule, clock)),
        }
    } else {
        MarketEvent {
            kind: EventKind::Open,
            millis_until: millis_until_open(schedule, clock),
        }
    }
}

fn millis_until_close(schedule: &MarketSchedule, clock: &ClockReading) -> i64 {
    let now = i64::from(clock.minute_of_day());
    let close = i64::from(schedule.close_minute_of_day());

    let minutes = if schedule.is_overnight && clock.weekday != FRIDAY {
        // Overnight sessions only close for good on Friday.
        let mut days_until_friday = i64::from(FRIDAY) - i64::from(clock.weekday);
        if days_until_friday <= 0 {
            days_until_friday += 7;
        }
        minutes_across_days(now, days_until_friday, close)
    } else {
        close - now
    };

    to_millis(minutes, clock)
}

/// First trading day at or after today whose open is still ahead wins. The
/// scan stops at that day; later candidates are never compared.
fn millis_until_open(schedule: &MarketSchedule, clock: &ClockReading) -> Option<i64> {
    let now = i64::from(clock.minute_of_day());
    let open = i64::from(schedule.open_minute_of_day());

    for offset in 0..=OPEN_SCAN_DAYS {
        let day = ((u32::from(clock.weekday) + u32::from(offset)) % 7) as u8;
        if !schedule.trading_days.contains(day) {
            continue;
        }

        let minutes = if offset == 0 {
            if now >= open {
                continue;
            }
            open - now
        } else {
            minutes_across_days(now, i64::from(offset), open)
        };

        let ms = to_millis(minutes, clock);
        if ms > 0 {
            return Some(ms);
        }
    }

    None
}

/// Minutes from `now` (minute of today) to `target` (minute of day) on the
/// day `days_ahead` days from today. `days_ahead >= 1`.
fn minutes_across_days(now: i64, days_ahead: i64, target: i64) -> i64 {
    (MINUTES_PER_DAY - now) + (days_ahead - 1) * MINUTES_PER_DAY + target
}

fn to_millis(minutes: i64, clock: &ClockReading) -> i64 {
    minutes * MILLIS_PER_MINUTE - i64::from(clock.second) * MILLIS_PER_SECOND
}

// ---------------------------------------------------------------------------
// Unit tests (fast, no external dependencies)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradingDays;

    fn regular(open: (u8, u8), close: (u8, u8), days: TradingDays) -> MarketSchedule {
        MarketSchedule {
            id: "t".to_string(),
            name: "Test".to_string(),
            city: "Nowhere".to_string(),
            time_zone: chrono_tz::UTC,
            open_hour: open.0,
            open_minute: open.1,
            close_hour: close.0,
            close_minute: close.1,
            trading_days: days,
            latitude: 0.0,
            longitude: 0.0,
            is_overnight: false,
        }
    }

    fn at(weekday: u8, h: u8, m: u8, s: u8) -> ClockReading {
        ClockReading::new(weekday, h, m, s)
    }

    const MIN: i64 = 60_000;

    #[test]
    fn close_instant_is_closed() {
        let s = regular((9, 30), (16, 0), TradingDays::WEEKDAYS);
        assert!(is_open(&s, &at(2, 15, 59, 59)));
        assert!(!is_open(&s, &at(2, 16, 0, 0)));
    }

    #[test]
    fn countdown_to_close_subtracts_elapsed_seconds() {
        let s = regular((9, 30), (16, 0), TradingDays::WEEKDAYS);
        let ev = next_event(&s, &at(1, 15, 58, 20));
        assert_eq!(ev.kind, EventKind::Close);
        assert_eq!(ev.millis_until, Some(2 * MIN - 20_000));
    }

    #[test]
    fn opens_later_today() {
        let s = regular((9, 30), (16, 0), TradingDays::WEEKDAYS);
        let ev = next_event(&s, &at(1, 9, 0, 30));
        assert_eq!(ev.kind, EventKind::Open);
        assert_eq!(ev.millis_until, Some(30 * MIN - 30_000));
    }

    #[test]
    fn after_close_on_friday_rolls_to_monday() {
        let s = regular((9, 30), (16, 0), TradingDays::WEEKDAYS);
        let ev = next_event(&s, &at(FRIDAY, 17, 0, 0));
        // 7h to midnight + Sat + Sun + 9h30.
        let expected = (7 * 60 + 2 * 24 * 60 + 9 * 60 + 30) * MIN;
        assert_eq!(ev.millis_until, Some(expected));
    }

    #[test]
    fn single_day_schedule_resolves_next_week() {
        let wednesday_only = TradingDays::from_days(&[3]).unwrap();
        let s = regular((10, 0), (11, 0), wednesday_only);
        // Wednesday after close: next open is offset 7.
        let ev = next_event(&s, &at(3, 12, 0, 0));
        let expected = (12 * 60 + 6 * 24 * 60 + 10 * 60) * MIN;
        assert_eq!(ev.millis_until, Some(expected));
    }

    #[test]
    fn saturday_only_schedule_never_opens_but_still_resolves() {
        // Saturday is globally closed, yet the resolver only looks at trading_days.
        let s = regular((10, 0), (11, 0), TradingDays::from_days(&[SATURDAY]).unwrap());
        assert!(!is_open(&s, &at(SATURDAY, 10, 30, 0)));
        let ev = next_event(&s, &at(SATURDAY, 10, 30, 0));
        assert_eq!(ev.kind, EventKind::Open);
        let expected = (13 * 60 + 30 + 6 * 24 * 60 + 10 * 60) * MIN;
        assert_eq!(ev.millis_until, Some(expected));
    }

    #[test]
    fn out_of_range_weekday_wraps_instead_of_overflowing() {
        let s = regular((9, 30), (16, 0), TradingDays::WEEKDAYS);
        // 250 % 7 == 5 (Friday); built directly, bypassing `ClockReading::new`.
        let wild = ClockReading {
            weekday: 250,
            hour: 20,
            minute: 0,
            second: 0,
        };
        let ev = next_event(&s, &wild);
        assert_eq!(ev.kind, EventKind::Open);
        assert_eq!(ev.millis_until, next_event(&s, &at(FRIDAY, 20, 0, 0)).millis_until);
    }

    #[test]
    fn minutes_across_days_counts_whole_days_between() {
        assert_eq!(minutes_across_days(23 * 60, 1, 60), 120);
        assert_eq!(minutes_across_days(0, 2, 0), 2 * MINUTES_PER_DAY);
    }
}
