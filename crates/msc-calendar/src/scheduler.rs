use chrono::{DateTime, Utc};

use crate::calendar::{is_open, next_event};
use crate::clock::{read_clock, Clock};
use crate::{ClockReading, MarketEvent, MarketSchedule, NextEvent};

/// Is `schedule` in session right now according to `clock`?
pub fn is_market_open<C: Clock + ?Sized>(schedule: &MarketSchedule, clock: &C) -> bool {
    is_open(schedule, &read_clock(clock, schedule.time_zone))
}

/// Soonest open/close transition across `schedules` according to `clock`.
///
/// Returns `None` for an empty roster or when no market has a strictly
/// positive countdown.
pub fn next_global_event<'a, C: Clock + ?Sized>(
    schedules: &'a [MarketSchedule],
    clock: &C,
) -> Option<NextEvent<'a>> {
    next_global_event_at(schedules, clock.now_utc())
}

/// Same as [`next_global_event`] for an explicit instant. The instant is
/// projected into each market's own zone.
pub fn next_global_event_at(
    schedules: &[MarketSchedule],
    at: DateTime<Utc>,
) -> Option<NextEvent<'_>> {
    pick_soonest(schedules.iter().map(|m| {
        let reading = ClockReading::in_zone(m.time_zone, at);
        (m, next_event(m, &reading))
    }))
}

/// Selection rule of the global scheduler, separated from clock reading.
///
/// Only strictly positive countdowns qualify. The minimum wins; ties keep the
/// first candidate in iteration order.
pub fn pick_soonest<'a, I>(candidates: I) -> Option<NextEvent<'a>>
where
    I: IntoIterator<Item = (&'a MarketSchedule, MarketEvent)>,
{
    let mut best: Option<NextEvent<'a>> = None;

    for (market, ev) in candidates {
        let Some(ms) = ev.millis_until else {
            continue;
        };
        if ms <= 0 {
            continue;
        }
        if best.map_or(true, |b| ms < b.millis_until) {
            best = Some(NextEvent {
                market,
                kind: ev.kind,
                millis_until: ms,
            });
        }
    }

    best
}
