//! One-tick view of the whole roster for presentation layers.
//!
//! Everything in a [`BoardSnapshot`] derives from a single captured instant,
//! so the per-market rows and the global next event never disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{is_open, next_event};
use crate::countdown::{format_countdown, Countdown};
use crate::scheduler::pick_soonest;
use crate::{ClockReading, EventKind, MarketSchedule, NextEvent};

/// Per-market row: state, local clock, own next transition, globe position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketStatus {
    pub id: String,
    pub name: String,
    pub city: String,
    pub time_zone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub local: ClockReading,
    pub is_open: bool,
    pub next_kind: EventKind,
    /// `None` when no open resolves within a week.
    pub millis_until: Option<i64>,
    pub countdown: Option<Countdown>,
}

/// The single soonest transition, ready to render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextEventSummary {
    pub market_id: String,
    pub market_name: String,
    pub kind: EventKind,
    pub millis_until: i64,
    pub countdown: Countdown,
    /// e.g. "CME Futures closes in"
    pub headline: String,
}

impl NextEventSummary {
    pub fn from_event(ev: &NextEvent<'_>) -> Self {
        Self {
            market_id: ev.market.id.clone(),
            market_name: ev.market.name.clone(),
            kind: ev.kind,
            millis_until: ev.millis_until,
            countdown: format_countdown(ev.millis_until),
            headline: format!("{} {} in", ev.market.name, ev.kind.verb()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub open_count: usize,
    pub total: usize,
    pub markets: Vec<MarketStatus>,
    pub next_event: Option<NextEventSummary>,
}

impl BoardSnapshot {
    pub fn market(&self, id: &str) -> Option<&MarketStatus> {
        self.markets.iter().find(|m| m.id == id)
    }
}

/// Evaluate every market of `schedules` at `at`.
pub fn board_snapshot(schedules: &[MarketSchedule], at: DateTime<Utc>) -> BoardSnapshot {
    let mut markets = Vec::with_capacity(schedules.len());
    let mut events = Vec::with_capacity(schedules.len());

    for m in schedules {
        let local = ClockReading::in_zone(m.time_zone, at);
        let open = is_open(m, &local);
        let ev = next_event(m, &local);
        events.push((m, ev));

        markets.push(MarketStatus {
            id: m.id.clone(),
            name: m.name.clone(),
            city: m.city.clone(),
            time_zone: m.time_zone.name().to_string(),
            latitude: m.latitude,
            longitude: m.longitude,
            local,
            is_open: open,
            next_kind: ev.kind,
            millis_until: ev.millis_until,
            countdown: ev.millis_until.map(format_countdown),
        });
    }

    let next_event = pick_soonest(events).map(|ev| NextEventSummary::from_event(&ev));

    BoardSnapshot {
        generated_at: at,
        open_count: markets.iter().filter(|m| m.is_open).count(),
        total: markets.len(),
        markets,
        next_event,
    }
}
