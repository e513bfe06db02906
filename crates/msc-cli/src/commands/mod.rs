//! Command handler modules for msc.
//!
//! Shared loading and line formatting live here.
//! Command-specific logic lives in the submodules.

pub mod board;
pub mod watch;

use anyhow::{Context as _, Result};
use msc_calendar::{Clock, FixedClock, MarketStatus, NextEventSummary, SystemClock};
use msc_config::LoadedRoster;
use tracing::debug;

/// Roster + clock resolved from the global options.
pub struct Context {
    pub loaded: LoadedRoster,
    pub clock: Box<dyn Clock>,
}

impl Context {
    pub fn load(roster_paths: &[String], at: Option<&str>) -> Result<Self> {
        let path_refs: Vec<&str> = roster_paths.iter().map(|s| s.as_str()).collect();
        let loaded = msc_config::load_roster_or_default(&path_refs)?;
        debug!(
            roster_hash = %loaded.roster_hash,
            markets = loaded.roster.markets().len(),
            "roster loaded"
        );

        Ok(Self {
            loaded,
            clock: clock_from_arg(at)?,
        })
    }
}

pub fn clock_from_arg(at: Option<&str>) -> Result<Box<dyn Clock>> {
    match at {
        Some(raw) => {
            let fixed = FixedClock::parse_rfc3339(raw.trim())
                .with_context(|| format!("invalid --at '{raw}': expected RFC 3339"))?;
            Ok(Box::new(fixed))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

pub fn status_line(m: &MarketStatus) -> String {
    let state = if m.is_open { "OPEN" } else { "CLOSED" };
    let countdown = m
        .countdown
        .as_ref()
        .map_or_else(|| "none".to_string(), |c| c.to_string());
    format!(
        "market={} state={} local={} next={} in={}",
        m.id, state, m.local, m.next_kind, countdown
    )
}

pub fn next_event_line(ev: Option<&NextEventSummary>) -> String {
    match ev {
        Some(ev) => format!(
            "next_event market={} kind={} in={} millis={}",
            ev.market_id, ev.kind, ev.countdown, ev.millis_until
        ),
        None => "next_event=none".to_string(),
    }
}
