//! msc-calendar
//!
//! Market session engine: for a fixed roster of exchanges, decides whether
//! each one is open and how long until the soonest open/close transition.
//!
//! Layers (leaves first):
//! - [`clock`]: the only temporal input; projects "now" into a market's zone.
//! - [`calendar`]: session evaluation and per-market next-event resolution.
//! - [`scheduler`]: soonest event across the roster.
//! - [`countdown`]: millisecond durations to display units.
//! - [`board`]: one-tick snapshot for presentation layers.
//!
//! Pure deterministic logic apart from [`SystemClock`]. No IO, no shared state.

pub mod board;
pub mod calendar;
pub mod clock;
pub mod countdown;
pub mod scheduler;
mod types;

pub use board::{board_snapshot, BoardSnapshot, MarketStatus, NextEventSummary};
pub use calendar::{is_open, next_event};
pub use clock::{read_clock, Clock, FixedClock, SystemClock};
pub use countdown::{format_countdown, Countdown};
pub use scheduler::{is_market_open, next_global_event, next_global_event_at, pick_soonest};
pub use types::*;
