//! Shared runtime state for msc-daemon.
//!
//! All types here are `Clone`-able (via `Arc` or copy). Handlers receive
//! `State<Arc<AppState>>` from Axum. The roster is immutable after boot, so
//! there are no locks: every request evaluates the board from scratch.

use std::sync::Arc;
use std::time::Duration;

use msc_calendar::{board_snapshot, BoardSnapshot, Clock, SystemClock};
use msc_config::{LoadedRoster, Roster};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// BusMsg: SSE event bus payload
// ---------------------------------------------------------------------------

/// Messages broadcast over the internal event bus and surfaced as SSE events.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusMsg {
    Heartbeat { ts_millis: i64 },
    Board(BoardSnapshot),
}

impl BusMsg {
    /// SSE `event:` name.
    pub fn event_name(&self) -> &'static str {
        match self {
            BusMsg::Heartbeat { .. } => "heartbeat",
            BusMsg::Board(_) => "board",
        }
    }
}

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast bus for SSE.
    pub bus: broadcast::Sender<BusMsg>,
    /// Static build metadata.
    pub build: BuildInfo,
    /// Validated at load time; never changes while serving.
    pub roster: Arc<Roster>,
    pub roster_hash: String,
    /// Injected so tests can pin the instant.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(loaded: LoadedRoster, clock: Arc<dyn Clock>) -> Self {
        let (bus, _rx) = broadcast::channel::<BusMsg>(1024);

        Self {
            bus,
            build: BuildInfo {
                service: "msc-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            roster: Arc::new(loaded.roster),
            roster_hash: loaded.roster_hash,
            clock,
        }
    }

    /// Built-in roster on the system clock.
    pub fn with_builtin_roster() -> anyhow::Result<Self> {
        let loaded = msc_config::default_roster()?;
        Ok(Self::new(loaded, Arc::new(SystemClock)))
    }

    /// Evaluate the whole roster at the clock's current instant.
    pub fn board(&self) -> BoardSnapshot {
        board_snapshot(self.roster.markets(), self.clock.now_utc())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Spawn the periodic driver: every `interval` emit a heartbeat followed by a
/// freshly evaluated board. Send errors (no subscribers) are ignored.
pub fn spawn_board_ticker(state: Arc<AppState>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let board = state.board();
            let ts = board.generated_at.timestamp_millis();
            let _ = state.bus.send(BusMsg::Heartbeat { ts_millis: ts });
            let _ = state.bus.send(BusMsg::Board(board));
        }
    })
}
