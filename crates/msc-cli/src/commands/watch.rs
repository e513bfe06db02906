//! `msc watch`: the periodic driver.
//!
//! Every tick captures one instant and rebuilds the board from scratch. No
//! state carries between ticks, so a late or skipped tick only delays output.

use std::time::Duration;

use anyhow::{Context as _, Result};
use msc_calendar::{board_snapshot, BoardSnapshot};
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use super::Context;

pub async fn run(ctx: &Context, interval_ms: u64, ticks: Option<u64>, json: bool) -> Result<()> {
    info!(
        interval_ms,
        ticks = ?ticks,
        roster_hash = %ctx.loaded.roster_hash,
        "watch started"
    );

    let mut ticker = interval(Duration::from_millis(interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut n: u64 = 0;
    loop {
        if ticks.is_some_and(|limit| n >= limit) {
            break;
        }
        ticker.tick().await;
        n += 1;

        let board = board_snapshot(ctx.loaded.roster.markets(), ctx.clock.now_utc());
        if json {
            let out = serde_json::to_string(&board).context("serialize board json failed")?;
            println!("{out}");
        } else {
            println!("{}", tick_line(n, &board));
        }
    }

    info!(ticks = n, "watch finished");
    Ok(())
}

fn tick_line(n: u64, board: &BoardSnapshot) -> String {
    let headline = match &board.next_event {
        Some(ev) => format!("{} {}", ev.headline, ev.countdown),
        None => "no upcoming event".to_string(),
    };
    format!(
        "tick={} open_count={}/{} {}",
        n, board.open_count, board.total, headline
    )
}
