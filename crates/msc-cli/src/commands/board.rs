//! `msc status` and `msc next`: one evaluation at one instant.

use anyhow::{Context as _, Result};
use msc_calendar::board_snapshot;

use super::{next_event_line, status_line, Context};

pub fn status(ctx: &Context, json: bool) -> Result<()> {
    let board = board_snapshot(ctx.loaded.roster.markets(), ctx.clock.now_utc());

    if json {
        let out = serde_json::to_string_pretty(&board).context("serialize board json failed")?;
        println!("{out}");
        return Ok(());
    }

    for m in &board.markets {
        println!("{}", status_line(m));
    }
    println!("open_count={}/{}", board.open_count, board.total);
    println!("{}", next_event_line(board.next_event.as_ref()));
    Ok(())
}

pub fn next(ctx: &Context, json: bool) -> Result<()> {
    let board = board_snapshot(ctx.loaded.roster.markets(), ctx.clock.now_utc());

    if json {
        let body = serde_json::json!({ "event": board.next_event });
        let out = serde_json::to_string_pretty(&body).context("serialize next-event json failed")?;
        println!("{out}");
        return Ok(());
    }

    println!("{}", next_event_line(board.next_event.as_ref()));
    Ok(())
}
