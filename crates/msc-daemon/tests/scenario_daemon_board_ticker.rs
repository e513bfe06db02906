//! The background ticker publishes a heartbeat and a fresh board each tick,
//! and the SSE endpoint answers with an event stream.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use msc_calendar::FixedClock;
use msc_daemon::{routes, state};
use tower::ServiceExt;

fn pinned_state() -> Arc<state::AppState> {
    let loaded = msc_config::default_roster().expect("built-in roster");
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 8, 14, 29, 0).unwrap());
    Arc::new(state::AppState::new(loaded, Arc::new(clock)))
}

#[tokio::test]
async fn ticker_emits_heartbeat_then_board() {
    let st = pinned_state();
    let mut rx = st.bus.subscribe();

    let handle = state::spawn_board_ticker(Arc::clone(&st), Duration::from_millis(10));

    let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("ticker timed out")
        .expect("bus closed");
    let second = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("ticker timed out")
        .expect("bus closed");
    handle.abort();

    match first {
        state::BusMsg::Heartbeat { ts_millis } => {
            assert_eq!(
                ts_millis,
                Utc.with_ymd_and_hms(2024, 1, 8, 14, 29, 0)
                    .unwrap()
                    .timestamp_millis()
            );
        }
        other => panic!("expected heartbeat, got {other:?}"),
    }

    match second {
        state::BusMsg::Board(board) => {
            assert_eq!(board.open_count, 3);
            let next = board.next_event.expect("next event");
            assert_eq!(next.market_id, "nyse");
            assert_eq!(next.millis_until, 60_000);
        }
        other => panic!("expected board, got {other:?}"),
    }
}

#[test]
fn bus_messages_are_tagged() {
    let hb = state::BusMsg::Heartbeat { ts_millis: 7 };
    assert_eq!(hb.event_name(), "heartbeat");
    let v = serde_json::to_value(&hb).unwrap();
    assert_eq!(v["type"], "heartbeat");
    assert_eq!(v["ts_millis"], 7);

    let st = pinned_state();
    let board = state::BusMsg::Board(st.board());
    assert_eq!(board.event_name(), "board");
    let v = serde_json::to_value(&board).unwrap();
    assert_eq!(v["type"], "board");
    assert_eq!(v["open_count"], 3);
}

#[tokio::test]
async fn stream_endpoint_is_event_stream() {
    let router = routes::build_router(pinned_state());
    let req = Request::builder()
        .method("GET")
        .uri("/v1/stream")
        .body(axum::body::Body::empty())
        .unwrap();

    let resp = router.oneshot(req).await.expect("oneshot failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(ct.starts_with("text/event-stream"), "content-type was {ct}");
    assert_eq!(resp.headers().get("cache-control").unwrap(), "no-cache");
}

#[test]
fn builtin_state_uses_builtin_roster_hash() {
    let st = state::AppState::with_builtin_roster().unwrap();
    let loaded = msc_config::default_roster().unwrap();
    assert_eq!(st.roster_hash, loaded.roster_hash);
    assert_eq!(st.roster.markets().len(), 5);
}
