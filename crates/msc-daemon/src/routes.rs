//! Axum router and all HTTP handlers for msc-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. All routes are read-only.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

use crate::{
    api_types::{ErrorResponse, HealthResponse, MarketsResponse, NextEventResponse},
    state::{AppState, BusMsg},
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/board", get(board))
        .route("/v1/markets", get(markets))
        .route("/v1/markets/:id", get(market_by_id))
        .route("/v1/next-event", get(next_event))
        .route("/v1/stream", get(stream))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/board
// ---------------------------------------------------------------------------

pub(crate) async fn board(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(st.board()))
}

// ---------------------------------------------------------------------------
// GET /v1/markets  and  GET /v1/markets/:id
// ---------------------------------------------------------------------------

pub(crate) async fn markets(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = st.board();
    (
        StatusCode::OK,
        Json(MarketsResponse {
            roster_hash: st.roster_hash.clone(),
            markets: snap.markets,
        }),
    )
}

pub(crate) async fn market_by_id(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let snap = st.board();
    match snap.markets.into_iter().find(|m| m.id == id) {
        Some(m) => (StatusCode::OK, Json(m)).into_response(),
        None => {
            debug!(market_id = %id, "market not found");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "MARKET_NOT_FOUND".to_string(),
                }),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// GET /v1/next-event
// ---------------------------------------------------------------------------

pub(crate) async fn next_event(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = st.board();
    (
        StatusCode::OK,
        Json(NextEventResponse {
            event: snap.next_event,
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/stream  (SSE)
// ---------------------------------------------------------------------------

pub(crate) async fn stream(State(st): State<Arc<AppState>>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
    headers.insert("Connection", HeaderValue::from_static("keep-alive"));

    let rx = st.bus.subscribe();
    let events = broadcast_to_sse(rx);

    (headers, Sse::new(events).keep_alive(KeepAlive::new())).into_response()
}

fn broadcast_to_sse(
    rx: broadcast::Receiver<BusMsg>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(m) => {
                let data = serde_json::to_string(&m).ok()?;
                Some(Ok(Event::default().event(m.event_name()).data(data)))
            }
            Err(_) => None, // lagged / closed
        }
    })
}
