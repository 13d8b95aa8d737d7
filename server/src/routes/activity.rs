//! Live activity feed
//!
//! `/api/activity/stream` relays hub events as server-sent events named
//! after the event kind. Slow clients that lag behind skip missed events.

use super::{LimitQuery, SharedState};
use crate::database::TransactionEntry;
use crate::error::Result;
use crate::services::ActivityEvent;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::{Json, Router};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;

const DEFAULT_RECENT_LIMIT: i64 = 20;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/activity/stream", get(stream_activity))
        .route("/api/activity/recent", get(recent_activity))
}

async fn stream_activity(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let receiver = state.hub.subscribe();
    tracing::info!(
        "Activity stream opened ({} subscribers)",
        state.hub.subscriber_count()
    );

    let events = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => match to_sse(&event) {
                    Some(sse) => return Some((Ok(sse), receiver)),
                    None => continue,
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Activity stream lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_sse(event: &ActivityEvent) -> Option<Event> {
    match Event::default().event(event.kind()).json_data(event) {
        Ok(sse) => Some(sse),
        Err(e) => {
            tracing::error!("Failed to encode activity event: {}", e);
            None
        }
    }
}

async fn recent_activity(
    State(state): State<SharedState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<TransactionEntry>>> {
    Ok(Json(
        state
            .ledger
            .transactions(query.limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .await?,
    ))
}
