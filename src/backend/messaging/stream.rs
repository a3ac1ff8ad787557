//! Live message stream
//!
//! GET /api/messages/stream keeps a Server-Sent-Events connection open and
//! pushes every message addressed to the caller as a `message` event.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;

use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

const KEEP_ALIVE_SECS: u64 = 30;

pub async fn message_stream(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.messaging_broadcast.subscribe(me.id);
    tracing::info!(
        "{} opened a message stream ({} open)",
        me.username,
        state.messaging_broadcast.get_subscriber_count(me.id)
    );

    let stream = stream::unfold(receiver, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(message) => match Event::default().event("message").json_data(&message) {
                    Ok(event) => return Some((Ok(event), rx)),
                    Err(e) => tracing::error!("Failed to encode message {}: {}", message.id, e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Message stream lagged, {} messages skipped", skipped);
                    let event = Event::default().event("lagged").data(skipped.to_string());
                    return Some((Ok(event), rx));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(KEEP_ALIVE_SECS))
            .text("keep-alive"),
    )
}
