//! Server-sent event stream of file changes.

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{
    future,
    stream::{self, Stream, StreamExt},
};
use std::convert::Infallible;
use tracing::error;

use crate::live;
use crate::state::AppState;

/// Open a long-lived event stream for the calling browser tab.
///
/// The connection stays registered until the client goes away or the
/// server closes it. Each file event arrives as one `data:` record.
pub async fn stream_handler(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, String)> {
    let subscription = live::open(state.broadcaster.registry(), state.config.subscriber_buffer)
        .map_err(|e| {
            error!(error = %e, "Failed to register stream client");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    // Sent first so the client's onopen fires without waiting for an event.
    let connected = stream::once(future::ready(Ok::<_, Infallible>(
        Event::default().comment("connected"),
    )));
    let events = subscription.map(|payload| Ok(Event::default().data(payload)));

    Ok(Sse::new(connected.chain(events)).keep_alive(
        KeepAlive::new()
            .interval(state.config.keep_alive)
            .text("keep-alive"),
    ))
}
