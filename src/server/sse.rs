//! Server-sent events for history changes.

use std::convert::Infallible;

use actix_web::web::{self, Bytes};
use actix_web::{HttpResponse, Responder};
use futures_util::stream::{self, Stream};
use tokio::sync::broadcast::{self, error::RecvError};

use super::AppState;
use crate::service::HistoryEvent;

/// Encode one event as an SSE frame.
pub(crate) fn sse_frame(event: &HistoryEvent) -> Option<Bytes> {
    match serde_json::to_string(event) {
        Ok(data) => Some(Bytes::from(format!(
            "event: {}\ndata: {data}\n\n",
            event.name()
        ))),
        Err(e) => {
            tracing::error!(error = %e, event = event.name(), "Failed to encode event");
            None
        }
    }
}

/// SSE frames for every event received on `receiver`. Ends when the
/// channel closes; lagged receivers skip what they missed.
pub(crate) fn event_stream(
    receiver: broadcast::Receiver<HistoryEvent>,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Some(frame) = sse_frame(&event) {
                        return Some((Ok(frame), receiver));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

/// `GET /api/analyses/events`
pub async fn history_events(state: web::Data<AppState>) -> impl Responder {
    tracing::debug!("Event subscriber connected");
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(event_stream(state.service.subscribe()))
}
