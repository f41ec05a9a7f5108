use axum::response::sse::Event;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::upstream::UpstreamCallError;

pub const DONE_SENTINEL: &str = "[DONE]";

/// Decoded form of one upstream SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Text increment to forward.
    Delta(String),
    /// Well-formed event with nothing to forward.
    Empty,
    /// End-of-stream sentinel.
    Done,
    /// Undecodable payload; dropped, the stream continues.
    Malformed,
}

/// Decodes one event payload. Sentinel first, then a tolerant walk of
/// `choices[0].delta.content`; only a payload that fails to parse as JSON
/// at all counts as malformed.
pub fn decode_frame(data: &str) -> Frame {
    if data.trim() == DONE_SENTINEL {
        return Frame::Done;
    }
    let Ok(value) = serde_json::from_str::<Value>(data) else {
        return Frame::Malformed;
    };
    match value
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("delta"))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.as_str())
    {
        Some(content) if !content.is_empty() => Frame::Delta(content.to_string()),
        _ => Frame::Empty,
    }
}

fn content_event(text: &str) -> Event {
    Event::default().data(json!({ "content": text }).to_string())
}

fn error_event(message: &str) -> Event {
    Event::default().data(json!({ "error": message }).to_string())
}

/// Relays a successful upstream SSE response to the caller as an
/// independent event stream. The loop runs in a spawned task behind a
/// bounded channel; when the caller goes away the send fails, the task
/// returns and the upstream response is dropped with it.
pub fn relay_stream(
    resp: reqwest::Response,
) -> impl futures_util::Stream<Item = Result<Event, std::convert::Infallible>> + Send + 'static {
    let (tx, rx) = mpsc::channel::<Event>(64);
    tokio::spawn(async move {
        let mut frames = resp.bytes_stream().eventsource();
        while let Some(frame) = frames.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(err) => {
                    tracing::debug!("upstream stream ended abnormally: {err}");
                    break;
                }
            };
            match decode_frame(&frame.data) {
                Frame::Delta(text) => {
                    metrics::counter!("translay_stream_frames_total", "outcome" => "delta")
                        .increment(1);
                    if tx.send(content_event(&text)).await.is_err() {
                        break;
                    }
                }
                Frame::Empty => {
                    metrics::counter!("translay_stream_frames_total", "outcome" => "empty")
                        .increment(1);
                }
                Frame::Done => break,
                Frame::Malformed => {
                    metrics::counter!("translay_stream_frames_total", "outcome" => "malformed")
                        .increment(1);
                    tracing::debug!(len = frame.data.len(), "dropping malformed stream frame");
                }
            }
        }
    });
    ReceiverStream::new(rx).map(Ok)
}

/// One-event stream carrying an upstream failure, for errors that have to
/// ride the already-committed `text/event-stream` response.
pub fn error_stream(
    err: &UpstreamCallError,
) -> impl futures_util::Stream<Item = Result<Event, std::convert::Infallible>> + Send + 'static {
    futures_util::stream::iter([Ok(error_event(&err.message))])
}
