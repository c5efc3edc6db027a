//! Server-sent events alert stream
//!
//! Holds one long-lived `GET` per subscription and forwards the payloads of
//! matching events in delivery order. Reconnection is left to the caller.

use super::sse::SseParser;
use super::traits::{AlertStream, EventSink, StreamEvent, Subscription};
use crate::error::StreamError;

use futures::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use std::time::Duration;

/// reqwest-backed [`AlertStream`] speaking `text/event-stream`
#[derive(Debug, Clone)]
pub struct SseAlertStream {
    client: reqwest::Client,
    url: String,
}

impl SseAlertStream {
    /// Create a stream client for `stream_url`
    ///
    /// Only connecting is bounded by `connect_timeout`; an open stream may
    /// stay idle indefinitely.
    pub fn new(stream_url: &str, connect_timeout: Duration) -> Result<Self, StreamError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| StreamError::Connect {
                url: stream_url.to_string(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            url: stream_url.to_string(),
        })
    }

    /// Stream endpoint
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AlertStream for SseAlertStream {
    fn subscribe(&self, event: &str, sink: EventSink) -> Subscription {
        let task = tokio::spawn(pump(
            self.client.clone(),
            self.url.clone(),
            event.to_string(),
            sink,
        ));
        Subscription::new(event, move || task.abort())
    }
}

async fn pump(client: reqwest::Client, url: String, event: String, sink: EventSink) {
    log::info!("Subscribing to '{}' events at {}", event, url);

    let response = client
        .get(&url)
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await
        .and_then(|response| response.error_for_status());

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            sink.deliver(StreamEvent::Ended(Some(StreamError::Connect {
                url,
                message: e.to_string(),
            })));
            return;
        }
    };

    let mut body = response.bytes_stream();
    let mut parser = SseParser::new();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                sink.deliver(StreamEvent::Ended(Some(StreamError::Disconnected(
                    e.to_string(),
                ))));
                return;
            }
        };

        for frame in parser.feed(&chunk) {
            if frame.event != event {
                log::trace!("Skipping '{}' event", frame.event);
                continue;
            }
            if !sink.deliver(StreamEvent::Payload(frame.data)) {
                // Receiver is gone, nobody is listening any more
                return;
            }
        }
    }

    sink.deliver(StreamEvent::Ended(None));
}
