//! Mock implementations for testing
//!
//! Provides a scripted prediction fetcher, an in-process alert stream, and a
//! one-shot local HTTP responder for exercising the real transports.

use crate::error::FetchError;
use crate::sources::{
    AlertStream, AnomalyData, EventSink, PredictionFetcher, PredictionReport, StreamEvent,
    Subscription,
};

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Scripted prediction fetcher
#[derive(Debug)]
pub struct MockFetcher {
    result: Result<PredictionReport, FetchError>,
    gate: Option<Arc<Notify>>,
    calls: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
}

impl MockFetcher {
    /// Fetcher that reports `abnormal` anomalies
    pub fn returning(abnormal: u64) -> Self {
        Self::with_result(Ok(PredictionReport {
            anomaly_data: AnomalyData {
                normal: 0,
                abnormal,
            },
            protocol_counts: Default::default(),
        }))
    }

    /// Fetcher that always fails
    pub fn failing() -> Self {
        Self::with_result(Err(FetchError::Transport {
            url: "http://mock/get-predictions".to_string(),
            message: "connection refused".to_string(),
        }))
    }

    /// Fetcher with an explicit outcome
    pub fn with_result(result: Result<PredictionReport, FetchError>) -> Self {
        Self {
            result,
            gate: None,
            calls: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Hold every fetch until `gate` is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Counter of started fetches
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Counter of finished fetches
    pub fn completed(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.completed)
    }
}

#[async_trait]
impl PredictionFetcher for MockFetcher {
    async fn fetch(&self) -> Result<PredictionReport, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }

    fn endpoint(&self) -> &str {
        "http://mock/get-predictions"
    }
}

#[derive(Default)]
struct MockStreamState {
    listeners: Vec<(u64, String, EventSink)>,
    next_id: u64,
    subscribes: usize,
    unsubscribes: usize,
}

/// In-process alert stream driven by the test
#[derive(Clone, Default)]
pub struct MockStream {
    state: Arc<Mutex<MockStreamState>>,
}

impl MockStream {
    /// Create a stream with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a raw payload to every listener of `event`
    ///
    /// Returns the number of listeners that accepted it.
    pub fn push(&self, event: &str, payload: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .listeners
            .iter()
            .filter(|(_, name, _)| name == event)
            .filter(|(_, _, sink)| sink.deliver(StreamEvent::Payload(payload.to_string())))
            .count()
    }

    /// Signal the end of the stream to every listener
    pub fn end(&self, error: Option<crate::error::StreamError>) {
        let state = self.state.lock().unwrap();
        for (_, _, sink) in &state.listeners {
            sink.deliver(StreamEvent::Ended(error.clone()));
        }
    }

    /// Number of registered listeners for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .listeners
            .iter()
            .filter(|(_, name, _)| name == event)
            .count()
    }

    /// Total subscriptions ever made
    pub fn subscribe_count(&self) -> usize {
        self.state.lock().unwrap().subscribes
    }

    /// Total subscriptions released
    pub fn unsubscribe_count(&self) -> usize {
        self.state.lock().unwrap().unsubscribes
    }
}

impl AlertStream for MockStream {
    fn subscribe(&self, event: &str, sink: EventSink) -> Subscription {
        let id = {
            let mut state = self.state.lock().unwrap();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribes += 1;
            state.listeners.push((id, event.to_string(), sink));
            id
        };

        let state = Arc::clone(&self.state);
        Subscription::new(event, move || {
            let mut state = state.lock().unwrap();
            state.listeners.retain(|(listener, _, _)| *listener != id);
            state.unsubscribes += 1;
        })
    }
}

/// Build a raw HTTP/1.1 response that closes the connection after the body
pub fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nConnection: close\r\n\r\n{}",
        status, content_type, body
    )
}

/// Serve `response` to the first connection on an ephemeral local port
///
/// Returns the base URL of the listener.
pub async fn serve_once(response: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}

/// Base URL of a local port with nothing listening on it
pub async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
