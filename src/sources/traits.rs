//! Trait definitions for the external collaborators
//!
//! These traits abstract over the prediction API and the push channel so the
//! monitor can run against mocks in tests and real transports in production.

use super::report::PredictionReport;
use crate::error::{FetchError, StreamError};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One-shot bootstrap request for the aggregate anomaly count
#[async_trait]
pub trait PredictionFetcher: Send + Sync {
    /// Fetch the current prediction report
    async fn fetch(&self) -> Result<PredictionReport, FetchError>;

    /// Address the fetcher talks to, for diagnostics
    fn endpoint(&self) -> &str;
}

/// Server-initiated push channel of named events
pub trait AlertStream: Send + Sync {
    /// Start delivering events named `event` into `sink`
    ///
    /// Delivery continues until the returned [`Subscription`] is released.
    /// Must be called from within a tokio runtime.
    fn subscribe(&self, event: &str, sink: EventSink) -> Subscription;
}

/// Item delivered by an [`AlertStream`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Raw payload of a matching event, not yet validated
    Payload(String),
    /// The transport stopped delivering; `None` for a clean close
    Ended(Option<StreamError>),
}

/// Channel-backed destination for stream events
///
/// Wraps any unbounded sender whose item type can be built from a
/// [`StreamEvent`], so several producers can share one ordered channel.
#[derive(Clone)]
pub struct EventSink {
    send: Arc<dyn Fn(StreamEvent) -> bool + Send + Sync>,
}

impl EventSink {
    /// Create a sink that forwards into `sender`
    pub fn from_sender<T>(sender: mpsc::UnboundedSender<T>) -> Self
    where
        T: From<StreamEvent> + Send + 'static,
    {
        Self {
            send: Arc::new(move |event| sender.send(T::from(event)).is_ok()),
        }
    }

    /// Deliver an event. Returns `false` once the receiving side is gone.
    pub fn deliver(&self, event: StreamEvent) -> bool {
        (self.send)(event)
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}

/// Scoped listener registration
///
/// Releasing (explicitly or on drop) removes exactly this listener, once.
pub struct Subscription {
    event: String,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Create a subscription that runs `release` when it ends
    pub fn new(event: impl Into<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            event: event.into(),
            release: Some(Box::new(release)),
        }
    }

    /// Event name this subscription listens to
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Release the listener now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
            log::debug!("Unsubscribed from '{}' events", self.event);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscription_releases_once_on_drop() {
        let releases = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&releases);
        let subscription = Subscription::new("alert", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(subscription.is_active());
        assert_eq!(subscription.event(), "alert");
        drop(subscription);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_unsubscribe_does_not_double_release() {
        let releases = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&releases);
        let subscription = Subscription::new("alert", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // unsubscribe consumes the guard; Drop runs afterwards with nothing left
        subscription.unsubscribe();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[derive(Debug, PartialEq)]
    enum Wrapped {
        Stream(StreamEvent),
    }

    impl From<StreamEvent> for Wrapped {
        fn from(event: StreamEvent) -> Self {
            Wrapped::Stream(event)
        }
    }

    #[test]
    fn test_event_sink_wraps_sender() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Wrapped>();
        let sink = EventSink::from_sender(tx);

        assert!(sink.deliver(StreamEvent::Payload("{}".to_string())));
        assert_eq!(
            rx.try_recv().unwrap(),
            Wrapped::Stream(StreamEvent::Payload("{}".to_string()))
        );

        drop(rx);
        assert!(!sink.deliver(StreamEvent::Ended(None)));
    }
}
