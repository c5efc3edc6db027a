//! Alert monitor
//!
//! Owns one [`AlertBoard`] for the lifetime of the component. The bootstrap
//! fetch and the stream subscription are two producers feeding one ordered
//! channel; a single task consumes it and is the only writer of the board.

use crate::alerts::{AlertBoard, AlertRecord, AlertView, BoardEvent, AUTO_HIDE_AFTER};
use crate::error::{AppError, FetchError, Result};
use crate::sources::{
    AlertStream, EventSink, PredictionFetcher, PredictionReport, StreamEvent, Subscription,
};

use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Name of the pushed alert event
pub const ALERT_EVENT: &str = "alert";

/// Configuration for the monitor
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Event channel to subscribe to
    pub event_name: String,
    /// How long a notification stays visible
    pub auto_hide: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            event_name: ALERT_EVENT.to_string(),
            auto_hide: AUTO_HIDE_AFTER,
        }
    }
}

/// Messages on the monitor's inbound channel
#[derive(Debug)]
enum Inbound {
    Fetched(std::result::Result<PredictionReport, FetchError>),
    Stream(StreamEvent),
    Dismiss,
}

impl From<StreamEvent> for Inbound {
    fn from(event: StreamEvent) -> Self {
        Inbound::Stream(event)
    }
}

/// Entry point for starting a monitor
pub struct AlertMonitor;

impl AlertMonitor {
    /// Start the component: issue one fetch and open one subscription
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, S>(fetcher: F, stream: &S, settings: MonitorSettings) -> MonitorHandle
    where
        F: PredictionFetcher + 'static,
        S: AlertStream + ?Sized,
    {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<Inbound>();

        let subscription = stream.subscribe(
            &settings.event_name,
            EventSink::from_sender(inbound_tx.clone()),
        );

        let fetch_tx = inbound_tx.clone();
        tokio::spawn(async move {
            log::debug!("Fetching predictions from {}", fetcher.endpoint());
            let result = fetcher.fetch().await;
            if fetch_tx.send(Inbound::Fetched(result)).is_err() {
                log::debug!("Monitor already stopped, discarding prediction result");
            }
        });

        let board = AlertBoard::with_auto_hide(settings.auto_hide);
        let (view_tx, view_rx) = watch::channel(board.view());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(run(board, inbound_rx, view_tx, shutdown_rx, subscription));
        log::info!("Alert monitor started");

        MonitorHandle {
            inbound: inbound_tx,
            views: view_rx,
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running monitor
///
/// Dropping the handle tears the monitor down as well.
#[derive(Debug)]
pub struct MonitorHandle {
    inbound: mpsc::UnboundedSender<Inbound>,
    views: watch::Receiver<AlertView>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Latest render snapshot
    pub fn view(&self) -> AlertView {
        self.views.borrow().clone()
    }

    /// Receiver notified on every change of the render snapshot
    pub fn changes(&self) -> watch::Receiver<AlertView> {
        self.views.clone()
    }

    /// Hide the notification
    pub fn dismiss_notification(&self) -> Result<()> {
        self.inbound
            .send(Inbound::Dismiss)
            .map_err(|_| AppError::MonitorClosed)
    }

    /// Tear down: release the subscription and stop the consumer
    pub async fn shutdown(self) -> Result<()> {
        let MonitorHandle { shutdown, task, .. } = self;
        // Ignored if the task already stopped on its own
        let _ = shutdown.send(());
        task.await.map_err(|e| {
            log::error!("Alert monitor task failed: {}", e);
            AppError::MonitorClosed
        })
    }
}

async fn run(
    mut board: AlertBoard,
    mut inbound: mpsc::UnboundedReceiver<Inbound>,
    views: watch::Sender<AlertView>,
    mut shutdown: oneshot::Receiver<()>,
    subscription: Subscription,
) {
    loop {
        let deadline = board.deadline();

        let changed = tokio::select! {
            biased;

            // Fires on explicit shutdown and when the handle is dropped
            _ = &mut shutdown => break,

            message = inbound.recv() => match message {
                Some(message) => match translate(message) {
                    Some(event) => board.apply(event, Instant::now()),
                    None => false,
                },
                None => break,
            },

            _ = sleep_until(deadline) => board.apply(BoardEvent::HideDue, Instant::now()),
        };

        // Snapshots are built only for state changes
        if changed {
            views.send_replace(board.view());
        }
    }

    subscription.unsubscribe();
    log::info!(
        "Alert monitor stopped ({} alerts logged)",
        board.alerts().len()
    );
}

fn translate(message: Inbound) -> Option<BoardEvent> {
    match message {
        Inbound::Fetched(Ok(report)) => Some(BoardEvent::PredictionsLoaded(report.abnormal())),
        Inbound::Fetched(Err(e)) => Some(BoardEvent::PredictionsFailed(e.to_string())),
        Inbound::Stream(StreamEvent::Payload(payload)) => {
            Some(match AlertRecord::from_payload(&payload) {
                Ok(record) => BoardEvent::AlertReceived(record),
                Err(e) => BoardEvent::PayloadRejected(e.to_string()),
            })
        }
        Inbound::Stream(StreamEvent::Ended(Some(e))) => {
            log::warn!("Alert stream ended: {}", e);
            None
        }
        Inbound::Stream(StreamEvent::Ended(None)) => {
            log::info!("Alert stream closed by server");
            None
        }
        Inbound::Dismiss => Some(BoardEvent::DismissNotification),
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertRecord, Severity};
    use crate::mock::{MockFetcher, MockStream};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tokio::sync::Notify;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_success_adds_warning() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::returning(7), &stream, Default::default());
        let mut changes = handle.changes();

        let view = changes.wait_for(|v| !v.is_loading).await.unwrap().clone();
        assert_eq!(
            view.alerts,
            vec![AlertRecord::new(
                "Network anomalies detected: 7 counts",
                Severity::Warning
            )]
        );
        assert!(view.notification.visible);
        assert_eq!(
            view.notification.message,
            "Network anomalies detected: 7 counts"
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_is_silent() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());
        let mut changes = handle.changes();

        let view = changes.wait_for(|v| !v.is_loading).await.unwrap().clone();
        assert!(view.alerts.is_empty());
        assert!(!view.notification.visible);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_runs_once() {
        let stream = MockStream::new();
        let fetcher = MockFetcher::returning(1);
        let calls = fetcher.calls();
        let handle = AlertMonitor::start(fetcher, &stream, Default::default());

        let mut changes = handle.changes();
        changes.wait_for(|v| !v.is_loading).await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_events_keep_order_last_wins() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());
        let mut changes = handle.changes();
        changes.wait_for(|v| !v.is_loading).await.unwrap();

        assert_eq!(
            stream.push(ALERT_EVENT, r#"{"message":"Port scan","severity":"error"}"#),
            1
        );
        stream.push(ALERT_EVENT, r#"{"message":"High latency","severity":"info"}"#);

        let view = changes
            .wait_for(|v| v.alerts.len() == 2)
            .await
            .unwrap()
            .clone();
        assert_eq!(
            view.alerts,
            vec![
                AlertRecord::new("Port scan", Severity::Error),
                AlertRecord::new("High latency", Severity::Info),
            ]
        );
        assert!(view.notification.visible);
        assert_eq!(view.notification.message, "High latency");

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_event_names_are_ignored() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());

        assert_eq!(stream.push("status", r#"{"message":"up"}"#), 0);
        settle().await;
        assert!(handle.view().alerts.is_empty());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_hide_after_timeout() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());
        let mut changes = handle.changes();
        changes.wait_for(|v| !v.is_loading).await.unwrap();

        stream.push(ALERT_EVENT, r#"{"message":"Port scan","severity":"error"}"#);
        changes
            .wait_for(|v| v.notification.visible)
            .await
            .unwrap();
        let shown_at = Instant::now();

        changes
            .wait_for(|v| !v.notification.visible)
            .await
            .unwrap();
        assert!(Instant::now() >= shown_at + AUTO_HIDE_AFTER);
        // Hiding never touches the log
        assert_eq!(handle.view().alerts.len(), 1);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_alert_restarts_countdown() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());
        let mut changes = handle.changes();
        changes.wait_for(|v| !v.is_loading).await.unwrap();

        stream.push(ALERT_EVENT, r#"{"message":"first","severity":"info"}"#);
        changes
            .wait_for(|v| v.notification.visible)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_millis(3000)).await;
        stream.push(ALERT_EVENT, r#"{"message":"second","severity":"info"}"#);
        changes
            .wait_for(|v| v.notification.message == "second")
            .await
            .unwrap();
        let second_at = Instant::now();

        // Past the first alert's deadline, before the second one's
        tokio::time::advance(Duration::from_millis(5999)).await;
        settle().await;
        assert!(handle.view().notification.visible);

        changes
            .wait_for(|v| !v.notification.visible)
            .await
            .unwrap();
        assert!(Instant::now() >= second_at + AUTO_HIDE_AFTER);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_notification() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::returning(3), &stream, Default::default());
        let mut changes = handle.changes();
        changes
            .wait_for(|v| v.notification.visible)
            .await
            .unwrap();

        handle.dismiss_notification().unwrap();
        let view = changes
            .wait_for(|v| !v.notification.visible)
            .await
            .unwrap()
            .clone();
        assert_eq!(view.alerts.len(), 1);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_op_events_publish_nothing() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());
        let mut changes = handle.changes();
        changes.wait_for(|v| !v.is_loading).await.unwrap();
        changes.borrow_and_update();

        handle.dismiss_notification().unwrap();
        stream.end(None);
        settle().await;
        assert!(!changes.has_changed().unwrap());

        stream.push(ALERT_EVENT, r#"{"message":"Port scan","severity":"error"}"#);
        settle().await;
        assert!(changes.has_changed().unwrap());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_payload_is_quarantined() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());
        let mut changes = handle.changes();
        changes.wait_for(|v| !v.is_loading).await.unwrap();

        stream.push(ALERT_EVENT, r#"{"severity":"error"}"#);
        stream.push(ALERT_EVENT, r#"{"message":"Port scan"}"#);

        let view = changes
            .wait_for(|v| v.alerts.len() == 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(view.rejected_payloads, 1);
        assert_eq!(view.alerts[0].severity, Severity::Unknown);
        assert_eq!(view.alerts[0].severity.icon(), crate::alerts::SeverityIcon::Neutral);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_unsubscribes_once() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());
        assert_eq!(stream.listener_count(ALERT_EVENT), 1);

        handle.shutdown().await.unwrap();
        assert_eq!(stream.listener_count(ALERT_EVENT), 0);
        assert_eq!(stream.subscribe_count(), 1);
        assert_eq!(stream.unsubscribe_count(), 1);
        assert_eq!(stream.push(ALERT_EVENT, r#"{"message":"late"}"#), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_handle_tears_down() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());
        drop(handle);
        settle().await;

        assert_eq!(stream.listener_count(ALERT_EVENT), 0);
        assert_eq!(stream.unsubscribe_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_releases_previous_subscription() {
        let stream = MockStream::new();
        let first = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());
        first.shutdown().await.unwrap();

        let second = AlertMonitor::start(MockFetcher::failing(), &stream, Default::default());
        assert_eq!(stream.listener_count(ALERT_EVENT), 1);
        assert_eq!(stream.subscribe_count(), 2);
        assert_eq!(stream.unsubscribe_count(), 1);

        second.shutdown().await.unwrap();
        assert_eq!(stream.unsubscribe_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_fetch_after_teardown_is_discarded() {
        let stream = MockStream::new();
        let gate = Arc::new(Notify::new());
        let fetcher = MockFetcher::returning(5).gated(Arc::clone(&gate));
        let completed = fetcher.completed();

        let handle = AlertMonitor::start(fetcher, &stream, Default::default());
        let changes = handle.changes();
        settle().await;
        assert!(handle.view().is_loading);

        handle.shutdown().await.unwrap();

        gate.notify_one();
        settle().await;
        assert_eq!(completed.load(Ordering::SeqCst), 1);

        let last = changes.borrow().clone();
        assert!(last.is_loading);
        assert!(last.alerts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_first_then_fetch() {
        let stream = MockStream::new();
        let gate = Arc::new(Notify::new());
        let fetcher = MockFetcher::returning(2).gated(Arc::clone(&gate));
        let handle = AlertMonitor::start(fetcher, &stream, Default::default());
        let mut changes = handle.changes();

        stream.push(ALERT_EVENT, r#"{"message":"Port scan","severity":"error"}"#);
        changes.wait_for(|v| v.alerts.len() == 1).await.unwrap();
        gate.notify_one();

        let view = changes
            .wait_for(|v| !v.is_loading)
            .await
            .unwrap()
            .clone();
        let messages: Vec<_> = view.alerts.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Port scan", "Network anomalies detected: 2 counts"]
        );
        assert_eq!(
            view.notification.message,
            "Network anomalies detected: 2 counts"
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_end_keeps_log() {
        let stream = MockStream::new();
        let handle = AlertMonitor::start(MockFetcher::returning(1), &stream, Default::default());
        let mut changes = handle.changes();
        changes.wait_for(|v| !v.is_loading).await.unwrap();

        stream.end(Some(crate::error::StreamError::Disconnected(
            "reset".to_string(),
        )));
        settle().await;
        assert_eq!(handle.view().alerts.len(), 1);
        assert!(handle.dismiss_notification().is_ok());

        handle.shutdown().await.unwrap();
    }
}
