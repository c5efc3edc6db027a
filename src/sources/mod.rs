//! External collaborators
//!
//! Trait-based abstractions over the prediction API and the alert push
//! channel, with reqwest-backed implementations.

pub mod fetcher;
pub mod report;
pub mod sse;
pub mod stream;
pub mod traits;

pub use fetcher::HttpPredictionFetcher;
pub use report::{AnomalyData, PredictionReport};
pub use stream::SseAlertStream;
pub use traits::{AlertStream, EventSink, PredictionFetcher, StreamEvent, Subscription};
