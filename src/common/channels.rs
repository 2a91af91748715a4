//! Channel type definitions for inter-task communication

use tokio::sync::mpsc;

/// Default tracking queue size
pub const DEFAULT_CHANNEL_SIZE: usize = 1000;

/// Order handed from the pipeline to the tracker.
///
/// Only the immutable `(order_id, symbol)` pair crosses the task boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackJob {
    pub order_id: String,
    pub symbol: String,
}

impl TrackJob {
    pub fn new(order_id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            symbol: symbol.into(),
        }
    }
}

/// Create a tracking channel; a zero size is raised to one
pub fn create_tracking_channel_with_size(
    size: usize,
) -> (mpsc::Sender<TrackJob>, mpsc::Receiver<TrackJob>) {
    mpsc::channel(size.max(1))
}
